// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Newline framing over a serial byte stream.
pub mod line_reader;
/// Serial input/output traits for UART-style communication.
pub mod serial;

pub use line_reader::LineReader;
pub use serial::{SerialError, SerialIO};
