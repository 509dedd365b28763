// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-hal
//!
//! Hardware Abstraction Layer for the electrode board link.
//!
//! - [`hal::SerialIO`]: platform-agnostic byte-level serial trait
//! - [`hal::LineReader`]: newline framing on top of any `SerialIO`, with a
//!   bounded wait per call instead of busy polling
//! - [`platforms::HostSerialPort`]: desktop serial port (feature `host-serial`)
//! - [`platforms::ReplaySerial`]: replays a captured serial log

pub mod hal;
pub mod platforms;

pub use hal::{LineReader, SerialError, SerialIO};
#[cfg(feature = "host-serial")]
pub use platforms::HostSerialPort;
pub use platforms::ReplaySerial;
