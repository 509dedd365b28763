// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Desktop serial port backed by the `serialport` crate.
#[cfg(feature = "host-serial")]
pub mod host;
/// In-memory / file replay of a captured serial session.
pub mod replay;

#[cfg(feature = "host-serial")]
pub use host::HostSerialPort;
pub use replay::ReplaySerial;
