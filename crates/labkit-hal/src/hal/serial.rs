// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by serial links
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("Failed to open serial port {port}: {reason}")]
    Open { port: String, reason: String },

    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port is closed")]
    Closed,
}

/// Serial I/O abstraction
pub trait SerialIO {
    /// Platform-specific error type
    type Error;

    /// Write bytes to serial port
    ///
    /// # Returns
    /// Number of bytes written or error
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read bytes from serial port
    ///
    /// Waits at most the link's read timeout. A timeout with nothing received
    /// is `Ok(0)`, not an error.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Flush output buffer
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available to read
    fn available(&self) -> Result<bool, Self::Error> {
        // Default implementation - platforms can override
        Ok(false)
    }

    /// Release the underlying device. Further reads fail.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// True when the source can never produce more bytes (finite replays).
    /// Live ports always return false.
    fn at_end_of_stream(&self) -> bool {
        false
    }
}
