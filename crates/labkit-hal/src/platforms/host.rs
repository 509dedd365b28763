// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host (desktop) serial port
//!
//! The board prints one reading per line at a fixed baud rate; the port is
//! opened with a read timeout so [`SerialIO::read`] never blocks longer than
//! that.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use crate::hal::{SerialError, SerialIO};

pub struct HostSerialPort {
    name: String,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl std::fmt::Debug for HostSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSerialPort")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl HostSerialPort {
    /// Open `name` (e.g. `COM5`, `/dev/ttyACM0`) at `baud_rate`.
    pub fn open(name: &str, baud_rate: u32, timeout: Duration) -> Result<Self, SerialError> {
        let port = serialport::new(name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| SerialError::Open {
                port: name.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(
            target: "labkit_hal",
            "Opened serial port {} @ {} baud (timeout {:?})",
            name,
            baud_rate,
            timeout
        );

        Ok(Self {
            name: name.to_string(),
            port: Some(port),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn serialport::SerialPort>, SerialError> {
        self.port.as_mut().ok_or(SerialError::Closed)
    }
}

impl SerialIO for HostSerialPort {
    type Error = SerialError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        Ok(self.port_mut()?.write(data)?)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        match self.port_mut()?.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => Ok(0),
            Err(e) => Err(SerialError::Io(e)),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(self.port_mut()?.flush()?)
    }

    fn available(&self) -> Result<bool, Self::Error> {
        let port = self.port.as_ref().ok_or(SerialError::Closed)?;
        let waiting = port
            .bytes_to_read()
            .map_err(|e| SerialError::Io(std::io::Error::new(ErrorKind::Other, e)))?;
        Ok(waiting > 0)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if self.port.take().is_some() {
            tracing::info!(target: "labkit_hal", "Closed serial port {}", self.name);
        }
        Ok(())
    }
}

impl Drop for HostSerialPort {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
