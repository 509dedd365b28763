// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Replay of a captured serial session
//!
//! Feeds recorded board output back through [`SerialIO`] so acquisition can
//! run without hardware. Reads are delivered in fixed-size chunks to exercise
//! line reassembly.

use std::path::Path;

use crate::hal::{SerialError, SerialIO};

const DEFAULT_CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct ReplaySerial {
    data: Vec<u8>,
    cursor: usize,
    chunk_size: usize,
    written: Vec<u8>,
    closed: bool,
}

impl ReplaySerial {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            cursor: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            written: Vec::new(),
            closed: false,
        }
    }

    /// Joins `lines` with `\n`, the way the board prints them.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut data = Vec::new();
        for line in lines {
            data.extend_from_slice(line.as_ref().as_bytes());
            data.push(b'\n');
        }
        Self::from_bytes(data)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SerialError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| SerialError::Open {
            port: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            target: "labkit_hal",
            "Replaying {} bytes from {}",
            data.len(),
            path.display()
        );
        Ok(Self::from_bytes(data))
    }

    /// Maximum bytes returned per read (minimum 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bytes the host wrote to the link
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl SerialIO for ReplaySerial {
    type Error = SerialError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if self.closed {
            return Err(SerialError::Closed);
        }
        self.written.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        if self.closed {
            return Err(SerialError::Closed);
        }
        let n = self.remaining().min(self.chunk_size).min(buffer.len());
        buffer[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> Result<bool, Self::Error> {
        Ok(!self.closed && self.remaining() > 0)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closed = true;
        Ok(())
    }

    fn at_end_of_stream(&self) -> bool {
        self.closed || self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_respect_chunk_size() {
        let mut replay = ReplaySerial::from_bytes(b"abcdefg".to_vec()).with_chunk_size(3);
        let mut buf = [0u8; 16];

        assert_eq!(replay.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(replay.read(&mut buf).unwrap(), 3);
        assert_eq!(replay.read(&mut buf).unwrap(), 1);
        assert_eq!(replay.read(&mut buf).unwrap(), 0);
        assert!(replay.at_end_of_stream());
    }

    #[test]
    fn test_from_lines_appends_newlines() {
        let replay = ReplaySerial::from_lines(["Start", "Mux: 0 Channel: 0"]);
        assert_eq!(replay.remaining(), "Start\nMux: 0 Channel: 0\n".len());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Start\n").unwrap();

        let replay = ReplaySerial::from_file(file.path()).unwrap();
        assert_eq!(replay.remaining(), 6);
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = ReplaySerial::from_file("/nonexistent/capture.log").unwrap_err();
        assert!(matches!(err, SerialError::Open { .. }));
    }

    #[test]
    fn test_closed_link_rejects_io() {
        let mut replay = ReplaySerial::from_bytes(b"x".to_vec());
        replay.write(b"ping").unwrap();
        assert_eq!(replay.written(), b"ping");

        replay.close().unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(replay.read(&mut buf), Err(SerialError::Closed)));
        assert!(replay.at_end_of_stream());
    }
}
