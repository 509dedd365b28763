// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Newline framing
//!
//! Each [`LineReader::read_line`] call performs at most one bounded read on
//! the link, so the caller's loop blocks on the port timeout rather than
//! spinning on an availability check.

use super::serial::SerialIO;

const READ_CHUNK: usize = 256;

/// Longest run of bytes kept while waiting for a line terminator
pub const MAX_LINE_BYTES: usize = 4096;

/// Splits a serial byte stream into text lines, preserving arrival order.
pub struct LineReader<S> {
    io: S,
    pending: Vec<u8>,
    lines_read: u64,
    bytes_discarded: u64,
}

impl<S: SerialIO> LineReader<S> {
    pub fn new(io: S) -> Self {
        Self {
            io,
            pending: Vec::with_capacity(READ_CHUNK),
            lines_read: 0,
            bytes_discarded: 0,
        }
    }

    /// Next complete line, decoded as UTF-8 (invalid bytes replaced) with
    /// surrounding whitespace and `\r` removed.
    ///
    /// Returns `Ok(None)` when the read timed out before a full line arrived.
    /// At end of a finite stream, a trailing unterminated line is returned once.
    /// Unterminated data beyond [`MAX_LINE_BYTES`] is dropped with a warning.
    pub fn read_line(&mut self) -> Result<Option<String>, S::Error> {
        if let Some(line) = self.take_buffered_line() {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; READ_CHUNK];
        let n = self.io.read(&mut chunk)?;
        if n == 0 {
            if self.io.at_end_of_stream() && !self.pending.is_empty() {
                let rest = std::mem::take(&mut self.pending);
                self.lines_read += 1;
                return Ok(Some(decode(&rest)));
            }
            return Ok(None);
        }

        self.pending.extend_from_slice(&chunk[..n]);
        let line = self.take_buffered_line();
        if line.is_none() && self.pending.len() > MAX_LINE_BYTES {
            self.discard_pending();
        }
        Ok(line)
    }

    fn discard_pending(&mut self) {
        let dropped = self.pending.len();
        self.pending.clear();
        self.bytes_discarded += dropped as u64;
        tracing::warn!(
            target: "labkit_hal",
            "Discarding {} bytes without a line terminator",
            dropped
        );
    }

    fn take_buffered_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=newline).collect();
        self.lines_read += 1;
        Some(decode(&line))
    }

    /// True once the source is exhausted and no buffered bytes remain.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.io.at_end_of_stream()
    }

    /// Number of lines handed out so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Bytes dropped because no terminator arrived within [`MAX_LINE_BYTES`]
    pub fn bytes_discarded(&self) -> u64 {
        self.bytes_discarded
    }

    pub fn get_ref(&self) -> &S {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.io
    }

    pub fn into_inner(self) -> S {
        self.io
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::ReplaySerial;

    fn collect_lines(reader: &mut LineReader<ReplaySerial>) -> Vec<String> {
        let mut lines = Vec::new();
        while !reader.is_finished() {
            if let Some(line) = reader.read_line().unwrap() {
                lines.push(line);
            }
        }
        lines
    }

    #[test]
    fn test_lines_split_across_reads() {
        let replay = ReplaySerial::from_bytes(b"Start\r\nMux: 0 Channel: 1\nCurrent Voltage: 2.50\n".to_vec())
            .with_chunk_size(3);
        let mut reader = LineReader::new(replay);

        assert_eq!(
            collect_lines(&mut reader),
            vec!["Start", "Mux: 0 Channel: 1", "Current Voltage: 2.50"]
        );
        assert_eq!(reader.lines_read(), 3);
    }

    #[test]
    fn test_trailing_partial_line_flushed_at_end() {
        let replay = ReplaySerial::from_bytes(b"Start\nCurrent Voltage: 1.0".to_vec());
        let mut reader = LineReader::new(replay);

        assert_eq!(collect_lines(&mut reader), vec!["Start", "Current Voltage: 1.0"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_fatal() {
        let replay = ReplaySerial::from_bytes(vec![b'S', 0xFF, b't', b'\n']);
        let mut reader = LineReader::new(replay);

        let lines = collect_lines(&mut reader);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('S'));
        assert!(lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn test_unterminated_garbage_is_capped() {
        let mut stream = vec![b'x'; 10 * 1024];
        stream.extend_from_slice(b"\nStart\n");
        let mut reader = LineReader::new(ReplaySerial::from_bytes(stream));

        let mut lines = Vec::new();
        while !reader.is_finished() {
            if let Some(line) = reader.read_line().unwrap() {
                lines.push(line);
            }
            assert!(reader.pending.len() <= MAX_LINE_BYTES + READ_CHUNK);
        }

        assert_eq!(lines.last().map(String::as_str), Some("Start"));
        assert!(lines.iter().all(|line| line.len() <= MAX_LINE_BYTES));
        assert!(reader.bytes_discarded() > 0);
    }

    #[test]
    fn test_timeout_yields_none() {
        let replay = ReplaySerial::from_bytes(Vec::new());
        let mut reader = LineReader::new(replay);
        assert_eq!(reader.read_line().unwrap(), None);
        assert!(reader.is_finished());
    }
}
