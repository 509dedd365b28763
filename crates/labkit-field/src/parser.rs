// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Board output line classifier
//!
//! The multiplexer firmware prints three kinds of lines:
//!
//! ```text
//! Start
//! Mux: 1 Channel: 7
//! Current Voltage: 2.43
//! ```
//!
//! Matching is case-sensitive. Values are located by whitespace token index.

use crate::error::LineParseError;

pub const START_MARKER: &str = "Start";
pub const ADDRESS_PREFIX: &str = "Mux:";
pub const VOLTAGE_PREFIX: &str = "Current Voltage:";

const MUX_TOKEN: usize = 1;
const CHANNEL_TOKEN: usize = 3;
const VOLTAGE_TOKEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SerialLine {
    /// Begin a new acquisition
    Start,
    /// Address of the electrode whose voltage follows
    Address { mux: u32, channel: u32 },
    /// Voltage of the most recently addressed electrode
    Voltage(f64),
    /// Anything else the board prints (banners, blank lines, noise)
    Unrecognized,
}

/// Classify one line. Surrounding whitespace is ignored.
///
/// Lines that carry a known prefix but a missing or non-numeric value are
/// reported as errors so the caller can log them; they never hold a reading.
pub fn parse_line(line: &str) -> Result<SerialLine, LineParseError> {
    let line = line.trim();

    if line == START_MARKER {
        return Ok(SerialLine::Start);
    }

    if line.starts_with(ADDRESS_PREFIX) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mux = numeric_token::<u32>(line, &tokens, MUX_TOKEN)?;
        let channel = numeric_token::<u32>(line, &tokens, CHANNEL_TOKEN)?;
        return Ok(SerialLine::Address { mux, channel });
    }

    if line.starts_with(VOLTAGE_PREFIX) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let voltage = numeric_token::<f64>(line, &tokens, VOLTAGE_TOKEN)?;
        return Ok(SerialLine::Voltage(voltage));
    }

    Ok(SerialLine::Unrecognized)
}

fn numeric_token<T: std::str::FromStr>(
    line: &str,
    tokens: &[&str],
    index: usize,
) -> Result<T, LineParseError> {
    let token = tokens.get(index).ok_or_else(|| LineParseError::MissingToken {
        line: line.to_string(),
        index,
    })?;
    token.parse::<T>().map_err(|_| LineParseError::BadNumber {
        line: line.to_string(),
        token: token.to_string(),
    })
}
