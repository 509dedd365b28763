// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Errors raised by the field pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("Mux {mux} / channel {channel} maps to cell ({row}, {col}), outside the {rows}x{cols} grid")]
    CellOutOfRange {
        mux: u32,
        channel: u32,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Grid must be at least 2x2 and square, got {rows}x{cols}")]
    InvalidGridShape { rows: usize, cols: usize },
}

/// Why a serial line could not be parsed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineParseError {
    /// Recognized prefix, but the token at `index` is absent
    #[error("Line '{line}' has no token {index}")]
    MissingToken { line: String, index: usize },
    /// Recognized prefix, but the token does not parse as a number
    #[error("Line '{line}': '{token}' is not a number")]
    BadNumber { line: String, token: String },
}
