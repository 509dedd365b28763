// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Electrodes per side of the board
pub const GRID_SIDE: usize = 6;
/// Cells in one complete grid
pub const READINGS_PER_GRID: usize = GRID_SIDE * GRID_SIDE;
/// Channels per grid row; each mux spans two rows
const CHANNELS_PER_ROW: u32 = GRID_SIDE as u32;
const ROWS_PER_MUX: u32 = 2;

/// Multiplexer address of one electrode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridAddress {
    pub mux: u32,
    pub channel: u32,
}

impl GridAddress {
    pub fn new(mux: u32, channel: u32) -> Self {
        Self { mux, channel }
    }

    /// `(row, col)` of this electrode: row = mux*2 + channel/6, col = channel%6.
    pub fn cell(&self) -> Result<(usize, usize), FieldError> {
        let row = (self.mux as u64) * ROWS_PER_MUX as u64 + (self.channel / CHANNELS_PER_ROW) as u64;
        let col = (self.channel % CHANNELS_PER_ROW) as usize;
        let row = usize::try_from(row).unwrap_or(usize::MAX);
        if row >= GRID_SIDE || col >= GRID_SIDE {
            return Err(FieldError::CellOutOfRange {
                mux: self.mux,
                channel: self.channel,
                row,
                col,
                rows: GRID_SIDE,
                cols: GRID_SIDE,
            });
        }
        Ok((row, col))
    }
}

impl Display for GridAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mux {}, Channel {}", self.mux, self.channel)
    }
}

/// 6x6 electrode potentials in volts, indexed `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageGrid {
    cells: Array2<f64>,
}

impl Default for VoltageGrid {
    fn default() -> Self {
        Self::zeros()
    }
}

impl VoltageGrid {
    pub fn zeros() -> Self {
        Self {
            cells: Array2::zeros((GRID_SIDE, GRID_SIDE)),
        }
    }

    /// Wrap an existing 6x6 array.
    pub fn from_array(cells: Array2<f64>) -> Result<Self, FieldError> {
        let (rows, cols) = cells.dim();
        if rows != GRID_SIDE || cols != GRID_SIDE {
            return Err(FieldError::InvalidGridShape { rows, cols });
        }
        Ok(Self { cells })
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get((row, col)).copied()
    }

    /// Store the voltage read at `address`, returning the cell written.
    pub fn record(&mut self, address: GridAddress, voltage: f64) -> Result<(usize, usize), FieldError> {
        let (row, col) = address.cell()?;
        self.cells[[row, col]] = voltage;
        Ok((row, col))
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.cells.view()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.cells
    }

    pub fn into_array(self) -> Array2<f64> {
        self.cells
    }

    /// Row-major copy, for JSON dumps and logs
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.cells.outer_iter().map(|row| row.to_vec()).collect()
    }
}

impl Display for VoltageGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.outer_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row.iter().map(|v| format!("{:>7.3}", v)).collect();
            write!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
