// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Grid assembly
//!
//! [`GridAssembler`] consumes board lines in arrival order and hands out a
//! [`VoltageGrid`] every [`READINGS_PER_GRID`] recorded readings. The counter
//! resets after each hand-off but the grid keeps its values until the next
//! `Start`, unless [`GridAssembler::with_reset_each_cycle`] is enabled.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::error::{FieldError, LineParseError};
use crate::grid::{GridAddress, VoltageGrid, READINGS_PER_GRID};
use crate::parser::{parse_line, SerialLine, ADDRESS_PREFIX};

/// Why a line produced no reading
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    /// No `Start` seen yet
    BeforeStart,
    /// Voltage arrived without a preceding address line
    NoAddress,
    Unrecognized,
    Malformed(LineParseError),
    OutOfRange(FieldError),
}

impl Display for IgnoreReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::BeforeStart => write!(f, "waiting for Start"),
            IgnoreReason::NoAddress => write!(f, "voltage without a Mux/Channel line"),
            IgnoreReason::Unrecognized => write!(f, "unrecognized line"),
            IgnoreReason::Malformed(e) => write!(f, "{}", e),
            IgnoreReason::OutOfRange(e) => write!(f, "{}", e),
        }
    }
}

/// Result of feeding one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Ignored(IgnoreReason),
    Started,
    AddressCached(GridAddress),
    Recorded {
        row: usize,
        col: usize,
        voltage: f64,
        count: usize,
    },
    /// The 36th reading of a cycle was recorded; carries a snapshot of the grid.
    GridComplete(VoltageGrid),
}

/// Running totals since the assembler was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblerStats {
    pub lines_seen: u64,
    pub readings_recorded: u64,
    pub lines_ignored: u64,
    pub grids_completed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GridAssembler {
    grid: VoltageGrid,
    readings_in_cycle: usize,
    acquiring: bool,
    address: Option<GridAddress>,
    reset_each_cycle: bool,
    stats: AssemblerStats,
}

impl GridAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the grid after each completed cycle instead of carrying the
    /// previous cycle's values forward.
    pub fn with_reset_each_cycle(mut self, reset: bool) -> Self {
        self.reset_each_cycle = reset;
        self
    }

    pub fn feed(&mut self, line: &str) -> LineOutcome {
        self.stats.lines_seen += 1;
        let outcome = self.classify(line);
        if let LineOutcome::Ignored(reason) = &outcome {
            self.stats.lines_ignored += 1;
            match reason {
                IgnoreReason::OutOfRange(e) => {
                    tracing::warn!(target: "labkit_field", "Discarding reading: {}", e)
                }
                _ => tracing::debug!(target: "labkit_field", "Ignoring '{}': {}", line.trim(), reason),
            }
        }
        outcome
    }

    fn classify(&mut self, line: &str) -> LineOutcome {
        let parsed = parse_line(line);

        if matches!(parsed, Ok(SerialLine::Start)) {
            self.grid = VoltageGrid::zeros();
            self.readings_in_cycle = 0;
            self.address = None;
            self.acquiring = true;
            tracing::debug!(target: "labkit_field", "Start marker received, new grid");
            return LineOutcome::Started;
        }

        if !self.acquiring {
            return LineOutcome::Ignored(IgnoreReason::BeforeStart);
        }

        match parsed {
            Ok(SerialLine::Start) => LineOutcome::Started,
            Ok(SerialLine::Address { mux, channel }) => {
                let address = GridAddress::new(mux, channel);
                self.address = Some(address);
                LineOutcome::AddressCached(address)
            }
            Ok(SerialLine::Voltage(voltage)) => self.record(voltage),
            Ok(SerialLine::Unrecognized) => LineOutcome::Ignored(IgnoreReason::Unrecognized),
            Err(e) => {
                // A garbled address must not leave the previous electrode selected.
                if line.trim_start().starts_with(ADDRESS_PREFIX) {
                    self.address = None;
                }
                LineOutcome::Ignored(IgnoreReason::Malformed(e))
            }
        }
    }

    fn record(&mut self, voltage: f64) -> LineOutcome {
        let Some(address) = self.address else {
            return LineOutcome::Ignored(IgnoreReason::NoAddress);
        };
        let (row, col) = match self.grid.record(address, voltage) {
            Ok(cell) => cell,
            Err(e) => return LineOutcome::Ignored(IgnoreReason::OutOfRange(e)),
        };

        self.readings_in_cycle += 1;
        self.stats.readings_recorded += 1;
        tracing::debug!(
            target: "labkit_field",
            "Reading {}: {}, Voltage {}",
            self.readings_in_cycle,
            address,
            voltage
        );

        if self.readings_in_cycle < READINGS_PER_GRID {
            return LineOutcome::Recorded {
                row,
                col,
                voltage,
                count: self.readings_in_cycle,
            };
        }

        self.readings_in_cycle = 0;
        self.stats.grids_completed += 1;
        let snapshot = self.grid.clone();
        tracing::info!(target: "labkit_field", "All readings captured.");
        tracing::info!(target: "labkit_field", "\n{}", snapshot);
        if self.reset_each_cycle {
            self.grid.clear();
        }
        LineOutcome::GridComplete(snapshot)
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    /// Readings recorded in the current cycle (0..36)
    pub fn readings_in_cycle(&self) -> usize {
        self.readings_in_cycle
    }

    pub fn grid(&self) -> &VoltageGrid {
        &self.grid
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_line(index: usize) -> String {
        // Walk the documented address space: 3 muxes x 12 channels.
        format!("Mux: {} Channel: {}", index / 12, index % 12)
    }

    fn feed_reading(assembler: &mut GridAssembler, index: usize, voltage: f64) -> LineOutcome {
        assembler.feed(&address_line(index));
        assembler.feed(&format!("Current Voltage: {}", voltage))
    }

    #[test]
    fn test_voltage_before_start_is_ignored() {
        let mut assembler = GridAssembler::new();
        assert_eq!(
            assembler.feed("Current Voltage: 3.5"),
            LineOutcome::Ignored(IgnoreReason::BeforeStart)
        );
        assert_eq!(
            assembler.feed("Mux: 0 Channel: 0"),
            LineOutcome::Ignored(IgnoreReason::BeforeStart)
        );
        assert_eq!(assembler.readings_in_cycle(), 0);
        assert_eq!(assembler.grid(), &VoltageGrid::zeros());
        assert!(!assembler.is_acquiring());
    }

    #[test]
    fn test_unrecognized_line_changes_nothing() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        feed_reading(&mut assembler, 0, 1.0);
        let before = assembler.grid().clone();

        assert_eq!(
            assembler.feed("Calibrating..."),
            LineOutcome::Ignored(IgnoreReason::Unrecognized)
        );
        assert!(matches!(
            assembler.feed("Current Voltage: abc"),
            LineOutcome::Ignored(IgnoreReason::Malformed(_))
        ));
        assert_eq!(assembler.readings_in_cycle(), 1);
        assert_eq!(assembler.grid(), &before);
        assert_eq!(assembler.stats().lines_ignored, 2);
    }

    #[test]
    fn test_grid_completes_after_exactly_36_readings() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");

        for i in 0..35 {
            let outcome = feed_reading(&mut assembler, i, i as f64);
            assert!(
                matches!(outcome, LineOutcome::Recorded { count, .. } if count == i + 1),
                "reading {i}: {outcome:?}"
            );
        }
        assert_eq!(assembler.readings_in_cycle(), 35);

        let LineOutcome::GridComplete(grid) = feed_reading(&mut assembler, 35, 35.0) else {
            panic!("36th reading should complete the grid");
        };
        assert_eq!(grid.get(5, 5), Some(35.0));
        assert_eq!(grid.get(1, 0), Some(6.0));
        assert_eq!(assembler.readings_in_cycle(), 0);

        // 37th reading starts the next cycle.
        assert!(matches!(
            feed_reading(&mut assembler, 0, 100.0),
            LineOutcome::Recorded { count: 1, .. }
        ));
        assert_eq!(assembler.stats().grids_completed, 1);
    }

    #[test]
    fn test_stale_values_persist_across_cycles() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        for i in 0..36 {
            feed_reading(&mut assembler, i, 1.0);
        }
        // Second cycle rewrites a single cell 36 times.
        let mut last = None;
        for _ in 0..36 {
            last = Some(feed_reading(&mut assembler, 0, 7.0));
        }
        let Some(LineOutcome::GridComplete(grid)) = last else {
            panic!("second cycle should complete");
        };
        assert_eq!(grid.get(0, 0), Some(7.0));
        assert_eq!(grid.get(5, 5), Some(1.0));
    }

    #[test]
    fn test_reset_each_cycle_zeroes_grid() {
        let mut assembler = GridAssembler::new().with_reset_each_cycle(true);
        assembler.feed("Start");
        for i in 0..36 {
            feed_reading(&mut assembler, i, 1.0);
        }
        assert_eq!(assembler.grid(), &VoltageGrid::zeros());
    }

    #[test]
    fn test_start_resets_grid_counter_and_address() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        feed_reading(&mut assembler, 3, 2.0);
        assembler.feed("Mux: 1 Channel: 1");

        assert_eq!(assembler.feed("Start"), LineOutcome::Started);
        assert_eq!(assembler.readings_in_cycle(), 0);
        assert_eq!(assembler.grid(), &VoltageGrid::zeros());
        assert_eq!(
            assembler.feed("Current Voltage: 1.0"),
            LineOutcome::Ignored(IgnoreReason::NoAddress)
        );
    }

    #[test]
    fn test_malformed_address_clears_cached_address() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        assembler.feed("Mux: 0 Channel: 0");
        assembler.feed("Current Voltage: 1.0");

        assert!(matches!(
            assembler.feed("Mux: 1 Chan#el: x7"),
            LineOutcome::Ignored(IgnoreReason::Malformed(_))
        ));
        assert_eq!(
            assembler.feed("Current Voltage: 9.0"),
            LineOutcome::Ignored(IgnoreReason::NoAddress)
        );
        assert_eq!(assembler.grid().get(0, 0), Some(1.0));
        assert_eq!(assembler.readings_in_cycle(), 1);

        // A good address afterwards resumes recording.
        assembler.feed("Mux: 0 Channel: 1");
        assert!(matches!(
            assembler.feed("Current Voltage: 2.0"),
            LineOutcome::Recorded { row: 0, col: 1, count: 2, .. }
        ));
    }

    #[test]
    fn test_out_of_range_reading_is_discarded() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        assembler.feed("Mux: 4 Channel: 0");
        assert!(matches!(
            assembler.feed("Current Voltage: 1.0"),
            LineOutcome::Ignored(IgnoreReason::OutOfRange(FieldError::CellOutOfRange { .. }))
        ));
        assert_eq!(assembler.readings_in_cycle(), 0);
        assert_eq!(assembler.stats().readings_recorded, 0);
    }

    #[test]
    fn test_repeated_voltage_reuses_cached_address() {
        let mut assembler = GridAssembler::new();
        assembler.feed("Start");
        assembler.feed("Mux: 1 Channel: 7");
        assembler.feed("Current Voltage: 1.0");
        let outcome = assembler.feed("Current Voltage: 2.0");
        assert_eq!(
            outcome,
            LineOutcome::Recorded {
                row: 3,
                col: 1,
                voltage: 2.0,
                count: 2
            }
        );
    }
}
