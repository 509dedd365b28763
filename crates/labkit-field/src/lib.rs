// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-field
//!
//! Acquisition core for the 6x6 electrode board:
//!
//! - [`parser`]: classifies board output lines (`Start`, `Mux: m Channel: c`,
//!   `Current Voltage: v`)
//! - [`assembler`]: accumulates readings into a [`VoltageGrid`] and emits it
//!   every 36 readings
//! - [`transform`]: unit electric field and 2x2 block averages from a grid
//!
//! ```
//! use labkit_field::{field_transform, GridAssembler, LineOutcome};
//!
//! let mut assembler = GridAssembler::new();
//! assembler.feed("Start");
//! for index in 0..36 {
//!     assembler.feed(&format!("Mux: {} Channel: {}", index / 12, index % 12));
//!     if let LineOutcome::GridComplete(grid) = assembler.feed("Current Voltage: 1.5") {
//!         let frame = field_transform(&grid);
//!         assert_eq!(frame.dim(), (5, 5));
//!     }
//! }
//! ```

pub mod assembler;
pub mod error;
pub mod grid;
pub mod parser;
pub mod transform;

pub use assembler::{AssemblerStats, GridAssembler, IgnoreReason, LineOutcome};
pub use error::{FieldError, LineParseError};
pub use grid::{GridAddress, VoltageGrid, GRID_SIDE, READINGS_PER_GRID};
pub use parser::{parse_line, SerialLine};
pub use transform::{field_transform, field_transform_array, FieldFrame, MAGNITUDE_FLOOR};
