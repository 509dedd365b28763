// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Potential grid to electric field
//!
//! With unit electrode spacing, for an N×N potential grid `V`:
//!
//! ```text
//! Ex[i,j] = -(V[i,j+1] - V[i,j])
//! Ey[i,j] = -(V[i+1,j] - V[i,j])          i, j in 0..N-1
//! |E|     = sqrt(Ex² + Ey²) + 1e-10
//! ```
//!
//! Both components are divided by `|E|`, so every output vector has unit
//! length except where the potential is flat. The block average is the mean
//! of each 2x2 neighbourhood and only drives colouring.

use ndarray::{s, Array2, ArrayView2, Zip};

use crate::error::FieldError;
use crate::grid::VoltageGrid;

/// Added to the field magnitude before normalizing
pub const MAGNITUDE_FLOOR: f64 = 1e-10;

/// One frame of derived field data, each array (N-1)×(N-1)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFrame {
    /// Normalized x component
    pub ex: Array2<f64>,
    /// Normalized y component
    pub ey: Array2<f64>,
    /// Mean potential of each 2x2 electrode block
    pub block_average: Array2<f64>,
}

impl FieldFrame {
    /// `(rows, cols)` of the vector field
    pub fn dim(&self) -> (usize, usize) {
        self.ex.dim()
    }

    /// Min and max block-averaged potential, for the colour scale.
    /// A flat frame is widened to a non-empty range.
    pub fn potential_range(&self) -> (f64, f64) {
        let (min, max) = self
            .block_average
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return (0.0, 1.0);
        }
        if (max - min).abs() < f64::EPSILON {
            return (min - 0.5, max + 0.5);
        }
        (min, max)
    }

    /// Length of each normalized vector
    pub fn unit_norms(&self) -> Array2<f64> {
        Zip::from(&self.ex)
            .and(&self.ey)
            .map_collect(|&x, &y| (x * x + y * y).sqrt())
    }
}

pub fn field_transform(grid: &VoltageGrid) -> FieldFrame {
    transform_unchecked(grid.view())
}

/// Transform any square grid of side N >= 2.
pub fn field_transform_array(potentials: ArrayView2<'_, f64>) -> Result<FieldFrame, FieldError> {
    let (rows, cols) = potentials.dim();
    if rows < 2 || rows != cols {
        return Err(FieldError::InvalidGridShape { rows, cols });
    }
    Ok(transform_unchecked(potentials))
}

fn transform_unchecked(v: ArrayView2<'_, f64>) -> FieldFrame {
    let origin = v.slice(s![..-1, ..-1]);
    let right = v.slice(s![..-1, 1..]);
    let below = v.slice(s![1.., ..-1]);
    let diagonal = v.slice(s![1.., 1..]);

    let ex_raw = &origin - &right;
    let ey_raw = &origin - &below;

    let magnitude = Zip::from(&ex_raw)
        .and(&ey_raw)
        .map_collect(|&x, &y| (x * x + y * y).sqrt() + MAGNITUDE_FLOOR);

    let ex = &ex_raw / &magnitude;
    let ey = &ey_raw / &magnitude;

    let block_average = Zip::from(&origin)
        .and(&right)
        .and(&below)
        .and(&diagonal)
        .map_collect(|&a, &b, &c, &d| (a + b + c + d) / 4.0);

    FieldFrame {
        ex,
        ey,
        block_average,
    }
}
