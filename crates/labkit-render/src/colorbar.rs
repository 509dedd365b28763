// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

pub const COLORBAR_LABEL: &str = "Electric Potential (V)";

/// Colour scale legend shared by every frame of a renderer.
///
/// Created once on the first frame; later frames only move its limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    label: String,
    range: (f64, f64),
    updates: u64,
}

impl Colorbar {
    pub fn new(range: (f64, f64)) -> Self {
        Self {
            label: COLORBAR_LABEL.to_string(),
            range,
            updates: 0,
        }
    }

    /// Re-normalize to the limits of a new frame.
    pub fn update_normal(&mut self, range: (f64, f64)) {
        self.range = range;
        self.updates += 1;
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of [`Colorbar::update_normal`] calls since creation
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
