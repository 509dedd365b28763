// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reversed "gist heat" colormap: white at the low end through yellow and
//! red to black at the high end.

use plotters::style::RGBColor;

/// Map `t` in [0, 1] to a colour. Values outside the range are clamped.
pub fn gist_heat_r(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let x = 1.0 - t;
    let r = (1.5 * x).clamp(0.0, 1.0);
    let g = (2.0 * x - 1.0).clamp(0.0, 1.0);
    let b = (4.0 * x - 3.0).clamp(0.0, 1.0);
    RGBColor(to_byte(r), to_byte(g), to_byte(b))
}

/// Position of `value` inside `(lo, hi)` as a fraction.
pub fn normalize(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.5
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}
