// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Streamline tracing over a gridded vector field
//!
//! Lines are seeded from the outside of the domain inwards and integrated in
//! both directions with a midpoint (RK2) step on the bilinearly interpolated,
//! unit-normalized field. An occupancy mask of `30 * density` cells per side
//! keeps lines apart: a line stops when it enters a cell another line (or an
//! earlier part of itself) already claimed.

use ndarray::ArrayView2;

const MASK_CELLS_PER_DENSITY: f64 = 30.0;
/// Step length as a fraction of one mask cell
const STEP_FRACTION: f64 = 0.5;
/// Maximum length of one direction, in domain widths
const MAX_LENGTH: f64 = 4.0;
/// Lines shorter than this (in domain widths) are discarded
const MIN_LENGTH: f64 = 0.1;
const STALL_SPEED: f64 = 1e-12;

pub type Point = (f64, f64);

/// Bilinear sampler over a grid whose nodes sit at integer `(x = col, y = row)`.
#[derive(Debug, Clone, Copy)]
pub struct BilinearSampler<'a> {
    values: ArrayView2<'a, f64>,
}

impl<'a> BilinearSampler<'a> {
    pub fn new(values: ArrayView2<'a, f64>) -> Self {
        Self { values }
    }

    pub fn x_max(&self) -> f64 {
        self.values.ncols().saturating_sub(1) as f64
    }

    pub fn y_max(&self) -> f64 {
        self.values.nrows().saturating_sub(1) as f64
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.x_max() && y <= self.y_max()
    }

    /// Interpolated value, or `None` outside the grid.
    pub fn sample(&self, (x, y): Point) -> Option<f64> {
        if self.values.is_empty() || !self.contains((x, y)) {
            return None;
        }
        let (rows, cols) = self.values.dim();
        let c0 = (x.floor() as usize).min(cols - 1);
        let r0 = (y.floor() as usize).min(rows - 1);
        let c1 = (c0 + 1).min(cols - 1);
        let r1 = (r0 + 1).min(rows - 1);
        let fx = x - c0 as f64;
        let fy = y - r0 as f64;

        let top = self.values[[r0, c0]] * (1.0 - fx) + self.values[[r0, c1]] * fx;
        let bottom = self.values[[r1, c0]] * (1.0 - fx) + self.values[[r1, c1]] * fx;
        Some(top * (1.0 - fy) + bottom * fy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    pub points: Vec<Point>,
}

impl Streamline {
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| distance(w[0], w[1])).sum()
    }

    /// Position and unit direction halfway along the line, for the arrowhead.
    pub fn midpoint_arrow(&self) -> Option<(Point, Point)> {
        let half = self.length() / 2.0;
        let mut travelled = 0.0;
        for w in self.points.windows(2) {
            let segment = distance(w[0], w[1]);
            if segment > 0.0 && travelled + segment >= half {
                let t = (half - travelled) / segment;
                let dir = ((w[1].0 - w[0].0) / segment, (w[1].1 - w[0].1) / segment);
                let at = (w[0].0 + dir.0 * segment * t, w[0].1 + dir.1 * segment * t);
                return Some((at, dir));
            }
            travelled += segment;
        }
        None
    }
}

struct OccupancyMask {
    cells: Vec<bool>,
    side: usize,
    x_scale: f64,
    y_scale: f64,
}

impl OccupancyMask {
    fn new(side: usize, x_max: f64, y_max: f64) -> Self {
        let span = (side - 1).max(1) as f64;
        Self {
            cells: vec![false; side * side],
            side,
            x_scale: span / x_max,
            y_scale: span / y_max,
        }
    }

    fn cell_of(&self, (x, y): Point) -> (usize, usize) {
        let cx = ((x * self.x_scale).round().max(0.0) as usize).min(self.side - 1);
        let cy = ((y * self.y_scale).round().max(0.0) as usize).min(self.side - 1);
        (cx, cy)
    }

    fn point_of(&self, (cx, cy): (usize, usize)) -> Point {
        (cx as f64 / self.x_scale, cy as f64 / self.y_scale)
    }

    fn is_set(&self, (cx, cy): (usize, usize)) -> bool {
        self.cells[cy * self.side + cx]
    }

    fn set(&mut self, (cx, cy): (usize, usize), value: bool) {
        self.cells[cy * self.side + cx] = value;
    }
}

/// Trace streamlines through `(ex, ey)`; both arrays share one shape.
pub fn trace_streamlines(
    ex: ArrayView2<'_, f64>,
    ey: ArrayView2<'_, f64>,
    density: f64,
) -> Vec<Streamline> {
    let u = BilinearSampler::new(ex);
    let v = BilinearSampler::new(ey);
    if ex.dim() != ey.dim() || u.x_max() <= 0.0 || u.y_max() <= 0.0 {
        return Vec::new();
    }

    let side = ((MASK_CELLS_PER_DENSITY * density.max(0.0)).round() as usize).max(2);
    let mut mask = OccupancyMask::new(side, u.x_max(), u.y_max());
    let width = u.x_max().max(u.y_max());
    let step = STEP_FRACTION * width / (side - 1) as f64;
    let max_steps = (MAX_LENGTH * width / step).ceil() as usize;

    let mut lines = Vec::new();
    for seed_cell in spiral_order(side) {
        if mask.is_set(seed_cell) {
            continue;
        }
        let seed = mask.point_of(seed_cell);
        let mut claimed = vec![seed_cell];
        mask.set(seed_cell, true);

        let mut backward = integrate(&u, &v, seed, -1.0, step, max_steps, &mut mask, &mut claimed);
        let forward = integrate(&u, &v, seed, 1.0, step, max_steps, &mut mask, &mut claimed);

        backward.reverse();
        backward.push(seed);
        backward.extend(forward);
        let line = Streamline { points: backward };

        if line.points.len() < 2 || line.length() < MIN_LENGTH * width {
            for cell in claimed {
                mask.set(cell, false);
            }
            continue;
        }
        lines.push(line);
    }
    lines
}

#[allow(clippy::too_many_arguments)]
fn integrate(
    u: &BilinearSampler<'_>,
    v: &BilinearSampler<'_>,
    start: Point,
    sign: f64,
    step: f64,
    max_steps: usize,
    mask: &mut OccupancyMask,
    claimed: &mut Vec<(usize, usize)>,
) -> Vec<Point> {
    let mut points = Vec::new();
    let mut position = start;
    let mut cell = mask.cell_of(start);

    for _ in 0..max_steps {
        let Some(k1) = direction(u, v, position) else { break };
        let mid = (
            position.0 + 0.5 * step * sign * k1.0,
            position.1 + 0.5 * step * sign * k1.1,
        );
        let Some(k2) = direction(u, v, mid) else { break };
        let next = (
            position.0 + step * sign * k2.0,
            position.1 + step * sign * k2.1,
        );
        if !u.contains(next) {
            break;
        }

        let next_cell = mask.cell_of(next);
        if next_cell != cell {
            if mask.is_set(next_cell) {
                break;
            }
            mask.set(next_cell, true);
            claimed.push(next_cell);
            cell = next_cell;
        }
        points.push(next);
        position = next;
    }
    points
}

fn direction(u: &BilinearSampler<'_>, v: &BilinearSampler<'_>, at: Point) -> Option<Point> {
    let dx = u.sample(at)?;
    let dy = v.sample(at)?;
    let speed = (dx * dx + dy * dy).sqrt();
    if !speed.is_finite() || speed < STALL_SPEED {
        return None;
    }
    Some((dx / speed, dy / speed))
}

/// Mask cells ordered from the outer ring inwards, clockwise.
fn spiral_order(side: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(side * side);
    let (mut x_lo, mut y_lo) = (0isize, 0isize);
    let (mut x_hi, mut y_hi) = (side as isize - 1, side as isize - 1);

    while x_lo <= x_hi && y_lo <= y_hi {
        for x in x_lo..=x_hi {
            order.push((x as usize, y_lo as usize));
        }
        for y in (y_lo + 1)..=y_hi {
            order.push((x_hi as usize, y as usize));
        }
        if y_hi > y_lo {
            for x in (x_lo..x_hi).rev() {
                order.push((x as usize, y_hi as usize));
            }
        }
        if x_hi > x_lo {
            for y in ((y_lo + 1)..y_hi).rev() {
                order.push((x_lo as usize, y as usize));
            }
        }
        x_lo += 1;
        y_lo += 1;
        x_hi -= 1;
        y_hi -= 1;
    }
    order
}

fn distance(a: Point, b: Point) -> f64 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}
