// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Two-panel field figure
//!
//! Left: unit vectors drawn as arrows one data unit long ("UNIT VECTOR").
//! Right: streamlines coloured by the block-averaged potential ("Stream
//! Field") next to the shared colorbar.

use std::path::PathBuf;

use labkit_field::FieldFrame;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::colorbar::Colorbar;
use crate::colormap::{gist_heat_r, normalize};
use crate::error::{draw_err, RenderError};
use crate::streamlines::{trace_streamlines, BilinearSampler, Point, Streamline};
use crate::surface::{RenderSurface, SurfaceFormat};

const FIGURE_TITLE: &str = "Electric Field";
const QUIVER_TITLE: &str = "UNIT VECTOR";
const STREAM_TITLE: &str = "Stream Field";
const FONT: &str = "sans-serif";
const STREAM_LINE_WIDTH: u32 = 4;
const ARROW_SIZE: f64 = 3.0;
const COLORBAR_STEPS: usize = 64;
const COLORBAR_WIDTH: u32 = 120;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Streamline spacing; 1.0 gives a 30x30 occupancy grid
    pub stream_density: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("electric_field.svg"),
            width: 1200,
            height: 600,
            stream_density: 1.0,
        }
    }
}

pub struct FieldRenderer {
    surface: RenderSurface,
    colorbar: Option<Colorbar>,
    stream_density: f64,
    frames_rendered: u64,
}

impl FieldRenderer {
    pub fn new(options: &RenderOptions) -> Result<Self, RenderError> {
        let surface = RenderSurface::new(&options.output_path, (options.width, options.height))?;
        tracing::info!(
            target: "labkit_render",
            "Rendering {}x{} field plot to {}",
            options.width,
            options.height,
            surface.path().display()
        );
        Ok(Self {
            surface,
            colorbar: None,
            stream_density: options.stream_density,
            frames_rendered: 0,
        })
    }

    /// Draw `frame`. Returns `Ok(false)` without drawing once the surface is
    /// closed.
    pub fn update(&mut self, frame: &FieldFrame) -> Result<bool, RenderError> {
        if !self.surface.is_open() {
            return Ok(false);
        }

        let range = frame.potential_range();
        let first_frame = self.colorbar.is_none();
        let colorbar = self.colorbar.get_or_insert_with(|| Colorbar::new(range));
        if !first_frame {
            colorbar.update_normal(range);
        }
        let colorbar: &Colorbar = colorbar;

        let streamlines = trace_streamlines(frame.ex.view(), frame.ey.view(), self.stream_density);
        let scene = Scene {
            frame,
            streamlines: &streamlines,
            colorbar,
        };

        let path = self.surface.path().to_path_buf();
        let size = self.surface.size();
        match self.surface.format() {
            SurfaceFormat::Svg => {
                let root = SVGBackend::new(&path, size).into_drawing_area();
                draw_figure(&root, &scene)?;
                root.present().map_err(draw_err)?;
            }
            #[cfg(feature = "png")]
            SurfaceFormat::Png => {
                let root = BitMapBackend::new(&path, size).into_drawing_area();
                draw_figure(&root, &scene)?;
                root.present().map_err(draw_err)?;
            }
        }

        self.surface.mark_written();
        self.frames_rendered += 1;
        tracing::debug!(
            target: "labkit_render",
            "Frame {} drawn with {} streamlines, potential {:.3}..{:.3} V",
            self.frames_rendered,
            streamlines.len(),
            range.0,
            range.1
        );
        Ok(true)
    }

    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    pub fn close(&mut self) {
        self.surface.close();
    }

    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }
}

struct Scene<'a> {
    frame: &'a FieldFrame,
    streamlines: &'a [Streamline],
    colorbar: &'a Colorbar,
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene<'_>,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_err)?;
    let body = root.titled(FIGURE_TITLE, (FONT, 40)).map_err(draw_err)?;

    let (width, height) = body.dim_in_pixel();
    let (left, right) = body.split_horizontally(width / 2);
    let (stream_area, colorbar_area) =
        right.split_horizontally((width - width / 2).saturating_sub(COLORBAR_WIDTH));

    draw_quiver(&left, scene.frame)?;
    draw_streams(&stream_area, scene)?;
    draw_colorbar(&colorbar_area, scene.colorbar, height)?;
    Ok(())
}

fn draw_quiver<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &FieldFrame,
) -> Result<(), RenderError> {
    let (rows, cols) = frame.dim();
    let x_max = cols.saturating_sub(1) as f64;
    let y_max = rows.saturating_sub(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(QUIVER_TITLE, (FONT, 17))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(-1.0..x_max + 1.0, -1.0..y_max + 1.0)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(draw_err)?;

    let mut shafts = Vec::with_capacity(rows * cols);
    let mut heads = Vec::with_capacity(rows * cols);
    for ((row, col), &u) in frame.ex.indexed_iter() {
        let v = frame.ey[[row, col]];
        let tail = (col as f64, row as f64);
        let tip = (tail.0 + u, tail.1 + v);
        shafts.push(PathElement::new(vec![tail, tip], BLUE.stroke_width(2)));
        if let Some(head) = arrow_head(tip, (u, v), 0.25) {
            heads.push(Polygon::new(head, BLUE.filled()));
        }
    }
    chart.draw_series(shafts).map_err(draw_err)?;
    chart.draw_series(heads).map_err(draw_err)?;
    Ok(())
}

fn draw_streams<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene<'_>,
) -> Result<(), RenderError> {
    let (rows, cols) = scene.frame.dim();
    let x_max = (cols.saturating_sub(1) as f64).max(1.0);
    let y_max = (rows.saturating_sub(1) as f64).max(1.0);
    let potential = BilinearSampler::new(scene.frame.block_average.view());
    let range = scene.colorbar.range();
    let colour_at = |p: Point| gist_heat_r(normalize(potential.sample(p).unwrap_or(range.0), range));

    let mut chart = ChartBuilder::on(area)
        .caption(STREAM_TITLE, (FONT, 17))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(draw_err)?;

    for line in scene.streamlines {
        let segments = line.points.windows(2).map(|w| {
            let mid = ((w[0].0 + w[1].0) / 2.0, (w[0].1 + w[1].1) / 2.0);
            PathElement::new(vec![w[0], w[1]], colour_at(mid).stroke_width(STREAM_LINE_WIDTH))
        });
        chart.draw_series(segments).map_err(draw_err)?;

        if let Some((at, dir)) = line.midpoint_arrow() {
            let size = 0.06 * ARROW_SIZE;
            let tip = (at.0 + dir.0 * size / 2.0, at.1 + dir.1 * size / 2.0);
            if let Some(head) = arrow_head(tip, dir, size) {
                chart
                    .draw_series(std::iter::once(Polygon::new(head, colour_at(at).filled())))
                    .map_err(draw_err)?;
            }
        }
    }
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    colorbar: &Colorbar,
    figure_height: u32,
) -> Result<(), RenderError> {
    let (lo, hi) = colorbar.range();
    // Roughly 70% of the panel height, centred.
    let inset = figure_height * 15 / 100;

    let mut chart = ChartBuilder::on(area)
        .margin_top(inset)
        .margin_bottom(inset)
        .margin_left(10)
        .set_label_area_size(LabelAreaPosition::Right, 80)
        .build_cartesian_2d(0.0..1.0, lo..hi)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(colorbar.label())
        .axis_desc_style(TextStyle::from((FONT, 12).into_font().style(FontStyle::Bold)))
        .draw()
        .map_err(draw_err)?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    let bands = (0..COLORBAR_STEPS).map(|i| {
        let y0 = lo + step * i as f64;
        let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], gist_heat_r(t).filled())
    });
    chart.draw_series(bands).map_err(draw_err)?;
    Ok(())
}

/// Triangle with its point at `tip`, facing along `dir`.
fn arrow_head(tip: Point, dir: Point, length: f64) -> Option<Vec<Point>> {
    let norm = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
    if norm < 1e-9 {
        return None;
    }
    let (dx, dy) = (dir.0 / norm, dir.1 / norm);
    let base = (tip.0 - dx * length, tip.1 - dy * length);
    let half_width = length * 0.45;
    Some(vec![
        tip,
        (base.0 - dy * half_width, base.1 + dx * half_width),
        (base.0 + dy * half_width, base.1 - dx * half_width),
    ])
}
