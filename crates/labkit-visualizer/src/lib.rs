// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-visualizer
//!
//! Live electric field visualizer for the 6x6 electrode board.
//!
//! The binary opens the board's serial port (or a captured log with
//! `--replay`), assembles 36-reading grids and renders each one through
//! [`labkit_render::FieldRenderer`]. The loop is reusable with any
//! [`labkit_hal::SerialIO`] link and any [`FrameSink`].

pub mod acquisition;
pub mod error;
pub mod sink;

pub use acquisition::{
    run_acquisition, AcquisitionOptions, AcquisitionSession, AcquisitionSummary, StopReason,
};
pub use error::VisualizerError;
pub use sink::FrameSink;

use labkit_config::RenderConfig;
use labkit_render::RenderOptions;

/// Renderer settings from the `[render]` config section
pub fn render_options(config: &RenderConfig) -> RenderOptions {
    RenderOptions {
        output_path: config.output_path.clone(),
        width: config.width,
        height: config.height,
        stream_density: config.stream_density,
    }
}
