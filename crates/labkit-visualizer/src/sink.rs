// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use labkit_field::FieldFrame;
use labkit_render::FieldRenderer;

use crate::error::VisualizerError;

/// Destination for completed field frames
pub trait FrameSink {
    /// Display `frame`. `Ok(false)` means the surface was closed by the user
    /// and acquisition should stop.
    fn show(&mut self, frame: &FieldFrame) -> Result<bool, VisualizerError>;

    /// Release the surface. Called once, after the serial link is closed.
    fn close(&mut self);
}

impl FrameSink for FieldRenderer {
    fn show(&mut self, frame: &FieldFrame) -> Result<bool, VisualizerError> {
        Ok(self.update(frame)?)
    }

    fn close(&mut self) {
        FieldRenderer::close(self);
    }
}
