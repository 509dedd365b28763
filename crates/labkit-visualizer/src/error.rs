// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use labkit_hal::SerialError;
use labkit_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    #[error(transparent)]
    Serial(#[from] SerialError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
