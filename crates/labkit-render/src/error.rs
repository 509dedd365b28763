// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Unable to draw field plot: {0}")]
    Draw(String),

    #[error("Render surface I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported output format '{0}' (expected .svg{png})", png = if cfg!(feature = "png") { " or .png" } else { "" })]
    UnsupportedFormat(String),
}

pub(crate) fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}
