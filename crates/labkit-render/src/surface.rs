// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! File-backed render surface
//!
//! Each frame overwrites one image file. The surface counts as closed after
//! [`RenderSurface::close`], or once a previously written image has been
//! deleted by the operator.

use std::path::{Path, PathBuf};

use crate::error::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFormat {
    Svg,
    #[cfg(feature = "png")]
    Png,
}

impl SurfaceFormat {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "svg" => Ok(SurfaceFormat::Svg),
            #[cfg(feature = "png")]
            "png" => Ok(SurfaceFormat::Png),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

#[derive(Debug)]
pub struct RenderSurface {
    path: PathBuf,
    size: (u32, u32),
    format: SurfaceFormat,
    written: bool,
    closed: bool,
}

impl RenderSurface {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Result<Self, RenderError> {
        let path = path.into();
        let format = SurfaceFormat::from_path(&path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            size,
            format,
            written: false,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn format(&self) -> SurfaceFormat {
        self.format
    }

    pub fn is_open(&self) -> bool {
        !self.closed && (!self.written || self.path.exists())
    }

    pub(crate) fn mark_written(&mut self) {
        self.written = true;
    }

    /// Idempotent. The last image stays on disk.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            tracing::debug!(target: "labkit_render", "Render surface {} closed", self.path.display());
        }
    }
}
