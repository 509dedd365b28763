// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # labkit-render
//!
//! Draws a [`labkit_field::FieldFrame`] as the two-panel "Electric Field"
//! figure: a unit-vector quiver plot and a streamline plot coloured by the
//! block-averaged potential, with a colorbar that is created on the first
//! frame and re-normalized afterwards.
//!
//! Output goes to an image file (SVG, or PNG with the `png` feature). The
//! file is the render surface: deleting it closes the view.

pub mod colorbar;
pub mod colormap;
pub mod error;
pub mod renderer;
pub mod streamlines;
pub mod surface;

pub use colorbar::{Colorbar, COLORBAR_LABEL};
pub use error::RenderError;
pub use renderer::{FieldRenderer, RenderOptions};
pub use streamlines::{trace_streamlines, Streamline};
pub use surface::{RenderSurface, SurfaceFormat};
