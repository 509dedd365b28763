//! # labkit
//!
//! Two small lab tools in one workspace:
//!
//! - an **electric field visualizer** that reads voltage readings from a
//!   multiplexed 6×6 electrode board over serial, assembles complete grids and
//!   draws the field as unit vectors and streamlines;
//! - a **tumor classifier demo** that trains a random forest on the Breast
//!   Cancer Wisconsin (Diagnostic) table and serves predictions through a
//!   web form.
//!
//! ## Feature Flags
//!
//! - **`field`** (default): serial layer, line parser, grid assembler, field transform
//! - **`render`** (default): quiver/stream figure with colorbar (SVG)
//! - **`visualizer`**: acquisition loop and the `labkit-visualizer` binary crate
//! - **`classifier`** (default): dataset, split, random forest, metrics
//! - **`api`**: HTTP prediction server
//! - **`full`**: everything
//!
//! ## Usage
//!
//! ```rust
//! use labkit::prelude::*;
//!
//! let mut assembler = GridAssembler::new();
//! assembler.feed("Start");
//! for index in 0..READINGS_PER_GRID as u32 {
//!     assembler.feed(&format!("Mux: {} Channel: {}", index / 12, index % 12));
//!     let outcome = assembler.feed(&format!("Current Voltage: {}", index as f64 * 0.1));
//!     if let LineOutcome::GridComplete(grid) = outcome {
//!         let frame = field_transform(&grid);
//!         assert_eq!(frame.dim(), (5, 5));
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! serial line ─► labkit-hal ─► labkit-field ─► labkit-render
//!                (LineReader)   (parse, assemble,  (quiver + stream,
//!                               transform)          colorbar)
//!                        └──── labkit-visualizer ────┘
//!
//! CSV ─► labkit-classifier ─► labkit-api
//!        (split, forest,       (form + /v1 JSON)
//!         evaluation)
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Foundation
pub use labkit_config as config;
pub use labkit_observability as observability;

// Field pipeline
#[cfg(feature = "field")]
pub use labkit_hal as hal;

#[cfg(feature = "field")]
pub use labkit_field as field;

#[cfg(feature = "render")]
pub use labkit_render as render;

#[cfg(feature = "visualizer")]
pub use labkit_visualizer as visualizer;

// ML pipeline
#[cfg(feature = "classifier")]
pub use labkit_classifier as classifier;

#[cfg(feature = "api")]
pub use labkit_api as api;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::config::{load_config_or_default, LabkitConfig};

    #[cfg(feature = "field")]
    pub use crate::hal::{LineReader, ReplaySerial, SerialIO};

    #[cfg(feature = "field")]
    pub use crate::field::{
        field_transform, FieldFrame, GridAddress, GridAssembler, LineOutcome, VoltageGrid,
        READINGS_PER_GRID,
    };

    #[cfg(feature = "render")]
    pub use crate::render::{FieldRenderer, RenderOptions};

    #[cfg(feature = "visualizer")]
    pub use crate::visualizer::{run_acquisition, AcquisitionOptions, StopReason};

    #[cfg(feature = "classifier")]
    pub use crate::classifier::{Diagnosis, Prediction, TrainedModel};
}
