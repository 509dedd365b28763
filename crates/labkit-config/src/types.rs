// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `labkit.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// UCI "Breast Cancer Wisconsin (Diagnostic)" CSV export.
pub const DEFAULT_DATASET_SOURCE: &str = "https://archive.ics.uci.edu/static/public/17/data.csv";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabkitConfig {
    pub serial: SerialConfig,
    pub acquisition: AcquisitionConfig,
    pub render: RenderConfig,
    pub classifier: ClassifierConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Serial link to the electrode multiplexer board
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
    /// Delay after opening the port before the first read (board reset)
    pub warmup_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "COM5".to_string(),
            baud_rate: 9600,
            timeout_ms: 1000,
            warmup_ms: 2000,
        }
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }
}

/// Acquisition loop behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Pause after each rendered grid, in milliseconds
    pub hold_ms: u64,
    /// Zero the grid after each completed cycle instead of keeping stale cells
    pub reset_grid_each_cycle: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            hold_ms: 2000,
            reset_grid_each_cycle: false,
        }
    }
}

impl AcquisitionConfig {
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

/// Field plot output
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub stream_density: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("electric_field.svg"),
            width: 1200,
            height: 600,
            stream_density: 1.0,
        }
    }
}

/// Tumor classifier training
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// URL (http/https) or local path of the CSV export
    pub dataset_source: String,
    pub test_fraction: f64,
    pub seed: u64,
    pub n_trees: usize,
    pub min_samples_split: usize,
    pub max_depth: Option<usize>,
    pub fetch_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            dataset_source: DEFAULT_DATASET_SOURCE.to_string(),
            test_fraction: 0.2,
            seed: 42,
            n_trees: 100,
            min_samples_split: 2,
            max_depth: None,
            fetch_timeout_secs: 30,
        }
    }
}

/// Prediction server
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_logging: false,
        }
    }
}
