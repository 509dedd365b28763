// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for labkit
//!
//! Console output is always installed. With the `file-logging` feature a
//! timestamped run folder receives a combined JSON log:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── labkit.log
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, TimeZone, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, ObservabilityConfig};

/// Logging initialization result
///
/// Must be held until the program exits; dropping it flushes file writers.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Initialize logging
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `config` - Base level, format and file logging settings
///
/// `RUST_LOG`, when set, replaces the computed filter entirely.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    config: &ObservabilityConfig,
) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&filter))
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    let mut layers = Vec::new();

    let console_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter.clone())
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter.clone())
            .boxed(),
    };
    layers.push(console_layer);

    #[cfg(feature = "file-logging")]
    let mut file_guards = Vec::new();
    #[allow(unused_mut)]
    let mut log_dir = None;

    if config.file_logging {
        #[cfg(feature = "file-logging")]
        {
            let run_folder = create_run_folder(&config.log_dir)?;
            cleanup_old_logs(&config.log_dir, config.retention_days, config.retention_runs)?;

            let appender = tracing_appender::rolling::never(&run_folder, "labkit.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            file_guards.push(guard);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json()
                .with_filter(env_filter.clone())
                .boxed();
            layers.push(file_layer);
            log_dir = Some(run_folder);
        }
        #[cfg(not(feature = "file-logging"))]
        {
            eprintln!("Warning: file logging requested but labkit-observability was built without the `file-logging` feature");
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .context("Global tracing subscriber already installed")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

/// Initialize console logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &ObservabilityConfig::default())
}

#[cfg(feature = "file-logging")]
fn create_run_folder(base_log_dir: &Path) -> Result<PathBuf> {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;
    Ok(run_folder)
}

/// Parse the timestamp out of a `run_YYYYMMDD_HHMMSS` folder name
fn parse_run_timestamp(dir_name: &str) -> Option<chrono::DateTime<Utc>> {
    let timestamp_str = dir_name.strip_prefix("run_")?;
    let naive = NaiveDateTime::parse_from_str(timestamp_str, "%Y%m%d_%H%M%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Clean up old run folders: anything older than `retention_days`, then the
/// oldest until at most `retention_runs` remain.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_run_timestamp);
        if let Some(dt) = stamp {
            runs.push((path, dt));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let mut kept = Vec::new();
    for (path, dt) in runs {
        if dt < cutoff_date {
            remove_run(&path);
        } else {
            kept.push(path);
        }
    }

    if kept.len() > retention_runs {
        let to_remove = kept.len() - retention_runs;
        for path in kept.iter().take(to_remove) {
            remove_run(path);
        }
    }

    Ok(())
}

fn remove_run(path: &Path) {
    if let Err(e) = std::fs::remove_dir_all(path) {
        eprintln!(
            "Warning: Failed to remove old log directory {}: {}",
            path.display(),
            e
        );
    }
}
