// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use labkit_config::{load_config_or_default, validate_config, LabkitConfig};
use labkit_hal::{HostSerialPort, ReplaySerial, SerialError, SerialIO};
use labkit_observability::{
    debug_flags_help, init_logging, parse_debug_flags, strip_debug_flags, ObservabilityConfig,
};
use labkit_render::FieldRenderer;
use labkit_visualizer::{
    render_options, run_acquisition, AcquisitionOptions, AcquisitionSummary, StopReason,
};

/// Labkit Field Visualizer - renders the electric field measured by the electrode board
#[derive(Parser, Debug)]
#[command(name = "labkit-visualizer", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to labkit.toml (default: discovered from the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port of the board (e.g. COM5, /dev/ttyACM0)
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Output image (.svg, or .png when built with the `png` feature)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pause after each rendered frame, in milliseconds
    #[arg(long)]
    hold_ms: Option<u64>,

    /// Replay a captured serial log instead of opening a port
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Enable debug logging for every labkit crate
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(port) = &self.port {
            overrides.insert("serial_port".to_string(), port.clone());
        }
        if let Some(baud) = self.baud {
            overrides.insert("baud_rate".to_string(), baud.to_string());
        }
        if let Some(output) = &self.output {
            overrides.insert("output_path".to_string(), output.display().to_string());
        }
        if let Some(hold_ms) = self.hold_ms {
            overrides.insert("hold_ms".to_string(), hold_ms.to_string());
        }
        overrides
    }
}

fn main() -> Result<()> {
    let args = Args::parse_from(strip_debug_flags(std::env::args()));

    let (config, from_file) = load_config_or_default(args.config.as_deref(), Some(&args.overrides()))
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let mut debug_flags = parse_debug_flags();
    if args.verbose {
        debug_flags.enable_all();
    }
    let mut observability = ObservabilityConfig::default().with_level(config.logging.level.clone());
    if config.logging.file_logging {
        observability = observability.with_file_logging(config.logging.log_dir.clone());
    }
    let _logging = init_logging(&debug_flags, &observability)?;

    if !from_file {
        warn!("No labkit.toml found, using built-in defaults");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Shutdown signal received...");
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    let summary = match &args.replay {
        Some(path) => {
            let link = ReplaySerial::from_file(path)?;
            acquire(link, &config, &args, &running)?
        }
        None => {
            let link = HostSerialPort::open(
                &config.serial.port,
                config.serial.baud_rate,
                config.serial.timeout(),
            )?;
            std::thread::sleep(config.serial.warmup());
            acquire(link, &config, &args, &running)?
        }
    };

    if summary.stop_reason == StopReason::Interrupted {
        warn!("***Program stopped manually***");
    }
    info!(
        "Done: {} frames from {} readings",
        summary.frames_shown, summary.readings_recorded
    );
    Ok(())
}

fn acquire<S>(
    link: S,
    config: &LabkitConfig,
    args: &Args,
    running: &AtomicBool,
) -> Result<AcquisitionSummary>
where
    S: SerialIO<Error = SerialError>,
{
    let renderer = FieldRenderer::new(&render_options(&config.render))?;
    let options = AcquisitionOptions {
        max_frames: args.max_frames,
        ..AcquisitionOptions::from_config(config)
    };

    info!("Starting...");
    let summary = run_acquisition(link, renderer, options, running)?;
    Ok(summary)
}
