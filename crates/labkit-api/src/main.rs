// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use labkit_api::{serve, ApiState};
use labkit_classifier::TrainedModel;
use labkit_config::{load_config_or_default, validate_config};
use labkit_observability::{
    debug_flags_help, init_logging, parse_debug_flags, strip_debug_flags, ObservabilityConfig,
};

/// Labkit Prediction Server - trains the tumor classifier and serves predictions
#[derive(Parser, Debug)]
#[command(name = "labkit-predict-server", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to labkit.toml (default: discovered from the working directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset URL or local CSV path
    #[arg(short, long)]
    dataset: Option<String>,

    /// Seed for the train/test split and the forest
    #[arg(short, long)]
    seed: Option<u64>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging for every labkit crate
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(dataset) = &self.dataset {
            overrides.insert("dataset_source".to_string(), dataset.clone());
        }
        if let Some(seed) = self.seed {
            overrides.insert("seed".to_string(), seed.to_string());
        }
        if let Some(host) = &self.host {
            overrides.insert("api_host".to_string(), host.clone());
        }
        if let Some(port) = self.port {
            overrides.insert("api_port".to_string(), port.to_string());
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

    // The dataset fetch is blocking; finish training before the runtime starts.
    info!("Loading dataset from {}", config.classifier.dataset_source);
    let model = TrainedModel::from_config(&config.classifier).context("Failed to train model")?;
    info!(
        "Accuracy of the model: {:.2}%",
        model.evaluation().accuracy_percent()
    );
    info!("Classification report:\n{}", model.evaluation().report);

    let host: IpAddr = config
        .api
        .host
        .parse()
        .with_context(|| format!("Invalid API host '{}'", config.api.host))?;
    let addr = SocketAddr::new(host, config.api.port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;
    runtime.block_on(serve(ApiState::new(model), addr, shutdown_signal()))?;

    info!("Prediction server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received...");
}
