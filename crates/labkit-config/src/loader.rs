// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LabkitConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "labkit.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "LABKIT_CONFIG_PATH";

/// Find the labkit configuration file
///
/// Search order:
/// 1. `LABKIT_CONFIG_PATH` environment variable
/// 2. Current working directory: `./labkit.toml`
/// 3. Parent directory: `../labkit.toml`
/// 4. Workspace root (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by {} not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet {} environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LabkitConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: LabkitConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Like [`load_config`], but a missing file yields built-in defaults (with
/// overrides still applied). The returned flag tells whether a file was used.
///
/// An explicit `config_path` that does not exist, or a malformed file, is
/// still an error.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<(LabkitConfig, bool)> {
    if config_path.is_some() {
        return load_config(config_path, cli_args).map(|c| (c, true));
    }
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args).map(|c| (c, true)),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_ENV).is_err() => {
            let mut config = LabkitConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok((config, false))
        }
        Err(e) => Err(e),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `LABKIT_SERIAL_PORT` -> `serial.port`
/// - `LABKIT_SERIAL_BAUD` -> `serial.baud_rate`
/// - `LABKIT_HOLD_MS` -> `acquisition.hold_ms`
/// - `LABKIT_RENDER_OUTPUT` -> `render.output_path`
/// - `LABKIT_DATASET_SOURCE` -> `classifier.dataset_source`
/// - `LABKIT_SEED` -> `classifier.seed`
/// - `LABKIT_API_HOST` -> `api.host`
/// - `LABKIT_API_PORT` -> `api.port`
/// - `LABKIT_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut LabkitConfig) {
    let vars: HashMap<String, String> = [
        ("LABKIT_SERIAL_PORT", "serial_port"),
        ("LABKIT_SERIAL_BAUD", "baud_rate"),
        ("LABKIT_HOLD_MS", "hold_ms"),
        ("LABKIT_RENDER_OUTPUT", "output_path"),
        ("LABKIT_DATASET_SOURCE", "dataset_source"),
        ("LABKIT_SEED", "seed"),
        ("LABKIT_API_HOST", "api_host"),
        ("LABKIT_API_PORT", "api_port"),
        ("LABKIT_LOG_LEVEL", "log_level"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"serial_port": "/dev/ttyACM0", "baud_rate": "115200"}`)
///
/// Numeric values that fail to parse are ignored.
pub fn apply_cli_overrides(config: &mut LabkitConfig, cli_args: &HashMap<String, String>) {
    // Serial settings
    if let Some(value) = cli_args.get("serial_port") {
        config.serial.port = value.clone();
    }
    if let Some(value) = cli_args.get("baud_rate") {
        if let Ok(baud) = value.parse::<u32>() {
            config.serial.baud_rate = baud;
        }
    }

    // Acquisition / render
    if let Some(value) = cli_args.get("hold_ms") {
        if let Ok(hold) = value.parse::<u64>() {
            config.acquisition.hold_ms = hold;
        }
    }
    if let Some(value) = cli_args.get("output_path") {
        config.render.output_path = PathBuf::from(value);
    }

    // Classifier
    if let Some(value) = cli_args.get("dataset_source") {
        config.classifier.dataset_source = value.clone();
    }
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.classifier.seed = seed;
        }
    }

    // API settings
    if let Some(value) = cli_args.get("api_host") {
        config.api.host = value.clone();
    }
    if let Some(value) = cli_args.get("api_port") {
        if let Ok(port) = value.parse::<u16>() {
            config.api.port = port;
        }
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_missing_env_path_is_an_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var(CONFIG_PATH_ENV, "/definitely/not/here/labkit.toml");
        let result = load_config_or_default(None, None);
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("LABKIT_SERIAL_PORT");
        env::remove_var("LABKIT_SERIAL_BAUD");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[serial]").unwrap();
        writeln!(file, "port = \"/dev/ttyACM0\"").unwrap();
        writeln!(file, "[classifier]").unwrap();
        writeln!(file, "n_trees = 25").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.classifier.n_trees, 25);
        assert_eq!(config.classifier.test_fraction, 0.2);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[serial\nport = 3").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = LabkitConfig::default();

        env::set_var("LABKIT_SERIAL_PORT", "/dev/ttyUSB1");
        env::set_var("LABKIT_API_PORT", "9999");
        env::set_var("LABKIT_SERIAL_BAUD", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("LABKIT_SERIAL_PORT");
        env::remove_var("LABKIT_API_PORT");
        env::remove_var("LABKIT_SERIAL_BAUD");

        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.api.port, 9999);
        assert_eq!(config.serial.baud_rate, 9600);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LabkitConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("hold_ms".to_string(), "250".to_string());
        cli_args.insert("output_path".to_string(), "/tmp/field.svg".to_string());
        cli_args.insert("seed".to_string(), "7".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.acquisition.hold_ms, 250);
        assert_eq!(config.render.output_path, PathBuf::from("/tmp/field.svg"));
        assert_eq!(config.classifier.seed, 7);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        // CLI overrides take precedence over environment variables
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[api]").unwrap();
        writeln!(file, "host = \"file-host\"").unwrap();
        writeln!(file, "port = 8000").unwrap();

        env::set_var("LABKIT_API_HOST", "env-host");
        env::set_var("LABKIT_API_PORT", "9000");

        let mut cli_args = HashMap::new();
        cli_args.insert("api_host".to_string(), "cli-host".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("LABKIT_API_HOST");
        env::remove_var("LABKIT_API_PORT");

        // CLI wins for host, env wins for port (no CLI override)
        assert_eq!(config.api.host, "cli-host");
        assert_eq!(config.api.port, 9000);
    }
}
