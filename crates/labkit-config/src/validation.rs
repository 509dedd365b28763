//! Configuration validation
//!
//! Checks that configuration values are within usable ranges before either
//! application starts touching hardware or the network.

use crate::{ConfigError, ConfigResult, LabkitConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    InvalidPortRange { port_name: String, port: u16 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortRange { port_name, port } => {
                write!(
                    f,
                    "Port {} = {} is outside valid range (1024-65535)",
                    port_name, port
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// All problems are collected before failing so one run reports everything.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &LabkitConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_serial(config, &mut errors);
    validate_render(config, &mut errors);
    validate_classifier(config, &mut errors);

    if config.api.port < 1024 {
        errors.push(ConfigValidationError::InvalidPortRange {
            port_name: "api.port".to_string(),
            port: config.api.port,
        });
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &LabkitConfig, errors: &mut Vec<ConfigValidationError>) {
    let required = [
        ("serial.port", config.serial.port.as_str()),
        ("api.host", config.api.host.as_str()),
        ("classifier.dataset_source", config.classifier.dataset_source.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: field.to_string(),
            });
        }
    }
}

fn validate_serial(config: &LabkitConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.serial.baud_rate == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "serial.baud_rate".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if config.serial.timeout_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "serial.timeout_ms".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_render(config: &LabkitConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.render.width < 200 || config.render.height < 200 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "render.width/render.height".to_string(),
            reason: "must be at least 200 pixels".to_string(),
        });
    }
    let density = config.render.stream_density;
    if !(density > 0.0 && density <= 10.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "render.stream_density".to_string(),
            reason: "must be in (0, 10]".to_string(),
        });
    }
}

fn validate_classifier(config: &LabkitConfig, errors: &mut Vec<ConfigValidationError>) {
    let fraction = config.classifier.test_fraction;
    if !(fraction > 0.0 && fraction < 1.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "classifier.test_fraction".to_string(),
            reason: "must be between 0.0 and 1.0 (exclusive)".to_string(),
        });
    }
    if config.classifier.n_trees == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "classifier.n_trees".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if config.classifier.min_samples_split < 2 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "classifier.min_samples_split".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LabkitConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_privileged_api_port_rejected() {
        let mut config = LabkitConfig::default();
        config.api.port = 80;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("api.port"));
    }

    #[test]
    fn test_all_problems_reported_together() {
        let mut config = LabkitConfig::default();
        config.serial.port = String::new();
        config.classifier.test_fraction = 1.5;
        config.render.stream_density = 0.0;

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("serial.port"));
        assert!(err.contains("classifier.test_fraction"));
        assert!(err.contains("render.stream_density"));
    }
}
