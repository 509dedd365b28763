//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-labkit-field`, `--debug-labkit-api`, etc.
//! to raise the log level of a single crate.

use std::collections::HashMap;
use std::env;

use crate::{crate_target, KNOWN_CRATES};

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use labkit_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-labkit-field".to_string()]);
/// assert!(flags.is_enabled("labkit-field"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = HashMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Enable debug output for every known crate (`-v/--verbose`)
    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enabled_crates.insert(crate_name.to_string(), true);
        }
    }

    /// Create a tracing filter from debug flags
    ///
    /// Format: "labkit_field=debug,labkit_hal=debug,info", or just the base
    /// level when nothing is enabled.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        if self.enabled_crates.is_empty() {
            return base_level.to_string();
        }

        let mut names: Vec<&String> = self.enabled_crates.keys().collect();
        names.sort();
        let mut filters: Vec<String> = names
            .into_iter()
            .map(|name| format!("{}=debug", crate_target(name)))
            .collect();
        filters.push(base_level.to_string());
        filters.join(",")
    }
}

/// Helper function to parse debug flags from the environment
///
/// Checks both command-line arguments and the `LABKIT_DEBUG` environment
/// variable (comma-separated crate names, or `all`).
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("LABKIT_DEBUG") {
        if env_var == "all" {
            flags.enable_all();
        } else {
            for crate_name in env_var.split(',') {
                let crate_name = crate_name.trim();
                if !crate_name.is_empty() {
                    flags.enabled_crates.insert(crate_name.to_string(), true);
                }
            }
        }
    }

    flags
}

/// Strip `--debug-*` flags so the remaining arguments can go to the
/// application's own parser.
pub fn strip_debug_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .filter(|arg| !arg.starts_with("--debug-"))
        .collect()
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  LABKIT_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  LABKIT_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-labkit-field".to_string()]);
        assert!(flags.is_enabled("labkit-field"));
        assert!(!flags.is_enabled("labkit-hal"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string_uses_module_targets() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-labkit-hal".to_string(),
            "--debug-labkit-field".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("warn"),
            "labkit_field=debug,labkit_hal=debug,warn"
        );
    }

    #[test]
    fn test_empty_flags_use_base_level() {
        let flags = CrateDebugFlags::default();
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string("info"), "info");
    }

    #[test]
    fn test_strip_debug_flags() {
        let args = vec![
            "labkit-visualizer".to_string(),
            "--debug-labkit-field".to_string(),
            "--port".to_string(),
            "COM3".to_string(),
        ];
        assert_eq!(
            strip_debug_flags(args),
            vec!["labkit-visualizer", "--port", "COM3"]
        );
    }
}
