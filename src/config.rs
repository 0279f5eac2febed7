//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tree-height/tree-height.toml`
//! 3. Environment variables: `TREE_HEIGHT_*` prefix
//! 4. Command-line flags (applied by the CLI layer)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{HeightStrategy, DEFAULT_STACK_SIZE};

/// Smallest stack accepted for the recursive strategy.
pub const MIN_STACK_SIZE: usize = 64 * 1024;

/// Largest stack accepted for the recursive strategy.
pub const MAX_STACK_SIZE: usize = 1024 * 1024 * 1024;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "TREE_HEIGHT";

/// Unified configuration for tree-height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Height algorithm (default: iterative)
    pub strategy: HeightStrategy,
    /// Stack reserved for the recursive strategy, in bytes (default: 16 MiB)
    pub stack_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: HeightStrategy::default(),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub strategy: Option<HeightStrategy>,
    pub stack_size: Option<usize>,
}

/// Get the XDG config directory for tree-height.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tree-height").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tree-height.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence from an explicit config file.
    ///
    /// A missing file is skipped; an unreadable or invalid one is an error.
    /// Values are not validated here: command-line flags still apply on top,
    /// so call [`Settings::validate`] once the last layer is in.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config: {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Environment variables
        current = Self::apply_env_overrides(current, Environment::with_prefix(ENV_PREFIX))?;

        Ok(current)
    }

    /// Overlay wins where it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            strategy: overlay.strategy.unwrap_or(self.strategy),
            stack_size: overlay.stack_size.unwrap_or(self.stack_size),
        }
    }

    /// Apply `TREE_HEIGHT_*` environment variables as explicit overrides.
    pub fn apply_env_overrides(
        mut settings: Self,
        environment: Environment,
    ) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(environment)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("strategy") {
            settings.strategy = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("{}_STRATEGY: {}", ENV_PREFIX, e),
            })?;
        }
        if let Ok(val) = config.get_string("stack_size") {
            settings.stack_size = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("{}_STACK_SIZE: {}: {}", ENV_PREFIX, val, e),
            })?;
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.stack_size < MIN_STACK_SIZE {
            return Err(ApplicationError::Config {
                message: format!(
                    "stack_size {} is below the minimum of {} bytes",
                    self.stack_size, MIN_STACK_SIZE
                ),
            });
        }
        if self.stack_size > MAX_STACK_SIZE {
            return Err(ApplicationError::Config {
                message: format!(
                    "stack_size {} exceeds the maximum of {} bytes",
                    self.stack_size, MAX_STACK_SIZE
                ),
            });
        }
        Ok(())
    }

    /// Render as TOML, used by `config show` and `config init`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_are_iterative_with_16_mib_stack() {
        let settings = Settings::default();
        assert_eq!(settings.strategy, HeightStrategy::Iterative);
        assert_eq!(settings.stack_size, 16 * 1024 * 1024);
    }

    #[test]
    fn merge_keeps_base_when_overlay_is_silent() {
        let merged = Settings::default().merge_with(&RawSettings::default());
        assert_eq!(merged, Settings::default());
    }

    #[test]
    fn merge_prefers_overlay_values() {
        let overlay = RawSettings {
            strategy: Some(HeightStrategy::Recursive),
            stack_size: None,
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.strategy, HeightStrategy::Recursive);
        assert_eq!(merged.stack_size, DEFAULT_STACK_SIZE);
    }

    #[test]
    fn env_overrides_replace_values() {
        let env = env_with(&[
            ("TREE_HEIGHT_STRATEGY", "recursive"),
            ("TREE_HEIGHT_STACK_SIZE", "1048576"),
        ]);
        let settings = Settings::apply_env_overrides(Settings::default(), env).unwrap();
        assert_eq!(settings.strategy, HeightStrategy::Recursive);
        assert_eq!(settings.stack_size, 1_048_576);
    }

    #[test]
    fn env_override_with_bad_strategy_is_config_error() {
        let env = env_with(&[("TREE_HEIGHT_STRATEGY", "sideways")]);
        let err = Settings::apply_env_overrides(Settings::default(), env).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn tiny_stack_is_rejected() {
        let settings = Settings {
            stack_size: 1024,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn huge_stack_is_rejected() {
        let settings = Settings {
            stack_size: usize::MAX,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn stack_bounds_are_inclusive() {
        for stack_size in [MIN_STACK_SIZE, MAX_STACK_SIZE] {
            let settings = Settings {
                stack_size,
                ..Settings::default()
            };
            assert!(settings.validate().is_ok());
        }
    }

    #[test]
    fn load_from_leaves_out_of_range_file_values_for_later_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree-height.toml");
        std::fs::write(&path, "stack_size = 1024\n").unwrap();

        let mut settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.stack_size, 1024);

        settings.stack_size = MIN_STACK_SIZE;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn toml_round_trips_through_raw_settings() {
        let settings = Settings {
            strategy: HeightStrategy::Recursive,
            stack_size: 4 * 1024 * 1024,
        };
        let raw: RawSettings = toml::from_str(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
