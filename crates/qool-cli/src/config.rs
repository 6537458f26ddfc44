//! Configuration for the `qool` command-line tool.
//!
//! Supports loading configuration from:
//! 1. An explicit `--config` file (YAML)
//! 2. `$QOOL_CONFIG`, else `~/.qool/config.yaml` when it exists
//! 3. Environment variables (with `QOOL_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use qool_compile::ProfileKind;

/// Name accepted for the built-in margin-balancing objective.
pub const MARGIN_BALANCE: &str = "margin-balance";

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults applied when a command omits `--device` or `--profile`
    #[serde(default)]
    pub defaults: CompileDefaults,

    /// Extra device descriptions (YAML list of device specs)
    #[serde(default)]
    pub devices_file: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: console or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Compilation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileDefaults {
    /// Target device name
    #[serde(default = "default_device")]
    pub device: String,

    /// Compiler profile name; `default` keeps the device converter, `auto` searches for the largest amplitude
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_device() -> String {
    "mock".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for CompileDefaults {
    fn default() -> Self {
        Self {
            device: default_device(),
            profile: default_profile(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: CliConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the first available source, then apply
    /// environment overrides and validate.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_file
            .map(PathBuf::from)
            .or_else(|| std::env::var("QOOL_CONFIG").ok().map(PathBuf::from))
            .or_else(|| default_config_path().filter(|p| p.exists()));

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `QOOL_*` environment variables.
    fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from any variable source. Variables that are absent
    /// leave the corresponding fields unchanged.
    pub fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("QOOL_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("QOOL_LOG_FORMAT") {
            self.logging.format = v;
        }
        if let Some(v) = var("QOOL_DEVICE") {
            self.defaults.device = v;
        }
        if let Some(v) = var("QOOL_PROFILE") {
            self.defaults.profile = v;
        }
        if let Some(v) = var("QOOL_DEVICES_FILE") {
            self.devices_file = Some(v);
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        if self.defaults.device.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Default device must not be empty".to_string(),
            ));
        }

        if self.defaults.profile != MARGIN_BALANCE {
            self.defaults
                .profile
                .parse::<ProfileKind>()
                .map_err(ConfigError::ValidationError)?;
        }

        Ok(())
    }
}

/// `~/.qool/config.yaml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qool").join("config.yaml"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
