//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `encgen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "encgen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Code generation options.
    pub generate: GenerateConfig,

    /// Logging options.
    pub logging: LoggingConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Suffix appended to the snake_case type name to form the file name.
    pub suffix: String,
}

/// Code generation options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Path through which generated code reaches the runtime crate.
    pub runtime_crate: String,

    /// Paths brought into scope with `use` at the top of the generated file.
    pub imports: Vec<String>,

    /// Whether to emit the "generated, do not edit" header.
    pub header: bool,
}

/// Logging options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter directive.
    pub level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            suffix: "_encoder".to_string(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "encgen".to_string(),
            imports: vec!["super::*".to_string()],
            header: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Check values that deserialize fine but cannot produce a usable encoder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.suffix.contains(['/', '\\']) {
            return Err(ConfigError::invalid_value(
                "output.suffix",
                "must not contain path separators",
            ));
        }

        if self.generate.runtime_crate.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "generate.runtime_crate",
                "must not be empty",
            ));
        }

        Ok(())
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// An explicit path must exist. Without one, `encgen.toml` in the current
    /// directory is used if present, and defaults otherwise.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref suffix) = args.suffix {
            config.output.suffix = suffix.clone();
        }

        if let Some(ref runtime_crate) = args.runtime_crate {
            config.generate.runtime_crate = runtime_crate.clone();
        }

        if let Some(ref level) = args.log_level {
            config.logging.level = level.clone();
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# encgen configuration file

[output]
# Output directory for generated encoder files
dir = "."

# Suffix appended to the snake_case type name (Parcel -> parcel_encoder.rs)
suffix = "_encoder"

[generate]
# Path through which generated code reaches the encgen runtime crate
runtime_crate = "encgen"

# `use` declarations emitted at the top of the generated file, so that the
# encoded types are in scope
imports = ["super::*"]

# Emit a "generated, do not edit" header
header = true

[logging]
# Default log filter (overridden by --log-level)
level = "warn"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// File suffix override.
    pub suffix: Option<String>,

    /// Runtime crate path override.
    pub runtime_crate: Option<String>,

    /// Log level override.
    pub log_level: Option<String>,
}
