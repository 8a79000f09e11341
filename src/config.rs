//! # Configuration Management
//!
//! Settings for the [`Codec`](crate::codec::Codec) facade and for logging.
//!
//! Fields themselves take no configuration: the wire format is fixed. What
//! can be tuned is how the facade drives them, i.e. the initial output
//! buffer size and whether bytes left over after a decode are an error.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Environment variables (`SCHEMA_CODEC_*`) via `from_env()`
//! - Direct instantiation with defaults

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, Level};

/// Default initial size of an encode buffer
pub const DEFAULT_INITIAL_CAPACITY: usize = crate::core::buffer::DEFAULT_CAPACITY;

/// Largest initial encode buffer accepted by validation (16 MB)
pub const MAX_INITIAL_CAPACITY: usize = 16 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct CodecConfig {
    /// Encode/decode behaviour
    #[serde(default)]
    pub codec: CodecSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "loading configuration");
        let mut file = File::open(path)
            .map_err(|e| CodecError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| CodecError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("SCHEMA_CODEC_INITIAL_CAPACITY") {
            config.codec.initial_capacity = capacity.parse::<usize>().map_err(|e| {
                CodecError::ConfigError(format!(
                    "Invalid SCHEMA_CODEC_INITIAL_CAPACITY '{capacity}': {e}"
                ))
            })?;
        }

        if let Ok(trailing) = std::env::var("SCHEMA_CODEC_TRAILING_BYTES") {
            config.codec.trailing_bytes = trailing.parse()?;
        }

        if let Ok(level) = std::env::var("SCHEMA_CODEC_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                CodecError::ConfigError(format!("Invalid SCHEMA_CODEC_LOG_LEVEL '{level}'"))
            })?;
        }

        if let Ok(json) = std::env::var("SCHEMA_CODEC_LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CodecError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CodecError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// What a decode does with input left over after the top-level value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBytes {
    /// Fail with `CodecError::TrailingBytes`
    #[default]
    Reject,
    /// Ignore the leftover bytes
    Allow,
}

impl std::str::FromStr for TrailingBytes {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow" => Ok(Self::Allow),
            other => Err(CodecError::ConfigError(format!(
                "Invalid trailing bytes policy: '{other}' (expected 'reject' or 'allow')"
            ))),
        }
    }
}

/// Encode/decode settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CodecSettings {
    /// Initial capacity of each encode buffer in bytes
    pub initial_capacity: usize,

    /// Policy for input left over after a decode
    #[serde(default)]
    pub trailing_bytes: TrailingBytes,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            trailing_bytes: TrailingBytes::Reject,
        }
    }
}

impl CodecSettings {
    /// Validate codec settings
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.initial_capacity == 0 {
            errors.push("Initial capacity must be greater than 0".to_string());
        } else if self.initial_capacity > MAX_INITIAL_CAPACITY {
            errors.push(format!(
                "Initial capacity too large: {} bytes (maximum: {} bytes)",
                self.initial_capacity, MAX_INITIAL_CAPACITY
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("schema-codec"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
