//! Error types for the recovery advisor

use std::path::PathBuf;

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`AdvisorConfig`](crate::AdvisorConfig)
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;
