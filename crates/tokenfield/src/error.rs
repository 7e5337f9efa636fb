//! Configuration errors.
//!
//! Runtime interaction never fails: stale filter results, disabled options and
//! out-of-range indices are absorbed into state resets. Only loading and
//! validating configuration returns these errors.

use std::path::PathBuf;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A filter type has no operator table.
    #[error("filter '{filter}' declares no operators")]
    MissingOperators { filter: String },

    /// An operator entry is malformed.
    #[error("filter '{filter}', operator '{operator}': {reason}")]
    InvalidOperator {
        filter: String,
        operator: String,
        reason: String,
    },

    /// JSON decode failure.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decode failure.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file has an extension we cannot decode.
    #[error("unsupported configuration format '{path}'")]
    UnsupportedFormat { path: PathBuf },
}

impl ConfigError {
    /// Create an operator error.
    pub fn invalid_operator(
        filter: impl Into<String>,
        operator: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOperator {
            filter: filter.into(),
            operator: operator.into(),
            reason: reason.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
