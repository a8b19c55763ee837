//! Error types for configuration loading and validation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No bearer token was supplied.
    #[error("API token is required (pass --token or set STRAPI_TOKEN)")]
    MissingToken,
    /// The bearer token is still the template placeholder.
    #[error("API token is still the placeholder value; create a full-access token in the CMS admin")]
    PlaceholderToken,
    /// The API base URL could not be used.
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// URL provided by the caller.
        value: String,
        /// Reason the URL was rejected.
        reason: String,
    },
    /// A folder layout field failed validation.
    #[error("invalid folder layout field '{field}': {reason}")]
    InvalidLayout {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// Reading a configuration file failed.
    #[error("failed to read {}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A configuration file was not valid JSON for its schema.
    #[error("{} is not a valid folder layout document", path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn layout(field: &'static str, reason: &'static str, value: Option<String>) -> Self {
        Self::InvalidLayout {
            field,
            reason,
            value,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
