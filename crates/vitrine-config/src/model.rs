//! Endpoint and pacing settings passed explicitly into every stage.

use std::time::Duration;

use url::Url;

use crate::defaults::{
    DEFAULT_DELETE_INTERVAL_MS, DEFAULT_ORGANIZE_INTERVAL_MS, DEFAULT_PURGE_INTERVAL_MS,
    DEFAULT_UPLOAD_INTERVAL_MS,
};
use crate::error::{ConfigError, ConfigResult};
use crate::token::ApiToken;

/// Location of the content API and the credential used against it.
#[derive(Debug, Clone)]
pub struct CmsEndpoint {
    /// Base URL; API paths are resolved against it.
    pub base_url: Url,
    /// Bearer credential.
    pub token: ApiToken,
}

impl CmsEndpoint {
    /// Parse the base URL and pair it with a validated token.
    ///
    /// The path always ends in `/` so API paths resolve beneath any prefix the
    /// CMS is mounted under.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the URL does not parse or is
    /// not `http`/`https`.
    pub fn new(base_url: &str, token: ApiToken) -> ConfigResult<Self> {
        let mut parsed = base_url
            .trim()
            .parse::<Url>()
            .map_err(|err| ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: err.to_string(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        Ok(Self {
            base_url: parsed,
            token,
        })
    }
}

/// Minimum spacing between successive remote calls, per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Spacing between upload attempts.
    pub upload: Duration,
    /// Spacing between delete calls during cleanup.
    pub delete: Duration,
    /// Spacing between folder and move calls during organisation.
    pub organize: Duration,
    /// Spacing between delete calls during a purge.
    pub purge: Duration,
}

impl PacingConfig {
    /// Pacing with every interval disabled.
    #[must_use]
    pub const fn unpaced() -> Self {
        Self {
            upload: Duration::ZERO,
            delete: Duration::ZERO,
            organize: Duration::ZERO,
            purge: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            upload: Duration::from_millis(DEFAULT_UPLOAD_INTERVAL_MS),
            delete: Duration::from_millis(DEFAULT_DELETE_INTERVAL_MS),
            organize: Duration::from_millis(DEFAULT_ORGANIZE_INTERVAL_MS),
            purge: Duration::from_millis(DEFAULT_PURGE_INTERVAL_MS),
        }
    }
}
