//! Error types for CMS requests.

use thiserror::Error;

/// Maximum number of response body characters kept in an error.
pub(crate) const BODY_EXCERPT_LIMIT: usize = 200;

/// Errors produced while talking to the content API.
#[derive(Debug, Error)]
pub enum CmsError {
    /// An API path could not be resolved against the base URL.
    #[error("invalid request path '{path}': {source}")]
    InvalidPath {
        /// Path that failed to resolve.
        path: String,
        /// Underlying URL error.
        source: url::ParseError,
    },
    /// The request could not be sent or its body could not be read.
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The API answered 403; the token lacks the required permission.
    #[error("{operation} was forbidden (HTTP 403); check the API token permissions")]
    Forbidden {
        /// Operation identifier.
        operation: &'static str,
    },
    /// The API answered with a non-success status.
    #[error("{operation} failed with HTTP {status}: {body}")]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },
    /// The response body was not valid JSON for the expected shape.
    #[error("{operation} returned an undecodable body: {source}")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// The response decoded but did not carry the expected data.
    #[error("{operation} returned an unexpected payload: {detail}")]
    UnexpectedPayload {
        /// Operation identifier.
        operation: &'static str,
        /// Static description of what was missing.
        detail: &'static str,
    },
}

impl CmsError {
    pub(crate) const fn transport(operation: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }
}

pub(crate) fn body_excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    trimmed.chars().take(BODY_EXCERPT_LIMIT).collect()
}

/// Convenience alias for CMS results.
pub type CmsResult<T> = Result<T, CmsError>;
