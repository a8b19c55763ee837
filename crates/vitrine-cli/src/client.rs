//! Shared HTTP client, run context, and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use url::Url;
use vitrine_cms::{CmsClient, CmsError, IntervalPacer, Pacer};
use vitrine_config::{ApiToken, CmsEndpoint, ConfigError, PacingConfig};
use vitrine_media::MediaError;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Io { .. } => Self::failure(error),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<MediaError> for CliError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::UploadRootMissing { .. }
            | MediaError::UploadRootNotDirectory { .. }
            | MediaError::ManifestRead { .. }
            | MediaError::ManifestParse { .. }
            | MediaError::ManifestInvalid { .. } => Self::validation(error.to_string()),
            MediaError::Layout(inner) => Self::from(inner),
            other => Self::failure(other),
        }
    }
}

impl From<CmsError> for CliError {
    fn from(error: CmsError) -> Self {
        match error {
            CmsError::InvalidPath { .. } => Self::validation(error.to_string()),
            other => Self::failure(other),
        }
    }
}

/// Dependencies constructed from CLI options before dispatch.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) http: Client,
}

impl CliDependencies {
    /// Construct an HTTP client tagging every request with the run trace id.
    pub(crate) fn new(timeout_secs: u64, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self { http })
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) http: Client,
    pub(crate) endpoint: CmsEndpoint,
    pub(crate) pacing: PacingConfig,
}

impl AppContext {
    /// Validate the credential and base URL; nothing is sent yet.
    pub(crate) fn new(http: Client, base_url: &Url, token: Option<&str>) -> CliResult<Self> {
        let token = ApiToken::parse(token)?;
        let endpoint = CmsEndpoint::new(base_url.as_str(), token)?;
        Ok(Self {
            http,
            endpoint,
            pacing: PacingConfig::default(),
        })
    }

    /// Content API client that waits at least `interval` between paced calls.
    pub(crate) fn cms(&self, interval: Duration) -> CmsClient {
        let pacer: Arc<dyn Pacer> = IntervalPacer::shared(interval);
        CmsClient::new(self.endpoint.clone(), self.http.clone(), pacer)
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Parse a `field=value` equality filter.
pub(crate) fn parse_filter(input: &str) -> Result<(String, String), String> {
    let (field, value) = input
        .split_once('=')
        .ok_or_else(|| format!("filter '{input}' must be field=value"))?;
    let field = field.trim();
    if field.is_empty() || field.split('.').any(str::is_empty) {
        return Err(format!("filter '{input}' has an empty field segment"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}
