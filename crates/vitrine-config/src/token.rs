//! Bearer credential used for every write against the media library.

use std::fmt::{self, Debug, Formatter};

use crate::defaults::PLACEHOLDER_TOKEN;
use crate::error::{ConfigError, ConfigResult};

/// Validated API token. Only constructible through [`ApiToken::parse`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validate a raw token value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] for absent or blank input and
    /// [`ConfigError::PlaceholderToken`] for the template placeholder.
    pub fn parse(raw: Option<&str>) -> ConfigResult<Self> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if trimmed == PLACEHOLDER_TOKEN {
            return Err(ConfigError::PlaceholderToken);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for ApiToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("ApiToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_and_blank_tokens() {
        assert!(matches!(ApiToken::parse(None), Err(ConfigError::MissingToken)));
        assert!(matches!(
            ApiToken::parse(Some("   ")),
            Err(ConfigError::MissingToken)
        ));
    }

    #[test]
    fn rejects_placeholder_token() {
        assert!(matches!(
            ApiToken::parse(Some(PLACEHOLDER_TOKEN)),
            Err(ConfigError::PlaceholderToken)
        ));
    }

    #[test]
    fn accepted_token_is_trimmed_and_redacted() {
        let token = ApiToken::parse(Some(" abc123 ")).expect("valid token");
        assert_eq!(token.bearer_header(), "Bearer abc123");
        assert_eq!(format!("{token:?}"), "ApiToken(<redacted>)");
    }
}
