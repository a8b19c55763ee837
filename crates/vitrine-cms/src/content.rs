//! Read-only fetches against collection and single-type endpoints.
//!
//! Missing documents are not errors here: a 404 or an empty body yields an empty
//! result so page renderers can fall back to static copy.

use reqwest::StatusCode;
use serde_json::Value;

use crate::client::CmsClient;
use crate::error::{CmsError, CmsResult, body_excerpt};

/// Default `populate` value for single-type fetches.
pub const POPULATE_ALL: &str = "*";

/// Query options for a collection fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    /// Relations to populate, e.g. `*`.
    pub populate: Option<String>,
    /// Sort expression, e.g. `publish_date:desc`.
    pub sort: Option<String>,
    /// Equality filters as `(field path, value)`; `category.slug` becomes
    /// `filters[category][slug][$eq]`.
    pub filters: Vec<(String, String)>,
}

impl CollectionQuery {
    /// Populate every relation.
    #[must_use]
    pub fn populate_all() -> Self {
        Self {
            populate: Some(POPULATE_ALL.to_string()),
            ..Self::default()
        }
    }

    /// Set the sort expression.
    #[must_use]
    pub fn sorted_by(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Add an equality filter.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(populate) = &self.populate {
            pairs.push(("populate".to_string(), populate.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        for (field, value) in &self.filters {
            let key: String = field
                .split('.')
                .map(|segment| format!("[{segment}]"))
                .collect();
            pairs.push((format!("filters{key}[$eq]"), value.clone()));
        }
        pairs
    }
}

impl CmsClient {
    /// Fetch the entries of a collection type.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Forbidden`] on 403, [`CmsError::Status`] for other
    /// failures except 404, and [`CmsError::Decode`] for malformed JSON.
    pub async fn fetch_collection(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> CmsResult<Vec<Value>> {
        let document = self
            .fetch_document("fetch collection", collection, &query.query_pairs())
            .await?;
        Ok(match document.and_then(|mut doc| doc.get_mut("data").map(Value::take)) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        })
    }

    /// Fetch a single-type document; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`CmsClient::fetch_collection`].
    pub async fn fetch_single_type(
        &self,
        type_name: &str,
        populate: Option<&str>,
    ) -> CmsResult<Option<Value>> {
        let pairs = vec![(
            "populate".to_string(),
            populate.unwrap_or(POPULATE_ALL).to_string(),
        )];
        let document = self
            .fetch_document("fetch single type", type_name, &pairs)
            .await?;
        Ok(document
            .and_then(|mut doc| doc.get_mut("data").map(Value::take))
            .filter(|data| !data.is_null()))
    }

    async fn fetch_document(
        &self,
        operation: &'static str,
        name: &str,
        pairs: &[(String, String)],
    ) -> CmsResult<Option<Value>> {
        let mut url = self.url(&format!("api/{}", name.trim_matches('/')))?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }

        tracing::debug!(url = %url, "content request");
        let response = self
            .authorized(self.http.get(url.clone()))
            .send()
            .await
            .map_err(|source| CmsError::transport(operation, source))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(url = %url, "content not found");
            return Ok(None);
        }
        if status == StatusCode::FORBIDDEN {
            return Err(CmsError::Forbidden { operation });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| CmsError::transport(operation, source))?;
        if !status.is_success() {
            return Err(CmsError::Status {
                operation,
                status: status.as_u16(),
                body: body_excerpt(&bytes),
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            tracing::warn!(url = %url, "content response was empty");
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CmsError::Decode { operation, source })
    }
}
