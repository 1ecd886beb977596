//! `SerpAPI` Google search client.
//!
//! Returns the raw search document untouched: answer boxes, knowledge graphs
//! and organic results are interpreted by the caller. A `200` response that
//! carries an `"error"` field is passed through as-is for the same reason.

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, parse_base_url, read_json, HttpSettings};
use crate::retry::{retry_with_backoff, RetryPolicy};

const PROVIDER: &str = "SerpAPI";

pub struct SerpClient {
    client: Client,
    api_key: String,
    search_url: Url,
    retry: RetryPolicy,
}

impl SerpClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(
        api_key: &str,
        base_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            client: build_client(settings)?,
            api_key: api_key.to_owned(),
            search_url: endpoint(&base, "search.json")?,
            retry: settings.retry,
        })
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("engine", "google")
            .append_pair("q", query)
            .append_pair("api_key", &self.api_key);
        url
    }

    /// Runs a Google search and returns the raw result document.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] for non-2xx responses carrying an error message.
    /// - [`ProviderError::UnexpectedStatus`] for other non-2xx responses.
    /// - [`ProviderError::Http`] on network failure after retries.
    /// - [`ProviderError::Deserialize`] if the body is not JSON.
    pub async fn search(&self, query: &str) -> Result<Value, ProviderError> {
        let url = self.build_url(query);
        tracing::debug!(provider = PROVIDER, query, "search request");
        retry_with_backoff(self.retry, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url).send().await?;
                read_json(PROVIDER, response).await
            }
        })
        .await
    }
}
