//! Proxycurl `LinkedIn` profile client.

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, parse_base_url, read_json, HttpSettings};
use crate::retry::{retry_with_backoff, RetryPolicy};

const PROVIDER: &str = "Proxycurl";

pub struct ProxycurlClient {
    client: Client,
    api_key: String,
    profile_url: Url,
    retry: RetryPolicy,
}

impl ProxycurlClient {
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
            profile_url: endpoint(&base, "api/v2/linkedin")?,
            retry: settings.retry,
        })
    }

    /// Fetches the raw profile document for a `LinkedIn` profile URL.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] / [`ProviderError::UnexpectedStatus`] on non-2xx.
    /// - [`ProviderError::Http`] on network failure after retries.
    /// - [`ProviderError::Deserialize`] if the body is not JSON.
    pub async fn fetch_profile(&self, linkedin_url: &str) -> Result<Value, ProviderError> {
        let mut url = self.profile_url.clone();
        url.query_pairs_mut().append_pair("url", linkedin_url);
        tracing::debug!(provider = PROVIDER, linkedin_url, "profile request");

        retry_with_backoff(self.retry, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url)
                    .bearer_auth(&self.api_key)
                    .send()
                    .await?;
                read_json(PROVIDER, response).await
            }
        })
        .await
    }
}
