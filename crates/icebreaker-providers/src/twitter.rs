//! Twitter/X client via the `twitter135` `RapidAPI` gateway.
//!
//! Two endpoints are used: `AutoComplete` to turn a display name into a
//! numeric user id, and `v2/UserTweets` for that user's recent timeline.

use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, parse_base_url, read_json, HttpSettings};
use crate::retry::{retry_with_backoff, RetryPolicy};

const PROVIDER: &str = "Twitter";

#[derive(Debug, Deserialize)]
struct AutoCompleteResponse {
    #[serde(default)]
    users: Vec<AutoCompleteUser>,
}

#[derive(Debug, Deserialize)]
struct AutoCompleteUser {
    #[serde(default)]
    id_str: Option<String>,
}

pub struct TwitterClient {
    client: Client,
    api_key: String,
    api_host: String,
    autocomplete_url: Url,
    user_tweets_url: Url,
    retry: RetryPolicy,
}

impl TwitterClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(
        api_key: &str,
        api_host: &str,
        base_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            client: build_client(settings)?,
            api_key: api_key.to_owned(),
            api_host: api_host.to_owned(),
            autocomplete_url: endpoint(&base, "AutoComplete/")?,
            user_tweets_url: endpoint(&base, "v2/UserTweets/")?,
            retry: settings.retry,
        })
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.client
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
    }

    async fn get_json(&self, url: Url) -> Result<Value, ProviderError> {
        retry_with_backoff(self.retry, || {
            let url = url.clone();
            async move {
                let response = self.get(url).send().await?;
                read_json(PROVIDER, response).await
            }
        })
        .await
    }

    /// Resolves the first matching user id for a name or handle.
    ///
    /// Returns `Ok(None)` when the lookup succeeds but matches nobody.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors; returns
    /// [`ProviderError::Deserialize`] if `users` has an unexpected shape.
    pub async fn lookup_user_id(&self, name: &str) -> Result<Option<String>, ProviderError> {
        let mut url = self.autocomplete_url.clone();
        url.query_pairs_mut().append_pair("q", name);
        tracing::debug!(provider = PROVIDER, name, "handle lookup request");

        let body = self.get_json(url).await?;
        let parsed: AutoCompleteResponse =
            serde_json::from_value(body).map_err(|e| ProviderError::Deserialize {
                context: format!("AutoComplete(q={name})"),
                source: e,
            })?;

        Ok(parsed
            .users
            .into_iter()
            .next()
            .and_then(|user| user.id_str)
            .filter(|id| !id.is_empty()))
    }

    /// Fetches the raw timeline document for a user id.
    ///
    /// # Errors
    ///
    /// Propagates transport, status and JSON decoding errors.
    pub async fn user_tweets(&self, user_id: &str, count: u32) -> Result<Value, ProviderError> {
        let mut url = self.user_tweets_url.clone();
        url.query_pairs_mut()
            .append_pair("id", user_id)
            .append_pair("count", &count.to_string());
        tracing::debug!(provider = PROVIDER, user_id, count, "timeline request");
        self.get_json(url).await
    }
}
