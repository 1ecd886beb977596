//! Narrow interfaces to the external providers.
//!
//! The pipeline only ever talks to these traits; the concrete HTTP clients in
//! `icebreaker-providers` implement them below, and tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use icebreaker_providers::{OpenAiClient, ProviderError, ProxycurlClient, SerpClient, TwitterClient};
use serde_json::Value;

/// `search(query) -> SearchDocument`
#[async_trait]
pub trait SearchCapability: Send + Sync {
    async fn search(&self, query: &str) -> Result<Value, ProviderError>;
}

/// `fetchProfile(url) -> JSON document`
#[async_trait]
pub trait ProfileFetch: Send + Sync {
    async fn fetch_profile(&self, url: &str) -> Result<Value, ProviderError>;
}

/// `lookupHandle(name) -> identifier`; `Ok(None)` when nobody matches.
#[async_trait]
pub trait HandleLookup: Send + Sync {
    async fn lookup_handle(&self, name: &str) -> Result<Option<String>, ProviderError>;
}

/// `fetchActivity(identifier, count) -> JSON document`
#[async_trait]
pub trait ActivityFetch: Send + Sync {
    async fn fetch_activity(&self, identifier: &str, count: u32) -> Result<Value, ProviderError>;
}

/// `generate(prompt) -> text`
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[async_trait]
impl SearchCapability for SerpClient {
    async fn search(&self, query: &str) -> Result<Value, ProviderError> {
        SerpClient::search(self, query).await
    }
}

#[async_trait]
impl ProfileFetch for ProxycurlClient {
    async fn fetch_profile(&self, url: &str) -> Result<Value, ProviderError> {
        ProxycurlClient::fetch_profile(self, url).await
    }
}

#[async_trait]
impl HandleLookup for TwitterClient {
    async fn lookup_handle(&self, name: &str) -> Result<Option<String>, ProviderError> {
        self.lookup_user_id(name).await
    }
}

#[async_trait]
impl ActivityFetch for TwitterClient {
    async fn fetch_activity(&self, identifier: &str, count: u32) -> Result<Value, ProviderError> {
        self.user_tweets(identifier, count).await
    }
}

#[async_trait]
impl Generate for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.complete(prompt).await
    }
}
