//! HTTP clients for the external providers used by the enrichment pipeline.
//!
//! Each client is a thin transport: it builds the request, checks the HTTP
//! status, decodes JSON and retries transient failures. Interpreting the
//! returned documents is left to `icebreaker-agent`.

pub mod error;
pub mod http;
pub mod openai;
pub mod proxycurl;
pub mod retry;
pub mod serp;
pub mod twitter;

pub use error::ProviderError;
pub use http::HttpSettings;
pub use openai::OpenAiClient;
pub use proxycurl::ProxycurlClient;
pub use retry::RetryPolicy;
pub use serp::SerpClient;
pub use twitter::TwitterClient;
