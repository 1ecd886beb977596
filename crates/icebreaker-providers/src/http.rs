//! Request plumbing shared by every provider client.

use std::time::Duration;

use icebreaker_core::AppConfig;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::error::ProviderError;
use crate::retry::RetryPolicy;

/// Transport settings common to all providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "icebreaker/0.1 (person-intel)".to_string(),
            retry: RetryPolicy::none(),
        }
    }
}

pub(crate) fn build_client(settings: &HttpSettings) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(settings.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Parses a base URL, normalising it to end with exactly one slash so that
/// relative endpoint paths join beneath it instead of replacing the last
/// segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: format!("cannot join \"{path}\": {e}"),
    })
}

/// Checks the HTTP status and decodes the body as JSON.
///
/// 429 and 5xx become [`ProviderError::UnexpectedStatus`] (retriable). Other
/// non-2xx responses become [`ProviderError::Api`] when the body carries an
/// error message, [`ProviderError::UnexpectedStatus`] otherwise.
pub(crate) async fn read_json(
    provider: &'static str,
    response: Response,
) -> Result<Value, ProviderError> {
    let status = response.status();
    let url = redacted_url(response.url());

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(error_message);
        return Err(match message {
            Some(message) => ProviderError::Api { provider, message },
            None => ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            },
        });
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: format!("{provider} response from {url}"),
        source: e,
    })
}

/// Extracts a provider error message from `{"error": "..."}` or
/// `{"error": {"message": "..."}}`.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| Some(Value::Object(obj.clone()).to_string())),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Drops the query string so API keys passed as parameters never reach logs
/// or error messages.
fn redacted_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_base_url_adds_single_trailing_slash() {
        let url = parse_base_url("https://nubela.co/proxycurl//").unwrap();
        assert_eq!(url.as_str(), "https://nubela.co/proxycurl/");
    }

    #[test]
    fn endpoint_joins_beneath_base_path() {
        let base = parse_base_url("https://nubela.co/proxycurl").unwrap();
        let url = endpoint(&base, "api/v2/linkedin").unwrap();
        assert_eq!(url.as_str(), "https://nubela.co/proxycurl/api/v2/linkedin");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn error_message_reads_string_and_object_forms() {
        assert_eq!(
            error_message(&json!({"error": "Invalid API key"})).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(
            error_message(&json!({"error": {"message": "quota", "type": "insufficient_quota"}}))
                .as_deref(),
            Some("quota")
        );
        assert_eq!(error_message(&json!({"error": null})), None);
        assert_eq!(error_message(&json!({"ok": true})), None);
    }

    #[test]
    fn redacted_url_strips_query() {
        let url = Url::parse("https://serpapi.com/search.json?q=ada&api_key=secret").unwrap();
        assert_eq!(redacted_url(&url), "https://serpapi.com/search.json");
    }
}
