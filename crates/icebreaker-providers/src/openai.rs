//! `OpenAI` chat-completions client.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint, error_message, parse_base_url, read_json, HttpSettings};
use crate::retry::{retry_with_backoff, RetryPolicy};

const PROVIDER: &str = "OpenAI";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    completions_url: Url,
    retry: RetryPolicy,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ProviderError::InvalidBaseUrl`] for a malformed base URL.
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        settings: &HttpSettings,
    ) -> Result<Self, ProviderError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            client: build_client(settings)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            completions_url: endpoint(&base, "chat/completions")?,
            retry: settings.retry,
        })
    }

    /// Sends `prompt` as a single user message at temperature 0 and returns
    /// the first choice's text.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Api`] if the provider returns an error payload.
    /// - [`ProviderError::EmptyCompletion`] if no choice carries text.
    /// - [`ProviderError::Http`] / [`ProviderError::UnexpectedStatus`] on
    ///   transport failure after retries.
    /// - [`ProviderError::Deserialize`] if the response shape is unexpected.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        tracing::debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_chars = prompt.len(),
            "completion request"
        );

        let body = retry_with_backoff(self.retry, || {
            let url = self.completions_url.clone();
            let request = &request;
            async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.api_key)
                    .json(request)
                    .send()
                    .await?;
                read_json(PROVIDER, response).await
            }
        })
        .await?;

        if let Some(message) = error_message(&body) {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_value(body).map_err(|e| ProviderError::Deserialize {
                context: "chat completion".to_string(),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyCompletion { provider: PROVIDER })
    }
}
