//! OpenRouter chat-completions client.
//!
//! Decoding is pinned deterministic (temperature 0.0) and the answer is
//! requested as a strict JSON object. Connection pooling lives inside the
//! reqwest client.

use crate::config::LlmConfig;
use crate::resolver::CompletionBackend;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{error, info};
use triagem_common::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};

pub struct OpenRouterClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenRouterClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Whether a bearer credential is present. Cheap, no network.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OPENROUTER_API_KEY is not configured")?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        info!(
            "[>]  Completion call [{}] ({} prompt chars)",
            self.model,
            user_prompt.len()
        );
        let start = Instant::now();

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenRouter")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("[-]  OpenRouter error {}: {}", status, error_text);
            anyhow::bail!("OpenRouter returned error {}: {}", status, error_text);
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to decode OpenRouter response")?;

        info!(
            "[<]  Completion answered in {}ms",
            start.elapsed().as_millis()
        );

        first_choice_content(chat_response)
    }
}

/// The reply must carry at least one candidate; only the first is used.
fn first_choice_content(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .context("OpenRouter reply carried no choices")
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    fn is_configured(&self) -> bool {
        self.has_credential()
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.chat(system_prompt, user_prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: key.map(|k| k.to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_has_credential() {
        assert!(!OpenRouterClient::new(&config_with_key(None)).has_credential());
        assert!(!OpenRouterClient::new(&config_with_key(Some(""))).has_credential());
        assert!(OpenRouterClient::new(&config_with_key(Some("sk-or-abc"))).has_credential());
    }

    #[test]
    fn test_first_choice_content_takes_the_first_candidate() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"id\":1,\"name\":\"x\"}"}},{"message":{"content":"ignored"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            first_choice_content(response).unwrap(),
            r#"{"id":1,"name":"x"}"#
        );
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_choice_content(response).is_err());
    }
}
