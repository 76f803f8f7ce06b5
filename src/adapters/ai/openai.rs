//! OpenAI provider - implementation of AiProvider against the chat
//! completions API.
//!
//! Non-streaming only; a persona turn is short and rendered whole. Retries
//! retryable failures with exponential backoff.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::domain::conversation::PromptRole;
use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Chat completions endpoint.
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4.1-nano".to_string(),
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            temperature: 0.2,
            top_p: 0.5,
            max_tokens: 150,
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }

    /// Builds a configuration from the application config.
    pub fn from_app_config(config: &AiConfig) -> Self {
        Self {
            api_key: Secret::new(config.openai_api_key.clone().unwrap_or_default()),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            max_retries: config.max_retries,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Converts a domain request to OpenAI's wire format.
    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let mut messages = vec![WireMessage {
            role: "system".to_string(),
            content: request.system_prompt.clone(),
        }];
        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    PromptRole::User => "user",
                    PromptRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.text.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AiError> {
        let wire_request = self.to_wire_request(request);

        self.client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AiError::network(format!("Connection failed: {}", e))
                } else {
                    AiError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(AiError::AuthenticationFailed),
            429 => {
                let retry_after = Self::parse_retry_after(&error_body);
                Err(AiError::rate_limited(retry_after))
            }
            500..=599 => Err(AiError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AiError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses retry-after from error response.
    fn parse_retry_after(error_body: &str) -> u32 {
        // OpenAI sometimes includes "try again in Xs" in the error message.
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) {
            if let Some(msg) = parsed.get("error").and_then(|e| e.get("message")) {
                if let Some(s) = msg.as_str() {
                    if let Some(idx) = s.find("try again in ") {
                        let rest = &s[idx + 13..];
                        if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                            if let Ok(secs) = rest[..num_end].parse::<u32>() {
                                return secs;
                            }
                        }
                    }
                }
            }
        }
        30
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AiError> {
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| AiError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or(AiError::EmptyCompletion)?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: wire_response.model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        let mut last_error = AiError::network("No attempts made");
        let mut retry_count = 0;

        while retry_count <= self.config.max_retries {
            match self.send_request(&request).await {
                Ok(response) => match self.parse_response(response).await {
                    Ok(completion) => {
                        debug!(model = %completion.model, "completion received");
                        return Ok(completion);
                    }
                    Err(err) => {
                        if !err.is_retryable() || retry_count >= self.config.max_retries {
                            return Err(err);
                        }
                        last_error = err;
                    }
                },
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    last_error = err;
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = Duration::from_secs(1 << retry_count);
            warn!(retry = retry_count + 1, delay_secs = delay.as_secs(), %last_error, "retrying completion");
            sleep(delay).await;
            retry_count += 1;
        }

        Err(last_error)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::PromptMessage;

    #[test]
    fn config_builder_works() {
        let config = OpenAiConfig::new("test-key")
            .with_model("gpt-4.1-mini")
            .with_base_url("https://custom.api.com/chat")
            .with_timeout(Duration::from_secs(10))
            .with_max_retries(5);

        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.base_url, "https://custom.api.com/chat");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn config_from_app_config_carries_sampling_params() {
        let app = AiConfig {
            openai_api_key: Some("sk-xxx".to_string()),
            ..Default::default()
        };
        let config = OpenAiConfig::from_app_config(&app);

        assert_eq!(config.model, "gpt-4.1-nano");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_p, 0.5);
        assert_eq!(config.max_tokens, 150);
        assert_eq!(config.api_key(), "sk-xxx");
    }

    #[test]
    fn wire_request_puts_the_system_prompt_first() {
        let provider = OpenAiProvider::new(OpenAiConfig::new("test"));
        let request = CompletionRequest::new(
            "You are the defendant.",
            vec![
                PromptMessage {
                    role: PromptRole::User,
                    text: "Where were you?".to_string(),
                },
                PromptMessage {
                    role: PromptRole::Assistant,
                    text: "Recharging.".to_string(),
                },
            ],
        );

        let wire = provider.to_wire_request(&request);
        assert_eq!(wire.messages.len(), 3);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].content, "You are the defendant.");
        assert_eq!(wire.messages[1].role, "user");
        assert_eq!(wire.messages[2].role, "assistant");
        assert_eq!(wire.temperature, 0.2);
        assert_eq!(wire.max_tokens, 150);
    }

    #[test]
    fn parse_retry_after_from_message() {
        let error = r#"{"error":{"message":"Rate limit exceeded. Please try again in 30 seconds."}}"#;
        assert_eq!(OpenAiProvider::parse_retry_after(error), 30);
    }

    #[test]
    fn parse_retry_after_default() {
        let error = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(OpenAiProvider::parse_retry_after(error), 30);
    }

    #[test]
    fn provider_info_names_the_model() {
        let provider = OpenAiProvider::new(OpenAiConfig::new("test").with_model("gpt-4.1-nano"));
        let info = provider.provider_info();
        assert_eq!(info.name, "openai");
        assert_eq!(info.model, "gpt-4.1-nano");
    }
}
