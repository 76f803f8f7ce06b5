//! AI provider port - interface for the language model behind the personas.
//!
//! The conversation core treats the model call as an opaque request/response
//! function: a system prompt plus an ordered, role-tagged message list in,
//! one completion text out. Latency and transport belong to the adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{BuiltContext, PromptMessage};

/// Port for language model completions.
///
/// Implementations translate between the provider-specific API and the
/// domain's prompt types. Called without any domain locks held.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generates a single completion for one persona turn.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError>;

    /// Provider identification for logging.
    fn provider_info(&self) -> ProviderInfo;
}

/// One outbound completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Persona and situational instructions.
    pub system_prompt: String,
    /// Ordered conversation window, new utterance last.
    pub messages: Vec<PromptMessage>,
}

impl CompletionRequest {
    pub fn new(system_prompt: impl Into<String>, messages: Vec<PromptMessage>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
        }
    }
}

impl From<BuiltContext> for CompletionRequest {
    fn from(context: BuiltContext) -> Self {
        Self {
            system_prompt: context.system_prompt,
            messages: context.messages,
        }
    }
}

/// Completion result.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated persona reply.
    pub content: String,
    /// Model that produced it.
    pub model: String,
}

/// Provider identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name, e.g. "openai" or "mock".
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider answered but returned no completion choices.
    #[error("empty completion: provider returned no choices")]
    EmptyCompletion,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AiError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited { .. }
                | AiError::Unavailable { .. }
                | AiError::Network(_)
                | AiError::Timeout { .. }
        )
    }
}
