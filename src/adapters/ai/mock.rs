//! Mock AI provider for testing.
//!
//! Returns queued responses in order and records every request it sees.
//! An optional artificial delay makes in-flight behavior testable under
//! tokio's paused time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Scripted AiProvider implementation.
pub struct MockAiProvider {
    responses: Mutex<VecDeque<Result<String, AiError>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleeps for `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queues a successful response.
    pub fn enqueue_response(&self, content: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content.into()));
    }

    /// Queues a failure.
    pub fn enqueue_error(&self, error: AiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Handle onto the recorded requests, usable after the provider has
    /// been moved into a session.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.calls)
    }

    /// Number of requests seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                content,
                model: "mock".to_string(),
            }),
            Some(Err(error)) => Err(error),
            // Unscripted calls get a canned reply rather than an error, so
            // tests that don't care about content stay terse.
            None => Ok(CompletionResponse {
                content: "I have nothing further to add.".to_string(),
                model: "mock".to_string(),
            }),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock")
    }
}
