//! AI provider adapters.

pub mod mock;
pub mod openai;

pub use mock::MockAiProvider;
pub use openai::{OpenAiConfig, OpenAiProvider};
