//! Ports - boundary contracts consumed by the session core.

pub mod ai;
pub mod persona;

pub use ai::{AiError, AiProvider, CompletionRequest, CompletionResponse, ProviderInfo};
pub use persona::PersonaSource;
