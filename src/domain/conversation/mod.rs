//! Conversation engine - logs, context windows and the chat orchestrator.

pub mod chat;
pub mod context;
pub mod message;
pub mod store;

pub use chat::{ChatError, ChatSession, SendOutcome};
pub use context::{BuiltContext, ContextBuilder, PromptMessage, PromptRole, MAX_HISTORY_MESSAGES};
pub use message::{Message, SpeakerRole};
pub use store::{ConversationStore, MessageScope};
