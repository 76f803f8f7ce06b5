//! Domain layer - session core, free of transport and provider concerns.

pub mod conversation;
pub mod foundation;
pub mod interaction;
pub mod session;
pub mod timer;
pub mod verdict;

pub use conversation::{ChatError, ChatSession, ConversationStore, Message, SendOutcome};
pub use foundation::Participant;
pub use interaction::{InteractionTracker, ParticipantProgress};
pub use session::{GameSession, RoundOutcome, VerdictEntry, VerdictSubmission};
pub use timer::{Phase, PhaseTimer, TimerDurations};
pub use verdict::{Verdict, VerdictRecord};
