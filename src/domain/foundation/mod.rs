//! Foundation layer - shared value objects and cross-cutting domain traits.

mod errors;
mod participant;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use participant::{Participant, PARTICIPANT_COUNT};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
