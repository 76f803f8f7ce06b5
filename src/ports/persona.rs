//! Persona port - supplies system prompts and flashback narration.
//!
//! A persona source is a pure lookup from the conversation core's point of
//! view: given a participant and that participant's discovery progress, it
//! returns the prompt text for the next model call.

use crate::domain::foundation::Participant;
use crate::domain::interaction::ParticipantProgress;

/// Supplies per-participant prompt material.
///
/// The progress record lets the prompt reflect what the player has already
/// discovered in that participant's room, without the persona layer holding
/// any session state of its own.
pub trait PersonaSource: Send + Sync {
    /// Base persona prompt plus any situational suffix derived from the
    /// player's discoveries.
    fn system_prompt(&self, participant: Participant, progress: &ParticipantProgress) -> String;

    /// Narration for this participant's flashback scene, if it has one.
    /// Flashback text goes to the private log only.
    fn flashback_narration(&self, participant: Participant) -> Option<String>;
}
