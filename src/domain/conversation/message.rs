//! Message value object.
//!
//! A message is immutable once created. The speaker role is recorded
//! explicitly at creation time; it is never derived from display text, so
//! display names can change without touching protocol semantics.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Participant, Timestamp};

/// Who authored a message, in protocol terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    /// The player.
    User,
    /// One of the interviewed personas.
    Participant,
    /// Narration injected by the game itself, e.g. a flashback scene.
    System,
}

/// One immutable entry in a conversation log.
///
/// `sequence` comes from a single session-wide counter, so merging the
/// private and shared logs by sequence yields a consistent chronology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    speaker_role: SpeakerRole,
    participant: Option<Participant>,
    text: String,
    sequence: u64,
    created_at: Timestamp,
}

impl Message {
    pub(crate) fn new(
        speaker_role: SpeakerRole,
        participant: Option<Participant>,
        text: impl Into<String>,
        sequence: u64,
    ) -> Self {
        Self {
            speaker_role,
            participant,
            text: text.into(),
            sequence,
            created_at: Timestamp::now(),
        }
    }

    pub fn speaker_role(&self) -> SpeakerRole {
        self.speaker_role
    }

    /// The persona this message belongs to, if any. User messages carry the
    /// participant they were addressed to.
    pub fn participant(&self) -> Option<Participant> {
        self.participant
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_role_and_participant() {
        let message = Message::new(
            SpeakerRole::User,
            Some(Participant::Defendant),
            "What happened that night?",
            7,
        );
        assert_eq!(message.speaker_role(), SpeakerRole::User);
        assert_eq!(message.participant(), Some(Participant::Defendant));
        assert_eq!(message.text(), "What happened that night?");
        assert_eq!(message.sequence(), 7);
    }

    #[test]
    fn speaker_role_serializes_snake_case() {
        let json = serde_json::to_string(&SpeakerRole::Participant).unwrap();
        assert_eq!(json, "\"participant\"");
    }
}
