//! Conversation store - per-participant private logs plus one shared log.
//!
//! Append-only except for `reset()`. The store owns the global sequence
//! counter; every appended message gets the next value, so sequence numbers
//! are strictly increasing across all logs in a session.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::foundation::Participant;

use super::message::{Message, SpeakerRole};

/// Whether a message is visible to the other personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    /// Written to the participant's private log and to the shared log.
    Shared,
    /// Private log only. Used for flashback narration that the other
    /// personas must not be able to reference.
    PrivateOnly,
}

/// All conversation logs for one session.
#[derive(Debug, Default)]
pub struct ConversationStore {
    private: HashMap<Participant, Vec<Message>>,
    shared: Vec<Message>,
    next_sequence: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the participant's private log and, unless the
    /// scope is `PrivateOnly`, to the shared log as well.
    ///
    /// The dual write is deliberate: a persona's own log holds everything
    /// relevant to it including its flashback, while the shared log holds
    /// only cross-examinable dialogue.
    pub fn append(
        &mut self,
        participant: Participant,
        speaker_role: SpeakerRole,
        text: impl Into<String>,
        scope: MessageScope,
    ) -> Message {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let message = Message::new(speaker_role, Some(participant), text, sequence);
        self.private
            .entry(participant)
            .or_default()
            .push(message.clone());
        if scope == MessageScope::Shared {
            self.shared.push(message.clone());
        }
        debug!(
            participant = %participant,
            sequence,
            shared = scope == MessageScope::Shared,
            "message appended"
        );
        message
    }

    /// The participant's private log, oldest-first.
    pub fn history(&self, participant: Participant) -> &[Message] {
        self.private
            .get(&participant)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The shared log, oldest-first.
    pub fn shared_history(&self) -> &[Message] {
        &self.shared
    }

    /// Clears every log and the sequence counter.
    pub fn reset(&mut self) {
        self.private.clear();
        self.shared.clear();
        self.next_sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod appending {
        use super::*;

        #[test]
        fn shared_messages_land_in_both_logs() {
            let mut store = ConversationStore::new();
            store.append(
                Participant::Defendant,
                SpeakerRole::User,
                "Where were you?",
                MessageScope::Shared,
            );

            assert_eq!(store.history(Participant::Defendant).len(), 1);
            assert_eq!(store.shared_history().len(), 1);
            assert_eq!(store.history(Participant::AiWitness).len(), 0);
        }

        #[test]
        fn private_only_messages_stay_out_of_the_shared_log() {
            let mut store = ConversationStore::new();
            store.append(
                Participant::HumanWitness,
                SpeakerRole::System,
                "Flashback: the ward at midnight.",
                MessageScope::PrivateOnly,
            );

            assert_eq!(store.history(Participant::HumanWitness).len(), 1);
            assert!(store.shared_history().is_empty());
        }

        #[test]
        fn sequence_is_strictly_increasing_across_logs() {
            let mut store = ConversationStore::new();
            let a = store.append(
                Participant::Defendant,
                SpeakerRole::User,
                "one",
                MessageScope::Shared,
            );
            let b = store.append(
                Participant::HumanWitness,
                SpeakerRole::System,
                "two",
                MessageScope::PrivateOnly,
            );
            let c = store.append(
                Participant::AiWitness,
                SpeakerRole::Participant,
                "three",
                MessageScope::Shared,
            );

            assert_eq!(a.sequence(), 0);
            assert_eq!(b.sequence(), 1);
            assert_eq!(c.sequence(), 2);
        }

        #[test]
        fn logs_are_oldest_first() {
            let mut store = ConversationStore::new();
            store.append(
                Participant::Defendant,
                SpeakerRole::User,
                "first",
                MessageScope::Shared,
            );
            store.append(
                Participant::Defendant,
                SpeakerRole::Participant,
                "second",
                MessageScope::Shared,
            );

            let history = store.history(Participant::Defendant);
            assert_eq!(history[0].text(), "first");
            assert_eq!(history[1].text(), "second");
        }
    }

    #[test]
    fn reset_clears_logs_and_counter() {
        let mut store = ConversationStore::new();
        store.append(
            Participant::Defendant,
            SpeakerRole::User,
            "hello",
            MessageScope::Shared,
        );
        store.reset();

        assert!(store.history(Participant::Defendant).is_empty());
        assert!(store.shared_history().is_empty());

        let first = store.append(
            Participant::Defendant,
            SpeakerRole::User,
            "again",
            MessageScope::Shared,
        );
        assert_eq!(first.sequence(), 0);
    }
}
