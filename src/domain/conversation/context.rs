//! Context builder - maps conversation logs into one ordered prompt.
//!
//! For each outbound model call the builder takes bounded windows of the
//! participant's private log and the shared log, drops shared entries whose
//! text already appears in the private window, role-maps everything, and
//! appends the new user utterance last.

use serde::Serialize;

use crate::domain::foundation::Participant;

use super::message::{Message, SpeakerRole};
use super::store::ConversationStore;

/// How many messages each log contributes to the context window. The two
/// windows are independent, not a combined total.
pub const MAX_HISTORY_MESSAGES: usize = 6;

/// Role tag understood by the model API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    User,
    Assistant,
}

/// One role-tagged line of the outbound prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub text: String,
}

/// The fully assembled input for one model call.
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub system_prompt: String,
    pub messages: Vec<PromptMessage>,
}

/// Builds bounded, deduplicated prompt contexts.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    max_history: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_MESSAGES,
        }
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_max_history(max_history: usize) -> Self {
        Self { max_history }
    }

    /// Produces the ordered message list for the participant's next turn.
    ///
    /// Output shape: private window, then the shared window minus entries
    /// whose text appears verbatim in the private window, then the new
    /// utterance as a user line. Shared entries authored by the addressed
    /// participant stay eligible; cross-examination context is intentional.
    pub fn build(
        &self,
        store: &ConversationStore,
        participant: Participant,
        system_prompt: impl Into<String>,
        new_utterance: &str,
    ) -> BuiltContext {
        let private_window = tail(store.history(participant), self.max_history);
        let shared_window = tail(store.shared_history(), self.max_history);

        let mut messages: Vec<PromptMessage> =
            private_window.iter().map(to_prompt_message).collect();
        messages.extend(
            shared_window
                .iter()
                .filter(|shared| {
                    !private_window
                        .iter()
                        .any(|private| private.text() == shared.text())
                })
                .map(to_prompt_message),
        );
        messages.push(PromptMessage {
            role: PromptRole::User,
            text: new_utterance.to_owned(),
        });

        BuiltContext {
            system_prompt: system_prompt.into(),
            messages,
        }
    }
}

fn tail(log: &[Message], count: usize) -> &[Message] {
    let start = log.len().saturating_sub(count);
    &log[start..]
}

/// Deterministic role mapping: persona responses become assistant lines,
/// everything else becomes a user line.
fn to_prompt_message(message: &Message) -> PromptMessage {
    let role = match message.speaker_role() {
        SpeakerRole::Participant => PromptRole::Assistant,
        SpeakerRole::User | SpeakerRole::System => PromptRole::User,
    };
    PromptMessage {
        role,
        text: message.text().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::store::MessageScope;

    fn seeded_store() -> ConversationStore {
        let mut store = ConversationStore::new();
        store.append(
            Participant::Defendant,
            SpeakerRole::User,
            "Where were you at 2am?",
            MessageScope::Shared,
        );
        store.append(
            Participant::Defendant,
            SpeakerRole::Participant,
            "Running ward diagnostics.",
            MessageScope::Shared,
        );
        store
    }

    mod windowing {
        use super::*;

        #[test]
        fn empty_logs_yield_only_the_new_utterance() {
            let store = ConversationStore::new();
            let context = ContextBuilder::new().build(
                &store,
                Participant::Defendant,
                "You are the defendant.",
                "Hello?",
            );

            assert_eq!(context.system_prompt, "You are the defendant.");
            assert_eq!(context.messages.len(), 1);
            assert_eq!(context.messages[0].role, PromptRole::User);
            assert_eq!(context.messages[0].text, "Hello?");
        }

        #[test]
        fn long_logs_are_truncated_to_the_window() {
            let mut store = ConversationStore::new();
            for i in 0..20 {
                store.append(
                    Participant::Defendant,
                    SpeakerRole::Participant,
                    format!("private {i}"),
                    MessageScope::PrivateOnly,
                );
                store.append(
                    Participant::HumanWitness,
                    SpeakerRole::User,
                    format!("shared {i}"),
                    MessageScope::Shared,
                );
            }

            let builder = ContextBuilder::with_max_history(6);
            let context = builder.build(&store, Participant::Defendant, "sys", "next");

            // 6 private + 6 shared + the new utterance.
            assert_eq!(context.messages.len(), 13);
            assert_eq!(context.messages[0].text, "private 14");
            assert_eq!(context.messages[6].text, "shared 14");
            assert_eq!(context.messages[12].text, "next");
        }

        #[test]
        fn windows_keep_oldest_first_order() {
            let store = seeded_store();
            let context =
                ContextBuilder::new().build(&store, Participant::Defendant, "sys", "next");

            assert_eq!(context.messages[0].text, "Where were you at 2am?");
            assert_eq!(context.messages[1].text, "Running ward diagnostics.");
        }
    }

    mod deduplication {
        use super::*;

        #[test]
        fn shared_entries_already_in_the_private_window_are_dropped() {
            // The defendant's own shared dialogue lands in both logs; the
            // context must carry each line once.
            let store = seeded_store();
            let context =
                ContextBuilder::new().build(&store, Participant::Defendant, "sys", "next");

            let occurrences = context
                .messages
                .iter()
                .filter(|m| m.text == "Where were you at 2am?")
                .count();
            assert_eq!(occurrences, 1);
            assert_eq!(context.messages.len(), 3);
        }

        #[test]
        fn dedup_is_by_content_not_sequence() {
            let mut store = ConversationStore::new();
            // Same literal text appended to two different participants, so
            // it sits in this participant's private log and in the shared
            // log under different sequence numbers.
            store.append(
                Participant::Defendant,
                SpeakerRole::User,
                "What happened?",
                MessageScope::PrivateOnly,
            );
            store.append(
                Participant::HumanWitness,
                SpeakerRole::User,
                "What happened?",
                MessageScope::Shared,
            );

            let context =
                ContextBuilder::new().build(&store, Participant::Defendant, "sys", "next");
            let occurrences = context
                .messages
                .iter()
                .filter(|m| m.text == "What happened?")
                .count();
            assert_eq!(occurrences, 1);
        }

        #[test]
        fn other_participants_shared_lines_are_included() {
            let mut store = ConversationStore::new();
            store.append(
                Participant::HumanWitness,
                SpeakerRole::Participant,
                "I saw the cart leave bay three.",
                MessageScope::Shared,
            );

            let context =
                ContextBuilder::new().build(&store, Participant::Defendant, "sys", "next");
            assert_eq!(context.messages[0].text, "I saw the cart leave bay three.");
            assert_eq!(context.messages[0].role, PromptRole::Assistant);
        }
    }

    mod role_mapping {
        use super::*;

        #[test]
        fn only_participant_messages_map_to_assistant() {
            let mut store = ConversationStore::new();
            store.append(
                Participant::Defendant,
                SpeakerRole::User,
                "question",
                MessageScope::PrivateOnly,
            );
            store.append(
                Participant::Defendant,
                SpeakerRole::Participant,
                "answer",
                MessageScope::PrivateOnly,
            );
            store.append(
                Participant::Defendant,
                SpeakerRole::System,
                "narration",
                MessageScope::PrivateOnly,
            );

            let context =
                ContextBuilder::new().build(&store, Participant::Defendant, "sys", "next");
            let roles: Vec<PromptRole> = context.messages.iter().map(|m| m.role).collect();
            assert_eq!(
                roles,
                vec![
                    PromptRole::User,
                    PromptRole::Assistant,
                    PromptRole::User,
                    PromptRole::User,
                ]
            );
        }

        #[test]
        fn prompt_role_serializes_lowercase() {
            assert_eq!(
                serde_json::to_string(&PromptRole::Assistant).unwrap(),
                "\"assistant\""
            );
        }
    }
}
