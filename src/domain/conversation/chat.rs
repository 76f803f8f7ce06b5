//! Chat session - orchestrates one conversational exchange.
//!
//! `send()` validates the utterance, snapshots the context, appends the
//! user message, calls the model without holding any lock, and appends the
//! persona's reply. At most one request per participant may be in flight;
//! overlapping sends are rejected rather than queued, which keeps context
//! snapshots and appends for one participant strictly ordered.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::domain::foundation::Participant;
use crate::domain::interaction::InteractionTracker;
use crate::ports::{AiError, AiProvider, CompletionRequest, PersonaSource};

use super::context::ContextBuilder;
use super::message::{Message, SpeakerRole};
use super::store::{ConversationStore, MessageScope};

/// Result of an accepted `send()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The persona replied; the reply is already in the store.
    Replied(Message),
    /// Empty or whitespace-only utterance. Nothing happened.
    IgnoredEmpty,
    /// The session was reset while the model call was in flight. The
    /// completion was dropped without touching the new session's state.
    Discarded,
    /// The current phase does not accept chat. Nothing happened.
    PhaseClosed,
}

/// Errors surfaced by `send()`.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// A request for this participant is already awaiting a response.
    #[error("a request for this participant is already in flight")]
    RequestInFlight,

    /// The model call failed. The user message stays in the store; the
    /// caller may re-offer the same utterance.
    #[error(transparent)]
    Provider(#[from] AiError),
}

/// Orchestrates exchanges between the player and the personas.
#[derive(Clone)]
pub struct ChatSession {
    store: Arc<Mutex<ConversationStore>>,
    tracker: Arc<Mutex<InteractionTracker>>,
    provider: Arc<dyn AiProvider>,
    personas: Arc<dyn PersonaSource>,
    builder: ContextBuilder,
    in_flight: Arc<Mutex<HashSet<Participant>>>,
    epoch: Arc<AtomicU64>,
}

impl ChatSession {
    pub fn new(
        store: Arc<Mutex<ConversationStore>>,
        tracker: Arc<Mutex<InteractionTracker>>,
        provider: Arc<dyn AiProvider>,
        personas: Arc<dyn PersonaSource>,
        epoch: Arc<AtomicU64>,
    ) -> Self {
        Self {
            store,
            tracker,
            provider,
            personas,
            builder: ContextBuilder::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            epoch,
        }
    }

    /// Sends one user utterance to a participant and awaits the reply.
    ///
    /// The context is built from the store state before the user message is
    /// appended; the builder places the new utterance last, so it appears in
    /// the prompt exactly once. On provider failure the store keeps only the
    /// user message, never a partial reply.
    pub async fn send(
        &self,
        participant: Participant,
        utterance: &str,
    ) -> Result<SendOutcome, ChatError> {
        let trimmed = utterance.trim();
        if trimmed.is_empty() {
            debug!(participant = %participant, "empty utterance ignored");
            return Ok(SendOutcome::IgnoredEmpty);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight, participant)
            .ok_or(ChatError::RequestInFlight)?;
        let dispatch_epoch = self.epoch.load(Ordering::SeqCst);

        let system_prompt = {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.record_interaction(participant);
            let progress = tracker.progress(participant);
            self.personas.system_prompt(participant, &progress)
        };

        let request: CompletionRequest = {
            let mut store = self.store.lock().unwrap();
            let context = self
                .builder
                .build(&store, participant, system_prompt, trimmed);
            store.append(participant, SpeakerRole::User, trimmed, MessageScope::Shared);
            context.into()
        };

        // No locks held across the model call.
        let result = self.provider.complete(request).await;

        if self.epoch.load(Ordering::SeqCst) != dispatch_epoch {
            // Expected under normal replay flow, not an error.
            debug!(participant = %participant, "completion for a reset session discarded");
            return Ok(SendOutcome::Discarded);
        }

        match result {
            Ok(response) => {
                let reply = {
                    let mut store = self.store.lock().unwrap();
                    store.append(
                        participant,
                        SpeakerRole::Participant,
                        response.content,
                        MessageScope::Shared,
                    )
                };
                info!(
                    participant = %participant,
                    sequence = reply.sequence(),
                    "persona replied"
                );
                Ok(SendOutcome::Replied(reply))
            }
            Err(error) => {
                warn!(participant = %participant, %error, "model call failed");
                Err(ChatError::Provider(error))
            }
        }
    }

    /// True while a request for the participant is awaiting its response.
    pub fn is_awaiting_response(&self, participant: Participant) -> bool {
        self.in_flight.lock().unwrap().contains(&participant)
    }
}

/// Removes the participant from the in-flight set on every exit path.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<Participant>>>,
    participant: Participant,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<Participant>>>, participant: Participant) -> Option<Self> {
        if !set.lock().unwrap().insert(participant) {
            return None;
        }
        Some(Self {
            set: Arc::clone(set),
            participant,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.participant);
    }
}
