//! Game session - the single entry point the game-flow layer talks to.
//!
//! Wires the timer, the interaction tracker, the conversation store and the
//! chat orchestrator together, owns the verdict record and the session
//! epoch, and exposes the read-only query surface the UI renders from.
//! `reset_session()` is the one place where everything is wiped for replay.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::domain::conversation::{
    ChatError, ChatSession, ConversationStore, Message, MessageScope, SendOutcome, SpeakerRole,
};
use crate::domain::foundation::Participant;
use crate::domain::interaction::{InteractionTracker, ParticipantProgress};
use crate::domain::timer::{PhaseTimer, TimerDurations};
use crate::domain::verdict::{Verdict, VerdictRecord};
use crate::ports::{AiProvider, PersonaSource};

pub use crate::domain::timer::Phase;

/// What the round's end means for the game flow, read by the round-end
/// handler to pick the next scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Every participant was interviewed; the trial proceeds to a verdict.
    VerdictEligible,
    /// The round ended with participants uninterviewed. The case collapses.
    GameOver,
}

/// Result of asking to enter the verdict phase early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictEntry {
    Entered,
    /// Not every participant has been interviewed yet.
    NotEligible,
}

/// Result of committing a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSubmission {
    Recorded,
    /// A verdict for this session already exists. Nothing happened.
    AlreadySubmitted,
    /// The current phase does not accept verdicts. Nothing happened.
    PhaseClosed,
}

/// One playthrough of the trial.
pub struct GameSession {
    timer: Arc<PhaseTimer>,
    store: Arc<Mutex<ConversationStore>>,
    tracker: Arc<Mutex<InteractionTracker>>,
    chat: ChatSession,
    personas: Arc<dyn PersonaSource>,
    verdict: Arc<Mutex<Option<VerdictRecord>>>,
    epoch: Arc<AtomicU64>,
}

impl GameSession {
    pub fn new(
        provider: Arc<dyn AiProvider>,
        personas: Arc<dyn PersonaSource>,
        durations: TimerDurations,
    ) -> Self {
        let store = Arc::new(Mutex::new(ConversationStore::new()));
        let tracker = Arc::new(Mutex::new(InteractionTracker::new()));
        let epoch = Arc::new(AtomicU64::new(0));
        let chat = ChatSession::new(
            Arc::clone(&store),
            Arc::clone(&tracker),
            provider,
            Arc::clone(&personas),
            Arc::clone(&epoch),
        );
        Self {
            timer: Arc::new(PhaseTimer::new(durations)),
            store,
            tracker,
            chat,
            personas,
            verdict: Arc::new(Mutex::new(None)),
            epoch,
        }
    }

    /// Begins the interview round.
    ///
    /// `on_round_end` fires once when the round clock runs out; the handler
    /// reads `round_outcome()` to pick the next scene. `on_verdict_end`
    /// fires once when the verdict countdown expires; by the time it runs,
    /// an automatic guilty verdict has been recorded if the player never
    /// committed one.
    pub fn start_round(
        &self,
        on_round_end: impl Fn() + Send + Sync + 'static,
        on_verdict_end: impl Fn() + Send + Sync + 'static,
    ) {
        let verdict = Arc::clone(&self.verdict);
        self.timer.start(on_round_end, move || {
            let mut verdict = verdict.lock().unwrap();
            if verdict.is_none() {
                info!("verdict countdown expired, recording automatic guilty verdict");
                *verdict = Some(VerdictRecord::new(
                    Verdict::Guilty,
                    "No verdict was submitted before the countdown expired.",
                    true,
                ));
            }
            drop(verdict);
            on_verdict_end();
        });
    }

    /// Sends one user utterance to a participant.
    ///
    /// Chat is only open during the round; in any other phase this is a
    /// no-op reported as `PhaseClosed`.
    pub async fn send(
        &self,
        participant: Participant,
        utterance: &str,
    ) -> Result<SendOutcome, ChatError> {
        if !self.timer.current_phase().accepts_chat() {
            return Ok(SendOutcome::PhaseClosed);
        }
        self.chat.send(participant, utterance).await
    }

    /// Plays a participant's flashback, once per session.
    ///
    /// The narration goes to the participant's private log only. Returns
    /// the appended message the first time, `None` on repeats or when the
    /// participant has no flashback.
    pub fn show_flashback(&self, participant: Participant) -> Option<Message> {
        let narration = self.personas.flashback_narration(participant)?;
        if !self.tracker.lock().unwrap().mark_flashback_shown(participant) {
            return None;
        }
        let message = self.store.lock().unwrap().append(
            participant,
            SpeakerRole::System,
            narration,
            MessageScope::PrivateOnly,
        );
        Some(message)
    }

    /// Requests an early jump to the verdict phase.
    ///
    /// Gated on every participant having been interviewed. Idempotent once
    /// the verdict phase has been reached.
    pub fn request_verdict_phase(&self) -> VerdictEntry {
        if !self.all_interacted() {
            return VerdictEntry::NotEligible;
        }
        self.timer.switch_to_verdict();
        VerdictEntry::Entered
    }

    /// Commits the player's verdict.
    ///
    /// Accepted during the round and the verdict phase. A second submission
    /// is a no-op. Recording a verdict stops the countdown.
    pub fn submit_verdict(&self, verdict: Verdict, rationale: impl Into<String>) -> VerdictSubmission {
        if !self.timer.current_phase().accepts_verdict() {
            return VerdictSubmission::PhaseClosed;
        }
        let mut slot = self.verdict.lock().unwrap();
        if slot.is_some() {
            return VerdictSubmission::AlreadySubmitted;
        }
        let record = VerdictRecord::new(verdict, rationale, false);
        info!(verdict = %record.verdict(), "verdict recorded");
        *slot = Some(record);
        drop(slot);
        self.timer.stop();
        VerdictSubmission::Recorded
    }

    /// Wipes every piece of session state for replay.
    ///
    /// The epoch is bumped before the logs are cleared, so a model call
    /// still in flight discards its completion instead of writing into the
    /// fresh session.
    pub fn reset_session(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.timer.reset();
        self.store.lock().unwrap().reset();
        self.tracker.lock().unwrap().reset();
        *self.verdict.lock().unwrap() = None;
        info!(epoch = self.epoch.load(Ordering::SeqCst), "session reset");
    }

    // Query surface. None of these mutate.

    pub fn current_phase(&self) -> Phase {
        self.timer.current_phase()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn all_interacted(&self) -> bool {
        self.tracker.lock().unwrap().all_interacted()
    }

    pub fn has_interacted(&self, participant: Participant) -> bool {
        self.tracker.lock().unwrap().has_interacted(participant)
    }

    /// How the round ends, given who has been interviewed so far.
    pub fn round_outcome(&self) -> RoundOutcome {
        if self.all_interacted() {
            RoundOutcome::VerdictEligible
        } else {
            RoundOutcome::GameOver
        }
    }

    pub fn history(&self, participant: Participant) -> Vec<Message> {
        self.store.lock().unwrap().history(participant).to_vec()
    }

    pub fn shared_history(&self) -> Vec<Message> {
        self.store.lock().unwrap().shared_history().to_vec()
    }

    pub fn progress(&self, participant: Participant) -> ParticipantProgress {
        self.tracker.lock().unwrap().progress(participant)
    }

    pub fn verdict(&self) -> Option<VerdictRecord> {
        self.verdict.lock().unwrap().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    // Discovery markers, driven by the room UIs.

    pub fn mark_interacted(&self, participant: Participant) {
        self.tracker.lock().unwrap().record_interaction(participant);
    }

    pub fn mark_note_a_seen(&self, participant: Participant) {
        self.tracker.lock().unwrap().mark_note_a_seen(participant);
    }

    pub fn mark_note_b_seen(&self, participant: Participant) {
        self.tracker.lock().unwrap().mark_note_b_seen(participant);
    }

    pub fn mark_scanner_unlocked(&self, participant: Participant) {
        self.tracker.lock().unwrap().mark_scanner_unlocked(participant);
    }

    /// Advances the session clock by one second. Driven by the internal
    /// clock in production; exposed for deterministic tests.
    pub fn tick(&self) {
        self.timer.tick();
    }
}
