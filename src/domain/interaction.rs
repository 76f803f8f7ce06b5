//! Per-session interaction tracking.
//!
//! Records which participants the player has spoken to during the round and
//! what per-participant discoveries have been made. All of it is session
//! state: `reset()` wipes everything so a fresh session starts clean.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Participant, PARTICIPANT_COUNT};

/// Discoveries made while interviewing one participant.
///
/// Every flag starts false and only ever flips to true within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantProgress {
    /// The participant's flashback scene has been played.
    pub flashback_shown: bool,
    /// First clue note found in this participant's room.
    pub note_a_seen: bool,
    /// Second clue note found in this participant's room.
    pub note_b_seen: bool,
    /// The diagnostic scanner in this participant's room has been unlocked.
    pub scanner_unlocked: bool,
}

/// Tracks which participants have been interacted with, and their progress.
#[derive(Debug, Default)]
pub struct InteractionTracker {
    interacted: HashSet<Participant>,
    progress: HashMap<Participant, ParticipantProgress>,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a participant as interacted with.
    ///
    /// Returns true the first time, false on repeats. Idempotent.
    pub fn record_interaction(&mut self, participant: Participant) -> bool {
        self.interacted.insert(participant)
    }

    pub fn has_interacted(&self, participant: Participant) -> bool {
        self.interacted.contains(&participant)
    }

    pub fn interacted_count(&self) -> usize {
        self.interacted.len()
    }

    /// True once every participant has been interacted with at least once.
    ///
    /// This is the gate for reaching the verdict phase instead of an
    /// immediate loss when the round clock runs out.
    pub fn all_interacted(&self) -> bool {
        self.interacted.len() >= PARTICIPANT_COUNT
    }

    /// Progress snapshot for one participant. Absent entries read as all
    /// flags false.
    pub fn progress(&self, participant: Participant) -> ParticipantProgress {
        self.progress.get(&participant).copied().unwrap_or_default()
    }

    /// Marks the participant's flashback as shown.
    ///
    /// Returns true the first time, so the caller can decide whether to
    /// actually play the scene.
    pub fn mark_flashback_shown(&mut self, participant: Participant) -> bool {
        let entry = self.progress.entry(participant).or_default();
        let first = !entry.flashback_shown;
        entry.flashback_shown = true;
        first
    }

    pub fn flashback_shown(&self, participant: Participant) -> bool {
        self.progress(participant).flashback_shown
    }

    /// Marks the first clue note as seen. Viewing evidence is a meaningful
    /// interaction, so this also counts toward verdict eligibility.
    pub fn mark_note_a_seen(&mut self, participant: Participant) {
        self.progress.entry(participant).or_default().note_a_seen = true;
        self.interacted.insert(participant);
    }

    /// Marks the second clue note as seen. Counts as an interaction.
    pub fn mark_note_b_seen(&mut self, participant: Participant) {
        self.progress.entry(participant).or_default().note_b_seen = true;
        self.interacted.insert(participant);
    }

    /// Marks the scanner gesture as completed. Counts as an interaction.
    pub fn mark_scanner_unlocked(&mut self, participant: Participant) {
        self.progress.entry(participant).or_default().scanner_unlocked = true;
        self.interacted.insert(participant);
    }

    /// Wipes all interaction and progress state.
    pub fn reset(&mut self) {
        self.interacted.clear();
        self.progress.clear();
    }
}
