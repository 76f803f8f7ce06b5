//! Participant value object.
//!
//! The three chat personas the player interviews form a fixed, closed set.
//! Each carries a stable key used in logs and configuration, and a display
//! name that belongs purely to the rendering layer.

use serde::{Deserialize, Serialize};

/// One of the fixed chat personas the player interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// The AI system on trial.
    Defendant,
    /// The human expert witness.
    HumanWitness,
    /// The corroborating AI witness.
    AiWitness,
}

/// Number of participants a player must meaningfully interact with before
/// the session is verdict-eligible.
pub const PARTICIPANT_COUNT: usize = 3;

impl Participant {
    /// All participants, in interview order.
    pub const ALL: [Participant; PARTICIPANT_COUNT] = [
        Participant::Defendant,
        Participant::HumanWitness,
        Participant::AiWitness,
    ];

    /// Stable key identifying this participant.
    pub fn key(&self) -> &'static str {
        match self {
            Participant::Defendant => "defendant",
            Participant::HumanWitness => "human_witness",
            Participant::AiWitness => "ai_witness",
        }
    }

    /// Display name used by the rendering layer.
    ///
    /// Never used to recover roles or identity; see `SpeakerRole` on
    /// messages for that.
    pub fn display_name(&self) -> &'static str {
        match self {
            Participant::Defendant => "MediSort-5",
            Participant::HumanWitness => "Dr. Payne Gaun",
            Participant::AiWitness => "PathoScan-7",
        }
    }

    /// Parses a participant from its stable key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "defendant" => Some(Participant::Defendant),
            "human_witness" => Some(Participant::HumanWitness),
            "ai_witness" => Some(Participant::AiWitness),
            _ => None,
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
