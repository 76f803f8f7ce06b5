//! Session phases.
//!
//! A session moves through three live stages driven by the timer, with an
//! Idle state before the first round and after teardown. Unlike chat-turn
//! state, phases are monotonic: a phase is never revisited except through
//! an explicit reset back to Idle.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// The current stage of a trial session.
///
/// Flow: `Idle` → `Round` → `Verdict` → `Expired`. Only `reset` returns
/// the session to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No session running. Ticks are ignored.
    Idle,

    /// The interview round. The player questions the three participants.
    Round,

    /// The round is over; the player must commit a verdict before the
    /// shorter verdict countdown runs out.
    Verdict,

    /// Both countdowns have elapsed. Terminal until reset.
    Expired,
}

impl Phase {
    /// Returns true if the phase accepts chat interaction.
    pub fn accepts_chat(&self) -> bool {
        matches!(self, Self::Round)
    }

    /// Returns true if a verdict may be committed in this phase.
    pub fn accepts_verdict(&self) -> bool {
        matches!(self, Self::Round | Self::Verdict)
    }

    /// Returns a short label for the phase, suitable for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Round => "Round",
            Self::Verdict => "Verdict",
            Self::Expired => "Expired",
        }
    }
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Idle, Round) | (Round, Verdict) | (Verdict, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Phase::*;
        match self {
            Idle => vec![Round],
            Round => vec![Verdict],
            Verdict => vec![Expired],
            Expired => vec![],
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}
