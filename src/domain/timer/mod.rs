//! Session clock, phase state machine and countdown timer.

pub mod clock;
pub mod phase;
pub mod timer;

pub use clock::{Clock, ClockControl};
pub use phase::Phase;
pub use timer::{PhaseCallback, PhaseTimer, TimerDurations, ROUND_SECONDS, VERDICT_SECONDS};
