//! Phase timer - the session countdown state machine.
//!
//! Owns the session phase and remaining seconds, and is the only mutator of
//! either. A `Clock` drives `tick()` once per second; reaching zero in the
//! round phase enters the verdict phase, and reaching zero in the verdict
//! phase expires the session. Phase-transition callbacks fire exactly once
//! per phase entry, guarded by the transition itself rather than by flags.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info};

use super::clock::{Clock, ClockControl};
use super::phase::Phase;

/// Default length of the interview round, in seconds.
pub const ROUND_SECONDS: u32 = 300;

/// Default length of the verdict countdown, in seconds.
pub const VERDICT_SECONDS: u32 = 60;

/// Callback invoked on a phase transition.
pub type PhaseCallback = Arc<dyn Fn() + Send + Sync>;

/// Phase durations, overridable through configuration.
#[derive(Debug, Clone, Copy)]
pub struct TimerDurations {
    pub round_secs: u32,
    pub verdict_secs: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECONDS,
            verdict_secs: VERDICT_SECONDS,
        }
    }
}

/// Mutable timer state, only ever touched under the state lock.
struct TimerState {
    phase: Phase,
    remaining: u32,
    durations: TimerDurations,
    on_round_end: Option<PhaseCallback>,
    on_verdict_end: Option<PhaseCallback>,
}

/// The session phase state machine and its countdown.
///
/// At most one tick source is active at a time: `start()` cancels any
/// previous clock before installing a new one, and expiry stops the clock
/// from inside the tick callback.
pub struct PhaseTimer {
    state: Arc<Mutex<TimerState>>,
    clock: Mutex<Option<Clock>>,
    tick_period: Duration,
}

impl PhaseTimer {
    /// Creates an idle timer with the given durations.
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            state: Arc::new(Mutex::new(TimerState {
                phase: Phase::Idle,
                remaining: 0,
                durations,
                on_round_end: None,
                on_verdict_end: None,
            })),
            clock: Mutex::new(None),
            tick_period: Duration::from_secs(1),
        }
    }

    /// Begins a fresh round.
    ///
    /// Any previously running tick source is cancelled first, then the
    /// phase is set to `Round` with a full round countdown and a new clock
    /// is installed. Callable from any phase; it reinitializes the session
    /// countdown.
    pub fn start(
        &self,
        on_round_end: impl Fn() + Send + Sync + 'static,
        on_verdict_end: impl Fn() + Send + Sync + 'static,
    ) {
        let mut clock = self.clock.lock().unwrap();
        if let Some(previous) = clock.take() {
            previous.stop();
        }

        {
            let mut state = self.state.lock().unwrap();
            state.phase = Phase::Round;
            state.remaining = state.durations.round_secs;
            state.on_round_end = Some(Arc::new(on_round_end));
            state.on_verdict_end = Some(Arc::new(on_verdict_end));
            info!(remaining = state.remaining, "round started");
        }

        *clock = Some(self.spawn_clock());
    }

    /// Advances the countdown by one second.
    ///
    /// A tick while `Idle` or `Expired` is a no-op, never an error; a stray
    /// tick after `stop()` must not raise.
    pub fn tick(&self) {
        Self::advance(&self.state);
    }

    /// Skips directly to the verdict phase.
    ///
    /// Used when the game flow decides the round objective is already
    /// satisfied. No-op if already in `Verdict` or `Expired`. Installs a
    /// tick source if none is running.
    pub fn switch_to_verdict(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if matches!(state.phase, Phase::Verdict | Phase::Expired) {
                return;
            }
            state.phase = Phase::Verdict;
            state.remaining = state.durations.verdict_secs;
            info!(remaining = state.remaining, "switched to verdict phase");
        }

        let mut clock = self.clock.lock().unwrap();
        let running = clock.as_ref().map(Clock::is_running).unwrap_or(false);
        if !running {
            *clock = Some(self.spawn_clock());
        }
    }

    /// Halts ticking without changing phase. Used on session teardown.
    pub fn stop(&self) {
        if let Some(clock) = self.clock.lock().unwrap().take() {
            clock.stop();
        }
    }

    /// Stops the clock and returns the timer to `Idle`.
    pub fn reset(&self) {
        self.stop();
        let mut state = self.state.lock().unwrap();
        state.phase = Phase::Idle;
        state.remaining = 0;
        state.on_round_end = None;
        state.on_verdict_end = None;
        debug!("timer reset to idle");
    }

    /// Current phase.
    pub fn current_phase(&self) -> Phase {
        self.state.lock().unwrap().phase
    }

    /// Seconds left in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        self.state.lock().unwrap().remaining
    }

    /// True while a tick source is active.
    pub fn is_running(&self) -> bool {
        self.clock
            .lock()
            .unwrap()
            .as_ref()
            .map(Clock::is_running)
            .unwrap_or(false)
    }

    fn spawn_clock(&self) -> Clock {
        let state = Arc::clone(&self.state);
        Clock::start(self.tick_period, move || Self::advance(&state))
    }

    /// Performs one tick against the shared state.
    ///
    /// The transition callback is cloned out inside the critical section
    /// that flips the phase, then invoked after the lock is released, so a
    /// concurrent tick or switch observes the already-advanced phase and
    /// cannot fire the callback a second time.
    fn advance(state: &Arc<Mutex<TimerState>>) -> ClockControl {
        let fired: Option<PhaseCallback>;
        let control;
        {
            let mut s = state.lock().unwrap();
            match s.phase {
                Phase::Idle | Phase::Expired => return ClockControl::Stop,
                Phase::Round => {
                    s.remaining = s.remaining.saturating_sub(1);
                    if s.remaining == 0 {
                        s.phase = Phase::Verdict;
                        s.remaining = s.durations.verdict_secs;
                        info!(remaining = s.remaining, "round ended, verdict phase entered");
                        fired = s.on_round_end.clone();
                    } else {
                        fired = None;
                    }
                    control = ClockControl::Continue;
                }
                Phase::Verdict => {
                    s.remaining = s.remaining.saturating_sub(1);
                    if s.remaining == 0 {
                        s.phase = Phase::Expired;
                        info!("verdict countdown expired");
                        fired = s.on_verdict_end.clone();
                        control = ClockControl::Stop;
                    } else {
                        fired = None;
                        control = ClockControl::Continue;
                    }
                }
            }
        }

        if let Some(callback) = fired {
            callback();
        }
        control
    }
}

impl std::fmt::Debug for PhaseTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseTimer")
            .field("phase", &self.current_phase())
            .field("remaining", &self.remaining_seconds())
            .finish()
    }
}
