//! Periodic tick source.
//!
//! A `Clock` is a leaf component: one tokio task waking at a fixed period
//! and invoking a callback. The callback decides whether ticking continues,
//! which lets the phase timer stop the clock from inside a transition
//! without reaching back into the task.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Told to the clock by its tick callback after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockControl {
    /// Keep ticking.
    Continue,
    /// Stop the tick task.
    Stop,
}

/// A periodic tick source backed by a single tokio task.
///
/// Exactly one task runs per `Clock`. Dropping or stopping the clock aborts
/// the task, so replacing a clock can never leave two tick sources running.
#[derive(Debug)]
pub struct Clock {
    handle: JoinHandle<()>,
}

impl Clock {
    /// Spawns a tick task invoking `on_tick` every `period`.
    ///
    /// The first invocation happens one full period after the call, not
    /// immediately.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ClockControl + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; consume it so
            // callers observe a full period before the first callback.
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick() == ClockControl::Stop {
                    break;
                }
            }
        });

        Self { handle }
    }

    /// Halts the tick task. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Returns true while the tick task is alive.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let _clock = Clock::start(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ClockControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_tick_before_first_period() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let _clock = Clock::start(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ClockControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn callback_can_stop_the_clock() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let clock = Clock::start(Duration::from_secs(1), move || {
            if counter.fetch_add(1, Ordering::SeqCst) + 1 >= 2 {
                ClockControl::Stop
            } else {
                ClockControl::Continue
            }
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticking() {
        let count = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&count);

        let clock = Clock::start(Duration::from_secs(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ClockControl::Continue
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        clock.stop();
        // Give the abort a chance to land before measuring.
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!clock.is_running());
    }
}
