//! Tribunal - core engine for an interactive courtroom-simulation game.
//!
//! The player interviews three personas (an AI defendant, a human witness,
//! an AI witness) under a session clock, then renders a verdict before the
//! countdown expires. This crate is the in-process core consumed by a UI
//! shell: the phase timer and its state machine, per-participant and shared
//! conversation logs, bounded prompt-context assembly, and the chat
//! orchestration around an external language model.
//!
//! # Architecture
//!
//! - `domain` - timer, interaction tracking, conversation engine, session
//!   facade. No transport or provider concerns.
//! - `ports` - boundary traits: the model call and the persona supplier.
//! - `adapters` - OpenAI and mock providers, the built-in persona set.
//! - `config` - environment-based configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tribunal::adapters::ai::{OpenAiConfig, OpenAiProvider};
//! use tribunal::adapters::persona::TrialPersonas;
//! use tribunal::config::AppConfig;
//! use tribunal::domain::{GameSession, Participant};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//!
//! let provider = OpenAiProvider::new(OpenAiConfig::from_app_config(&config.ai));
//! let session = GameSession::new(
//!     Arc::new(provider),
//!     Arc::new(TrialPersonas::new()),
//!     config.session.durations(),
//! );
//!
//! session.start_round(|| {}, || {});
//! let outcome = session.send(Participant::Defendant, "Where were you at 2am?").await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

pub use domain::{
    GameSession, Participant, Phase, RoundOutcome, SendOutcome, Verdict, VerdictEntry,
    VerdictRecord, VerdictSubmission,
};
