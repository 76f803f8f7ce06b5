//! Session timing configuration

use serde::Deserialize;

use crate::domain::timer::{TimerDurations, ROUND_SECONDS, VERDICT_SECONDS};

use super::error::ValidationError;

/// Session timing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Interview round length in seconds
    #[serde(default = "default_round_secs")]
    pub round_secs: u32,

    /// Verdict countdown length in seconds
    #[serde(default = "default_verdict_secs")]
    pub verdict_secs: u32,
}

impl SessionConfig {
    /// Durations in the form the timer consumes
    pub fn durations(&self) -> TimerDurations {
        TimerDurations {
            round_secs: self.round_secs,
            verdict_secs: self.verdict_secs,
        }
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.round_secs == 0 || self.verdict_secs == 0 {
            return Err(ValidationError::InvalidPhaseDuration);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_secs: default_round_secs(),
            verdict_secs: default_verdict_secs(),
        }
    }
}

fn default_round_secs() -> u32 {
    ROUND_SECONDS
}

fn default_verdict_secs() -> u32 {
    VERDICT_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.round_secs, 300);
        assert_eq!(config.verdict_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        let config = SessionConfig {
            round_secs: 0,
            verdict_secs: 60,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidPhaseDuration)
        ));
    }

    #[test]
    fn test_durations_conversion() {
        let config = SessionConfig {
            round_secs: 120,
            verdict_secs: 30,
        };
        let durations = config.durations();
        assert_eq!(durations.round_secs, 120);
        assert_eq!(durations.verdict_secs, 30);
    }
}
