//! Verdict value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// The player's ruling on the defendant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Guilty,
    Innocent,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Guilty => write!(f, "guilty"),
            Verdict::Innocent => write!(f, "innocent"),
        }
    }
}

/// One committed verdict. Created once per session, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    verdict: Verdict,
    rationale: String,
    submitted_automatically: bool,
    submitted_at: Timestamp,
}

impl VerdictRecord {
    pub(crate) fn new(
        verdict: Verdict,
        rationale: impl Into<String>,
        submitted_automatically: bool,
    ) -> Self {
        Self {
            verdict,
            rationale: rationale.into(),
            submitted_automatically,
            submitted_at: Timestamp::now(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// True when the expiring verdict countdown committed this verdict
    /// instead of the player.
    pub fn submitted_automatically(&self) -> bool {
        self.submitted_automatically
    }

    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_its_fields() {
        let record = VerdictRecord::new(Verdict::Innocent, "The scan logs exonerate it.", false);
        assert_eq!(record.verdict(), Verdict::Innocent);
        assert_eq!(record.rationale(), "The scan logs exonerate it.");
        assert!(!record.submitted_automatically());
    }

    #[test]
    fn verdict_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Verdict::Guilty).unwrap(), "\"guilty\"");
    }

    #[test]
    fn verdict_displays_lowercase() {
        assert_eq!(Verdict::Innocent.to_string(), "innocent");
    }
}
