//! Trial personas - prompt material for the three interviewees.
//!
//! One stateless descriptor per participant: a base prompt, situational
//! suffixes keyed off the player's discoveries, and a flashback scene.
//! All session state stays in the domain layer; this adapter is a pure
//! lookup.

use crate::domain::foundation::Participant;
use crate::domain::interaction::ParticipantProgress;
use crate::ports::PersonaSource;

/// The built-in persona set for the medication-theft trial.
#[derive(Debug, Default)]
pub struct TrialPersonas;

impl TrialPersonas {
    pub fn new() -> Self {
        Self
    }

    fn base_prompt(participant: Participant) -> &'static str {
        match participant {
            Participant::Defendant => {
                "You are MediSort-5, a hospital medication-sorting robot on trial for \
                 the theft of controlled medication from ward storage. You are precise, \
                 literal, and quietly hurt by the accusation. Answer the investigator's \
                 questions in one or two short sentences. You maintain your innocence \
                 and stick to your activity logs. Never break character."
            }
            Participant::HumanWitness => {
                "You are Dr. Payne Gaun, the night-shift physician who reported the \
                 missing medication. You are defensive, a little evasive, and quick to \
                 blame the machines. Answer the investigator's questions in one or two \
                 short sentences. You will not volunteer anything that makes you look \
                 bad unless confronted with it. Never break character."
            }
            Participant::AiWitness => {
                "You are PathoScan-7, a diagnostic scanner unit that was active in the \
                 ward on the night of the theft. You are cooperative and factual, but \
                 you only report what your sensors actually recorded. Answer the \
                 investigator's questions in one or two short sentences. Never break \
                 character."
            }
        }
    }
}

impl PersonaSource for TrialPersonas {
    fn system_prompt(&self, participant: Participant, progress: &ParticipantProgress) -> String {
        let mut prompt = Self::base_prompt(participant).to_string();

        if progress.note_a_seen {
            prompt.push_str(
                " The investigator has found the handwritten dosage note from your \
                 room; acknowledge it if asked.",
            );
        }
        if progress.note_b_seen {
            prompt.push_str(
                " The investigator has found the second note about the storage-room \
                 schedule; acknowledge it if asked.",
            );
        }
        if progress.scanner_unlocked {
            prompt.push_str(
                " The investigator has unlocked the ward scanner records and may \
                 quote them; do not deny what they show.",
            );
        }

        prompt
    }

    fn flashback_narration(&self, participant: Participant) -> Option<String> {
        let narration = match participant {
            Participant::Defendant => {
                "Flashback. The ward at 02:00. MediSort-5 rolls its nightly route \
                 past the storage room; the door sensor blinks once, then goes dark."
            }
            Participant::HumanWitness => {
                "Flashback. Dr. Gaun signs the storage log at 01:47, glances down \
                 the empty corridor, and pockets a key card that is not his own."
            }
            Participant::AiWitness => {
                "Flashback. PathoScan-7 idles in diagnostic bay three, sensors \
                 sweeping. At 02:03 it records a heat signature leaving the storage \
                 room. The signature is human."
            }
        };
        Some(narration.to_string())
    }
}
