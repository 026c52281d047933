//! Correction attempts.

use serde::{Deserialize, Serialize};

use crate::vocabulary::WordEntry;

/// The two correction rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    FirstPass,
    CandidateGeneration,
}

impl Round {
    /// Round number stamped on the verification results of this round.
    pub fn number(&self) -> u32 {
        match self {
            Round::FirstPass => 1,
            Round::CandidateGeneration => 2,
        }
    }
}

/// One round of correction for one failed entry.
///
/// `chosen` is the proposal that was put to the verifier (first pass) or the
/// selected candidate (candidate round); `verified` tells whether it passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionAttempt {
    pub failed_entry: WordEntry,
    pub round: Round,
    pub proposals: Vec<String>,
    pub chosen: Option<String>,
    pub verified: bool,
}

impl CorrectionAttempt {
    pub fn new(failed_entry: WordEntry, round: Round, proposals: Vec<String>) -> Self {
        CorrectionAttempt {
            failed_entry,
            round,
            proposals,
            chosen: None,
            verified: false,
        }
    }
}
