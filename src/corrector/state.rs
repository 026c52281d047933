//! Per-entry correction states.

use crate::report::ChangeReason;

/// State of one failed entry in the correction loop.
///
/// Transitions only move forward:
/// `Unattempted -> FirstPassPending -> FirstPassVerifying ->
/// (Resolved | CandidatePending) -> CandidateVerifying -> (Resolved | Unresolved)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionState {
    Unattempted,
    FirstPassPending,
    /// `proposal` is `None` when the generator gave nothing usable.
    FirstPassVerifying {
        proposal: Option<String>,
    },
    CandidatePending,
    CandidateVerifying {
        candidates: Vec<String>,
    },
    Resolved {
        replacement: String,
        reason: ChangeReason,
    },
    Unresolved,
}

impl CorrectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CorrectionState::Resolved { .. } | CorrectionState::Unresolved
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorrectionState::Unattempted => "unattempted",
            CorrectionState::FirstPassPending => "first-pass-pending",
            CorrectionState::FirstPassVerifying { .. } => "first-pass-verifying",
            CorrectionState::CandidatePending => "candidate-pending",
            CorrectionState::CandidateVerifying { .. } => "candidate-verifying",
            CorrectionState::Resolved { .. } => "resolved",
            CorrectionState::Unresolved => "unresolved",
        }
    }
}
