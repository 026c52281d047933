//! Pipeline report and change provenance.
//!
//! A [`ReportBuilder`] is threaded through the pipeline and accumulates one
//! [`EntryResolution`] per entry in input order. [`ReportBuilder::finish`]
//! freezes it into a [`PipelineReport`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vocabulary::WordEntry;

/// Why a replacement was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// The first-pass spelling correction verified.
    FirstPassCorrection,
    /// A generated root candidate verified and was selected.
    CandidateRoot,
}

/// A verified replacement of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub original: String,
    pub replacement: String,
    pub reason: ChangeReason,
}

impl ChangeRecord {
    pub fn new<O: Into<String>, R: Into<String>>(
        original: O,
        replacement: R,
        reason: ChangeReason,
    ) -> Self {
        ChangeRecord {
            original: original.into(),
            replacement: replacement.into(),
            reason,
        }
    }
}

/// How an entry ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ConfirmedDirectly,
    CorrectedFirstPass,
    CorrectedCandidate,
    Unresolved,
}

impl Resolution {
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::ConfirmedDirectly => "confirmed",
            Resolution::CorrectedFirstPass => "corrected (round 1)",
            Resolution::CorrectedCandidate => "corrected (round 2)",
            Resolution::Unresolved => "unresolved",
        }
    }
}

/// Resolution path of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResolution {
    pub entry: String,
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// Per-resolution counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub total: usize,
    pub confirmed: usize,
    pub corrected_first_pass: usize,
    pub corrected_candidate: usize,
    pub unresolved: usize,
}

impl ReportCounts {
    pub fn corrected(&self) -> usize {
        self.corrected_first_pass + self.corrected_candidate
    }
}

/// Run-level result of a pipeline that did not fail hard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    SuccessWithWarnings,
}

/// Frozen summary of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcome: RunOutcome,
    pub cancelled: bool,
    pub counts: ReportCounts,
    pub changes: Vec<ChangeRecord>,
    pub unresolved: Vec<WordEntry>,
    pub entries: Vec<EntryResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

impl PipelineReport {
    pub fn has_warnings(&self) -> bool {
        self.outcome == RunOutcome::SuccessWithWarnings
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Incremental accumulator owned by the orchestrator.
#[derive(Debug)]
pub struct ReportBuilder {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    cancelled: bool,
    counts: ReportCounts,
    changes: Vec<ChangeRecord>,
    unresolved: Vec<WordEntry>,
    entries: Vec<EntryResolution>,
    backup_path: Option<PathBuf>,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        ReportBuilder::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        ReportBuilder {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            cancelled: false,
            counts: ReportCounts::default(),
            changes: Vec::new(),
            unresolved: Vec::new(),
            entries: Vec::new(),
            backup_path: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn record_confirmed(&mut self, entry: &WordEntry) {
        self.counts.total += 1;
        self.counts.confirmed += 1;
        self.entries.push(EntryResolution {
            entry: entry.original_text.clone(),
            resolution: Resolution::ConfirmedDirectly,
            replacement: None,
        });
    }

    pub fn record_change(&mut self, entry: &WordEntry, change: ChangeRecord) {
        self.counts.total += 1;
        let resolution = match change.reason {
            ChangeReason::FirstPassCorrection => {
                self.counts.corrected_first_pass += 1;
                Resolution::CorrectedFirstPass
            }
            ChangeReason::CandidateRoot => {
                self.counts.corrected_candidate += 1;
                Resolution::CorrectedCandidate
            }
        };
        self.entries.push(EntryResolution {
            entry: entry.original_text.clone(),
            resolution,
            replacement: Some(change.replacement.clone()),
        });
        self.changes.push(change);
    }

    pub fn record_unresolved(&mut self, entry: &WordEntry) {
        self.counts.total += 1;
        self.counts.unresolved += 1;
        self.entries.push(EntryResolution {
            entry: entry.original_text.clone(),
            resolution: Resolution::Unresolved,
            replacement: None,
        });
        self.unresolved.push(entry.clone());
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Record where the list was backed up before it was rewritten.
    pub fn set_backup_path(&mut self, path: PathBuf) {
        self.backup_path = Some(path);
    }

    /// Changes accumulated so far, in input order.
    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    /// Unresolved entries accumulated so far, in input order.
    pub fn unresolved(&self) -> &[WordEntry] {
        &self.unresolved
    }

    pub fn finish(self) -> PipelineReport {
        let outcome = if self.counts.unresolved > 0 || self.cancelled {
            RunOutcome::SuccessWithWarnings
        } else {
            RunOutcome::Success
        };
        PipelineReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            outcome,
            cancelled: self.cancelled,
            counts: self.counts,
            changes: self.changes,
            unresolved: self.unresolved,
            entries: self.entries,
            backup_path: self.backup_path,
        }
    }
}
