//! Two-round correction of entries that failed verification.
//!
//! Each failed entry runs through the [`CorrectionState`] machine on its own:
//! a first-pass spelling correction, and if that does not verify, a round of
//! root candidates from which the shortest verified one is selected. The
//! machine is bounded: at most two generator invocations and `1 + k`
//! verification calls per entry, `k` being the candidate cap.
//!
//! Generator and verifier failures never escape this module. They push the
//! entry forward to the next state, and at worst to `Unresolved`.

pub mod attempt;
pub mod selection;
pub mod state;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

pub use attempt::{CorrectionAttempt, Round};
pub use state::CorrectionState;

use crate::cancel::CancellationFlag;
use crate::config::CorrectorConfig;
use crate::generator::{CandidateGenerator, Directive};
use crate::report::{ChangeReason, ChangeRecord, Resolution};
use crate::retry::RetryPolicy;
use crate::verifier::{VerificationResult, VerificationStatus, Verifier};
use crate::vocabulary::WordEntry;

use self::selection::{filter_candidates, select_candidate, usable_proposal};

/// Final result of correcting one entry.
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    pub entry: WordEntry,
    pub attempts: Vec<CorrectionAttempt>,
    pub resolution: Resolution,
    pub change: Option<ChangeRecord>,
    /// Logical generator invocations (retries of one invocation count once).
    pub generator_calls: u32,
    /// The entry was cut short by cancellation.
    pub cancelled: bool,
}

impl CorrectionOutcome {
    pub fn attempt(&self, round: Round) -> Option<&CorrectionAttempt> {
        self.attempts.iter().find(|a| a.round == round)
    }
}

/// Mutable bookkeeping of one entry while its state machine runs.
struct EntryRun<'a> {
    entry: &'a WordEntry,
    attempts: Vec<CorrectionAttempt>,
    generator_calls: u32,
    cancelled: bool,
}

impl EntryRun<'_> {
    fn current_attempt(&mut self, round: Round) -> Option<&mut CorrectionAttempt> {
        self.attempts.iter_mut().find(|a| a.round == round)
    }
}

/// The correction state machine driver.
pub struct Corrector {
    generator: Arc<dyn CandidateGenerator>,
    verifier: Arc<Verifier>,
    config: CorrectorConfig,
    retry: RetryPolicy,
}

impl Corrector {
    pub fn new(
        generator: Arc<dyn CandidateGenerator>,
        verifier: Arc<Verifier>,
        config: CorrectorConfig,
    ) -> Self {
        let retry = RetryPolicy::new(config.retry.clone());
        Corrector {
            generator,
            verifier,
            config,
            retry,
        }
    }

    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }

    /// Correct every `Failed` result, returning outcomes in input order.
    ///
    /// Confirmed results are skipped.
    pub async fn correct(
        &self,
        results: &[VerificationResult],
        cancel: &CancellationFlag,
    ) -> Vec<CorrectionOutcome> {
        let failed: Vec<&WordEntry> = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Failed)
            .map(|r| &r.entry)
            .collect();

        if failed.is_empty() {
            return Vec::new();
        }
        info!(
            "correcting {} failed entries with {}",
            failed.len(),
            self.generator.name()
        );

        let outcomes: Vec<CorrectionOutcome> = stream::iter(failed)
            .map(|entry| self.correct_entry(entry, cancel))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let resolved = outcomes.iter().filter(|o| o.change.is_some()).count();
        info!("corrected {resolved}/{} entries", outcomes.len());
        outcomes
    }

    /// Run the state machine for one entry to a terminal state.
    pub async fn correct_entry(
        &self,
        entry: &WordEntry,
        cancel: &CancellationFlag,
    ) -> CorrectionOutcome {
        let mut run = EntryRun {
            entry,
            attempts: Vec::new(),
            generator_calls: 0,
            cancelled: false,
        };
        let mut state = CorrectionState::Unattempted;

        while !state.is_terminal() {
            let next = self.step(&mut run, state, cancel).await;
            debug!("'{entry}': -> {}", next.name());
            state = next;
        }

        let (resolution, change) = match state {
            CorrectionState::Resolved {
                replacement,
                reason,
            } => {
                let resolution = match reason {
                    ChangeReason::FirstPassCorrection => Resolution::CorrectedFirstPass,
                    ChangeReason::CandidateRoot => Resolution::CorrectedCandidate,
                };
                let change = ChangeRecord::new(entry.original_text.clone(), replacement, reason);
                (resolution, Some(change))
            }
            _ => (Resolution::Unresolved, None),
        };

        CorrectionOutcome {
            entry: entry.clone(),
            attempts: run.attempts,
            resolution,
            change,
            generator_calls: run.generator_calls,
            cancelled: run.cancelled,
        }
    }

    async fn step(
        &self,
        run: &mut EntryRun<'_>,
        state: CorrectionState,
        cancel: &CancellationFlag,
    ) -> CorrectionState {
        match state {
            CorrectionState::Unattempted => {
                if cancel.is_cancelled() {
                    run.cancelled = true;
                    CorrectionState::Unresolved
                } else {
                    CorrectionState::FirstPassPending
                }
            }

            CorrectionState::FirstPassPending => {
                let proposals = self.invoke(run, Directive::CorrectSpelling).await;
                let proposal = proposals
                    .first()
                    .and_then(|p| usable_proposal(run.entry, p));
                run.attempts.push(CorrectionAttempt::new(
                    run.entry.clone(),
                    Round::FirstPass,
                    proposals,
                ));
                CorrectionState::FirstPassVerifying { proposal }
            }

            CorrectionState::FirstPassVerifying { proposal } => {
                let Some(proposal) = proposal else {
                    return self.after_first_pass(run, cancel);
                };

                let status = self.verify_text(&proposal, Round::FirstPass).await;
                let confirmed = status.is_confirmed();
                if let Some(attempt) = run.current_attempt(Round::FirstPass) {
                    attempt.chosen = Some(proposal.clone());
                    attempt.verified = confirmed;
                }

                if confirmed {
                    CorrectionState::Resolved {
                        replacement: proposal,
                        reason: ChangeReason::FirstPassCorrection,
                    }
                } else {
                    self.after_first_pass(run, cancel)
                }
            }

            CorrectionState::CandidatePending => {
                let raw = self.invoke(run, Directive::RootCandidates).await;
                let candidates = filter_candidates(run.entry, raw, self.config.max_candidates);
                run.attempts.push(CorrectionAttempt::new(
                    run.entry.clone(),
                    Round::CandidateGeneration,
                    candidates.clone(),
                ));
                CorrectionState::CandidateVerifying { candidates }
            }

            CorrectionState::CandidateVerifying { candidates } => {
                if candidates.is_empty() {
                    return CorrectionState::Unresolved;
                }

                let statuses: Vec<VerificationStatus> = stream::iter(candidates.iter())
                    .map(|candidate| self.verify_text(candidate, Round::CandidateGeneration))
                    .buffered(self.config.concurrency.max(1))
                    .collect()
                    .await;

                match select_candidate(&candidates, &statuses) {
                    Some(index) => {
                        let selected = candidates[index].clone();
                        if let Some(attempt) = run.current_attempt(Round::CandidateGeneration) {
                            attempt.chosen = Some(selected.clone());
                            attempt.verified = true;
                        }
                        CorrectionState::Resolved {
                            replacement: selected,
                            reason: ChangeReason::CandidateRoot,
                        }
                    }
                    None => CorrectionState::Unresolved,
                }
            }

            terminal @ (CorrectionState::Resolved { .. } | CorrectionState::Unresolved) => terminal,
        }
    }

    /// The first pass ended unverified; go on to candidates unless cancelled.
    fn after_first_pass(&self, run: &mut EntryRun<'_>, cancel: &CancellationFlag) -> CorrectionState {
        if cancel.is_cancelled() {
            run.cancelled = true;
            CorrectionState::Unresolved
        } else {
            CorrectionState::CandidatePending
        }
    }

    /// One logical generator invocation under the retry policy.
    ///
    /// Any failure is reported as "no proposals".
    async fn invoke(&self, run: &mut EntryRun<'_>, directive: Directive) -> Vec<String> {
        run.generator_calls += 1;
        let word = run.entry.original_text.clone();
        let label = format!("{directive} for '{word}'");

        let result = self
            .retry
            .run(&label, |_| {
                let generator = self.generator.clone();
                let word = word.clone();
                async move { generator.generate(directive, &word).await }
            })
            .await;

        match result {
            Ok(proposals) => proposals,
            Err(e) => {
                warn!("{label} gave no usable proposal: {e}");
                Vec::new()
            }
        }
    }

    async fn verify_text(&self, text: &str, round: Round) -> VerificationStatus {
        match WordEntry::from_raw(text) {
            Some(entry) => self.verifier.verify_one(&entry, round.number()).await,
            None => VerificationStatus::Failed,
        }
    }
}
