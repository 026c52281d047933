//! Verification of word entries against a lookup service.
//!
//! The verifier splits a batch into pages, sends each page through the retry
//! policy and reassembles the verdicts in input order. It never fails a run
//! because of an unreachable or confused service: such pages come back as
//! [`VerificationStatus::Failed`]. The one exception is a configuration error
//! on the very first page, which means the credentials or endpoint are wrong
//! and every later call would fail the same way.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::cancel::CancellationFlag;
use crate::config::VerifierConfig;
use crate::error::{Result, WordbookError};
use crate::lookup::LookupService;
use crate::retry::RetryPolicy;
use crate::vocabulary::WordEntry;

/// Round number of the initial verification pass.
pub const INITIAL_ROUND: u32 = 0;

/// Outcome of verifying one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Confirmed,
    Failed,
}

impl VerificationStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, VerificationStatus::Confirmed)
    }
}

/// Verdict for one entry in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub entry: WordEntry,
    pub status: VerificationStatus,
    pub source_round: u32,
}

/// Recognized/unrecognized split of a verification pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub recognized: Vec<String>,
    pub unrecognized: Vec<String>,
}

impl VerificationSummary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        let mut summary = VerificationSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            let text = result.entry.original_text.clone();
            if result.status.is_confirmed() {
                summary.recognized.push(text);
            } else {
                summary.unrecognized.push(text);
            }
        }
        summary
    }

    /// Share of recognized entries, in percent.
    pub fn recognition_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.recognized.len() as f64 / self.total as f64 * 100.0
    }
}

/// Chunked, retried, order-preserving verifier.
pub struct Verifier {
    service: Arc<dyn LookupService>,
    config: VerifierConfig,
    retry: RetryPolicy,
}

impl Verifier {
    pub fn new(service: Arc<dyn LookupService>, config: VerifierConfig) -> Self {
        let retry = RetryPolicy::new(config.retry.clone());
        Verifier {
            service,
            config,
            retry,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verify a batch, returning one result per entry in input order.
    pub async fn verify(&self, batch: &[WordEntry], round: u32) -> Result<Vec<VerificationResult>> {
        self.verify_cancellable(batch, round, &CancellationFlag::new())
            .await
    }

    /// Like [`Verifier::verify`], skipping the remaining pages once `cancel` is set.
    pub async fn verify_cancellable(
        &self,
        batch: &[WordEntry],
        round: u32,
        cancel: &CancellationFlag,
    ) -> Result<Vec<VerificationResult>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let page_size = self.config.page_size.max(1);
        let pages: Vec<&[WordEntry]> = batch.chunks(page_size).collect();
        debug!(
            "verifying {} entries in {} pages via {} (round {round})",
            batch.len(),
            pages.len(),
            self.service.name()
        );

        let outcomes: Vec<Result<Vec<bool>>> = stream::iter(pages.iter().enumerate())
            .map(|(index, page)| self.verify_page(index, page, cancel))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut results = Vec::with_capacity(batch.len());
        for (index, (page, outcome)) in pages.iter().zip(outcomes).enumerate() {
            let verdicts = match outcome {
                Ok(verdicts) if verdicts.len() == page.len() => verdicts,
                Ok(verdicts) => {
                    warn!(
                        "page {index}: lookup returned {} verdicts for {} words, marking page failed",
                        verdicts.len(),
                        page.len()
                    );
                    vec![false; page.len()]
                }
                Err(e @ WordbookError::Configuration(_)) if index == 0 => return Err(e),
                Err(e) => {
                    warn!("page {index}: marking {} entries failed: {e}", page.len());
                    vec![false; page.len()]
                }
            };

            results.extend(page.iter().zip(verdicts).map(|(entry, ok)| {
                VerificationResult {
                    entry: entry.clone(),
                    status: if ok {
                        VerificationStatus::Confirmed
                    } else {
                        VerificationStatus::Failed
                    },
                    source_round: round,
                }
            }));
        }

        if round == INITIAL_ROUND {
            let confirmed = results.iter().filter(|r| r.status.is_confirmed()).count();
            info!("verified {} entries: {} confirmed", results.len(), confirmed);
        }

        Ok(results)
    }

    /// Verify a single entry. Every error is reported as `Failed`.
    pub async fn verify_one(&self, entry: &WordEntry, round: u32) -> VerificationStatus {
        match self.verify(std::slice::from_ref(entry), round).await {
            Ok(results) => results
                .first()
                .map(|r| r.status)
                .unwrap_or(VerificationStatus::Failed),
            Err(e) => {
                warn!("verification of '{entry}' failed: {e}");
                VerificationStatus::Failed
            }
        }
    }

    async fn verify_page(
        &self,
        index: usize,
        page: &[WordEntry],
        cancel: &CancellationFlag,
    ) -> Result<Vec<bool>> {
        if cancel.is_cancelled() {
            return Err(WordbookError::cancelled(format!("page {index} skipped")));
        }

        let words: Vec<String> = page.iter().map(|e| e.original_text.clone()).collect();
        let label = format!("lookup page {index}");

        self.retry
            .run(&label, |_| {
                let service = self.service.clone();
                let words = words.clone();
                async move { service.lookup(&words).await }
            })
            .await
    }
}
