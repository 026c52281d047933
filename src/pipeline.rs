//! Pipeline orchestration: normalize, verify, correct, apply.
//!
//! Stages run strictly in sequence. Only the stages themselves fan out (pages
//! in the verifier, entries in the corrector), and each reassembles its results
//! in input order, so the report lists entries in the order they were read.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use wordbook::cancel::CancellationFlag;
//! use wordbook::config::PipelineConfig;
//! use wordbook::lookup::DictionaryLookup;
//! use wordbook::pipeline::Pipeline;
//!
//! # tokio_test::block_on(async {
//! let lookup = Arc::new(DictionaryLookup::from_words(["dog", "cat"]));
//! let pipeline = Pipeline::new(PipelineConfig::default(), lookup, None).unwrap();
//!
//! let run = pipeline
//!     .run(["dog", "Cat", "dog"], &CancellationFlag::new())
//!     .await
//!     .unwrap();
//! assert_eq!(run.report.counts.confirmed, 2);
//! assert_eq!(run.lines, vec!["dog", "Cat"]);
//! # });
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use crate::cancel::CancellationFlag;
use crate::config::PipelineConfig;
use crate::corrector::{CorrectionOutcome, Corrector};
use crate::error::{Result, WordbookError};
use crate::generator::CandidateGenerator;
use crate::lookup::LookupService;
use crate::replacement::ReplacementApplier;
use crate::report::{PipelineReport, ReportBuilder};
use crate::verifier::{INITIAL_ROUND, VerificationStatus, VerificationSummary, Verifier};
use crate::vocabulary::{Normalizer, WordEntry};

/// Result of an in-memory run: the report and the corrected word list.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub report: PipelineReport,
    pub lines: Vec<String>,
}

/// The assembled correction pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: Normalizer,
    verifier: Arc<Verifier>,
    corrector: Option<Corrector>,
    applier: ReplacementApplier,
}

impl Pipeline {
    /// Assemble a pipeline. Without a generator, failed entries are reported
    /// unresolved instead of corrected.
    pub fn new(
        config: PipelineConfig,
        lookup: Arc<dyn LookupService>,
        generator: Option<Arc<dyn CandidateGenerator>>,
    ) -> Result<Self> {
        config.validate()?;

        let verifier = Arc::new(Verifier::new(lookup, config.verifier.clone()));
        let corrector = generator.map(|generator| {
            Corrector::new(generator, verifier.clone(), config.corrector.clone())
        });

        Ok(Pipeline {
            normalizer: Normalizer::with_config(config.normalizer.clone()),
            applier: ReplacementApplier::new(config.replacement.clone()),
            verifier,
            corrector,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn has_corrector(&self) -> bool {
        self.corrector.is_some()
    }

    fn normalize<I, S>(&self, tokens: I) -> Result<Vec<WordEntry>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.normalizer.normalize(tokens);
        if entries.is_empty() {
            return Err(WordbookError::empty_input("no entries after normalization"));
        }
        Ok(entries)
    }

    /// Verify `tokens` without correcting anything.
    pub async fn check<I, S>(&self, tokens: I) -> Result<VerificationSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.normalize(tokens)?;
        let results = self.verifier.verify(&entries, INITIAL_ROUND).await?;
        Ok(VerificationSummary::from_results(&results))
    }

    /// Run the whole pipeline in memory.
    ///
    /// The returned lines are the normalized entries with verified
    /// replacements applied and, when configured, unresolved entries dropped.
    pub async fn run<I, S>(&self, tokens: I, cancel: &CancellationFlag) -> Result<PipelineRun>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (builder, lines) = self.execute(tokens, cancel).await?;
        Ok(PipelineRun {
            report: self.finish(builder),
            lines,
        })
    }

    /// Run the pipeline on the word list at `path` and rewrite it in place.
    ///
    /// The file is backed up before it is rewritten. A cancelled run never
    /// touches the file.
    pub async fn run_file<P: AsRef<Path>>(
        &self,
        path: P,
        cancel: &CancellationFlag,
    ) -> Result<PipelineReport> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let (mut builder, _) = self.execute(content.lines(), cancel).await?;

        if builder.is_cancelled() {
            warn!("run cancelled, leaving {} unchanged", path.display());
            return Ok(self.finish(builder));
        }

        let drop = self.drop_list(builder.unresolved());
        if let Some(outcome) = self.applier.apply_to_file(path, builder.changes(), &drop)? {
            builder.set_backup_path(outcome.backup_path);
        }
        Ok(self.finish(builder))
    }

    /// Normalize, verify and correct `tokens`, recording every entry.
    ///
    /// Returns the unfinished report together with the in-memory list after
    /// replacement.
    async fn execute<I, S>(
        &self,
        tokens: I,
        cancel: &CancellationFlag,
    ) -> Result<(ReportBuilder, Vec<String>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = ReportBuilder::new();
        info!("pipeline run {} started", builder.run_id());

        let entries = self.normalize(tokens)?;
        let results = self
            .verifier
            .verify_cancellable(&entries, INITIAL_ROUND, cancel)
            .await?;

        let outcomes = match &self.corrector {
            Some(corrector) => corrector.correct(&results, cancel).await,
            None => {
                let failed = results.iter().filter(|r| !r.status.is_confirmed()).count();
                if failed > 0 {
                    warn!("no generator configured, {failed} unrecognized entries stay unresolved");
                }
                Vec::new()
            }
        };

        let mut outcomes = outcomes.into_iter();
        for result in &results {
            if result.status == VerificationStatus::Confirmed {
                builder.record_confirmed(&result.entry);
                continue;
            }
            match outcomes.next() {
                Some(CorrectionOutcome {
                    change: Some(change),
                    ..
                }) => builder.record_change(&result.entry, change),
                Some(outcome) => {
                    if outcome.cancelled {
                        builder.mark_cancelled();
                    }
                    builder.record_unresolved(&result.entry);
                }
                None => builder.record_unresolved(&result.entry),
            }
        }
        if cancel.is_cancelled() {
            builder.mark_cancelled();
        }

        let lines: Vec<String> = entries.iter().map(|e| e.original_text.clone()).collect();
        let applied = self
            .applier
            .apply(&lines, builder.changes(), &self.drop_list(builder.unresolved()));

        Ok((builder, applied.lines))
    }

    fn finish(&self, builder: ReportBuilder) -> PipelineReport {
        let report = builder.finish();
        info!(
            "pipeline run {} finished: {} confirmed, {} corrected, {} unresolved",
            report.run_id,
            report.counts.confirmed,
            report.counts.corrected(),
            report.counts.unresolved
        );
        report
    }

    fn drop_list(&self, unresolved: &[WordEntry]) -> Vec<String> {
        if self.config.replacement.drop_unresolved {
            unresolved.iter().map(|e| e.original_text.clone()).collect()
        } else {
            Vec::new()
        }
    }
}
