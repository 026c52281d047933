mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use common::{ScriptedGenerator, ScriptedLookup, fast_retry, test_config};
use wordbook::cancel::CancellationFlag;
use wordbook::config::{PipelineConfig, VerifierConfig};
use wordbook::error::{Result, WordbookError};
use wordbook::generator::{CandidateGenerator, Directive};
use wordbook::pipeline::Pipeline;
use wordbook::report::{ChangeReason, ChangeRecord, Resolution, RunOutcome};
use wordbook::verifier::{INITIAL_ROUND, VerificationStatus, Verifier};
use wordbook::vocabulary::Normalizer;

fn pipeline(
    config: PipelineConfig,
    lookup: &Arc<ScriptedLookup>,
    generator: &Arc<ScriptedGenerator>,
) -> Result<Pipeline> {
    let generator: Arc<dyn CandidateGenerator> = generator.clone();
    Pipeline::new(config, lookup.clone(), Some(generator))
}

fn sample_services() -> (Arc<ScriptedLookup>, Arc<ScriptedGenerator>) {
    let lookup = Arc::new(ScriptedLookup::new(&["happy", "dog"]));
    let generator = Arc::new(
        ScriptedGenerator::new()
            .correction("Hapy", "happy")
            .correction("wordd", "worrd"),
    );
    (lookup, generator)
}

#[tokio::test]
async fn end_to_end_corrects_and_drops_unresolved() -> Result<()> {
    let (lookup, generator) = sample_services();
    let pipeline = pipeline(test_config(), &lookup, &generator)?;

    let run = pipeline
        .run(["Hapy", "dog", "wordd"], &CancellationFlag::new())
        .await?;

    assert_eq!(run.lines, vec!["happy", "dog"]);
    let counts = &run.report.counts;
    assert_eq!(counts.confirmed, 1);
    assert_eq!(counts.corrected_first_pass, 1);
    assert_eq!(counts.corrected_candidate, 0);
    assert_eq!(counts.unresolved, 1);
    assert_eq!(run.report.outcome, RunOutcome::SuccessWithWarnings);
    assert_eq!(
        run.report.changes,
        vec![ChangeRecord::new("Hapy", "happy", ChangeReason::FirstPassCorrection)]
    );
    assert_eq!(run.report.unresolved[0].original_text, "wordd");

    let resolutions: Vec<_> = run.report.entries.iter().map(|e| e.resolution).collect();
    assert_eq!(
        resolutions,
        vec![
            Resolution::CorrectedFirstPass,
            Resolution::ConfirmedDirectly,
            Resolution::Unresolved
        ]
    );
    Ok(())
}

#[tokio::test]
async fn run_file_rewrites_list_after_backup() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "Hapy\ndog\nwordd\n")?;

    let (lookup, generator) = sample_services();
    let report = pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await?;

    assert_eq!(fs::read_to_string(&list)?, "happy\ndog\n");
    let backup = report.backup_path.expect("backup path reported");
    assert_eq!(backup, dir.path().join("words.txt.backup"));
    assert_eq!(fs::read_to_string(&backup)?, "Hapy\ndog\nwordd\n");
    Ok(())
}

#[tokio::test]
async fn candidate_round_prefers_shortest_verified_root() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new(&["system", "super"]));
    let generator = Arc::new(
        ScriptedGenerator::new()
            .correction("supersystem", "supersistem")
            .candidates("supersystem", &["supersystem", "system", "super"]),
    );

    let run = pipeline(test_config(), &lookup, &generator)?
        .run(["supersystem"], &CancellationFlag::new())
        .await?;

    assert_eq!(run.lines, vec!["super"]);
    assert_eq!(run.report.counts.corrected_candidate, 1);
    assert_eq!(run.report.changes[0].reason, ChangeReason::CandidateRoot);
    Ok(())
}

#[tokio::test]
async fn equal_length_candidates_keep_generator_order() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new(&["finish", "fiscal"]));
    let generator = Arc::new(ScriptedGenerator::new().candidates("finxish", &["finish", "fiscal"]));

    let run = pipeline(test_config(), &lookup, &generator)?
        .run(["finxish"], &CancellationFlag::new())
        .await?;

    assert_eq!(run.report.changes[0].replacement, "finish");
    Ok(())
}

#[tokio::test]
async fn generator_is_called_at_most_twice_per_entry() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new(&["dog"]));
    let generator = Arc::new(
        ScriptedGenerator::new()
            .correction("Hapy", "hapyy")
            .candidates("Hapy", &["hap", "ha"])
            .correction("wordd", "worrd"),
    );

    pipeline(test_config(), &lookup, &generator)?
        .run(["Hapy", "dog", "wordd"], &CancellationFlag::new())
        .await?;

    assert_eq!(
        generator.calls_for("Hapy"),
        vec![Directive::CorrectSpelling, Directive::RootCandidates]
    );
    assert_eq!(generator.calls_for("wordd").len(), 2);
    assert!(generator.calls_for("dog").is_empty());
    Ok(())
}

#[tokio::test]
async fn first_pass_success_skips_candidate_round() -> Result<()> {
    let (lookup, generator) = sample_services();

    pipeline(test_config(), &lookup, &generator)?
        .run(["Hapy"], &CancellationFlag::new())
        .await?;

    assert_eq!(generator.calls_for("Hapy"), vec![Directive::CorrectSpelling]);
    Ok(())
}

#[tokio::test]
async fn generator_outage_leaves_entries_unresolved() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new(&["dog"]));
    let generator = Arc::new(ScriptedGenerator::unavailable());

    let run = pipeline(test_config(), &lookup, &generator)?
        .run(["dog", "wordd"], &CancellationFlag::new())
        .await?;

    assert_eq!(run.report.counts.unresolved, 1);
    assert_eq!(run.lines, vec!["dog"]);
    // Two logical invocations, each retried to the bound.
    assert_eq!(generator.total_calls(), 2 * fast_retry().max_attempts as usize);
    Ok(())
}

#[tokio::test]
async fn all_confirmed_list_is_left_alone() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "happy\ndog\n")?;

    let (lookup, generator) = sample_services();
    let report = pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await?;

    assert!(report.changes.is_empty());
    assert_eq!(report.outcome, RunOutcome::Success);
    assert!(report.backup_path.is_none());
    assert_eq!(fs::read_to_string(&list)?, "happy\ndog\n");
    assert!(!dir.path().join("words.txt.backup").exists());
    assert_eq!(generator.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn backup_failure_aborts_without_touching_the_list() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    let original = b"Hapy\ndog\nwordd\n";
    fs::write(&list, original)?;

    let mut config = test_config();
    config.replacement.backup_dir = Some(dir.path().join("missing").join("backups"));
    let (lookup, generator) = sample_services();

    let err = pipeline(config, &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await
        .unwrap_err();

    assert!(matches!(err, WordbookError::Backup { .. }));
    assert_eq!(fs::read(&list)?, original);
    Ok(())
}

#[tokio::test]
async fn case_variants_of_a_corrected_word_are_not_left_behind() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "Hapy\ndog\nhapy\n")?;

    let (lookup, generator) = sample_services();
    let report = pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await?;

    assert_eq!(
        report.changes,
        vec![ChangeRecord::new("Hapy", "happy", ChangeReason::FirstPassCorrection)]
    );
    assert_eq!(fs::read_to_string(&list)?, "happy\ndog\n");
    Ok(())
}

#[tokio::test]
async fn crlf_list_keeps_its_line_endings() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "Hapy\r\ndog\r\nwordd")?;

    let (lookup, generator) = sample_services();
    pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await?;

    assert_eq!(fs::read_to_string(&list)?, "happy\r\ndog");
    Ok(())
}

#[tokio::test]
async fn unauthorized_first_page_fails_the_run_and_leaves_the_file() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "Hapy\ndog\n")?;

    let lookup = Arc::new(ScriptedLookup::refusing(&["happy", "dog"], &["dog"]));
    let generator = Arc::new(ScriptedGenerator::new().correction("Hapy", "happy"));
    let pipeline = pipeline(test_config(), &lookup, &generator)?;

    let err = pipeline
        .run(["Hapy", "dog"], &CancellationFlag::new())
        .await
        .unwrap_err();
    assert!(matches!(err, WordbookError::Configuration(_)));

    let err = pipeline
        .run_file(&list, &CancellationFlag::new())
        .await
        .unwrap_err();
    assert!(matches!(err, WordbookError::Configuration(_)));
    assert_eq!(fs::read_to_string(&list)?, "Hapy\ndog\n");
    assert!(!dir.path().join("words.txt.backup").exists());
    assert_eq!(generator.total_calls(), 0);
    // Configuration errors are not retried.
    assert_eq!(lookup.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn unauthorized_later_page_is_marked_failed() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::refusing(&["dog", "cat", "bird"], &["cat"]));
    let mut config = test_config();
    config.verifier.page_size = 1;
    config.verifier.concurrency = 1;

    let verifier = Verifier::new(lookup.clone(), config.verifier.clone());
    let entries = Normalizer::new().normalize(["dog", "cat", "bird"]);
    let results = verifier.verify(&entries, INITIAL_ROUND).await?;

    let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            VerificationStatus::Confirmed,
            VerificationStatus::Failed,
            VerificationStatus::Confirmed
        ]
    );

    let generator = Arc::new(ScriptedGenerator::new());
    let run = pipeline(config, &lookup, &generator)?
        .run(["dog", "cat", "bird"], &CancellationFlag::new())
        .await?;

    assert_eq!(run.report.counts.confirmed, 2);
    assert_eq!(run.report.counts.unresolved, 1);
    assert_eq!(run.report.unresolved[0].original_text, "cat");
    assert_eq!(run.lines, vec!["dog", "bird"]);
    Ok(())
}

#[tokio::test]
async fn cancelled_run_reports_and_never_mutates() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "Hapy\ndog\n")?;

    let (lookup, generator) = sample_services();
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let report = pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &cancel)
        .await?;

    assert!(report.cancelled);
    assert_eq!(report.outcome, RunOutcome::SuccessWithWarnings);
    assert_eq!(report.counts.unresolved, 2);
    assert_eq!(fs::read_to_string(&list)?, "Hapy\ndog\n");
    assert_eq!(lookup.calls(), 0);
    assert_eq!(generator.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn empty_list_is_a_hard_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let list = dir.path().join("words.txt");
    fs::write(&list, "\n   \n")?;

    let (lookup, generator) = sample_services();
    let err = pipeline(test_config(), &lookup, &generator)?
        .run_file(&list, &CancellationFlag::new())
        .await
        .unwrap_err();

    assert!(matches!(err, WordbookError::EmptyInput(_)));
    Ok(())
}

#[tokio::test]
async fn repeated_timeouts_mark_the_page_failed() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::stalling(&["dog"], Duration::from_millis(200)));
    let mut retry = fast_retry();
    retry.timeout_ms = 20;
    let verifier = Verifier::new(
        lookup.clone(),
        VerifierConfig {
            page_size: 10,
            concurrency: 1,
            retry,
        },
    );
    let entries = Normalizer::new().normalize(["dog", "cat"]);

    let results = verifier.verify(&entries, INITIAL_ROUND).await?;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.status == VerificationStatus::Failed));
    assert_eq!(lookup.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn pages_keep_input_order_under_concurrency() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new(&["a", "c", "e"]));
    let mut config = test_config();
    config.verifier.page_size = 1;
    config.verifier.concurrency = 4;
    let verifier = Verifier::new(lookup, config.verifier);
    let entries = Normalizer::new().normalize(["a", "b", "c", "d", "e"]);

    let results = verifier.verify(&entries, INITIAL_ROUND).await?;

    let confirmed: Vec<bool> = results.iter().map(|r| r.status.is_confirmed()).collect();
    assert_eq!(confirmed, vec![true, false, true, false, true]);
    Ok(())
}
