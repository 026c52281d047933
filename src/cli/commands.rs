//! Command implementations for the wordbook CLI.

use std::fs;
use std::sync::Arc;

use log::{info, warn};

use crate::cancel::CancellationFlag;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{GeneratorEndpointConfig, LookupEndpointConfig, PipelineConfig};
use crate::error::Result;
use crate::extraction::{Extractor, default_output_path, render};
use crate::generator::{CandidateGenerator, ChatCompletionGenerator};
use crate::lookup::{DictionaryLookup, LookupService, WordBookLookup};
use crate::pipeline::Pipeline;

/// Execute a CLI command.
pub async fn execute_command(args: WordbookArgs) -> Result<()> {
    match &args.command {
        Command::Extract(extract_args) => extract(extract_args.clone(), &args).await,
        Command::Check(check_args) => check(check_args.clone(), &args).await,
        Command::Correct(correct_args) => correct(correct_args.clone(), &args).await,
        Command::Env => show_env(&args),
    }
}

/// Extract vocabulary from a document and optionally correct the word list.
async fn extract(args: ExtractArgs, cli_args: &WordbookArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Extracting from: {}", args.input.display());
    }

    let extractor = Extractor::for_mode(args.unique, args.mode)?;
    let extraction = extractor.extract_file(&args.input)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, args.mode));
    fs::write(&output, render(&extraction, args.mode))?;

    output_result(
        "Extraction complete",
        &ExtractionResult {
            input: args.input.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            mode: args.mode,
            words: extraction.words.len(),
            phrases: extraction.phrases.len(),
        },
        cli_args,
    )?;

    if !args.should_check() {
        return Ok(());
    }
    if extraction.words.is_empty() {
        warn!("no words extracted, skipping the check");
        return Ok(());
    }

    let pipeline = build_pipeline(cli_args, false)?;
    let report = pipeline.run_file(&output, &cancel_on_ctrl_c()).await?;
    info!("{}", report_headline(&report));
    output_result("Check complete", &report, cli_args)
}

/// Verify a word list and print the recognized/unrecognized split.
async fn check(args: CheckArgs, cli_args: &WordbookArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)?;
    let pipeline = build_pipeline(cli_args, false)?;
    let summary = pipeline.check(content.lines()).await?;

    output_result(
        "Check complete",
        &CheckResult::new(args.input.to_string_lossy().to_string(), summary),
        cli_args,
    )
}

/// Run the full pipeline on a word list and rewrite it.
async fn correct(args: CorrectArgs, cli_args: &WordbookArgs) -> Result<()> {
    let pipeline = build_pipeline(cli_args, args.keep_unresolved)?;
    let report = pipeline
        .run_file(&args.input, &cancel_on_ctrl_c())
        .await?;
    info!("{}", report_headline(&report));
    output_result("Correction complete", &report, cli_args)
}

/// Show which services and credentials are configured.
fn show_env(cli_args: &WordbookArgs) -> Result<()> {
    let generator_config = generator_config(cli_args);
    let api_key_set = generator_config
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    let lookup = match &cli_args.dictionary {
        Some(path) => format!("dictionary {}", path.display()),
        None => cli_args.lookup_url.clone(),
    };

    output_result(
        "Environment",
        &EnvStatus {
            config_file: cli_args
                .config
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            lookup,
            llm_base_url: generator_config.base_url,
            llm_model: generator_config.model,
            llm_api_key_set: api_key_set,
            correction_enabled: api_key_set,
        },
        cli_args,
    )
}

fn load_config(cli_args: &WordbookArgs) -> Result<PipelineConfig> {
    match &cli_args.config {
        Some(path) => {
            info!("loading configuration from {}", path.display());
            PipelineConfig::load(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn generator_config(cli_args: &WordbookArgs) -> GeneratorEndpointConfig {
    GeneratorEndpointConfig {
        base_url: cli_args.llm_base_url.clone(),
        model: cli_args.llm_model.clone(),
        api_key: cli_args.llm_api_key.clone(),
        ..Default::default()
    }
}

fn build_lookup(cli_args: &WordbookArgs) -> Result<Arc<dyn LookupService>> {
    let lookup: Arc<dyn LookupService> = match &cli_args.dictionary {
        Some(path) => Arc::new(DictionaryLookup::load_from_file(path)?),
        None => Arc::new(WordBookLookup::new(LookupEndpointConfig {
            submit_url: cli_args.lookup_url.clone(),
            ..Default::default()
        })?),
    };
    Ok(lookup)
}

fn build_generator(cli_args: &WordbookArgs) -> Result<Option<Arc<dyn CandidateGenerator>>> {
    let generator = ChatCompletionGenerator::new(generator_config(cli_args))?;
    if !generator.is_enabled() {
        warn!("SILICONFLOW_API_KEY is not set, automatic correction is disabled");
        return Ok(None);
    }
    let generator: Arc<dyn CandidateGenerator> = Arc::new(generator);
    Ok(Some(generator))
}

fn build_pipeline(cli_args: &WordbookArgs, keep_unresolved: bool) -> Result<Pipeline> {
    let mut config = load_config(cli_args)?;
    if keep_unresolved {
        config.replacement.drop_unresolved = false;
    }
    Pipeline::new(config, build_lookup(cli_args)?, build_generator(cli_args)?)
}

/// A cancellation flag raised by Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationFlag {
    let cancel = CancellationFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing in-flight calls and stopping");
            flag.cancel();
        }
    });
    cancel
}

