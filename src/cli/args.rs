//! Command line argument parsing for the wordbook CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::{DEFAULT_GENERATOR_MODEL, DEFAULT_GENERATOR_URL, DEFAULT_LOOKUP_URL};
use crate::extraction::ExtractionMode;

/// wordbook - build and clean vocabulary lists for the word-book service
#[derive(Parser, Debug, Clone)]
#[command(name = "wordbook")]
#[command(about = "Extract vocabulary from textbook tables, verify it and correct unrecognized words")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Wordbook Contributors")]
#[command(long_about = None)]
pub struct WordbookArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "WORDBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Word-book submission endpoint used for verification
    #[arg(long, value_name = "URL", env = "WORDBOOK_LOOKUP_URL", default_value = DEFAULT_LOOKUP_URL)]
    pub lookup_url: String,

    /// Verify against a local dictionary file (one word per line) instead
    #[arg(long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// API key of the chat completions service; correction is disabled without it
    #[arg(long, value_name = "KEY", env = "SILICONFLOW_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Chat completions endpoint
    #[arg(long, value_name = "URL", env = "SILICONFLOW_BASE_URL", default_value = DEFAULT_GENERATOR_URL)]
    pub llm_base_url: String,

    /// Chat model
    #[arg(long, value_name = "MODEL", env = "SILICONFLOW_MODEL", default_value = DEFAULT_GENERATOR_MODEL)]
    pub llm_model: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl WordbookArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract vocabulary tables from a Markdown document
    Extract(ExtractArgs),

    /// Verify a word list without changing it
    Check(CheckArgs),

    /// Verify a word list and rewrite it with corrections
    Correct(CorrectArgs),

    /// Show the effective service configuration
    Env,
}

/// Arguments for extraction
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// Markdown document containing vocabulary tables
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (default: <input stem>_<mode>.txt next to the input)
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Drop repeated words
    #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
    pub unique: bool,

    /// Verify and correct the extracted list (words_only mode only)
    #[arg(short = 'c', long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_check: bool,

    /// Output layout
    #[arg(short, long, default_value = "words_only")]
    pub mode: ExtractionMode,
}

/// Arguments for checking a word list
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Word list, one entry per line
    #[arg(value_name = "WORD_LIST")]
    pub input: PathBuf,
}

/// Arguments for correcting a word list
#[derive(Parser, Debug, Clone)]
pub struct CorrectArgs {
    /// Word list, one entry per line; rewritten in place after a backup
    #[arg(value_name = "WORD_LIST")]
    pub input: PathBuf,

    /// Keep entries that could not be corrected
    #[arg(long)]
    pub keep_unresolved: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl ExtractArgs {
    /// Whether the extracted list goes through the pipeline afterwards
    pub fn should_check(&self) -> bool {
        self.auto_check && self.mode == ExtractionMode::WordsOnly
    }
}
