//! # wordbook
//!
//! Vocabulary list tooling for the word-book service: extract words from
//! textbook tables, verify them against a lookup service, and correct the
//! unrecognized ones with a language model.
//!
//! ## Features
//!
//! - HTML and Markdown table extraction
//! - Paged, retried verification against the word-book API or a local dictionary
//! - Two-round correction (spelling fix, then root candidates), every proposal re-verified
//! - Backed-up, atomic rewrite of the word list
//! - Structured run reports

pub mod cancel;
pub mod cli;
pub mod config;
pub mod corrector;
pub mod error;
pub mod extraction;
pub mod generator;
pub mod lookup;
pub mod pipeline;
pub mod replacement;
pub mod report;
pub mod retry;
pub mod verifier;
pub mod vocabulary;

pub mod prelude {
    pub use crate::cancel::CancellationFlag;
    pub use crate::config::PipelineConfig;
    pub use crate::error::{Result, WordbookError};
    pub use crate::generator::{CandidateGenerator, Directive};
    pub use crate::lookup::LookupService;
    pub use crate::pipeline::{Pipeline, PipelineRun};
    pub use crate::report::{ChangeRecord, PipelineReport};
    pub use crate::vocabulary::WordEntry;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
