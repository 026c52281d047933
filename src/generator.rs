//! Candidate generation through a language model.
//!
//! The corrector asks a [`CandidateGenerator`] for either a single spelling
//! correction or a ranked list of root candidates. Nothing a generator returns
//! is trusted: every proposal goes back through the verifier.

pub mod chat;
pub mod parse;
pub mod prompt;
pub mod service;

pub use chat::ChatCompletionGenerator;
pub use service::{CandidateGenerator, Directive};
