//! Vocabulary entries and their normalization.
//!
//! This module turns the raw token strings produced by the extractor into
//! unique, classified [`WordEntry`] values that flow through the rest of the
//! pipeline.

pub mod entry;
pub mod normalizer;

pub use entry::{EntryKind, WordEntry, normalize_key};
pub use normalizer::Normalizer;
