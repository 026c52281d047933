//! Normalizer implementation.
//!
//! Trims tokens, drops blanks, classifies words and phrases and removes
//! case-insensitive duplicates while keeping first-seen order.
//!
//! # Examples
//!
//! ```
//! use wordbook::vocabulary::Normalizer;
//!
//! let normalizer = Normalizer::new();
//! let entries = normalizer.normalize(["cat", "Cat", " dog", "dog"]);
//!
//! let words: Vec<_> = entries.iter().map(|e| e.normalized_text.as_str()).collect();
//! assert_eq!(words, vec!["cat", "dog"]);
//! ```

use std::collections::HashSet;

use log::debug;

use crate::config::NormalizerConfig;
use crate::vocabulary::entry::WordEntry;

/// Canonicalizes raw tokens into unique [`WordEntry`] values.
#[derive(Clone, Debug, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer that keeps phrases.
    pub fn new() -> Self {
        Normalizer::default()
    }

    pub fn with_config(config: NormalizerConfig) -> Self {
        Normalizer { config }
    }

    /// Normalize a finite token sequence.
    pub fn normalize<I, S>(&self, tokens: I) -> Vec<WordEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut blanks = 0usize;
        let mut duplicates = 0usize;
        let mut phrases = 0usize;

        for token in tokens {
            let Some(entry) = WordEntry::from_raw(token.as_ref()) else {
                blanks += 1;
                continue;
            };
            if entry.is_phrase() && !self.config.include_phrases {
                phrases += 1;
                continue;
            }
            if !seen.insert(entry.normalized_text.clone()) {
                duplicates += 1;
                continue;
            }
            entries.push(entry);
        }

        debug!(
            "normalized {} entries ({} blank, {} duplicate, {} phrases skipped)",
            entries.len(),
            blanks,
            duplicates,
            phrases
        );

        entries
    }
}
