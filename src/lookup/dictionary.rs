//! Local dictionary lookup.
//!
//! Answers lookups from an in-memory word set, typically loaded from a plain
//! text file with one word per line. Useful offline and as a deterministic
//! backend in tests.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::lookup::service::LookupService;
use crate::vocabulary::normalize_key;

/// A case-insensitive word set.
#[derive(Debug, Clone, Default)]
pub struct DictionaryLookup {
    words: HashSet<String>,
}

impl DictionaryLookup {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        DictionaryLookup::default()
    }

    /// Build a dictionary from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = DictionaryLookup::new();
        for word in words {
            dictionary.add_word(word.as_ref());
        }
        dictionary
    }

    /// Load a dictionary from a text file with one word per line.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut dictionary = DictionaryLookup::new();

        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                dictionary.add_word(word);
            }
        }

        Ok(dictionary)
    }

    /// Add a word to the dictionary.
    pub fn add_word(&mut self, word: &str) {
        let key = normalize_key(word);
        if !key.is_empty() {
            self.words.insert(key);
        }
    }

    /// Check if a word exists in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize_key(word))
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

#[async_trait]
impl LookupService for DictionaryLookup {
    async fn lookup(&self, words: &[String]) -> Result<Vec<bool>> {
        Ok(words.iter().map(|w| self.contains(w)).collect())
    }

    fn name(&self) -> &str {
        "dictionary"
    }
}
