//! Word entry type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether an entry is a single word or a multi-part phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Word,
    Phrase,
}

impl EntryKind {
    /// Classify trimmed text. Any internal whitespace or hyphen makes a phrase.
    pub fn classify(text: &str) -> Self {
        if text.chars().any(|c| c.is_whitespace() || c == '-') {
            EntryKind::Phrase
        } else {
            EntryKind::Word
        }
    }
}

/// Comparison key of a token: trimmed and lowercased.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A single extracted vocabulary entry.
///
/// Identity is `normalized_text`; `original_text` keeps the casing of the
/// first occurrence for display and for exact-match replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    pub original_text: String,
    pub normalized_text: String,
    pub kind: EntryKind,
}

impl WordEntry {
    /// Build an entry from a raw token. Blank tokens yield `None`.
    ///
    /// ```
    /// use wordbook::vocabulary::{EntryKind, WordEntry};
    ///
    /// let entry = WordEntry::from_raw("  Give-Up ").unwrap();
    /// assert_eq!(entry.original_text, "Give-Up");
    /// assert_eq!(entry.normalized_text, "give-up");
    /// assert_eq!(entry.kind, EntryKind::Phrase);
    ///
    /// assert!(WordEntry::from_raw(" \t").is_none());
    /// ```
    pub fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(WordEntry {
            original_text: trimmed.to_string(),
            normalized_text: trimmed.to_lowercase(),
            kind: EntryKind::classify(trimmed),
        })
    }

    pub fn is_phrase(&self) -> bool {
        self.kind == EntryKind::Phrase
    }

    /// Length used by the candidate tie-break, in characters.
    pub fn normalized_len(&self) -> usize {
        self.normalized_text.chars().count()
    }
}

impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original_text)
    }
}
