//! Vocabulary extraction from converted textbook documents.
//!
//! Source documents are Markdown files in which each vocabulary section is a
//! table of `number | term | meaning` rows, either as HTML `<table>` markup or
//! as a pipe table. Header rows and filler rows are skipped, and terms are
//! split into words and phrases.

pub mod table;
pub mod writer;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::vocabulary::{EntryKind, normalize_key};

use self::table::{Cells, TableScanner};

pub use writer::render;

/// Column titles and section markers that are never vocabulary.
const HEADER_NUMBERS: &[&str] = &["NO.", "No.", "no."];
const HEADER_TERMS: &[&str] = &["单词", "短语", "Word", "Phrase", "word", "phrase"];
const SUPPLEMENT_MARKER: &str = "补充区";

/// Output layout of the extract command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// One word per line
    #[default]
    WordsOnly,
    /// Numbered words with their meanings
    WithMeaning,
    /// Words and phrases with their meanings
    Full,
}

impl ExtractionMode {
    /// Suffix of the default output file name for this mode.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ExtractionMode::WordsOnly => "_words.txt",
            ExtractionMode::WithMeaning => "_meanings.txt",
            ExtractionMode::Full => "_full.txt",
        }
    }

    pub fn includes_phrases(&self) -> bool {
        matches!(self, ExtractionMode::Full)
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::WordsOnly => f.write_str("words_only"),
            ExtractionMode::WithMeaning => f.write_str("with_meaning"),
            ExtractionMode::Full => f.write_str("full"),
        }
    }
}

/// One vocabulary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRow {
    pub number: String,
    pub term: String,
    pub meaning: String,
}

/// Words and phrases found in a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub words: Vec<ExtractedRow>,
    pub phrases: Vec<ExtractedRow>,
}

impl Extraction {
    /// The word terms, as a word list.
    pub fn word_list(&self) -> Vec<String> {
        self.words.iter().map(|row| row.term.clone()).collect()
    }
}

/// Default output path: `<input stem><mode suffix>` next to the input.
pub fn default_output_path(input: &Path, mode: ExtractionMode) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "vocabulary".to_string());
    input.with_file_name(format!("{stem}{}", mode.file_suffix()))
}

/// Extracts vocabulary tables from documents.
#[derive(Debug, Clone)]
pub struct Extractor {
    unique: bool,
    include_phrases: bool,
    scanner: TableScanner,
}

impl Extractor {
    pub fn new(unique: bool, include_phrases: bool) -> Result<Self> {
        Ok(Extractor {
            unique,
            include_phrases,
            scanner: TableScanner::new()?,
        })
    }

    pub fn for_mode(unique: bool, mode: ExtractionMode) -> Result<Self> {
        Extractor::new(unique, mode.includes_phrases())
    }

    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(self.extract(&content))
    }

    /// Extract every vocabulary row of `content`.
    ///
    /// ```
    /// use wordbook::extraction::Extractor;
    ///
    /// let doc = "<table><tr><td>NO.</td><td>单词</td><td>释义</td></tr>\
    ///            <tr><td>1</td><td>hello</td><td>你好</td></tr></table>";
    /// let extraction = Extractor::new(true, false).unwrap().extract(doc);
    /// assert_eq!(extraction.word_list(), vec!["hello"]);
    /// ```
    pub fn extract(&self, content: &str) -> Extraction {
        let mut extraction = Extraction::default();
        let mut seen = HashSet::new();

        let rows = self
            .scanner
            .html_rows(content)
            .into_iter()
            .chain(self.scanner.pipe_rows(content));

        for cells in rows {
            let Some(row) = vocabulary_row(cells) else {
                continue;
            };

            match EntryKind::classify(&row.term) {
                EntryKind::Phrase => {
                    if self.include_phrases {
                        extraction.phrases.push(row);
                    }
                }
                EntryKind::Word => {
                    if self.unique && !seen.insert(normalize_key(&row.term)) {
                        debug!("skipping duplicate word '{}'", row.term);
                        continue;
                    }
                    extraction.words.push(row);
                }
            }
        }

        info!(
            "extracted {} words and {} phrases",
            extraction.words.len(),
            extraction.phrases.len()
        );
        extraction
    }
}

/// Turn a row's cells into a vocabulary row, or `None` for header and filler rows.
fn vocabulary_row(cells: Cells) -> Option<ExtractedRow> {
    let mut cells = cells.into_iter();
    let (number, term, meaning) = (cells.next()?, cells.next()?, cells.next()?);

    if number.is_empty()
        || HEADER_NUMBERS.contains(&number.as_str())
        || number.contains(SUPPLEMENT_MARKER)
        || !number.chars().all(|c| c.is_numeric())
    {
        return None;
    }
    if term.is_empty() || HEADER_TERMS.contains(&term.as_str()) {
        return None;
    }

    Some(ExtractedRow {
        number,
        term,
        meaning,
    })
}
