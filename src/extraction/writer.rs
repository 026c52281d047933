//! Rendering of extraction results into the output file formats.

use crate::extraction::{ExtractedRow, Extraction, ExtractionMode};

const RULE_WIDTH: usize = 50;

fn section(out: &mut String, title: &str, rows: &[ExtractedRow]) {
    let rule = "=".repeat(RULE_WIDTH);
    out.push_str(&rule);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\n\n");
    for row in rows {
        out.push_str(&format!("{}. {}\t{}\n", row.number, row.term, row.meaning));
    }
}

/// Render `extraction` in the layout of `mode`.
///
/// `words_only` yields one word per line, which is the word-list format the
/// check and correct commands read. The other modes are for reading.
pub fn render(extraction: &Extraction, mode: ExtractionMode) -> String {
    let mut out = String::new();
    match mode {
        ExtractionMode::WordsOnly => {
            for row in &extraction.words {
                out.push_str(&row.term);
                out.push('\n');
            }
        }
        ExtractionMode::WithMeaning => section(&mut out, "Words", &extraction.words),
        ExtractionMode::Full => {
            section(&mut out, "Words", &extraction.words);
            if !extraction.phrases.is_empty() {
                out.push('\n');
                section(&mut out, "Phrases", &extraction.phrases);
            }
        }
    }
    out
}
