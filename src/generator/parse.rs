//! Parsing of free-form model output into proposals.
//!
//! Models are asked for JSON but often wrap it in a Markdown code fence or add
//! prose around it. The parsers here strip fences, try the expected JSON
//! shapes, and fall back to plain-text heuristics where that is safe.

use serde::Deserialize;

use crate::error::{Result, WordbookError};

#[derive(Debug, Deserialize)]
struct CorrectionReply {
    corrected: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandidateItem {
    Detailed { word: String },
    Plain(String),
}

impl CandidateItem {
    fn into_word(self) -> String {
        match self {
            CandidateItem::Detailed { word } => word,
            CandidateItem::Plain(word) => word,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CandidatesReply {
    Object { candidates: Vec<CandidateItem> },
    List(Vec<CandidateItem>),
}

/// Return the body of the first code fence, or the trimmed content.
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    let Some(start) = content.find("```") else {
        return content;
    };
    let after = &content[start + 3..];
    // Skip an info string such as `json`.
    let body = match after.find('\n') {
        Some(newline) if after[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &after[newline + 1..]
        }
        _ => after,
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Parse a spelling-correction reply into at most one proposal.
///
/// When the reply is not the expected JSON, the first token with its
/// non-alphabetic edges stripped is taken, like a one-word answer.
pub fn parse_correction(content: &str) -> Vec<String> {
    let body = strip_code_fence(content);

    if let Ok(reply) = serde_json::from_str::<CorrectionReply>(body) {
        let corrected = reply.corrected.trim();
        return if corrected.is_empty() {
            Vec::new()
        } else {
            vec![corrected.to_string()]
        };
    }

    body.split_whitespace()
        .next()
        .map(|token| token.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|token| !token.is_empty())
        .map(|token| vec![token.to_string()])
        .unwrap_or_default()
}

/// Parse a root-candidates reply into an ordered list of proposals.
///
/// Accepts `{"candidates": [...]}` or a bare array, with items either
/// `{"word": ...}` objects or plain strings.
pub fn parse_candidates(content: &str) -> Result<Vec<String>> {
    let body = strip_code_fence(content);

    let reply: CandidatesReply = serde_json::from_str(body)
        .map_err(|e| WordbookError::malformed(format!("undecodable candidate list: {e}"), content))?;

    let items = match reply {
        CandidatesReply::Object { candidates } => candidates,
        CandidatesReply::List(items) => items,
    };

    Ok(items
        .into_iter()
        .map(CandidateItem::into_word)
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect())
}
