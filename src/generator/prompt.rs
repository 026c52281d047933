//! Prompt templates for the chat generator.

use crate::generator::service::Directive;

/// System message shared by both directives.
pub const SYSTEM_PROMPT: &str = "You are an English vocabulary assistant. You fix misspelled \
    words and suggest base forms of words. Answer with JSON only.";

/// Build the user message for `word` under `directive`.
pub fn user_prompt(directive: Directive, word: &str) -> String {
    match directive {
        Directive::CorrectSpelling => format!(
            r#"Check whether the English word "{word}" is misspelled. If it is, give the correct spelling.

Return a JSON object with these fields:
- corrected: the corrected word, or the original word if it is already correct
- confidence: one of "high", "medium", "low"
- reason: a short explanation

Example: {{"corrected": "receive", "confidence": "high", "reason": "swapped i and e"}}

Return only the JSON object."#
        ),
        Directive::RootCandidates => format!(
            r#"The English word "{word}" is not recognized by a vocabulary service. Suggest 3 to 5 real, common English words that could replace it, most fundamental first:
1. its root or base form
2. the word with prefixes or suffixes removed
3. the likely intended spelling, if it is a typo

Return a JSON object with a "candidates" array whose items have "word" and "reason" fields.

Example: {{"candidates": [{{"word": "system", "reason": "root of supersystem"}}]}}

Return only the JSON object."#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_mention_word_and_shape() {
        let correction = user_prompt(Directive::CorrectSpelling, "recieve");
        assert!(correction.contains("\"recieve\""));
        assert!(correction.contains("corrected"));

        let candidates = user_prompt(Directive::RootCandidates, "supersystem");
        assert!(candidates.contains("\"supersystem\""));
        assert!(candidates.contains("\"candidates\""));
    }
}
