//! Generator trait and directives.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the generator is asked to produce for a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// One best spelling correction.
    CorrectSpelling,
    /// An ordered list of roots, base forms or decompositions.
    RootCandidates,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::CorrectSpelling => f.write_str("correct-spelling"),
            Directive::RootCandidates => f.write_str("root-candidates"),
        }
    }
}

/// Trait for proposing replacement words.
///
/// The returned strings are raw proposals in the generator's order; callers
/// trim, filter and verify them.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use wordbook::error::Result;
/// use wordbook::generator::{CandidateGenerator, Directive};
///
/// struct Lowercaser;
///
/// #[async_trait]
/// impl CandidateGenerator for Lowercaser {
///     async fn generate(&self, _directive: Directive, word: &str) -> Result<Vec<String>> {
///         Ok(vec![word.to_lowercase()])
///     }
///
///     fn name(&self) -> &str {
///         "lowercaser"
///     }
/// }
/// ```
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    /// Propose replacements for `word` under `directive`.
    async fn generate(&self, directive: Directive, word: &str) -> Result<Vec<String>>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}
