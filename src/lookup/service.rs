//! Lookup service trait.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for classifying a batch of words as recognized or not.
///
/// Implementations return one flag per input word, in input order. Errors are
/// reported through the crate error taxonomy: credential problems as
/// [`WordbookError::Configuration`](crate::error::WordbookError::Configuration),
/// timeouts and 5xx answers as transient errors, undecodable answers as
/// malformed responses.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use wordbook::error::Result;
/// use wordbook::lookup::LookupService;
///
/// struct ShortWords;
///
/// #[async_trait]
/// impl LookupService for ShortWords {
///     async fn lookup(&self, words: &[String]) -> Result<Vec<bool>> {
///         Ok(words.iter().map(|w| w.len() <= 4).collect())
///     }
///
///     fn name(&self) -> &str {
///         "short-words"
///     }
/// }
/// ```
#[async_trait]
pub trait LookupService: Send + Sync {
    /// Classify `words`; the result has the same length and order.
    async fn lookup(&self, words: &[String]) -> Result<Vec<bool>>;

    /// Name used in log lines.
    fn name(&self) -> &str;
}
