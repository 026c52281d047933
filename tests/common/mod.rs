//! Scripted service fakes shared by the scenario tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use wordbook::config::{PipelineConfig, RetryConfig};
use wordbook::error::{Result, WordbookError};
use wordbook::generator::{CandidateGenerator, Directive};
use wordbook::lookup::LookupService;

/// Lookup service recognizing a fixed word set, optionally stalling every call
/// or refusing batches that contain certain words.
#[derive(Default)]
pub struct ScriptedLookup {
    known: HashSet<String>,
    delay: Option<Duration>,
    refused: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedLookup {
    pub fn new(known: &[&str]) -> Self {
        ScriptedLookup {
            known: known.iter().map(|w| w.to_lowercase()).collect(),
            ..Default::default()
        }
    }

    /// Every call sleeps for `delay` before answering.
    pub fn stalling(known: &[&str], delay: Duration) -> Self {
        ScriptedLookup {
            delay: Some(delay),
            ..ScriptedLookup::new(known)
        }
    }

    /// Any batch containing one of `refused` fails as unauthorized.
    pub fn refusing(known: &[&str], refused: &[&str]) -> Self {
        ScriptedLookup {
            refused: refused.iter().map(|w| w.to_lowercase()).collect(),
            ..ScriptedLookup::new(known)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupService for ScriptedLookup {
    async fn lookup(&self, words: &[String]) -> Result<Vec<bool>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if words
            .iter()
            .any(|w| self.refused.contains(&w.to_lowercase()))
        {
            return Err(WordbookError::configuration("401 unauthorized"));
        }
        Ok(words
            .iter()
            .map(|w| self.known.contains(&w.to_lowercase()))
            .collect())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Generator answering from per-word scripts and counting invocations.
#[derive(Default)]
pub struct ScriptedGenerator {
    corrections: HashMap<String, String>,
    candidates: HashMap<String, Vec<String>>,
    unavailable: bool,
    calls: Mutex<HashMap<String, Vec<Directive>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        ScriptedGenerator::default()
    }

    /// A generator whose every call fails transiently.
    pub fn unavailable() -> Self {
        ScriptedGenerator {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn correction(mut self, word: &str, proposal: &str) -> Self {
        self.corrections
            .insert(word.to_string(), proposal.to_string());
        self
    }

    pub fn candidates(mut self, word: &str, list: &[&str]) -> Self {
        self.candidates.insert(
            word.to_string(),
            list.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Directives received for `word`, in call order.
    pub fn calls_for(&self, word: &str) -> Vec<Directive> {
        self.calls
            .lock()
            .unwrap()
            .get(word)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().map(Vec::len).sum()
    }
}

#[async_trait]
impl CandidateGenerator for ScriptedGenerator {
    async fn generate(&self, directive: Directive, word: &str) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .entry(word.to_string())
            .or_default()
            .push(directive);

        if self.unavailable {
            return Err(WordbookError::transient("scripted outage"));
        }
        Ok(match directive {
            Directive::CorrectSpelling => self.corrections.get(word).cloned().into_iter().collect(),
            Directive::RootCandidates => self.candidates.get(word).cloned().unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Retry settings that keep tests fast.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_backoff_ms: 1,
        max_backoff_ms: 4,
        timeout_ms: 500,
    }
}

/// Default pipeline configuration with fast retries.
pub fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.verifier.retry = fast_retry();
    config.corrector.retry = fast_retry();
    config
}
