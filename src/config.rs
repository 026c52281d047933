//! Configuration for the correction pipeline and its service backends.
//!
//! Every component receives its configuration by value at construction and
//! never consults the environment itself. The CLI is the only place where
//! environment variables are read (through clap's `env` support).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WordbookError};

/// Default endpoint of the word-book submission API.
pub const DEFAULT_LOOKUP_URL: &str = "https://bbdc.cn/lexis/book/file/submit";

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_GENERATOR_URL: &str = "https://api.siliconflow.cn/v1/chat/completions";

/// Default chat model.
pub const DEFAULT_GENERATOR_MODEL: &str = "Qwen/Qwen2.5-7B-Instruct";

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles afterwards.
    pub initial_backoff_ms: u64,
    /// Upper bound of a single backoff.
    pub max_backoff_ms: u64,
    /// Timeout of one attempt.
    pub timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            timeout_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self, owner: &str) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(WordbookError::configuration(format!(
                "{owner}.retry.max_attempts must be at least 1"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(WordbookError::configuration(format!(
                "{owner}.retry.timeout_ms must be greater than 0"
            )));
        }
        Ok(())
    }
}

/// Normalizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Keep entries classified as phrases.
    pub include_phrases: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            include_phrases: true,
        }
    }
}

/// Verifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum number of words sent in one lookup call.
    pub page_size: usize,
    /// Number of chunk calls allowed in flight at once.
    pub concurrency: usize,
    pub retry: RetryConfig,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            page_size: 200,
            concurrency: 1,
            retry: RetryConfig::default(),
        }
    }
}

/// Corrector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Upper bound of second-round candidates that get verified.
    pub max_candidates: usize,
    /// Number of failed entries corrected at once.
    pub concurrency: usize,
    /// Retry policy applied to each generator invocation.
    pub retry: RetryConfig,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig {
            max_candidates: 5,
            concurrency: 1,
            retry: RetryConfig::default(),
        }
    }
}

/// Replacement and backup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacementConfig {
    /// Suffix appended to the word-list file name to build the backup name.
    pub backup_suffix: String,
    /// Directory for backups. Defaults to the word-list's own directory.
    pub backup_dir: Option<PathBuf>,
    /// Remove unresolved entries from the rewritten list.
    pub drop_unresolved: bool,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        ReplacementConfig {
            backup_suffix: ".backup".to_string(),
            backup_dir: None,
            drop_unresolved: true,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub normalizer: NormalizerConfig,
    pub verifier: VerifierConfig,
    pub corrector: CorrectorConfig,
    pub replacement: ReplacementConfig,
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the pipeline loop or stall.
    pub fn validate(&self) -> Result<()> {
        if self.verifier.page_size == 0 {
            return Err(WordbookError::configuration(
                "verifier.page_size must be at least 1",
            ));
        }
        if self.verifier.concurrency == 0 || self.corrector.concurrency == 0 {
            return Err(WordbookError::configuration(
                "concurrency must be at least 1",
            ));
        }
        if self.replacement.backup_suffix.is_empty() {
            return Err(WordbookError::configuration(
                "replacement.backup_suffix must not be empty",
            ));
        }
        self.verifier.retry.validate("verifier")?;
        self.corrector.retry.validate("corrector")?;
        Ok(())
    }
}

/// Endpoint settings of the lookup service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupEndpointConfig {
    pub submit_url: String,
    pub timeout_ms: u64,
}

impl Default for LookupEndpointConfig {
    fn default() -> Self {
        LookupEndpointConfig {
            submit_url: DEFAULT_LOOKUP_URL.to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Endpoint settings of the chat completions service.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorEndpointConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for GeneratorEndpointConfig {
    fn default() -> Self {
        GeneratorEndpointConfig {
            base_url: DEFAULT_GENERATOR_URL.to_string(),
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            api_key: None,
            temperature: 0.3,
            max_tokens: 300,
            timeout_ms: 30_000,
        }
    }
}

impl std::fmt::Debug for GeneratorEndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorEndpointConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
