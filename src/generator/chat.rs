//! OpenAI-compatible chat completions generator.
//!
//! Sends one chat request per directive and word, then parses the reply with
//! [`crate::generator::parse`]. Works with any endpoint implementing the
//! `/v1/chat/completions` contract (SiliconFlow, OpenAI, local servers).
//!
//! # Examples
//!
//! ```no_run
//! use wordbook::config::GeneratorEndpointConfig;
//! use wordbook::generator::{CandidateGenerator, ChatCompletionGenerator, Directive};
//!
//! # async fn example() -> wordbook::error::Result<()> {
//! let generator = ChatCompletionGenerator::new(GeneratorEndpointConfig {
//!     api_key: Some(std::env::var("SILICONFLOW_API_KEY").unwrap_or_default()),
//!     ..Default::default()
//! })?;
//!
//! let proposals = generator.generate(Directive::CorrectSpelling, "recieve").await?;
//! println!("{proposals:?}");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::GeneratorEndpointConfig;
use crate::error::{Result, WordbookError};
use crate::generator::parse::{parse_candidates, parse_correction};
use crate::generator::prompt::{SYSTEM_PROMPT, user_prompt};
use crate::generator::service::{CandidateGenerator, Directive};

/// Request body of the chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body of the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

/// Chat-completions-backed candidate generator.
pub struct ChatCompletionGenerator {
    client: Client,
    config: GeneratorEndpointConfig,
}

impl ChatCompletionGenerator {
    /// Create a generator for the configured endpoint.
    ///
    /// A missing API key is not an error here; see [`Self::is_enabled`].
    pub fn new(config: GeneratorEndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(ChatCompletionGenerator { client, config })
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WordbookError::configuration("generator API key is not set"))?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let http_response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| WordbookError::transient(format!("chat request failed: {e}")))?;

        let status = http_response.status();
        let response_text = http_response
            .text()
            .await
            .map_err(|e| WordbookError::transient(format!("chat body read failed: {e}")))?;

        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WordbookError::configuration(
                    format!("chat endpoint rejected the API key: HTTP {status}"),
                ),
                s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => {
                    WordbookError::transient(format!("chat endpoint unavailable: HTTP {status}"))
                }
                _ => WordbookError::malformed(
                    format!("chat endpoint error: HTTP {status}"),
                    response_text,
                ),
            });
        }

        let response: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            warn!("chat response could not be decoded: {e}; payload: {response_text}");
            WordbookError::malformed(format!("undecodable chat response: {e}"), &response_text)
        })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| WordbookError::malformed("chat response has no choices", response_text))
    }
}

#[async_trait]
impl CandidateGenerator for ChatCompletionGenerator {
    async fn generate(&self, directive: Directive, word: &str) -> Result<Vec<String>> {
        let prompt = user_prompt(directive, word);
        let content = self.complete(&prompt).await?;
        debug!("{directive} reply for '{word}': {content}");

        match directive {
            Directive::CorrectSpelling => Ok(parse_correction(&content)),
            Directive::RootCandidates => parse_candidates(&content),
        }
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
