//! Word-book submission API lookup.
//!
//! The service accepts a plain-text word list uploaded as a multipart file and
//! answers with two comma-separated lists: the words it knows and the words it
//! does not. Recognition is compared case-insensitively.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::LookupEndpointConfig;
use crate::error::{Result, WordbookError};
use crate::lookup::service::LookupService;
use crate::vocabulary::normalize_key;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const UPLOAD_FILE_NAME: &str = "words.txt";

/// Response envelope of the submission API.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data_body: Option<SubmitBody>,
}

/// Known word list. Anything not in it counts as unknown.
#[derive(Debug, Deserialize)]
struct SubmitBody {
    #[serde(rename = "knowList", default)]
    know_list: String,
}

/// HTTP lookup against the word-book submission endpoint.
pub struct WordBookLookup {
    client: Client,
    config: LookupEndpointConfig,
}

impl WordBookLookup {
    /// Create a lookup client for the configured endpoint.
    pub fn new(config: LookupEndpointConfig) -> Result<Self> {
        if !config.submit_url.starts_with("http://") && !config.submit_url.starts_with("https://") {
            return Err(WordbookError::configuration(format!(
                "invalid lookup URL: {}",
                config.submit_url
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(WordBookLookup { client, config })
    }

    pub fn submit_url(&self) -> &str {
        &self.config.submit_url
    }

    fn origin(&self) -> Option<String> {
        reqwest::Url::parse(&self.config.submit_url)
            .ok()
            .map(|url| url.origin().ascii_serialization())
    }
}

/// Map a non-success HTTP status to the error taxonomy.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> WordbookError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WordbookError::configuration(format!(
            "lookup service rejected the request: HTTP {status}"
        )),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            WordbookError::transient(format!("lookup service throttled: HTTP {status}"))
        }
        s if s.is_server_error() => {
            WordbookError::transient(format!("lookup service unavailable: HTTP {status}"))
        }
        _ => WordbookError::malformed(format!("unexpected lookup status: HTTP {status}"), body),
    }
}

/// Decode a submission response into one flag per word.
pub(crate) fn parse_submit_response(body: &str, words: &[String]) -> Result<Vec<bool>> {
    let response: SubmitResponse = serde_json::from_str(body)
        .map_err(|e| WordbookError::malformed(format!("undecodable lookup response: {e}"), body))?;

    let data_body = response
        .data_body
        .ok_or_else(|| WordbookError::malformed("lookup response has no data_body", body))?;

    let known: HashSet<String> = data_body
        .know_list
        .split(',')
        .map(normalize_key)
        .filter(|w| !w.is_empty())
        .collect();

    Ok(words.iter().map(|w| known.contains(&normalize_key(w))).collect())
}

#[async_trait]
impl LookupService for WordBookLookup {
    async fn lookup(&self, words: &[String]) -> Result<Vec<bool>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let content = words.join("\n");
        let part = Part::bytes(content.into_bytes())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("text/plain")?;
        let form = Form::new().part("file", part);

        debug!(
            "uploading {} words to {}",
            words.len(),
            self.config.submit_url
        );

        let mut request = self
            .client
            .post(&self.config.submit_url)
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("X-Requested-With", "XMLHttpRequest")
            .multipart(form);
        if let Some(origin) = self.origin() {
            request = request.header("Origin", origin);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                WordbookError::transient(format!("lookup request failed: {e}"))
            } else {
                WordbookError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WordbookError::transient(format!("lookup body read failed: {e}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        parse_submit_response(&body, words).inspect_err(|e| {
            warn!("lookup response could not be decoded: {e}; payload: {body}");
        })
    }

    fn name(&self) -> &str {
        "word-book"
    }
}
