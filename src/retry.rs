//! Bounded retry with exponential backoff and a per-attempt timeout.
//!
//! Every call to an external service goes through [`RetryPolicy::run`]. An
//! attempt that exceeds the configured timeout counts as a transient failure.
//! Only errors classified by [`WordbookError::is_transient`] are retried; any
//! other error is returned immediately.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

use crate::config::RetryConfig;
use crate::error::{Result, WordbookError};

/// Retry policy shared by the verifier and the corrector.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        RetryPolicy { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Backoff before attempt number `attempt` (0-based), without jitter.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 1);
        self.config
            .initial_backoff()
            .saturating_mul(factor)
            .min(self.config.max_backoff())
    }

    fn backoff_with_jitter(&self, attempt: u32) -> Duration {
        let base = self.base_backoff(attempt);
        let jitter_ms = (base.as_millis() / 10) as u64;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
    }

    /// Run `op` until it succeeds, fails permanently or runs out of attempts.
    ///
    /// `op` receives the 0-based attempt number.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                let delay = self.backoff_with_jitter(attempt);
                debug!(
                    "{label}: retry attempt {}/{} after {:?}",
                    attempt + 1,
                    self.config.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
            }

            match tokio::time::timeout(self.config.timeout(), op(attempt)).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if e.is_transient() => {
                    warn!("{label}: attempt {} failed: {e}", attempt + 1);
                    last_err = Some(e);
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    warn!(
                        "{label}: attempt {} timed out after {:?}",
                        attempt + 1,
                        self.config.timeout()
                    );
                    last_err = Some(WordbookError::timeout(format!(
                        "{label} exceeded {:?}",
                        self.config.timeout()
                    )));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            WordbookError::transient(format!("{label}: no attempt was made"))
        }))
    }
}
