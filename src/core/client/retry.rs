//! Retry configuration and logic for the Stronghold client.
//!
//! Only transport failures are retried (see
//! [`StrongholdError::is_retryable`]). A response with the wrong status code is
//! surfaced on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::core::client::utils;
use crate::core::error::{Result, StrongholdError};

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Additional attempts after the first one fails.
    pub max_retries: u32,
    /// Pause between attempts. Zero leaves pacing to the transport.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, duration: Duration) -> Self {
        self.backoff = duration;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Retry(Duration),
    DontRetry,
}

#[derive(Debug, Clone)]
pub struct RetryState {
    pub attempts: u32,
    config: RetryConfig,
}

impl RetryState {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            attempts: 0,
            config,
        }
    }

    pub fn should_retry_error(&mut self, error: &StrongholdError) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::DontRetry;
        }
        self.attempts += 1;
        if self.attempts > self.config.max_retries {
            return RetryDecision::DontRetry;
        }
        RetryDecision::Retry(self.config.backoff)
    }
}

/// Runs an operation under a [`RetryConfig`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    enable_logging: bool,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            enable_logging: false,
        }
    }

    #[must_use]
    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Attempt `op`, retrying transport failures. The last error is returned
    /// unchanged once attempts run out.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut state = RetryState::new(self.config.clone());
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => match state.should_retry_error(&e) {
                    RetryDecision::Retry(delay) => {
                        if self.enable_logging {
                            tracing::warn!(
                                "Request failed (attempt {}), retrying after {:?}: {}",
                                state.attempts,
                                delay,
                                e
                            );
                        }
                        if !delay.is_zero() {
                            utils::sleep(delay).await;
                        }
                    }
                    RetryDecision::DontRetry => return Err(e),
                },
            }
        }
    }

    /// Like [`run`](Self::run), but any final failure becomes
    /// [`StrongholdError::ConnectionFailure`] carrying `label`.
    pub async fn guard<T, F, Fut>(&self, label: impl Into<String>, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run(op)
            .await
            .map_err(|source| StrongholdError::ConnectionFailure {
                label: label.into(),
                source: Box::new(source),
            })
    }
}
