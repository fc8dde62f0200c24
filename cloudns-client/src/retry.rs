//! Retry policy for transport calls
//!
//! Linear backoff: the k-th retry waits `k * base_delay`. Only transport
//! failures and a fixed set of HTTP statuses are retried; business-level
//! `"Failed"` bodies are never seen here.

use std::future::Future;
use std::time::Duration;

use crate::transport::{TransportError, TransportResponse};

/// HTTP statuses that are worth another attempt.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Result of one attempt, as far as the retry decision is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transport raised (connection refused, timeout, ...).
    TransportFailure,
    /// An HTTP response with this status arrived.
    Status(u16),
}

impl Outcome {
    fn of(result: &Result<TransportResponse, TransportError>) -> Self {
        match result {
            Ok(response) => Self::Status(response.status),
            Err(_) => Self::TransportFailure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retry_times: u32,
    base_delay: Duration,
    log_retries: bool,
}

impl RetryPolicy {
    pub fn new(retry_times: u32, base_delay: Duration) -> Self {
        Self {
            retry_times,
            base_delay,
            log_retries: true,
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_retries = enabled;
        self
    }

    pub fn retry_times(&self) -> u32 {
        self.retry_times
    }

    /// Whether to retry after `retries_done` retries ended in `outcome`.
    pub fn should_retry(&self, retries_done: u32, outcome: Outcome) -> bool {
        if retries_done >= self.retry_times {
            return false;
        }
        match outcome {
            Outcome::TransportFailure => true,
            Outcome::Status(status) => RETRYABLE_STATUSES.contains(&status),
        }
    }

    /// Delay before the `retry`-th retry (1-indexed).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Runs `attempt` until it yields a terminal outcome or retries are
    /// exhausted, and returns the last outcome unchanged.
    ///
    /// Sleeping uses the tokio timer, so only the calling task waits.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Result<TransportResponse, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<TransportResponse, TransportError>>,
    {
        let mut retries_done = 0;
        loop {
            let result = attempt().await;
            let outcome = Outcome::of(&result);
            if !self.should_retry(retries_done, outcome) {
                return result;
            }

            retries_done += 1;
            let delay = self.delay_for(retries_done);
            if self.log_retries {
                let reason = match &result {
                    Ok(response) => format!("HTTP {}", response.status),
                    Err(e) => e.to_string(),
                };
                log::warn!(
                    "[cloudns] Request failed (retry {}/{}), retrying in {:.1}s: {}",
                    retries_done,
                    self.retry_times,
                    delay.as_secs_f32(),
                    reason
                );
            }
            tokio::time::sleep(delay).await;
        }
    }
}
