//! Bounded retry for customer updates that lose a storage conflict

use std::future::Future;
use std::time::Duration;

use meter_common::RetryConfig;
use meter_core::DomainError;
use tracing::{error, warn};

use super::error::{ServiceError, ServiceResult};

/// How many times a conflicting update is attempted, and how long to wait
/// between attempts (the wait grows linearly with the attempt number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.backoff())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, fails permanently, or runs out of attempts
    ///
    /// Only transient domain errors are retried. Exhaustion surfaces as
    /// [`ServiceError::Unavailable`]; every other error is returned as is.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut op: F) -> ServiceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let sleep_for = self.backoff * attempt;
                    warn!(
                        error = %e,
                        attempt,
                        operation,
                        "customer update conflicted, retrying with backoff"
                    );
                    tokio::time::sleep(sleep_for).await;
                }
                Err(e) if e.is_transient() => {
                    error!(error = %e, attempt, operation, "customer update conflicted, giving up");
                    return Err(ServiceError::Unavailable {
                        operation,
                        attempts: attempt,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
