//! Sleep and exponential backoff over async operations.
//!
//! Attempts are strictly sequential. After failed attempt `i` (0-based) the
//! caller waits `base_delay * 2^i`; there is no wait after the final attempt
//! and no jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Non-blocking pause on the tokio timer.
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Run `op` up to `max_retries` times (at least once), doubling the wait
/// between attempts. Returns the first success or the last error.
pub async fn retry_with_backoff<T, E, F, Fut>(
    op: F,
    max_retries: u32,
    base_delay: Duration,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    RetryPolicy {
        max_retries,
        base_delay,
        max_delay: Duration::MAX,
    }
    .run(op)
    .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total attempts; zero behaves like one.
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Upper bound for a single wait.
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait after failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    pub async fn run<T, E, F, Fut>(&self, op: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
    {
        self.run_if(op, |_| true).await
    }

    /// Like [`run`](Self::run), but gives up as soon as `should_retry`
    /// rejects an error.
    pub async fn run_if<T, E, F, Fut, P>(
        &self,
        mut op: F,
        should_retry: P,
    ) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let attempts = self.attempts();
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let last = attempt + 1 >= attempts;
                    if last || !should_retry(&err) {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        of = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "attempt failed, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
