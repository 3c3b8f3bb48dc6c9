//! Retry policy and backoff handling for rate-limited requests.
//!
//! The upstream API signals rate limiting with HTTP 429. Each logical
//! fetch makes up to [`RetryPolicy::max_attempts`] attempts, doubling the
//! wait between them. Every other error status is terminal on the first
//! response: a 4xx will not get better by retrying and a 5xx is the
//! upstream's problem to report, not ours to hammer.
//!
//! The decision for one response lives in [`RetryPolicy::disposition`],
//! a pure function from (status, attempt) to [`Disposition`]. The loop in
//! [`fetch_with_retry`] only carries out what the disposition says, so
//! the whole state machine can be tested without timers or sockets.

use std::time::Duration;

use async_trait::async_trait;

use crate::ClientError;
use crate::transport::HttpTransport;

/// Attempts per logical fetch: one initial request plus three retries.
///
/// With exponential backoff (2s, 4s, 8s) the total wait before giving
/// up on a rate-limited endpoint is 14 seconds.
const MAX_ATTEMPTS: u32 = 4;

/// Capability to wait out a backoff delay.
///
/// Production code sleeps on the tokio timer; tests substitute a
/// recorder so retry schedules can be asserted without waiting. Each
/// call sleeps on its own future, so concurrent fetches back off
/// independently.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the calling task for `delay`.
    async fn sleep(&self, delay: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// What to do with one HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 2xx; hand the body to the caller.
    Success,
    /// 429 with retry budget left; wait, then send again.
    RetryAfter(Duration),
    /// 429 on the final attempt; the retry budget is spent.
    RateLimitExhausted,
    /// Any other status; terminal immediately, no retry.
    Upstream,
}

/// Retry schedule for one logical fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Creates a policy making up to `max_attempts` attempts (at least
    /// one; zero is rounded up).
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Total attempts this policy allows, including the first one.
    #[must_use]
    pub const fn max_attempts(self) -> u32 {
        self.max_attempts
    }

    /// Backoff delay after attempt `attempt` (1-based).
    #[must_use]
    pub const fn backoff_delay(attempt: u32) -> Duration {
        Duration::from_secs(1u64 << attempt) // 2s, 4s, 8s
    }

    /// Decides what to do with the response to attempt `attempt`
    /// (1-based).
    #[must_use]
    pub fn disposition(self, status: u16, attempt: u32) -> Disposition {
        match status {
            200..=299 => Disposition::Success,
            429 if attempt < self.max_attempts => {
                Disposition::RetryAfter(Self::backoff_delay(attempt))
            }
            429 => Disposition::RateLimitExhausted,
            _ => Disposition::Upstream,
        }
    }
}

/// Sends GET requests to `url` until the policy settles on an outcome,
/// returning the successful response body.
///
/// Transport-level failures are returned immediately; a connection that
/// never produced a response says nothing about rate limiting, so
/// retrying it is not this loop's call.
pub(crate) async fn fetch_with_retry(
    transport: &dyn HttpTransport,
    sleeper: &dyn Sleeper,
    policy: RetryPolicy,
    url: &str,
) -> Result<String, ClientError> {
    for attempt in 1..=policy.max_attempts() {
        let response = transport.send(url).await?;

        match policy.disposition(response.status, attempt) {
            Disposition::Success => return Ok(response.body),
            Disposition::RetryAfter(delay) => {
                log::warn!(
                    "HTTP 429 (rate limited), retry {attempt}/{} in {delay:?}...",
                    policy.max_attempts() - 1
                );
                sleeper.sleep(delay).await;
            }
            Disposition::RateLimitExhausted => {
                return Err(ClientError::RateLimitExhausted {
                    attempts: policy.max_attempts(),
                });
            }
            Disposition::Upstream => {
                return Err(ClientError::UpstreamStatus {
                    status: response.status,
                });
            }
        }
    }

    unreachable!("retry loop exited without a terminal disposition")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_exactly_2xx() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.disposition(200, 1), Disposition::Success);
        assert_eq!(policy.disposition(204, 3), Disposition::Success);
        assert_eq!(policy.disposition(299, 4), Disposition::Success);
        assert_eq!(policy.disposition(199, 1), Disposition::Upstream);
        assert_eq!(policy.disposition(300, 1), Disposition::Upstream);
    }

    #[test]
    fn rate_limit_backs_off_then_exhausts() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.disposition(429, 1),
            Disposition::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(
            policy.disposition(429, 2),
            Disposition::RetryAfter(Duration::from_secs(4))
        );
        assert_eq!(
            policy.disposition(429, 3),
            Disposition::RetryAfter(Duration::from_secs(8))
        );
        assert_eq!(policy.disposition(429, 4), Disposition::RateLimitExhausted);
    }

    #[test]
    fn other_statuses_are_terminal_on_first_sight() {
        let policy = RetryPolicy::default();
        for status in [301, 400, 403, 404, 500, 502, 503] {
            assert_eq!(
                policy.disposition(status, 1),
                Disposition::Upstream,
                "HTTP {status} must not be retried"
            );
        }
    }

    #[test]
    fn zero_attempts_rounds_up_to_one() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.disposition(429, 1), Disposition::RateLimitExhausted);
    }
}
