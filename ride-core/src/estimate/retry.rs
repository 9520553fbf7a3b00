//! Bounded retries with exponential backoff around routing queries.

use std::future::Future;
use std::time::Duration;

use crate::RoutingError;

/// How routing queries are retried and bounded in time.
///
/// Only errors for which [`RoutingError::is_transient`] holds are retried.
/// An elapsed `per_call_timeout` is reported as [`RoutingError::Timeout`] and
/// therefore retried as well.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ride_core::RetryPolicy;
///
/// let policy = RetryPolicy::default()
///     .with_max_attempts(5)
///     .with_per_call_timeout(Some(Duration::from_secs(2)));
/// assert_eq!(policy.max_attempts, 5);
/// assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
/// assert_eq!(policy.backoff_for(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per query, including the first. Never below one.
    pub max_attempts: u32,
    /// Pause before the second attempt.
    pub initial_backoff: Duration,
    /// Factor applied to the pause after every failed attempt.
    pub backoff_multiplier: u32,
    /// Upper bound on any single pause.
    pub max_backoff: Duration,
    /// Deadline for one attempt; `None` leaves timing to the client.
    pub per_call_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            backoff_multiplier: 2,
            max_backoff: Duration::from_secs(2),
            per_call_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl RetryPolicy {
    /// A policy making exactly one attempt with no deadline of its own.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            backoff_multiplier: 1,
            max_backoff: Duration::ZERO,
            per_call_timeout: None,
        }
    }

    /// Override the attempt budget; zero is raised to one.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Override the first pause.
    #[must_use]
    pub const fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Override the pause growth factor.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Override the pause ceiling.
    #[must_use]
    pub const fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Override the per-attempt deadline.
    #[must_use]
    pub const fn with_per_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.per_call_timeout = timeout;
        self
    }

    /// Pause to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.backoff_multiplier.saturating_pow(exponent);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `attempt` until it succeeds, fails permanently or the budget is spent.
    ///
    /// `target` names the query in logs and in synthesised timeout errors.
    pub(crate) async fn run<T, F, Fut>(
        &self,
        target: &str,
        mut attempt: F,
    ) -> Result<T, RoutingError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RoutingError>>,
    {
        let budget = self.max_attempts.max(1);
        let mut tried = 0;
        loop {
            tried += 1;
            let err = match self.bounded(target, attempt()).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !err.is_transient() || tried >= budget {
                return Err(err);
            }
            let pause = self.backoff_for(tried);
            log::warn!(
                "routing attempt {tried}/{budget} for {target} failed: {err}; retrying in {pause:?}"
            );
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }
    }

    async fn bounded<T, Fut>(&self, target: &str, call: Fut) -> Result<T, RoutingError>
    where
        Fut: Future<Output = Result<T, RoutingError>>,
    {
        let Some(limit) = self.per_call_timeout else {
            return call.await;
        };
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or_else(|_| {
                Err(RoutingError::Timeout {
                    url: target.to_owned(),
                    timeout_secs: limit.as_secs(),
                })
            })
    }
}
