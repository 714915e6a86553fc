use super::{ModelCallError, ModelClient};
use crate::config::RetryConfig;
use crate::logging::log_model_call;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Bounded exponential backoff applied to model calls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Policy that gives up after the first failure
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based), capped at `max_delay`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let seconds = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(seconds)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt budget is spent.
///
/// The closure receives the 1-based attempt number. Exhaustion is reported as
/// [`ModelCallError::Exhausted`] carrying the last failure.
///
/// ```rust
/// use sidequest_core::client::{retry_with_backoff, ModelCallError, RetryPolicy};
///
/// # tokio_test::block_on(async {
/// let outcome: Result<String, ModelCallError> =
///     retry_with_backoff(&RetryPolicy::no_retry(), "model.complete", |_attempt| async {
///         Err(ModelCallError::MissingApiKey("OPENROUTER_API_KEY".to_string()))
///     })
///     .await;
/// assert!(matches!(outcome, Err(ModelCallError::MissingApiKey(_))));
/// # });
/// ```
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt_fn: F,
) -> Result<T, ModelCallError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ModelCallError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let started = Instant::now();
        let outcome = attempt_fn(attempt).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let error = match outcome {
            Ok(value) => {
                log_model_call(operation, attempt, "success", Some(duration_ms), None);
                return Ok(value);
            }
            Err(error) => error,
        };

        if !error.is_retryable() {
            log_model_call(
                operation,
                attempt,
                "failed",
                Some(duration_ms),
                Some(&error.to_string()),
            );
            return Err(error);
        }

        if attempt >= max_attempts {
            log_model_call(
                operation,
                attempt,
                "exhausted",
                Some(duration_ms),
                Some(&error.to_string()),
            );
            return Err(ModelCallError::Exhausted {
                attempts: attempt,
                last: Box::new(error),
            });
        }

        let delay = policy.delay_for_attempt(attempt);
        warn!(
            operation = %operation,
            attempt = attempt,
            max_attempts = max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Model call attempt failed, retrying"
        );
        sleep(delay).await;
        attempt += 1;
    }
}

/// Adds retry with backoff and empty-content detection to any [`ModelClient`]
#[derive(Debug)]
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C: ModelClient> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ModelClient> ModelClient for RetryingClient<C> {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
        let inner = &self.inner;
        debug!(prompt_chars = prompt.len(), "Dispatching model call");

        retry_with_backoff(&self.policy, "model.complete", move |_| async move {
            let text = inner.complete(prompt).await?;
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ModelCallError::EmptyContent);
            }
            Ok(trimmed.to_string())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedClient {
        responses: Mutex<VecDeque<Result<String, ModelCallError>>>,
        calls: AtomicU32,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, ModelCallError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn complete(&self, _prompt: &str) -> Result<String, ModelCallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or(Err(ModelCallError::Transport("script exhausted".to_string())))
        }
    }

    #[test]
    fn test_default_delays_double_from_two_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
        assert_eq!(policy.delay_for_attempt(u32::MAX), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_empty_responses() {
        let client = RetryingClient::new(
            ScriptedClient::new(vec![
                Ok("   ".to_string()),
                Err(ModelCallError::HttpStatus {
                    status: 503,
                    body: "busy".to_string(),
                }),
                Ok("  1. done  ".to_string()),
            ]),
            RetryPolicy::default(),
        );

        let started = Instant::now();
        let text = client.complete("prompt").await.unwrap();

        assert_eq!(text, "1. done");
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_carries_last_error() {
        let client = RetryingClient::new(
            ScriptedClient::new(vec![Ok(String::new()), Ok(String::new()), Ok(String::new())]),
            RetryPolicy::default(),
        );

        let error = client.complete("prompt").await.unwrap_err();

        assert_eq!(
            error,
            ModelCallError::Exhausted {
                attempts: 3,
                last: Box::new(ModelCallError::EmptyContent),
            }
        );
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_retried() {
        let client = RetryingClient::new(
            ScriptedClient::new(vec![Err(ModelCallError::MissingApiKey(
                "OPENROUTER_API_KEY".to_string(),
            ))]),
            RetryPolicy::default(),
        );

        let error = client.complete("prompt").await.unwrap_err();

        assert!(matches!(error, ModelCallError::MissingApiKey(_)));
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 1);
    }
}
