use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::error::WebDriverError;
use crate::domain::models::ConsoleConfig;

/// Bounded polling for page conditions.
///
/// A check returns `Ok(Some(_))` when the condition holds and `Ok(None)` when
/// it should be polled again. Transient driver errors (element missing, stale
/// or not yet clickable) are treated like `Ok(None)`; any other error ends the
/// wait at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Ceiling for one wait
    pub timeout: Duration,
    /// Pause between checks
    pub poll_interval: Duration,
}

impl WaitPolicy {
    /// Policy with explicit bounds.
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// `wait_timeout_ms` and `poll_interval_ms` from the console config.
    pub const fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(
            Duration::from_millis(config.wait_timeout_ms),
            Duration::from_millis(config.poll_interval_ms),
        )
    }

    /// Poll `check` until it yields a value or the timeout elapses.
    ///
    /// The check always runs at least once.
    pub async fn until<F, Fut, T>(&self, what: &str, mut check: F) -> Result<T, WebDriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, WebDriverError>>,
    {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match check().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) if e.is_transient() => {
                    debug!(what, attempt, error = %e, "condition not met yet");
                }
                Err(e) => return Err(e),
            }

            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                return Err(WebDriverError::Timeout {
                    what: what.to_string(),
                    waited: elapsed,
                });
            }
            sleep(self.poll_interval.min(self.timeout - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> WaitPolicy {
        WaitPolicy::new(Duration::from_millis(200), Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_until_returns_first_value() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let value = policy()
            .until("third poll", || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok((n >= 3).then_some(n))
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transient_errors_are_polled_through() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let value = policy()
            .until("element", || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(WebDriverError::StaleElement("re-rendered".to_string()))
                } else {
                    Ok(Some("found"))
                }
            })
            .await
            .unwrap();
        assert_eq!(value, "found");
    }

    #[tokio::test]
    async fn test_permanent_error_stops_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let err = policy()
            .until::<_, _, ()>("element", || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(WebDriverError::UnexpectedResponse("garbage".to_string()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WebDriverError::UnexpectedResponse(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_times_out() {
        let err = policy()
            .until::<_, _, ()>("checkbox", || async { Ok(None) })
            .await
            .unwrap_err();

        match err {
            WebDriverError::Timeout { what, waited } => {
                assert_eq!(what, "checkbox");
                assert!(waited >= Duration::from_millis(200));
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
    }
}
