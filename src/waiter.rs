//! Bounded polling for eventually consistent API operations.
//!
//! Some Silo endpoints acknowledge a change before it becomes visible to
//! readers. [`wait_until`] re-runs a caller-supplied check at a fixed
//! interval until the check reports ready, fails, or the overall timeout
//! elapses. There is no backoff; the bounds are fixed per call site.

use std::{future::Future, time::Duration};

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::error::ProviderError;

/// Outcome of a single poll check.
#[derive(Debug)]
pub enum Poll {
    /// The awaited condition holds.
    Ready,
    /// Not there yet; check again after the interval.
    Pending,
    /// Unrecoverable failure; polling stops and the error propagates as-is.
    Fatal(ProviderError),
}

/// Fixed-interval polling bounds.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl WaitConfig {
    /// Bounds used when waiting for a resource to become visible.
    pub const fn creation() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
        }
    }

    /// Bounds used when waiting for a resource to disappear.
    pub const fn deletion() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            interval: Duration::from_secs(1),
        }
    }
}

/// Poll `check` until it reports ready, fails, or `config.timeout` elapses.
///
/// `resource` and `operation` identify the wait in logs and in the timeout
/// error ("waiting for `<resource>` to be `<operation>`"). A check that
/// keeps reporting [`Poll::Pending`] is re-run once per interval until the
/// next run would land past the deadline.
pub async fn wait_until<F, Fut>(
    config: WaitConfig,
    resource: &str,
    operation: &'static str,
    mut check: F,
) -> Result<(), ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Poll>,
{
    let deadline = Instant::now() + config.timeout;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match check().await {
            Poll::Ready => {
                if attempt > 1 {
                    debug!(resource, operation, attempt, "Condition met after polling");
                }
                return Ok(());
            }
            Poll::Fatal(error) => return Err(error),
            Poll::Pending => {}
        }

        if Instant::now() + config.interval > deadline {
            return Err(ProviderError::Timeout {
                resource: resource.to_string(),
                operation,
                after: config.timeout,
            });
        }

        debug!(resource, operation, attempt, "Condition not met, waiting");
        sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn short_config() -> WaitConfig {
        WaitConfig {
            timeout: Duration::from_millis(100),
            interval: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn test_ready_on_first_check() {
        let attempts = AtomicU32::new(0);

        let result = wait_until(short_config(), "thing (t1)", "created", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Poll::Ready }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pending_then_ready() {
        let attempts = AtomicU32::new(0);

        let result = wait_until(short_config(), "thing (t2)", "created", || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Poll::Pending
                } else {
                    Poll::Ready
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_perpetual_pending_times_out() {
        let attempts = AtomicU32::new(0);

        let result = wait_until(short_config(), "thing (t3)", "created", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Poll::Pending }
        })
        .await;

        match result {
            Err(ProviderError::Timeout {
                resource,
                operation,
                after,
            }) => {
                assert_eq!(resource, "thing (t3)");
                assert_eq!(operation, "created");
                assert_eq!(after, Duration::from_millis(100));
            }
            other => panic!("expected timeout, got {other:?}"),
        }

        // timeout / interval = 5 checks, give or take one for scheduling.
        let count = attempts.load(Ordering::SeqCst);
        assert!((4..=6).contains(&count), "unexpected attempt count {count}");
    }

    #[tokio::test]
    async fn test_fatal_stops_immediately() {
        let attempts = AtomicU32::new(0);

        let result = wait_until(short_config(), "thing (t4)", "deleted", || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async {
                Poll::Fatal(ProviderError::InvalidImportId("boom".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::InvalidImportId(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
