use std::future::Future;
use std::time::Duration;

/// Why a retried operation finally gave up
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("{0}")]
    Failed(E),
}

/// Run `op` up to `retries + 1` times, bounding each attempt by `timeout`.
///
/// Backoff starts at 200ms and doubles between attempts. The last error is
/// returned when every attempt fails.
pub async fn with_retry<T, E, F, Fut>(
    label: &str,
    retries: u32,
    timeout: Duration,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0u32;
    let mut backoff = Duration::from_millis(200);

    loop {
        let error = match tokio::time::timeout(timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => RetryError::Failed(e),
            Err(_) => RetryError::TimedOut(timeout),
        };

        if attempt >= retries {
            return Err(error);
        }

        attempt += 1;
        tracing::debug!(
            "{} failed (attempt {}/{}): {}; retrying in {:?}",
            label,
            attempt,
            retries + 1,
            error,
            backoff
        );
        tokio::time::sleep(backoff).await;
        backoff *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, RetryError<String>> =
            with_retry("flaky", 3, Duration::from_secs(1), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(format!("attempt {} failed", n))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_bound() {
        let calls = AtomicU32::new(0);
        let result: Result<(), RetryError<&str>> =
            with_retry("broken", 2, Duration::from_secs(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("nope") }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Failed("nope"))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_times_out_slow_attempts() {
        let result: Result<(), RetryError<&str>> =
            with_retry("slow", 0, Duration::from_millis(50), || async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(RetryError::TimedOut(_))));
    }
}
