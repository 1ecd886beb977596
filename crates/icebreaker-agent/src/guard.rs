//! Per-call timeout and cooperative cancellation.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{EnrichError, Stage};

/// Bounds every external call made during one enrichment run.
#[derive(Debug, Clone)]
pub struct CallGuard {
    timeout: Duration,
    cancel: CancellationToken,
}

impl CallGuard {
    #[must_use]
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// Runs `call`, failing with [`EnrichError::Cancelled`] if the token fires
    /// first or [`EnrichError::Timeout`] if the call exceeds the bound.
    ///
    /// A token that is already cancelled short-circuits before `call` is polled.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `call`, or one of the two above.
    pub async fn run<T, F>(&self, stage: Stage, call: F) -> Result<T, EnrichError>
    where
        F: Future<Output = Result<T, EnrichError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(EnrichError::Cancelled { stage });
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::info!(%stage, "call cancelled");
                Err(EnrichError::Cancelled { stage })
            }
            outcome = tokio::time::timeout(self.timeout, call) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(%stage, timeout_secs = self.timeout.as_secs(), "call timed out");
                    Err(EnrichError::Timeout { stage, after: self.timeout })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_result() {
        let guard = CallGuard::new(Duration::from_secs(1), CancellationToken::new());
        let value = guard.run(Stage::Search, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let guard = CallGuard::new(Duration::from_secs(2), CancellationToken::new());
        let err = guard
            .run(Stage::ProfileFetch, async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, EnrichError::Timeout { stage: Stage::ProfileFetch, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let guard = CallGuard::new(Duration::from_secs(1), token);
        let err = guard
            .run(Stage::Synthesis, async { Ok::<_, EnrichError>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, EnrichError::Cancelled { stage: Stage::Synthesis }));
    }

    #[tokio::test]
    async fn cancellation_interrupts_in_flight_call() {
        let token = CancellationToken::new();
        let guard = CallGuard::new(Duration::from_secs(60), token.clone());
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        let err = guard
            .run(Stage::Search, async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        canceller.await.unwrap();
        assert!(matches!(err, EnrichError::Cancelled { stage: Stage::Search }));
    }
}
