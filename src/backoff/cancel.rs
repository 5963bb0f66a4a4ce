//! Cancellation-aware backoff on the tokio timer.

use std::future::Future;

use futures::future::{select, Either};

use super::attempt::Attempt;
use super::error::BackoffError;
use super::options::BackoffOptions;
use super::schedule::Schedule;

/// Async counterpart of [`backoff`](fn@crate::backoff) that can be canceled.
///
/// The sleep sequence is the same as the blocking loop for the same
/// options and seed. Each sleep runs on the tokio timer and is raced
/// against `cancel`; if `cancel` completes first the run ends with
/// [`BackoffError::Canceled`]. Cancellation is only observed while
/// waiting, never in the middle of an attempt.
///
/// The configured [`Sleeper`](crate::Sleeper) is not used.
///
/// # Panics
///
/// Panics before the first attempt if `options` is invalid.
///
/// # Examples
///
/// ```rust
/// use decay::{backoff_until, Attempt, BackoffError, BackoffOptions};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let options = BackoffOptions::new(Duration::from_secs(60), Duration::from_millis(1));
/// let (tx, rx) = tokio::sync::oneshot::channel::<()>();
/// tx.send(()).unwrap();
///
/// let result = backoff_until(
///     || async { Attempt::Retry("still down") },
///     &options,
///     async move {
///         let _ = rx.await;
///     },
/// )
/// .await;
///
/// assert_eq!(result, Err(BackoffError::Canceled));
/// # });
/// ```
pub async fn backoff_until<E, A, F, Fut, S, C>(
    mut attempt: F,
    options: &BackoffOptions<S>,
    cancel: C,
) -> Result<(), BackoffError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = A>,
    A: Into<Attempt<E>>,
    C: Future,
{
    let mut schedule = Schedule::new(options);
    let mut cancel = std::pin::pin!(cancel);

    loop {
        let outcome: Attempt<E> = attempt().await.into();
        match outcome {
            Attempt::Success => return Ok(()),
            Attempt::Stop(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("attempt asked to stop retrying");
                return Err(BackoffError::GaveUp(err));
            }
            Attempt::Retry(_) => {}
        }

        let Some(sleep) = schedule.next_sleep() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                elapsed = ?schedule.elapsed_sleep(),
                max = ?options.max_sleep_time(),
                "backoff sleep budget exhausted"
            );
            return Err(BackoffError::MaximumTimeExceeded);
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(?sleep, elapsed = ?schedule.elapsed_sleep(), "attempt failed, backing off");

        let timer = std::pin::pin!(tokio::time::sleep(sleep));
        if let Either::Left(_) = select(cancel.as_mut(), timer).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(elapsed = ?schedule.elapsed_sleep(), "backoff canceled");
            return Err(BackoffError::Canceled);
        }
    }
}
