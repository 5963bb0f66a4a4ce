//! The blocking backoff loop.

use super::attempt::Attempt;
use super::error::BackoffError;
use super::options::BackoffOptions;
use super::schedule::Schedule;
use crate::sleeper::Sleeper;

/// Call `attempt` until it succeeds, asks to stop, or the sleep budget runs out.
///
/// Between failed attempts the calling thread sleeps through
/// `options.sleeper()` for the next duration of a fresh [`Schedule`].
///
/// # Outcomes
///
/// - `Ok(())` once an attempt reports [`Attempt::Success`].
/// - [`BackoffError::GaveUp`] as soon as an attempt reports [`Attempt::Stop`],
///   wrapping the error it carried.
/// - [`BackoffError::MaximumTimeExceeded`] when an attempt fails after the
///   whole `max_sleep_time` budget has been slept. The last sleep is cut short
///   to fit the budget exactly. The last attempt error is dropped.
///
/// The engine never looks at attempt errors. Whether to continue is decided
/// only by the variant the attempt returns.
///
/// # Panics
///
/// Panics before the first attempt if `options` is invalid
/// (see [`BackoffOptions::validate`]).
///
/// # Examples
///
/// ```rust
/// use decay::testing::RecordingSleeper;
/// use decay::{backoff, BackoffOptions};
/// use std::time::Duration;
///
/// let sleeper = RecordingSleeper::new();
/// let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1))
///     .with_sleeper(sleeper.clone());
///
/// let mut calls = 0;
/// let result = backoff(
///     || {
///         calls += 1;
///         if calls < 4 {
///             (true, Some("not ready"))
///         } else {
///             (true, None)
///         }
///     },
///     &options,
/// );
///
/// assert_eq!(result, Ok(()));
/// assert_eq!(
///     sleeper.calls(),
///     vec![
///         Duration::from_millis(1),
///         Duration::from_millis(2),
///         Duration::from_millis(4),
///     ]
/// );
/// ```
pub fn backoff<E, A, F, S>(
    mut attempt: F,
    options: &BackoffOptions<S>,
) -> Result<(), BackoffError<E>>
where
    F: FnMut() -> A,
    A: Into<Attempt<E>>,
    S: Sleeper,
{
    let mut schedule = Schedule::new(options);
    #[cfg(feature = "tracing")]
    let mut attempts: u32 = 0;

    loop {
        #[cfg(feature = "tracing")]
        {
            attempts += 1;
        }

        let outcome: Attempt<E> = attempt().into();
        match outcome {
            Attempt::Success => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempts,
                    elapsed = ?schedule.elapsed_sleep(),
                    "backoff succeeded"
                );
                return Ok(());
            }
            Attempt::Stop(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempts, "attempt asked to stop retrying");
                return Err(BackoffError::GaveUp(err));
            }
            Attempt::Retry(_) => {}
        }

        let Some(sleep) = schedule.next_sleep() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                attempts,
                elapsed = ?schedule.elapsed_sleep(),
                max = ?options.max_sleep_time(),
                "backoff sleep budget exhausted"
            );
            return Err(BackoffError::MaximumTimeExceeded);
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempts,
            ?sleep,
            elapsed = ?schedule.elapsed_sleep(),
            "attempt failed, backing off"
        );

        options.sleeper().sleep(sleep);
    }
}
