//! Error types for backoff runs.

use std::time::Duration;

/// Message carried by [`BackoffError::GaveUp`].
pub const GAVE_UP_MESSAGE: &str = "instructed to stop retrying";

/// Message carried by [`BackoffError::MaximumTimeExceeded`].
pub const TIME_EXCEEDED_MESSAGE: &str = "maximum retry time exceeded";

/// Why a backoff run ended without success.
///
/// # Examples
///
/// ```rust
/// use decay::testing::RecordingSleeper;
/// use decay::{backoff, Attempt, BackoffError, BackoffOptions};
/// use std::time::Duration;
///
/// let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1))
///     .with_sleeper(RecordingSleeper::new());
///
/// let result = backoff(|| Attempt::Stop(Some("bad credentials")), &options);
///
/// match result {
///     Err(BackoffError::GaveUp(Some(reason))) => assert_eq!(reason, "bad credentials"),
///     other => panic!("unexpected outcome: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffError<E> {
    /// The attempt asked to stop retrying. Holds the error it returned, if any.
    GaveUp(Option<E>),
    /// Cumulative sleep would have exceeded the configured maximum.
    ///
    /// This is a fixed value: it never carries the last attempt error.
    MaximumTimeExceeded,
    /// The cancellation signal fired while waiting between attempts.
    ///
    /// Only produced by [`backoff_until`](crate::backoff::backoff_until).
    Canceled,
}

impl<E> BackoffError<E> {
    /// Returns true if the attempt asked to stop.
    pub fn is_gave_up(&self) -> bool {
        matches!(self, Self::GaveUp(_))
    }

    /// Returns true if the sleep budget ran out.
    pub fn is_time_exceeded(&self) -> bool {
        matches!(self, Self::MaximumTimeExceeded)
    }

    /// Returns true if the run was canceled.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Extract the attempt error, if this outcome wraps one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::GaveUp(err) => err,
            Self::MaximumTimeExceeded | Self::Canceled => None,
        }
    }

    /// Get a reference to the wrapped attempt error, if any.
    pub fn inner(&self) -> Option<&E> {
        match self {
            Self::GaveUp(err) => err.as_ref(),
            Self::MaximumTimeExceeded | Self::Canceled => None,
        }
    }

    /// Transform the wrapped attempt error.
    pub fn map_inner<F, E2>(self, f: F) -> BackoffError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::GaveUp(err) => BackoffError::GaveUp(err.map(f)),
            Self::MaximumTimeExceeded => BackoffError::MaximumTimeExceeded,
            Self::Canceled => BackoffError::Canceled,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for BackoffError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GaveUp(Some(err)) => write!(f, "{}: {}", GAVE_UP_MESSAGE, err),
            Self::GaveUp(None) => f.write_str(GAVE_UP_MESSAGE),
            Self::MaximumTimeExceeded => f.write_str(TIME_EXCEEDED_MESSAGE),
            Self::Canceled => f.write_str("backoff canceled"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for BackoffError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GaveUp(Some(err)) => Some(err),
            _ => None,
        }
    }
}

/// A configuration fault detected by [`BackoffOptions::validate`].
///
/// [`BackoffOptions::validate`]: crate::BackoffOptions::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsError {
    /// `max_sleep_time` was zero.
    ZeroMaxSleepTime,
    /// `initial_gap_size` was zero.
    ZeroInitialGapSize,
    /// `max_jitter_size` was above [`MAX_JITTER_SIZE`](crate::MAX_JITTER_SIZE).
    JitterTooLarge {
        /// The configured jitter bound.
        jitter: Duration,
    },
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroMaxSleepTime => f.write_str("max_sleep_time must be greater than zero"),
            Self::ZeroInitialGapSize => f.write_str("initial_gap_size must be greater than zero"),
            Self::JitterTooLarge { jitter } => write!(
                f,
                "max_jitter_size {:?} exceeds the {:?} ceiling",
                jitter,
                crate::MAX_JITTER_SIZE
            ),
        }
    }
}

impl std::error::Error for OptionsError {}
