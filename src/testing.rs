//! Testing utilities for code that retries with backoff.
//!
//! [`RecordingSleeper`] stands in for a real sleeper: it remembers every
//! requested duration and returns immediately, so tests can assert the exact
//! sleep sequence without waiting.
//!
//! # Examples
//!
//! ```rust
//! use decay::testing::RecordingSleeper;
//! use decay::{assert_time_exceeded, backoff, Attempt, BackoffOptions};
//! use std::time::Duration;
//!
//! let sleeper = RecordingSleeper::new();
//! let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1))
//!     .with_sleeper(sleeper.clone());
//!
//! assert_time_exceeded!(backoff(|| Attempt::Retry("down"), &options));
//! assert_eq!(sleeper.total(), Duration::from_millis(32));
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::sleeper::Sleeper;

/// A sleeper that records calls instead of sleeping.
///
/// Clones share the same record, so a test can keep one handle and move
/// another into the options.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create a sleeper with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order.
    pub fn calls(&self) -> Vec<Duration> {
        self.lock().clone()
    }

    /// Number of sleeps requested so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Sum of all requested durations.
    pub fn total(&self) -> Duration {
        self.lock().iter().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Duration>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.lock().push(duration);
    }
}

/// Assert that a backoff run ended with [`BackoffError::GaveUp`].
///
/// [`BackoffError::GaveUp`]: crate::BackoffError::GaveUp
///
/// # Example
///
/// ```rust
/// use decay::{assert_gave_up, BackoffError};
///
/// let result: Result<(), BackoffError<&str>> = Err(BackoffError::GaveUp(Some("fatal")));
/// assert_gave_up!(result);
/// ```
#[macro_export]
macro_rules! assert_gave_up {
    ($result:expr) => {
        match $result {
            Err($crate::BackoffError::GaveUp(_)) => {}
            other => {
                panic!("Expected GaveUp, got {:?}", other);
            }
        }
    };
}

/// Assert that a backoff run ended with [`BackoffError::MaximumTimeExceeded`].
///
/// [`BackoffError::MaximumTimeExceeded`]: crate::BackoffError::MaximumTimeExceeded
///
/// # Example
///
/// ```rust
/// use decay::{assert_time_exceeded, BackoffError};
///
/// let result: Result<(), BackoffError<&str>> = Err(BackoffError::MaximumTimeExceeded);
/// assert_time_exceeded!(result);
/// ```
#[macro_export]
macro_rules! assert_time_exceeded {
    ($result:expr) => {
        match $result {
            Err($crate::BackoffError::MaximumTimeExceeded) => {}
            other => {
                panic!("Expected MaximumTimeExceeded, got {:?}", other);
            }
        }
    };
}
