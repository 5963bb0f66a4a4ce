//! # Decay
//!
//! > *"Try, wait a little longer, try again"*
//!
//! A small library for retrying operations with exponential backoff.
//!
//! ## Philosophy
//!
//! **Decay** keeps the retry policy pure and the waiting injectable:
//! - The schedule (gap doubling, jitter, the total sleep budget) is plain
//!   data computed by [`Schedule`]
//! - Sleeping goes through the [`Sleeper`] trait, so tests observe exact
//!   sleep durations without real time passing
//! - Whether to keep trying is decided by the attempt itself, never by the
//!   engine inspecting errors
//!
//! ## Quick Example
//!
//! ```rust
//! use decay::testing::RecordingSleeper;
//! use decay::{backoff, BackoffError, BackoffOptions};
//! use std::time::Duration;
//!
//! let sleeper = RecordingSleeper::new();
//! let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1))
//!     .with_sleeper(sleeper.clone());
//!
//! // (keep_trying, error): keep going while the service is unavailable,
//! // stop as soon as it reports something that will not fix itself.
//! let mut responses = vec![(true, Some("503")), (true, Some("503")), (false, Some("401"))].into_iter();
//! let result = backoff(|| responses.next().unwrap_or((true, None)), &options);
//!
//! match result {
//!     Err(BackoffError::GaveUp(Some(status))) => assert_eq!(status, "401"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! assert_eq!(sleeper.calls(), vec![Duration::from_millis(1), Duration::from_millis(2)]);
//! ```
//!
//! ## Features
//!
//! - `async`: [`backoff_until`], a tokio-based variant that can be canceled
//!   while waiting
//! - `tracing`: emit `tracing` events for retries, truncation, budget
//!   exhaustion and cancellation

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod sleeper;
pub mod testing;

// Re-exports
pub use backoff::{
    backoff, Attempt, BackoffError, BackoffOptions, OptionsError, Schedule, MAX_JITTER_SIZE,
};
#[cfg(feature = "async")]
pub use backoff::backoff_until;
pub use sleeper::{Sleeper, ThreadSleeper};

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "async")]
    pub use crate::backoff::backoff_until;
    pub use crate::backoff::{backoff, Attempt, BackoffError, BackoffOptions, Schedule};
    pub use crate::sleeper::{Sleeper, ThreadSleeper};
}
