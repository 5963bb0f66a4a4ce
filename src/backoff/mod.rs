//! Retry with exponential backoff, bounded jitter and a total sleep budget.
//!
//! The module follows the "pure core, imperative shell" split:
//!
//! - **Pure Core**: [`BackoffOptions`] is plain data and [`Schedule`] computes
//!   the sleep sequence without touching a clock
//! - **Imperative Shell**: [`backoff`] runs the attempts and hands every
//!   sleep to an injected [`Sleeper`](crate::Sleeper)
//!
//! # Quick Start
//!
//! ```rust
//! use decay::{backoff, Attempt, BackoffOptions};
//! use std::time::Duration;
//!
//! let options = BackoffOptions::new(Duration::from_millis(50), Duration::from_millis(1))
//!     .with_max_jitter_size(Duration::from_millis(1));
//!
//! let mut remaining_failures = 2;
//! let result = backoff(
//!     || {
//!         if remaining_failures > 0 {
//!             remaining_failures -= 1;
//!             Attempt::Retry("connection reset")
//!         } else {
//!             Attempt::Success
//!         }
//!     },
//!     &options,
//! );
//!
//! assert!(result.is_ok());
//! ```
//!
//! # Schedule
//!
//! With `initial_gap_size = 1ms` and `max_sleep_time = 32ms` the sleeps are
//! `1, 2, 4, 8, 16, 1` milliseconds. A gap that would reach the ceiling is
//! truncated back to the initial gap rather than pinned at the ceiling. A
//! sleep that would take the total past the ceiling is shortened to the time
//! left, and the run ends once the whole budget has been slept.
//!
//! # Outcomes
//!
//! - `Ok(())`: an attempt succeeded
//! - [`BackoffError::GaveUp`]: an attempt asked to stop; wraps its error
//! - [`BackoffError::MaximumTimeExceeded`]: the sleep budget is spent
//! - [`BackoffError::Canceled`]: the cancel signal of [`backoff_until`] fired
//!   (requires the `async` feature)

mod attempt;
#[cfg(feature = "async")]
mod cancel;
mod engine;
mod error;
mod options;
mod schedule;

pub use attempt::Attempt;
#[cfg(feature = "async")]
pub use cancel::backoff_until;
pub use engine::backoff;
pub use error::{BackoffError, OptionsError, GAVE_UP_MESSAGE, TIME_EXCEEDED_MESSAGE};
pub use options::{BackoffOptions, MAX_JITTER_SIZE};
pub use schedule::Schedule;

#[cfg(test)]
mod tests;
