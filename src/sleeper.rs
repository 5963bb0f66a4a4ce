//! The blocking sleep capability used by the backoff engine.
//!
//! The engine never talks to a timer directly. It asks a [`Sleeper`] to
//! suspend the current thread, which lets tests substitute a recorder that
//! returns immediately (see [`crate::testing::RecordingSleeper`]).
//!
//! # Examples
//!
//! ```rust
//! use decay::{Sleeper, ThreadSleeper};
//! use std::time::{Duration, Instant};
//!
//! let before = Instant::now();
//! ThreadSleeper.sleep(Duration::from_millis(2));
//! assert!(before.elapsed() >= Duration::from_millis(2));
//! ```

use std::sync::Arc;
use std::time::Duration;

/// Something that can block the calling thread for a duration.
///
/// Implementations must not return before `duration` has passed unless they
/// are test doubles that deliberately skip real time.
pub trait Sleeper {
    /// Block for at least `duration`.
    fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Box<S> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Arc<S> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}
