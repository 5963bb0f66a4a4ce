//! Backoff configuration.

use std::time::Duration;

use super::error::OptionsError;
use crate::sleeper::{Sleeper, ThreadSleeper};

/// Upper bound on [`BackoffOptions::max_jitter_size`].
///
/// Jitter is meant to desynchronize retriers, not to dominate the schedule.
pub const MAX_JITTER_SIZE: Duration = Duration::from_millis(500);

/// Configuration for a single backoff run.
///
/// Options are pure data: building them performs no validation and no I/O.
/// They are checked once when a run starts, and an invalid configuration
/// panics there, before the first attempt.
///
/// # Invariants
///
/// - `max_sleep_time > 0`
/// - `initial_gap_size > 0`
/// - `max_jitter_size <= MAX_JITTER_SIZE`
///
/// # Examples
///
/// ```rust
/// use decay::BackoffOptions;
/// use std::time::Duration;
///
/// let options = BackoffOptions::new(Duration::from_secs(30), Duration::from_millis(100))
///     .with_max_jitter_size(Duration::from_millis(50))
///     .with_random_seed(42);
///
/// assert!(options.validate().is_ok());
/// assert_eq!(options.max_sleep_time(), Duration::from_secs(30));
/// assert_eq!(options.random_seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffOptions<S = ThreadSleeper> {
    max_sleep_time: Duration,
    initial_gap_size: Duration,
    max_jitter_size: Duration,
    random_seed: Option<u64>,
    sleeper: S,
}

impl BackoffOptions<ThreadSleeper> {
    /// Create options with the two required durations.
    ///
    /// `max_sleep_time` caps both a single sleep and the total time slept
    /// across the run. `initial_gap_size` is the first sleep and the value
    /// the schedule restarts from when growth would reach the cap.
    pub fn new(max_sleep_time: Duration, initial_gap_size: Duration) -> Self {
        Self {
            max_sleep_time,
            initial_gap_size,
            max_jitter_size: Duration::ZERO,
            random_seed: None,
            sleeper: ThreadSleeper,
        }
    }
}

impl<S> BackoffOptions<S> {
    /// Set the upper bound of the random jitter added to every sleep.
    ///
    /// Defaults to zero (no jitter).
    pub fn with_max_jitter_size(mut self, jitter: Duration) -> Self {
        self.max_jitter_size = jitter;
        self
    }

    /// Fix the jitter seed so the sleep sequence is reproducible.
    ///
    /// Without a seed, each run derives one from the wall clock.
    ///
    /// The sequence is stable for a given build only: the seeded generator is
    /// `rand`'s `StdRng`, whose output may differ across `rand` releases. Do
    /// not persist expected sleep values across dependency upgrades.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Replace the sleeper used between attempts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use decay::testing::RecordingSleeper;
    /// use decay::BackoffOptions;
    /// use std::time::Duration;
    ///
    /// let sleeper = RecordingSleeper::new();
    /// let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1))
    ///     .with_sleeper(sleeper.clone());
    ///
    /// assert!(options.sleeper().calls().is_empty());
    /// ```
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> BackoffOptions<S2> {
        BackoffOptions {
            max_sleep_time: self.max_sleep_time,
            initial_gap_size: self.initial_gap_size,
            max_jitter_size: self.max_jitter_size,
            random_seed: self.random_seed,
            sleeper,
        }
    }

    /// Get the ceiling on a single sleep and on total sleep.
    pub fn max_sleep_time(&self) -> Duration {
        self.max_sleep_time
    }

    /// Get the first sleep duration.
    pub fn initial_gap_size(&self) -> Duration {
        self.initial_gap_size
    }

    /// Get the jitter upper bound.
    pub fn max_jitter_size(&self) -> Duration {
        self.max_jitter_size
    }

    /// Get the configured seed, if any.
    pub fn random_seed(&self) -> Option<u64> {
        self.random_seed
    }

    /// Get the sleeper.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Check the configuration invariants.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use decay::{BackoffOptions, OptionsError};
    /// use std::time::Duration;
    ///
    /// let options = BackoffOptions::new(Duration::ZERO, Duration::from_millis(1));
    /// assert_eq!(options.validate(), Err(OptionsError::ZeroMaxSleepTime));
    /// ```
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_sleep_time.is_zero() {
            return Err(OptionsError::ZeroMaxSleepTime);
        }
        if self.initial_gap_size.is_zero() {
            return Err(OptionsError::ZeroInitialGapSize);
        }
        if self.max_jitter_size > MAX_JITTER_SIZE {
            return Err(OptionsError::JitterTooLarge {
                jitter: self.max_jitter_size,
            });
        }
        Ok(())
    }

    /// Panic unless the configuration is valid.
    ///
    /// A bad configuration is a programming mistake, so runs fail loudly
    /// instead of returning an error the caller might retry on.
    pub(crate) fn assert_valid(&self) {
        if let Err(err) = self.validate() {
            panic!("invalid backoff options: {}", err);
        }
    }
}
