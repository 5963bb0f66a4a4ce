//! The sleep schedule of a single backoff run.
//!
//! This is the pure half of the engine: it decides how long to sleep next
//! and when the budget is spent, but never sleeps itself.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::options::BackoffOptions;

/// Run state for one backoff loop.
///
/// Each call to [`Schedule::next_sleep`] yields the next sleep duration:
///
/// 1. the current gap plus a jitter drawn uniformly from `[0, max_jitter_size]`;
/// 2. if that reaches `max_sleep_time`, the sleep becomes `initial_gap_size`
///    and the gap progression starts over (a sawtooth, not a plateau);
/// 3. if the sleep would push the total slept past `max_sleep_time`, it is
///    shortened to whatever budget is left;
/// 4. the gap doubles for the next call.
///
/// Once the whole budget has been handed out the schedule is exhausted and
/// yields `None` from then on, so a complete run always sleeps exactly
/// `max_sleep_time` in total.
///
/// Jitter comes from a [`StdRng`] seeded once per schedule. A fixed seed
/// reproduces the same sequence within one build, but `StdRng` may change
/// its algorithm between `rand` releases, so stored sequences are not
/// guaranteed to survive a dependency upgrade.
///
/// `Schedule` is also an [`Iterator`], which makes the whole sequence easy
/// to inspect:
///
/// ```rust
/// use decay::{BackoffOptions, Schedule};
/// use std::time::Duration;
///
/// let options = BackoffOptions::new(Duration::from_millis(32), Duration::from_millis(1));
/// let sleeps: Vec<u128> = Schedule::new(&options).map(|d| d.as_millis()).collect();
///
/// assert_eq!(sleeps, vec![1, 2, 4, 8, 16, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Schedule {
    initial_gap_size: Duration,
    max_sleep_time: Duration,
    max_jitter_size: Duration,
    current_gap: Duration,
    elapsed_sleep: Duration,
    exhausted: bool,
    rng: StdRng,
}

impl Schedule {
    /// Start a schedule for the given options.
    ///
    /// # Panics
    ///
    /// Panics if the options are invalid (see [`BackoffOptions::validate`]).
    pub fn new<S>(options: &BackoffOptions<S>) -> Self {
        options.assert_valid();
        let seed = options.random_seed().unwrap_or_else(clock_seed);
        Self {
            initial_gap_size: options.initial_gap_size(),
            max_sleep_time: options.max_sleep_time(),
            max_jitter_size: options.max_jitter_size(),
            current_gap: options.initial_gap_size(),
            elapsed_sleep: Duration::ZERO,
            exhausted: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Compute the next sleep, or `None` once the sleep budget is spent.
    ///
    /// The returned duration is counted as slept.
    ///
    /// ```rust
    /// use decay::{BackoffOptions, Schedule};
    /// use std::time::Duration;
    ///
    /// let options = BackoffOptions::new(Duration::from_millis(20), Duration::from_millis(1));
    /// let sleeps: Vec<u128> = Schedule::new(&options).map(|d| d.as_millis()).collect();
    ///
    /// // 1 + 2 + 4 + 8 = 15ms, so the 16ms gap is cut to the 5ms left.
    /// assert_eq!(sleeps, vec![1, 2, 4, 8, 5]);
    /// ```
    pub fn next_sleep(&mut self) -> Option<Duration> {
        if self.exhausted || self.elapsed_sleep >= self.max_sleep_time {
            self.exhausted = true;
            return None;
        }

        let jitter = self.jitter();
        let mut sleep = self.current_gap.saturating_add(jitter);
        if sleep >= self.max_sleep_time {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                gap = ?self.current_gap,
                ?jitter,
                initial = ?self.initial_gap_size,
                "backoff gap reached ceiling, restarting from initial gap"
            );
            sleep = self.initial_gap_size;
            self.current_gap = self.initial_gap_size;
        }

        let remaining = self.max_sleep_time - self.elapsed_sleep;
        if sleep > remaining {
            #[cfg(feature = "tracing")]
            tracing::trace!(?sleep, ?remaining, "backoff sleep shortened to remaining budget");
            sleep = remaining;
        }

        self.elapsed_sleep += sleep;
        self.current_gap = self.current_gap.saturating_mul(2);
        Some(sleep)
    }

    /// Total time handed out so far.
    pub fn elapsed_sleep(&self) -> Duration {
        self.elapsed_sleep
    }

    /// The pre-jitter gap the next call starts from.
    pub fn current_gap(&self) -> Duration {
        self.current_gap
    }

    /// Returns true once the budget has run out.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn jitter(&mut self) -> Duration {
        if self.max_jitter_size.is_zero() {
            return Duration::ZERO;
        }
        // Bounded by MAX_JITTER_SIZE, so the nanosecond count fits in u64.
        let bound = self.max_jitter_size.as_nanos() as u64;
        Duration::from_nanos(self.rng.random_range(0..=bound))
    }
}

impl Iterator for Schedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.next_sleep()
    }
}

impl std::iter::FusedIterator for Schedule {}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
