//! Engine tests driven by a recording sleeper.

use super::*;
use crate::testing::RecordingSleeper;
use std::cell::Cell;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Oops;

impl std::fmt::Display for Oops {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("oops")
    }
}

impl std::error::Error for Oops {}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn options(sleeper: &RecordingSleeper) -> BackoffOptions<RecordingSleeper> {
    BackoffOptions::new(ms(32), ms(1)).with_sleeper(sleeper.clone())
}

/// Replays a fixed list of outcomes, one per attempt.
fn schedule_of(outcomes: Vec<(bool, Option<Oops>)>) -> impl FnMut() -> (bool, Option<Oops>) {
    let mut outcomes = outcomes.into_iter();
    move || outcomes.next().expect("attempt called more often than scheduled")
}

#[test]
fn test_first_success_never_sleeps() {
    let sleeper = RecordingSleeper::new();

    let result = backoff(|| (true, None::<Oops>), &options(&sleeper));

    assert_eq!(result, Ok(()));
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_later_success() {
    let sleeper = RecordingSleeper::new();
    let attempt = schedule_of(vec![
        (true, Some(Oops)),
        (true, Some(Oops)),
        (true, Some(Oops)),
        (true, None),
    ]);

    let result = backoff(attempt, &options(&sleeper));

    assert_eq!(result, Ok(()));
    assert_eq!(sleeper.calls(), vec![ms(1), ms(2), ms(4)]);
}

#[test]
fn test_give_up_partway() {
    let sleeper = RecordingSleeper::new();
    let attempt = schedule_of(vec![
        (true, Some(Oops)),
        (true, Some(Oops)),
        (true, Some(Oops)),
        (true, Some(Oops)),
        (false, Some(Oops)),
    ]);

    let result = backoff(attempt, &options(&sleeper));

    assert_eq!(sleeper.calls(), vec![ms(1), ms(2), ms(4), ms(8)]);
    let err = result.unwrap_err();
    assert!(err.is_gave_up());
    assert!(err.to_string().contains("instructed to stop retrying"));
    assert_eq!(err.into_inner(), Some(Oops));
}

#[test]
fn test_give_up_without_error_is_not_success() {
    let sleeper = RecordingSleeper::new();

    let result = backoff(|| (false, None::<Oops>), &options(&sleeper));

    assert_eq!(result, Err(BackoffError::GaveUp(None)));
    assert_eq!(sleeper.count(), 0);
}

#[test]
fn test_all_fail_truncates_then_exceeds_budget() {
    let sleeper = RecordingSleeper::new();
    let attempts = Cell::new(0u32);

    let result = backoff(
        || {
            attempts.set(attempts.get() + 1);
            (true, Some(Oops))
        },
        &options(&sleeper),
    );

    assert_eq!(result, Err(BackoffError::MaximumTimeExceeded));
    // The sixth gap would be 32ms, which reaches the ceiling and restarts at 1ms.
    assert_eq!(
        sleeper.calls(),
        vec![ms(1), ms(2), ms(4), ms(8), ms(16), ms(1)]
    );
    assert_eq!(attempts.get(), 7);
    assert_eq!(sleeper.total(), ms(32));
}

#[test]
fn test_time_exceeded_does_not_wrap_attempt_error() {
    let sleeper = RecordingSleeper::new();

    let err = backoff(|| Attempt::Retry(Oops), &options(&sleeper)).unwrap_err();

    assert_eq!(err, BackoffError::MaximumTimeExceeded);
    assert!(err.inner().is_none());
    assert_eq!(err.to_string(), TIME_EXCEEDED_MESSAGE);
}

#[test]
fn test_result_attempts_are_always_retried() {
    let sleeper = RecordingSleeper::new();
    let mut calls = 0;

    let result = backoff(
        || {
            calls += 1;
            if calls < 3 {
                Err(Oops)
            } else {
                Ok(())
            }
        },
        &options(&sleeper),
    );

    assert_eq!(result, Ok(()));
    assert_eq!(sleeper.calls(), vec![ms(1), ms(2)]);
}

#[test]
fn test_same_seed_reproduces_sleeps() {
    let run = |seed: u64| {
        let sleeper = RecordingSleeper::new();
        let options = BackoffOptions::new(ms(400), ms(1))
            .with_max_jitter_size(ms(20))
            .with_random_seed(seed)
            .with_sleeper(sleeper.clone());
        let result = backoff(|| Attempt::Retry(Oops), &options);
        assert_eq!(result, Err(BackoffError::MaximumTimeExceeded));
        sleeper.calls()
    };

    let first = run(7);
    assert!(first.len() > 1);
    assert_eq!(first, run(7));
}

#[test]
fn test_engine_follows_schedule() {
    let sleeper = RecordingSleeper::new();
    let options = BackoffOptions::new(ms(300), ms(2))
        .with_max_jitter_size(ms(5))
        .with_random_seed(42)
        .with_sleeper(sleeper.clone());

    let _ = backoff(|| Attempt::Retry(Oops), &options);

    let expected: Vec<Duration> = Schedule::new(&options).collect();
    assert_eq!(sleeper.calls(), expected);
}

#[test]
fn test_jittered_sleeps_stay_under_ceiling() {
    let sleeper = RecordingSleeper::new();
    let options = BackoffOptions::new(ms(100), ms(10))
        .with_max_jitter_size(MAX_JITTER_SIZE)
        .with_random_seed(3)
        .with_sleeper(sleeper.clone());

    let _ = backoff(|| Attempt::Retry(Oops), &options);

    assert!(sleeper.calls().iter().all(|d| *d <= ms(100)));
    assert!(sleeper.total() <= ms(100));
}

#[test]
fn test_jittered_run_spends_whole_budget() {
    let sleeper = RecordingSleeper::new();
    let options = BackoffOptions::new(ms(32), ms(1))
        .with_max_jitter_size(ms(5))
        .with_random_seed(666)
        .with_sleeper(sleeper.clone());

    let result = backoff(|| Attempt::Retry(Oops), &options);

    assert_eq!(result, Err(BackoffError::MaximumTimeExceeded));
    assert_eq!(sleeper.total(), ms(32));
    let calls = sleeper.calls();
    let last = calls.last().copied().unwrap_or_default();
    let before_last: Duration = calls[..calls.len() - 1].iter().sum();
    assert_eq!(last, ms(32) - before_last);
}

#[test]
fn test_last_sleep_cut_to_remaining_budget() {
    let sleeper = RecordingSleeper::new();
    let options = BackoffOptions::new(ms(20), ms(1)).with_sleeper(sleeper.clone());

    let result = backoff(|| Attempt::Retry(Oops), &options);

    assert_eq!(result, Err(BackoffError::MaximumTimeExceeded));
    // The 16ms gap only has 5ms of budget left.
    assert_eq!(sleeper.calls(), vec![ms(1), ms(2), ms(4), ms(8), ms(5)]);
}

#[test]
#[should_panic(expected = "invalid backoff options")]
fn test_bad_max_sleep_time_panics() {
    let options = BackoffOptions::new(Duration::ZERO, ms(1));
    let _ = backoff(|| (true, None::<Oops>), &options);
}

#[test]
#[should_panic(expected = "invalid backoff options")]
fn test_bad_initial_gap_size_panics() {
    let options = BackoffOptions::new(Duration::from_secs(1), Duration::ZERO);
    let _ = backoff(|| (true, None::<Oops>), &options);
}

#[test]
#[should_panic(expected = "invalid backoff options")]
fn test_large_jitter_panics() {
    let options = BackoffOptions::new(Duration::from_secs(1), ms(1)).with_max_jitter_size(ms(501));
    let _ = backoff(|| (true, None::<Oops>), &options);
}

#[test]
fn test_invalid_options_panic_before_first_attempt() {
    let called = Cell::new(false);
    let options = BackoffOptions::new(Duration::ZERO, ms(1));

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        backoff(
            || {
                called.set(true);
                (true, None::<Oops>)
            },
            &options,
        )
    }));

    assert!(outcome.is_err());
    assert!(!called.get());
}

#[cfg(feature = "tracing")]
mod tracing_tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_logs_budget_exhaustion() {
        let sleeper = RecordingSleeper::new();
        let _ = backoff(|| Attempt::Retry(Oops), &options(&sleeper));
        assert!(logs_contain("attempt failed, backing off"));
        assert!(logs_contain("backoff sleep budget exhausted"));
        assert!(logs_contain("restarting from initial gap"));
    }

    #[traced_test]
    #[test]
    fn test_logs_shortened_sleep() {
        let sleeper = RecordingSleeper::new();
        let options = BackoffOptions::new(ms(20), ms(1)).with_sleeper(sleeper.clone());
        let _ = backoff(|| Attempt::Retry(Oops), &options);
        assert!(logs_contain("backoff sleep shortened to remaining budget"));
    }

    #[traced_test]
    #[test]
    fn test_logs_give_up() {
        let sleeper = RecordingSleeper::new();
        let _ = backoff(|| Attempt::Stop(Some(Oops)), &options(&sleeper));
        assert!(logs_contain("attempt asked to stop retrying"));
    }
}
