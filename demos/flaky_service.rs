//! Flaky Service Example
//!
//! Retries a simulated dependency with exponential backoff and jitter,
//! logging every decision through `tracing`.
//!
//! Run with: cargo run --example flaky_service --features tracing

use std::time::Duration;

use decay::{backoff, Attempt, BackoffError, BackoffOptions};

#[derive(Debug)]
enum FetchError {
    Unavailable,
    NotFound,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Unavailable => f.write_str("service unavailable"),
            FetchError::NotFound => f.write_str("resource not found"),
        }
    }
}

// ==================== Recovering Dependency ====================

fn example_recovers() {
    println!("\n=== Example 1: Dependency recovers ===");

    let options = BackoffOptions::new(Duration::from_secs(2), Duration::from_millis(20))
        .with_max_jitter_size(Duration::from_millis(10));

    let mut calls = 0;
    let result = backoff(
        || {
            calls += 1;
            println!("  Attempt {}", calls);
            if calls < 4 {
                Attempt::Retry(FetchError::Unavailable)
            } else {
                Attempt::Success
            }
        },
        &options,
    );

    println!("  Result: {:?}", result);
}

// ==================== Permanent Failure ====================

fn example_gives_up() {
    println!("\n=== Example 2: Permanent failure stops immediately ===");

    let options = BackoffOptions::new(Duration::from_secs(2), Duration::from_millis(20));

    let mut calls = 0;
    let result = backoff(
        || {
            calls += 1;
            if calls < 2 {
                Attempt::Retry(FetchError::Unavailable)
            } else {
                Attempt::Stop(Some(FetchError::NotFound))
            }
        },
        &options,
    );

    match result {
        Err(err @ BackoffError::GaveUp(_)) => println!("  {}", err),
        other => println!("  Unexpected: {:?}", other),
    }
}

// ==================== Budget Exhausted ====================

fn example_budget() {
    println!("\n=== Example 3: Sleep budget runs out ===");

    let options = BackoffOptions::new(Duration::from_millis(200), Duration::from_millis(10))
        .with_random_seed(7);

    let result = backoff(|| Attempt::Retry(FetchError::Unavailable), &options);

    if let Err(err) = result {
        println!("  {} (time exceeded: {})", err, err.is_time_exceeded());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("Decay - Flaky Service Example");
    println!("=============================");

    example_recovers();
    example_gives_up();
    example_budget();

    println!("\n=== All examples completed! ===");
}
