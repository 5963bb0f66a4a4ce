//! Cancel On Shutdown Example
//!
//! Keeps retrying an unreachable dependency until a shutdown signal arrives,
//! then stops waiting immediately.
//!
//! Run with: cargo run --example cancel_on_shutdown --features async

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use decay::{backoff_until, Attempt, BackoffError, BackoffOptions};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() {
    println!("Decay - Cancel On Shutdown Example");
    println!("==================================");

    let options = BackoffOptions::new(Duration::from_secs(30), Duration::from_millis(50))
        .with_max_jitter_size(Duration::from_millis(25));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        println!("  Shutdown requested");
        let _ = shutdown_tx.send(());
    });

    let attempts = Arc::new(AtomicU32::new(0));
    let result = backoff_until(
        || {
            let attempts = attempts.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                println!("  Attempt {}", n);
                Attempt::Retry("connection refused")
            }
        },
        &options,
        async move {
            let _ = shutdown_rx.await;
        },
    )
    .await;

    match result {
        Err(BackoffError::Canceled) => println!(
            "  Canceled after {} attempts",
            attempts.load(Ordering::SeqCst)
        ),
        other => println!("  Unexpected: {:?}", other),
    }
}
