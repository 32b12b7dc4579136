//! Integration tests for retry configuration
//!
//! The transport owns the retry loop; these tests drive the configuration the
//! same way (delay per attempt, bounded attempts) with a tokio clock.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lakekeeper_common::resilience::{BackoffStrategy, RetryConfig};

async fn run_with_retries<F>(config: &RetryConfig, mut attempt: F) -> Result<u32, u32>
where
    F: FnMut(u32) -> bool,
{
    for n in 0..config.max_attempts() {
        if attempt(n) {
            return Ok(n + 1);
        }
        if n < config.max_retries {
            tokio::time::sleep(config.delay_for(n)).await;
        }
    }
    Err(config.max_attempts())
}

/// Validates that an operation failing `max_retries` times still succeeds.
#[tokio::test(start_paused = true)]
async fn test_succeeds_when_failures_fit_in_budget() {
    let config = RetryConfig::default();
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);

    let result =
        run_with_retries(&config, move |_| calls_clone.fetch_add(1, Ordering::SeqCst) >= 5).await;

    assert_eq!(result, Ok(6));
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_budget() {
    let config = RetryConfig::builder().max_retries(2).build().expect("valid config");
    let attempts = tokio_test::assert_err!(run_with_retries(&config, |_| false).await);
    assert_eq!(attempts, 3);
}

#[tokio::test(start_paused = true)]
async fn test_custom_backoff_is_consulted_per_attempt() {
    let seen = Arc::new(AtomicU32::new(0));
    let seen_clone = Arc::clone(&seen);
    let config = RetryConfig::builder()
        .max_retries(3)
        .custom_backoff(move |_min, _max, attempt| {
            seen_clone.fetch_max(attempt + 1, Ordering::SeqCst);
            Duration::from_millis(1)
        })
        .build()
        .expect("valid config");

    assert!(matches!(config.backoff, BackoffStrategy::Custom(_)));
    let _ = run_with_retries(&config, |_| false).await;
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}
