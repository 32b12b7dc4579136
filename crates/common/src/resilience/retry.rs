//! Retry configuration and backoff strategies
//!
//! The HTTP transport owns the retry loop; this module only answers two
//! questions for it: how many retries are allowed, and how long to wait
//! before retry number `n`. Delays are bounded by a `[wait_min, wait_max]`
//! window that every strategy receives.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 5;
/// Default lower bound of the wait window
pub const DEFAULT_WAIT_MIN: Duration = Duration::from_millis(100);
/// Default upper bound of the wait window
pub const DEFAULT_WAIT_MAX: Duration = Duration::from_millis(400);

/// Signature of a user supplied backoff: `(wait_min, wait_max, attempt) -> delay`
pub type BackoffFn = dyn Fn(Duration, Duration, u32) -> Duration + Send + Sync;

/// Errors raised while building a [`RetryConfig`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RetryConfigError {
    /// The configured wait window is inverted
    #[error("Invalid retry configuration: wait_min {min:?} exceeds wait_max {max:?}")]
    InvertedWaitWindow { min: Duration, max: Duration },
}

/// Backoff strategy for calculating retry delays
#[derive(Clone)]
pub enum BackoffStrategy {
    /// `(attempt + 1) * uniform(wait_min, wait_max)`; collapses to
    /// `(attempt + 1) * wait_min` when the window is empty
    LinearJitter,
    /// Custom backoff function
    Custom(Arc<BackoffFn>),
}

impl fmt::Debug for BackoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinearJitter => write!(f, "LinearJitter"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl BackoffStrategy {
    /// Calculate the delay before retry `attempt` (0-based)
    pub fn calculate_delay(&self, wait_min: Duration, wait_max: Duration, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::LinearJitter => {
                let multiplier = attempt.saturating_add(1);
                if wait_max <= wait_min {
                    return wait_min.saturating_mul(multiplier);
                }
                let span = (wait_max - wait_min).as_secs_f64();
                let jitter = rand::thread_rng().gen::<f64>() * span;
                (wait_min + Duration::from_secs_f64(jitter)).saturating_mul(multiplier)
            }
            BackoffStrategy::Custom(f) => f(wait_min, wait_max, attempt),
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Lower bound handed to the backoff strategy
    pub wait_min: Duration,
    /// Upper bound handed to the backoff strategy
    pub wait_max: Duration,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            wait_min: DEFAULT_WAIT_MIN,
            wait_max: DEFAULT_WAIT_MAX,
            backoff: BackoffStrategy::LinearJitter,
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Total number of attempts (initial try + retries)
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.calculate_delay(self.wait_min, self.wait_max, attempt)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if self.wait_min > self.wait_max {
            return Err(RetryConfigError::InvertedWaitWindow {
                min: self.wait_min,
                max: self.wait_max,
            });
        }
        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn wait_bounds(mut self, wait_min: Duration, wait_max: Duration) -> Self {
        self.config.wait_min = wait_min;
        self.config.wait_max = wait_max;
        self
    }

    pub fn custom_backoff<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration, Duration, u32) -> Duration + Send + Sync + 'static,
    {
        self.config.backoff = BackoffStrategy::Custom(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
