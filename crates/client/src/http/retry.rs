//! Retry policy of the transport
//!
//! Delay computation comes from `lakekeeper_common::resilience`; this module
//! decides whether an attempt is retried at all.

use std::sync::Arc;

use lakekeeper_common::resilience::RetryConfig;
use reqwest::StatusCode;

use super::options::RequestContext;

/// What a single attempt produced
#[derive(Debug, Clone, Copy)]
pub enum AttemptOutcome<'a> {
    Response(StatusCode),
    Error(&'a reqwest::Error),
}

/// Retry decision: `true` schedules another attempt
pub type CheckRetryFn = dyn Fn(&RequestContext, AttemptOutcome<'_>) -> bool + Send + Sync;

/// Retry on 429 and 5xx responses, unless the call's context is done
///
/// Transport errors are returned as is.
pub fn default_check_retry(context: &RequestContext, outcome: AttemptOutcome<'_>) -> bool {
    if context.is_cancelled() || context.is_expired() {
        return false;
    }
    match outcome {
        AttemptOutcome::Error(_) => false,
        AttemptOutcome::Response(status) => {
            status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
    }
}

/// Everything the transport needs to run the retry loop
#[derive(Clone)]
pub struct RetryPolicy {
    pub enabled: bool,
    pub config: RetryConfig,
    pub check: Arc<CheckRetryFn>,
}

impl RetryPolicy {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Retries allowed after the first attempt
    pub fn max_retries(&self) -> u32 {
        if self.enabled {
            self.config.max_retries
        } else {
            0
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { enabled: true, config: RetryConfig::default(), check: Arc::new(default_check_retry) }
    }
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("enabled", &self.enabled)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
