//! Resilience primitives used by the HTTP transport
//!
//! Only configuration and delay computation live here. The transport decides
//! *whether* an attempt is retried (status and error inspection) and owns the
//! sleep so that cancellation can interrupt it.

pub mod retry;

pub use retry::{
    BackoffFn, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryConfigError,
    DEFAULT_MAX_RETRIES, DEFAULT_WAIT_MAX, DEFAULT_WAIT_MIN,
};
