//! Error classification shared by the Lakekeeper client crates
//!
//! Every error type that crosses a crate boundary implements
//! [`ErrorClassification`], so callers can make retry and reporting decisions
//! without matching on concrete variants or string-matching messages.
//!
//! ```rust,ignore
//! use lakekeeper_common::error::{ErrorClassification, ErrorSeverity};
//!
//! fn should_page_operator<E: ErrorClassification>(err: &E) -> bool {
//!     err.is_critical() || err.severity() >= ErrorSeverity::Error
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Classification interface implemented by the client error types.
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient: throttling (`429`), server-side
    /// failures (`5xx`), dropped connections and timeouts.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    ///
    /// Critical errors indicate a broken contract between client and server
    /// (undecodable payloads, unknown discriminators) rather than a bad call.
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    ///
    /// Returns `Some(Duration)` when the server told us how long to wait
    /// (e.g. a `Retry-After` header), `None` otherwise.
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected conditions, e.g. a resource that does not exist
    Info,
    /// Degraded but recoverable, e.g. throttling
    Warning,
    /// Failure requiring attention
    Error,
    /// Contract violation between client and server
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum ProbeError {
        Throttled,
        Broken,
    }

    impl ErrorClassification for ProbeError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Throttled)
        }

        fn severity(&self) -> ErrorSeverity {
            match self {
                Self::Throttled => ErrorSeverity::Warning,
                Self::Broken => ErrorSeverity::Critical,
            }
        }

        fn is_critical(&self) -> bool {
            matches!(self, Self::Broken)
        }

        fn retry_after(&self) -> Option<Duration> {
            match self {
                Self::Throttled => Some(Duration::from_secs(1)),
                Self::Broken => None,
            }
        }
    }

    #[test]
    fn severity_is_ordered() {
        assert!(ErrorSeverity::Info < ErrorSeverity::Warning);
        assert!(ErrorSeverity::Warning < ErrorSeverity::Error);
        assert!(ErrorSeverity::Error < ErrorSeverity::Critical);
    }

    #[test]
    fn severity_display_uses_log_level_names() {
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
        assert_eq!(ErrorSeverity::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn classification_is_usable_through_generics() {
        fn worth_retrying<E: ErrorClassification>(err: &E) -> Option<Duration> {
            err.is_retryable().then(|| err.retry_after().unwrap_or_default())
        }

        assert_eq!(worth_retrying(&ProbeError::Throttled), Some(Duration::from_secs(1)));
        assert_eq!(worth_retrying(&ProbeError::Broken), None);
        assert!(ProbeError::Broken.is_critical());
        assert_eq!(ProbeError::Broken.severity(), ErrorSeverity::Critical);
    }
}
