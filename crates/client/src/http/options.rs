//! Per-request options
//!
//! A [`RequestOption`] mutates the outgoing [`RequestParts`] before the first
//! attempt. The client applies its default options first and then the
//! per-call ones, so later options win.

use std::sync::Arc;
use std::time::Duration;

use lakekeeper_domain::constants::PROJECT_ID_HEADER;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::retry::CheckRetryFn;
use crate::errors::ClientError;

/// Mutator applied to a request before it is sent
pub type RequestOption = Arc<dyn Fn(&mut RequestParts) -> Result<(), ClientError> + Send + Sync>;

/// Cancellation, deadline and retry overrides carried by one call
#[derive(Clone, Default)]
pub struct RequestContext {
    pub cancellation: Option<CancellationToken>,
    pub deadline: Option<Instant>,
    /// Replaces the client's retry check for this call
    pub check_retry: Option<Arc<CheckRetryFn>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// The error a call should end with when the context is done
    pub(crate) fn done_error(&self) -> Option<ClientError> {
        if self.is_cancelled() {
            Some(ClientError::Cancelled)
        } else if self.is_expired() {
            Some(ClientError::Timeout)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("cancellation", &self.cancellation)
            .field("deadline", &self.deadline)
            .field("check_retry", &self.check_retry.is_some())
            .finish()
    }
}

/// The mutable parts of a request that options may touch
#[derive(Debug, Default)]
pub struct RequestParts {
    pub headers: HeaderMap,
    /// Appended after the payload-derived query
    pub query: Vec<(String, String)>,
    pub context: RequestContext,
}

/// Set a header, replacing any earlier value
pub fn with_header(name: &str, value: &str) -> RequestOption {
    let name = name.to_string();
    let value = value.to_string();
    Arc::new(move |parts: &mut RequestParts| {
        let header = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::Usage(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(&value)
            .map_err(|_| ClientError::Usage(format!("invalid value for header {name}")))?;
        parts.headers.insert(header, value);
        Ok(())
    })
}

/// Select the project the call operates on (`x-project-id`)
pub fn with_project_id(project_id: &str) -> RequestOption {
    with_header(PROJECT_ID_HEADER, project_id)
}

pub fn with_query_param(key: &str, value: &str) -> RequestOption {
    let pair = (key.to_string(), value.to_string());
    Arc::new(move |parts: &mut RequestParts| {
        parts.query.push(pair.clone());
        Ok(())
    })
}

/// Swap in a new context
///
/// A retry check installed earlier survives unless `context` brings its own.
pub fn with_context(context: RequestContext) -> RequestOption {
    Arc::new(move |parts: &mut RequestParts| {
        let previous_check = parts.context.check_retry.take();
        parts.context = context.clone();
        if parts.context.check_retry.is_none() {
            parts.context.check_retry = previous_check;
        }
        Ok(())
    })
}

pub fn with_cancellation(token: CancellationToken) -> RequestOption {
    Arc::new(move |parts: &mut RequestParts| {
        parts.context.cancellation = Some(token.clone());
        Ok(())
    })
}

/// Deadline measured from when the option is applied, i.e. call start
pub fn with_timeout(timeout: Duration) -> RequestOption {
    Arc::new(move |parts: &mut RequestParts| {
        parts.context.deadline = Some(Instant::now() + timeout);
        Ok(())
    })
}

/// Override the retry decision for this call only
pub fn with_check_retry<F>(check: F) -> RequestOption
where
    F: Fn(&RequestContext, super::retry::AttemptOutcome<'_>) -> bool + Send + Sync + 'static,
{
    let check: Arc<CheckRetryFn> = Arc::new(check);
    Arc::new(move |parts: &mut RequestParts| {
        parts.context.check_retry = Some(check.clone());
        Ok(())
    })
}

/// Apply options in order, stopping at the first failure
pub(crate) fn apply_all<'a>(
    parts: &mut RequestParts,
    options: impl IntoIterator<Item = &'a RequestOption>,
) -> Result<(), ClientError> {
    options.into_iter().try_for_each(|option| option(parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_header_wins() {
        let mut parts = RequestParts::default();
        apply_all(&mut parts, &[with_project_id("a"), with_project_id("b")]).unwrap();
        assert_eq!(parts.headers.get(PROJECT_ID_HEADER).unwrap(), "b");
    }

    #[test]
    fn test_invalid_header_is_usage_error() {
        let mut parts = RequestParts::default();
        let err = apply_all(&mut parts, &[with_header("bad header", "v")]).unwrap_err();
        assert!(matches!(err, ClientError::Usage(_)));
    }

    #[test]
    fn test_query_params_accumulate() {
        let mut parts = RequestParts::default();
        apply_all(&mut parts, &[with_query_param("a", "1"), with_query_param("a", "2")]).unwrap();
        assert_eq!(parts.query, vec![("a".into(), "1".into()), ("a".into(), "2".into())]);
    }

    #[test]
    fn test_context_swap_keeps_retry_check() {
        let mut parts = RequestParts::default();
        let token = CancellationToken::new();
        apply_all(
            &mut parts,
            &[
                with_check_retry(|_, _| false),
                with_context(RequestContext::new().with_cancellation(token.clone())),
            ],
        )
        .unwrap();
        assert!(parts.context.check_retry.is_some());
        assert!(parts.context.cancellation.is_some());

        token.cancel();
        assert!(matches!(parts.context.done_error(), Some(ClientError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_sets_deadline() {
        let mut parts = RequestParts::default();
        apply_all(&mut parts, &[with_timeout(Duration::from_secs(1))]).unwrap();
        assert!(!parts.context.is_expired());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(matches!(parts.context.done_error(), Some(ClientError::Timeout)));
    }
}
