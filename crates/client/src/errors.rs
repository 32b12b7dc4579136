//! Client error taxonomy
//!
//! Every operation returns [`ClientError`]. Non-success HTTP statuses become
//! [`ApiError`], which keeps what the server said (`type`, `message`, `code`)
//! together with the response metadata.

use std::fmt;
use std::time::Duration;

use lakekeeper_common::error::{ErrorClassification, ErrorSeverity};
use lakekeeper_common::validation::ValidationError;
use lakekeeper_domain::constants::CATALOG_ALREADY_BOOTSTRAPPED;
use lakekeeper_domain::ModelError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Metadata of an HTTP response, handed back next to every result
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
}

impl Response {
    pub(crate) fn from_reqwest(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            url: response.url().clone(),
            headers: response.headers().clone(),
        }
    }
}

/// Error reported by the server for a non-success status
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Server supplied code; usually equal to the HTTP status
    pub code: u16,
    /// Machine readable error type, e.g. `CatalogAlreadyBootstrapped`
    pub error_type: String,
    pub message: String,
    pub stack: Vec<String>,
    pub response: Response,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    error_type: String,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    stack: Vec<String>,
}

impl ApiError {
    /// Build from a response body
    ///
    /// Accepts `{"error": {...}}` and a flat `{message, type, code}` object.
    /// Anything else keeps the raw text as the message.
    pub fn from_body(response: Response, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .or_else(|_| serde_json::from_slice::<ErrorBody>(body))
            .ok()
            .filter(|body| !body.message.is_empty() || !body.error_type.is_empty());

        let status = response.status.as_u16();
        match parsed {
            Some(body) => Self {
                code: body.code.unwrap_or(status),
                error_type: body.error_type,
                message: body.message,
                stack: body.stack,
                response,
            },
            None => Self {
                code: status,
                error_type: String::new(),
                message: String::from_utf8_lossy(body).trim().to_string(),
                stack: Vec::new(),
                response,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    pub fn is_already_bootstrapped(&self) -> bool {
        self.error_type == CATALOG_ALREADY_BOOTSTRAPPED
    }

    /// `Retry-After` in seconds, when the server sent one
    pub fn retry_after(&self) -> Option<Duration> {
        self.response
            .headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} returned {}", self.response.url, self.response.status)?;
        if !self.error_type.is_empty() {
            write!(f, " ({})", self.error_type)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Categories of client errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 401/403 or a failed token exchange
    Authentication,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Other 4xx
    Client,
    /// Connection failures and deadlines
    Network,
    Cancelled,
    /// Payloads that do not match the wire model
    Protocol,
    /// Caller mistakes caught before anything was sent
    Usage,
}

/// Errors returned by the Lakekeeper client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    Timeout,

    #[error("API error: {0}")]
    Api(Box<ApiError>),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid usage: {0}")]
    Usage(String),

    #[error(transparent)]
    Validation(ValidationError),

    #[error("Model error: {0}")]
    Model(ModelError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ModelError> for ClientError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(errors) => Self::Validation(errors),
            other => Self::Model(other),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        Self::Api(Box::new(err))
    }
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Api(api) => match api.status() {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorCategory::Authentication,
                StatusCode::NOT_FOUND => ErrorCategory::NotFound,
                StatusCode::CONFLICT => ErrorCategory::Conflict,
                StatusCode::TOO_MANY_REQUESTS => ErrorCategory::RateLimit,
                status if status.is_server_error() => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::Transport(_) | Self::Timeout | Self::Io(_) => ErrorCategory::Network,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Decode(_) | Self::Model(_) => ErrorCategory::Protocol,
            Self::Usage(_) | Self::Validation(_) | Self::Config(_) => ErrorCategory::Usage,
            Self::Auth(_) => ErrorCategory::Authentication,
        }
    }

    /// The server error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    /// HTTP 404
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// HTTP 409
    pub fn is_conflict(&self) -> bool {
        self.category() == ErrorCategory::Conflict
    }
}

/// Free-function form of [`ClientError::is_not_found`]
pub fn is_not_found(err: &ClientError) -> bool {
    err.is_not_found()
}

/// Free-function form of [`ClientError::is_conflict`]
pub fn is_conflict(err: &ClientError) -> bool {
    err.is_conflict()
}

impl ErrorClassification for ClientError {
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit | ErrorCategory::Server | ErrorCategory::Network
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NotFound | ErrorCategory::Conflict | ErrorCategory::Cancelled => {
                ErrorSeverity::Info
            }
            ErrorCategory::RateLimit | ErrorCategory::Network => ErrorSeverity::Warning,
            ErrorCategory::Protocol => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        self.category() == ErrorCategory::Protocol
    }

    fn retry_after(&self) -> Option<Duration> {
        self.api_error().and_then(ApiError::retry_after)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn response(status: u16) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            url: Url::parse("http://lakekeeper:8181/management/v1/warehouse").unwrap(),
            headers: HeaderMap::new(),
        }
    }

    #[test]
    fn test_parses_wrapped_error() {
        let body = br#"{"error":{"message":"Warehouse is protected","type":"WarehouseProtected","code":409,"stack":["a"]}}"#;
        let err = ApiError::from_body(response(409), body);
        assert_eq!(err.code, 409);
        assert_eq!(err.error_type, "WarehouseProtected");
        assert_eq!(err.message, "Warehouse is protected");
        assert_eq!(err.stack, vec!["a".to_string()]);
    }

    #[test]
    fn test_parses_flat_error() {
        let body = br#"{"message":"already done","type":"CatalogAlreadyBootstrapped","code":400}"#;
        let err = ApiError::from_body(response(400), body);
        assert!(err.is_already_bootstrapped());
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_unparseable_body_keeps_text() {
        let err = ApiError::from_body(response(502), b"Bad Gateway\n");
        assert_eq!(err.code, 502);
        assert_eq!(err.message, "Bad Gateway");
        assert!(err.error_type.is_empty());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_predicates() {
        let not_found = ClientError::from(ApiError::from_body(response(404), b""));
        let conflict = ClientError::from(ApiError::from_body(response(409), b""));
        assert!(is_not_found(&not_found));
        assert!(!is_conflict(&not_found));
        assert!(is_conflict(&conflict));
        assert!(!ClientError::Usage("x".into()).is_not_found());
    }

    #[test]
    fn test_classification() {
        let throttled = ClientError::from(ApiError::from_body(response(429), b""));
        assert!(throttled.is_retryable());
        assert_eq!(throttled.severity(), ErrorSeverity::Warning);

        let server = ClientError::from(ApiError::from_body(response(503), b""));
        assert_eq!(server.category(), ErrorCategory::Server);
        assert!(server.is_retryable());

        let bad_request = ClientError::from(ApiError::from_body(response(400), b""));
        assert!(!bad_request.is_retryable());

        let decode = ClientError::Decode("eof".into());
        assert!(decode.is_critical());
        assert!(!ClientError::Cancelled.is_retryable());
    }

    #[test]
    fn test_retry_after_header() {
        let mut meta = response(429);
        meta.headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let err = ClientError::from(ApiError::from_body(meta, b""));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_model_validation_is_lifted() {
        let err = ClientError::from(ModelError::Validation(ValidationError::field("bucket", "short")));
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.category(), ErrorCategory::Usage);
    }
}
