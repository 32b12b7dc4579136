//! Authentication sources
//!
//! An [`AuthSource`] yields the authorization header attached to every
//! request. `init` runs at most once per client, on the first request; the
//! client owns that latch, so implementations do not need their own.

pub mod oauth;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};

use crate::errors::ClientError;

pub use oauth::{ClientCredentialsTokenSource, OAuthTokenAuth, Token, TokenSource};

/// Trait for providing request authentication
#[async_trait]
pub trait AuthSource: Send + Sync {
    /// One-time setup, with the HTTP client the transport uses
    async fn init(&self, _http: &reqwest::Client) -> Result<(), ClientError> {
        Ok(())
    }

    /// Header to set on the next request; `None` sends no header
    async fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>, ClientError>;
}

/// Static bearer token: `Authorization: Bearer <token>`
#[derive(Clone)]
pub struct AccessTokenAuth {
    token: String,
}

impl AccessTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for AccessTokenAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenAuth").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AuthSource for AccessTokenAuth {
    async fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>, ClientError> {
        let value = authorization_value("Bearer", &self.token)?;
        Ok(Some((AUTHORIZATION, value)))
    }
}

/// No authentication, for servers running with auth disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl AuthSource for NoAuth {
    async fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>, ClientError> {
        Ok(None)
    }
}

pub(crate) fn authorization_value(scheme: &str, token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("{scheme} {token}"))
        .map_err(|_| ClientError::Auth("token contains characters not allowed in a header".into()))?;
    value.set_sensitive(true);
    Ok(value)
}
