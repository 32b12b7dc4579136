//! OAuth 2.0 token sources
//!
//! [`OAuthTokenAuth`] adapts any [`TokenSource`] to an [`AuthSource`],
//! sending `Authorization: <TokenType> <AccessToken>`.
//! [`ClientCredentialsTokenSource`] implements the client-credentials grant
//! against a token endpoint and caches the token until shortly before expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::{authorization_value, AuthSource};
use crate::errors::ClientError;

/// Tokens are refreshed this long before they expire
const EXPIRY_LEEWAY: Duration = Duration::from_secs(30);

/// An access token with its type and expiry
#[derive(Clone)]
pub struct Token {
    pub access_token: String,
    /// As reported by the token endpoint; may be empty
    pub token_type: String,
    pub expires_at: Option<Instant>,
}

impl Token {
    /// Whether the token is still usable, with a safety margin
    pub fn is_fresh(&self) -> bool {
        self.expires_at
            .map_or(true, |expires_at| Instant::now() + EXPIRY_LEEWAY < expires_at)
    }

    /// Authorization scheme with the casing servers expect
    pub fn scheme(&self) -> &str {
        if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer") {
            "Bearer"
        } else if self.token_type.eq_ignore_ascii_case("mac") {
            "MAC"
        } else if self.token_type.eq_ignore_ascii_case("basic") {
            "Basic"
        } else {
            &self.token_type
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Trait for anything that can hand out OAuth tokens
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<Token, ClientError>;
}

/// [`AuthSource`] backed by a [`TokenSource`]
#[derive(Clone)]
pub struct OAuthTokenAuth {
    source: Arc<dyn TokenSource>,
}

impl OAuthTokenAuth {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self { source: Arc::new(source) }
    }
}

#[async_trait]
impl AuthSource for OAuthTokenAuth {
    async fn header(&self) -> Result<Option<(HeaderName, HeaderValue)>, ClientError> {
        let token = self.source.token().await?;
        let value = authorization_value(token.scheme(), &token.access_token)?;
        Ok(Some((AUTHORIZATION, value)))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Client-credentials grant (`grant_type=client_credentials`)
pub struct ClientCredentialsTokenSource {
    client_id: String,
    client_secret: String,
    token_url: String,
    scopes: Vec<String>,
    http: reqwest::Client,
    cached: Mutex<Option<Token>>,
}

impl ClientCredentialsTokenSource {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            scopes: Vec::new(),
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Use a specific HTTP client for the token endpoint
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    async fn fetch(&self) -> Result<Token, ClientError> {
        let mut params = vec![
            ("grant_type", "client_credentials".to_string()),
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
        ];
        if !self.scopes.is_empty() {
            params.push(("scope", self.scopes.join(" ")));
        }

        debug!(token_url = %self.token_url, "requesting client-credentials token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Auth(format!(
                "token endpoint returned {status}: {}",
                body.trim()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("invalid token response: {e}")))?;

        Ok(Token {
            access_token: body.access_token,
            token_type: body.token_type,
            expires_at: body.expires_in.map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}

impl std::fmt::Debug for ClientCredentialsTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentialsTokenSource")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsTokenSource {
    async fn token(&self) -> Result<Token, ClientError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.clone());
        }
        let token = self.fetch().await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    struct StaticSource(&'static str);

    #[async_trait]
    impl TokenSource for StaticSource {
        async fn token(&self) -> Result<Token, ClientError> {
            Ok(Token { access_token: "abc".into(), token_type: self.0.into(), expires_at: None })
        }
    }

    #[tokio::test]
    async fn test_token_type_is_normalised() {
        for (raw, expected) in [("", "Bearer abc"), ("bearer", "Bearer abc"), ("mac", "MAC abc")] {
            let (_, value) = OAuthTokenAuth::new(StaticSource(raw)).header().await.unwrap().unwrap();
            assert_eq!(value.to_str().unwrap(), expected);
        }
    }

    #[test]
    fn test_freshness_uses_leeway() {
        let mut token =
            Token { access_token: "t".into(), token_type: String::new(), expires_at: None };
        assert!(token.is_fresh());
        token.expires_at = Some(Instant::now() + Duration::from_secs(5));
        assert!(!token.is_fresh());
        token.expires_at = Some(Instant::now() + Duration::from_secs(3600));
        assert!(token.is_fresh());
    }

    #[tokio::test]
    async fn test_client_credentials_are_cached() {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=lakekeeper"))
            .respond_with(move |_req: &wiremock::Request| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "issued",
                    "token_type": "bearer",
                    "expires_in": 3600
                }))
            })
            .mount(&server)
            .await;

        let source = ClientCredentialsTokenSource::new(
            "client",
            "secret",
            format!("{}/oauth/token", server.uri()),
        )
        .with_scopes(["lakekeeper"]);

        let first = source.token().await.unwrap();
        let second = source.token().await.unwrap();
        assert_eq!(first.access_token, "issued");
        assert_eq!(second.access_token, "issued");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_endpoint_failure_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let source = ClientCredentialsTokenSource::new("client", "wrong", server.uri());
        let err = source.token().await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(ref msg) if msg.contains("invalid_client")));
    }
}
