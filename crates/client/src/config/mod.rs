//! Client configuration
//!
//! [`ClientConfig`] describes a client in data (TOML, JSON or environment
//! variables, see [`loader`]) and turns into a [`ClientBuilder`].

pub mod loader;

use std::time::Duration;

use lakekeeper_common::validation::{UrlValidator, Validator};
use serde::{Deserialize, Serialize};

use crate::auth::{AccessTokenAuth, ClientCredentialsTokenSource, NoAuth, OAuthTokenAuth};
use crate::client::{ClientBuilder, LakekeeperClient};
use crate::errors::ClientError;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

/// OAuth2 client-credentials settings
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_retries: u32,
    pub wait_min_ms: u64,
    pub wait_max_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { enabled: true, max_retries: 5, wait_min_ms: 100, wait_max_ms: 400 }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server URL, with or without `/management/v1`
    pub base_url: String,
    /// Static bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Takes precedence over `token`
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub initial_bootstrap: bool,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            oauth: None,
            user_agent: None,
            initial_bootstrap: false,
            retry: RetrySettings::default(),
            timeout_secs: None,
        }
    }

    /// Check the URLs and the retry window
    ///
    /// # Errors
    /// Returns `ClientError::Config` listing every invalid field.
    pub fn validate(&self) -> Result<(), ClientError> {
        let mut validator = Validator::new();
        validator.validate_field("base_url", &self.base_url, &UrlValidator::new());
        if let Some(oauth) = &self.oauth {
            validator.validate_nested("oauth", |v| {
                v.validate_not_empty("client_id", &oauth.client_id);
                v.validate_field("token_url", &oauth.token_url, &UrlValidator::new());
            });
        }
        validator.ensure(
            self.retry.wait_min_ms <= self.retry.wait_max_ms,
            "retry.wait_min_ms",
            "must not exceed retry.wait_max_ms",
        );
        validator.finalize().map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Builder with every configured option applied
    pub fn into_builder(self) -> ClientBuilder {
        let mut builder = match (self.oauth, self.token) {
            (Some(oauth), _) => {
                let source =
                    ClientCredentialsTokenSource::new(oauth.client_id, oauth.client_secret, oauth.token_url)
                        .with_scopes(oauth.scopes);
                LakekeeperClient::builder(self.base_url, OAuthTokenAuth::new(source))
            }
            (None, Some(token)) => LakekeeperClient::builder(self.base_url, AccessTokenAuth::new(token)),
            (None, None) => LakekeeperClient::builder(self.base_url, NoAuth),
        };

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if self.initial_bootstrap {
            builder = builder.initial_bootstrap();
        }
        builder = builder.retry_max(self.retry.max_retries).retry_wait(
            Duration::from_millis(self.retry.wait_min_ms),
            Duration::from_millis(self.retry.wait_max_ms),
        );
        if !self.retry.enabled {
            builder = builder.without_retries();
        }
        builder
    }

    /// Shorthand for `into_builder().build()`
    pub async fn connect(self) -> Result<LakekeeperClient, ClientError> {
        self.into_builder().build().await
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("oauth", &self.oauth)
            .field("user_agent", &self.user_agent)
            .field("initial_bootstrap", &self.initial_bootstrap)
            .field("retry", &self.retry)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml() {
        let config: ClientConfig = toml::from_str(r#"base_url = "http://localhost:8181""#).unwrap();
        assert_eq!(config, ClientConfig::new("http://localhost:8181"));
        assert!(config.retry.enabled);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ClientConfig::new("http://localhost:8181");
        config.token = Some("hunter2".into());
        config.oauth = Some(OAuthConfig {
            client_id: "id".into(),
            client_secret: "s3cret".into(),
            token_url: "http://idp/token".into(),
            scopes: vec![],
        });
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_validate_reports_bad_urls() {
        let mut config = ClientConfig::new("lakekeeper:8181");
        config.oauth = Some(OAuthConfig {
            client_id: "id".into(),
            client_secret: "secret".into(),
            token_url: "ftp://idp/token".into(),
            scopes: vec![],
        });
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("base_url"), "{message}");
        assert!(message.contains("oauth.token_url"), "{message}");

        assert!(ClientConfig::new("http://localhost:8181").validate().is_ok());
    }

    #[tokio::test]
    async fn test_into_builder_applies_settings() {
        let mut config = ClientConfig::new("http://localhost:8181");
        config.retry.enabled = false;
        config.user_agent = Some("lake-tool/1.0".into());
        let client = config.connect().await.unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8181/management/v1");
    }
}
