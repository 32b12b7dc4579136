//! Client construction and the initial bootstrap handshake

use std::sync::Arc;
use std::time::Duration;

use lakekeeper_common::resilience::{RetryConfig, RetryConfigBuilder};
use lakekeeper_domain::BootstrapOptions;
use reqwest::header::HeaderValue;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

use crate::auth::AuthSource;
use crate::errors::ClientError;
use crate::http::{
    management_base_url, AttemptOutcome, CheckRetryFn, ErrorHandlerFn, RequestContext,
    RequestOption, RetryPolicy, Transport, DEFAULT_USER_AGENT,
};
use crate::services::{ProjectService, RoleService, ServerService, UserService, WarehouseService};

/// Typed client for the Lakekeeper management API
///
/// Cloning is cheap; clones share the connection pool and the one-time gates.
#[derive(Debug, Clone)]
pub struct LakekeeperClient {
    transport: Arc<Transport>,
    bootstrap: Arc<OnceCell<()>>,
}

impl LakekeeperClient {
    /// Start building a client for the server at `base_url`
    ///
    /// `/management/v1` is appended unless already present.
    pub fn builder(base_url: impl Into<String>, auth: impl AuthSource + 'static) -> ClientBuilder {
        ClientBuilder::new(base_url, Arc::new(auth))
    }

    /// Management base URL
    pub fn base_url(&self) -> Url {
        self.transport.base_url()
    }

    /// Raw transport, for endpoints without a typed wrapper
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn server(&self) -> ServerService<'_> {
        ServerService::new(&self.transport)
    }

    pub fn project(&self) -> ProjectService<'_> {
        ProjectService::new(&self.transport)
    }

    pub fn user(&self) -> UserService<'_> {
        UserService::new(&self.transport)
    }

    pub fn role(&self) -> RoleService<'_> {
        RoleService::new(&self.transport)
    }

    pub fn warehouse(&self) -> WarehouseService<'_> {
        WarehouseService::new(&self.transport)
    }

    /// Bootstrap the catalog unless it already is, at most once per client
    async fn bootstrap_once(&self) -> Result<(), ClientError> {
        let mut failure = None;
        let slot = &mut failure;
        self.bootstrap
            .get_or_init(|| async move {
                if let Err(err) = self.bootstrap_if_needed().await {
                    *slot = Some(err);
                }
            })
            .await;
        failure.map_or(Ok(()), Err)
    }

    async fn bootstrap_if_needed(&self) -> Result<(), ClientError> {
        let (info, _) = self.server().info(&[]).await?;
        if info.bootstrapped {
            debug!(server_id = %info.server_id, "server already bootstrapped");
            return Ok(());
        }
        self.server().bootstrap(&BootstrapOptions::operator_application(), &[]).await?;
        info!(server_id = %info.server_id, "bootstrapped server");
        Ok(())
    }
}

/// Builder for [`LakekeeperClient`]
pub struct ClientBuilder {
    base_url: String,
    auth: Arc<dyn AuthSource>,
    user_agent: String,
    http: Option<reqwest::Client>,
    timeout: Option<Duration>,
    request_options: Vec<RequestOption>,
    retry_enabled: bool,
    check_retry: Option<Arc<CheckRetryFn>>,
    retry: RetryConfigBuilder,
    error_handler: Option<Arc<ErrorHandlerFn>>,
    initial_bootstrap: bool,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>, auth: Arc<dyn AuthSource>) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http: None,
            timeout: None,
            request_options: Vec::new(),
            retry_enabled: true,
            check_retry: None,
            retry: RetryConfig::builder(),
            error_handler: None,
            initial_bootstrap: false,
        }
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Use a preconfigured HTTP client; `timeout` is then ignored
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Overall timeout of a single HTTP attempt
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Options applied to every request before the per-call ones
    pub fn request_options(mut self, options: impl IntoIterator<Item = RequestOption>) -> Self {
        self.request_options.extend(options);
        self
    }

    pub fn without_retries(mut self) -> Self {
        self.retry_enabled = false;
        self
    }

    /// Replace the retry check
    pub fn custom_retry<F>(mut self, check: F) -> Self
    where
        F: Fn(&RequestContext, AttemptOutcome<'_>) -> bool + Send + Sync + 'static,
    {
        self.check_retry = Some(Arc::new(check));
        self
    }

    /// Replace the backoff: `(wait_min, wait_max, attempt) -> delay`
    pub fn custom_backoff<F>(mut self, backoff: F) -> Self
    where
        F: Fn(Duration, Duration, u32) -> Duration + Send + Sync + 'static,
    {
        self.retry = self.retry.custom_backoff(backoff);
        self
    }

    pub fn retry_max(mut self, max_retries: u32) -> Self {
        self.retry = self.retry.max_retries(max_retries);
        self
    }

    pub fn retry_wait(mut self, wait_min: Duration, wait_max: Duration) -> Self {
        self.retry = self.retry.wait_bounds(wait_min, wait_max);
        self
    }

    /// Transform the final error once retries are exhausted
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ClientError, u32) -> ClientError + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Bootstrap the server during [`build`](Self::build) if needed
    pub fn initial_bootstrap(mut self) -> Self {
        self.initial_bootstrap = true;
        self
    }

    /// Build the client, running the bootstrap handshake when enabled
    pub async fn build(self) -> Result<LakekeeperClient, ClientError> {
        let base_url = management_base_url(&self.base_url)?;
        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ClientError::Config(format!("invalid user agent {:?}", self.user_agent)))?;
        let retry_config = self.retry.build().map_err(|e| ClientError::Config(e.to_string()))?;

        let http = match self.http {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(ClientError::Transport)?
            }
        };

        let mut retry = RetryPolicy { enabled: self.retry_enabled, config: retry_config, ..RetryPolicy::default() };
        if let Some(check) = self.check_retry {
            retry.check = check;
        }

        let transport = Transport {
            http,
            base_url,
            user_agent,
            auth: self.auth,
            auth_init: Arc::new(OnceCell::new()),
            default_options: self.request_options,
            retry,
            error_handler: self.error_handler,
        };
        let client = LakekeeperClient { transport: Arc::new(transport), bootstrap: Arc::new(OnceCell::new()) };

        if self.initial_bootstrap {
            client.bootstrap_once().await?;
        }
        Ok(client)
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("retry_enabled", &self.retry_enabled)
            .field("retry", &self.retry)
            .field("initial_bootstrap", &self.initial_bootstrap)
            .finish_non_exhaustive()
    }
}
