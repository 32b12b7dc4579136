use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use lakekeeper_common::validation::{FieldValidator, UrlValidator};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use url::Url;

use super::options::{apply_all, RequestContext, RequestOption, RequestParts};
use super::query::encode_query;
use super::retry::{AttemptOutcome, RetryPolicy};
use crate::auth::AuthSource;
use crate::errors::{ApiError, ClientError, Response};

/// Path every management endpoint lives under
pub const API_VERSION_PATH: &str = "/management/v1";

/// Default `User-Agent`
pub const DEFAULT_USER_AGENT: &str = "go-lakekeeper";

const JSON: &str = "application/json";

/// Placeholder payload for calls without one
pub const NO_PAYLOAD: Option<&()> = None;

/// Called with the final error and the number of attempts once retries run out
pub type ErrorHandlerFn = dyn Fn(ClientError, u32) -> ClientError + Send + Sync;

/// Append the management API path to a server URL
///
/// Trailing slashes are stripped and the suffix is added only once, so the
/// function is idempotent.
pub fn management_base_url(base: &str) -> Result<Url, ClientError> {
    FieldValidator::<str>::validate(&UrlValidator::new(), base)
        .map_err(|e| ClientError::Config(format!("invalid base URL {base:?}: {e}")))?;
    let trimmed = base.trim_end_matches('/');
    let full = if trimmed.ends_with(API_VERSION_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_VERSION_PATH}")
    };
    Url::parse(&full).map_err(|e| ClientError::Config(format!("invalid base URL {base:?}: {e}")))
}

/// Whether a status counts as success
pub fn is_success(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201 | 202 | 204 | 304)
}

/// Authenticated JSON transport with retries
///
/// Shared by every service of a client. Cheap to reference, not to clone:
/// the client keeps it behind an `Arc`.
pub struct Transport {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) user_agent: HeaderValue,
    pub(crate) auth: Arc<dyn AuthSource>,
    pub(crate) auth_init: Arc<OnceCell<()>>,
    pub(crate) default_options: Vec<RequestOption>,
    pub(crate) retry: RetryPolicy,
    pub(crate) error_handler: Option<Arc<ErrorHandlerFn>>,
}

impl Transport {
    /// Management base URL, e.g. `http://localhost:8181/management/v1`
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Send a request and decode the JSON response into `T`
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<_>` work for
    /// endpoints answering `204` or `304`. Any other target type fails with
    /// [`ClientError::Decode`] naming the status; use
    /// [`request_discard`](Self::request_discard) when the body is not needed.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        options: &[RequestOption],
    ) -> Result<(T, Response), ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (live, meta, context) = self.execute(method, path, payload, options).await?;
        let body = guarded(&context, live.bytes()).await?.map_err(ClientError::Transport)?;
        Ok((decode_body(meta.status, &body)?, meta))
    }

    /// Send a request and drop the response body
    pub async fn request_discard<B>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let (live, meta, context) = self.execute(method, path, payload, options).await?;
        drain(live, &context).await;
        Ok(meta)
    }

    /// Send a request and stream the response body into `writer`
    pub async fn send_to_writer<B, W>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        writer: &mut W,
        options: &[RequestOption],
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let (mut live, meta, context) = self.execute(method, path, payload, options).await?;
        guarded(&context, async {
            while let Some(chunk) = live.chunk().await.map_err(ClientError::Transport)? {
                writer.write_all(&chunk).await?;
            }
            writer.flush().await?;
            Ok::<_, ClientError>(())
        })
        .await??;
        Ok(meta)
    }

    /// Run the retry loop until a success status, a final error, or exhaustion
    ///
    /// The returned response still holds its body.
    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
        options: &[RequestOption],
    ) -> Result<(reqwest::Response, Response, RequestContext), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut parts = RequestParts::default();
        apply_all(&mut parts, self.default_options.iter().chain(options))?;
        let context = parts.context.clone();
        if let Some(err) = context.done_error() {
            return Err(err);
        }

        self.ensure_auth_init(&context).await?;

        let carries_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
        let mut query = Vec::new();
        let mut body = None;
        if let Some(payload) = payload {
            if carries_body {
                body = Some(
                    serde_json::to_vec(payload)
                        .map_err(|e| ClientError::Usage(format!("cannot encode request body: {e}")))?,
                );
            } else {
                query = encode_query(payload)?;
            }
        }
        query.extend(parts.query.iter().cloned());

        let url = self.endpoint(path, &query)?;
        let display_path = urlencoding::decode(path).map(Cow::into_owned).unwrap_or_else(|_| path.to_string());
        let check = context.check_retry.clone().unwrap_or_else(|| self.retry.check.clone());
        let max_retries = self.retry.max_retries();

        let mut attempt: u32 = 0;
        loop {
            let headers = self.attempt_headers(&parts.headers, &context).await?;
            let mut builder = self.http.request(method.clone(), url.clone()).headers(headers);
            if let Some(body) = &body {
                builder = builder.header(CONTENT_TYPE, JSON).body(body.clone());
            }
            let request = builder.build().map_err(ClientError::Transport)?;

            debug!(attempt = attempt + 1, %method, path = %display_path, "sending request");
            let outcome = guarded(&context, self.http.execute(request)).await?;

            let retry_wanted = match &outcome {
                Ok(response) => {
                    debug!(attempt = attempt + 1, %method, path = %display_path, status = %response.status(), "received response");
                    check(&context, AttemptOutcome::Response(response.status()))
                }
                Err(err) => {
                    debug!(attempt = attempt + 1, %method, path = %display_path, error = %err, "request failed");
                    check(&context, AttemptOutcome::Error(err))
                }
            };

            if retry_wanted && attempt < max_retries {
                let delay = self.retry.config.delay_for(attempt);
                warn!(attempt = attempt + 1, %method, path = %display_path, ?delay, "scheduling retry");
                if let Ok(response) = outcome {
                    drain(response, &context).await;
                }
                guarded(&context, tokio::time::sleep(delay)).await?;
                attempt += 1;
                continue;
            }

            let err = match outcome {
                Err(err) => ClientError::Transport(err),
                Ok(response) => {
                    let meta = Response::from_reqwest(&response);
                    if is_success(meta.status) {
                        return Ok((response, meta, context));
                    }
                    let body = guarded(&context, response.bytes()).await?.unwrap_or_default();
                    ClientError::from(ApiError::from_body(meta, &body))
                }
            };

            return Err(match &self.error_handler {
                Some(handler) if retry_wanted && self.retry.enabled => handler(err, attempt + 1),
                _ => err,
            });
        }
    }

    /// Run `AuthSource::init` once per transport
    ///
    /// The gate runs in its own task, so it completes even when the caller
    /// that started it is cancelled or times out. Only the caller whose task
    /// ran `init` sees its error.
    async fn ensure_auth_init(&self, context: &RequestContext) -> Result<(), ClientError> {
        if self.auth_init.initialized() {
            return Ok(());
        }

        let gate = Arc::clone(&self.auth_init);
        let auth = Arc::clone(&self.auth);
        let http = self.http.clone();
        let task = tokio::spawn(async move {
            let mut failure = None;
            let slot = &mut failure;
            gate.get_or_init(|| async move {
                if let Err(err) = auth.init(&http).await {
                    warn!(error = %err, "auth provider init failed");
                    *slot = Some(err);
                }
            })
            .await;
            failure
        });

        match guarded(context, task).await? {
            Ok(None) => Ok(()),
            Ok(Some(err)) => Err(err),
            Err(join) => Err(ClientError::Auth(format!("auth init task failed: {join}"))),
        }
    }

    async fn attempt_headers(
        &self,
        caller: &HeaderMap,
        context: &RequestContext,
    ) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(USER_AGENT, self.user_agent.clone());
        for (name, value) in caller {
            headers.insert(name.clone(), value.clone());
        }
        if let Some((name, value)) = guarded(context, self.auth.header()).await?? {
            if !caller.contains_key(&name) {
                headers.insert(name, value);
            }
        }
        Ok(headers)
    }

    fn endpoint(&self, path: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&raw).map_err(|e| ClientError::Usage(format!("invalid request path {path:?}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Run `fut` unless the context is cancelled or its deadline passes first
async fn guarded<F: Future>(context: &RequestContext, fut: F) -> Result<F::Output, ClientError> {
    let cancelled = async {
        match &context.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    };
    let expired = async {
        match context.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        biased;
        _ = cancelled => Err(ClientError::Cancelled),
        _ = expired => Err(ClientError::Timeout),
        output = fut => Ok(output),
    }
}

async fn drain(response: reqwest::Response, context: &RequestContext) {
    let _ = guarded(context, response.bytes()).await;
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, ClientError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null)
            .map_err(|e| ClientError::Decode(format!("{status} response has no body: {e}")));
    }
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}
