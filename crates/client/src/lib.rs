//! Typed async client for the Lakekeeper management API
//!
//! ```no_run
//! use lakekeeper_client::{AccessTokenAuth, LakekeeperClient};
//!
//! # async fn run() -> Result<(), lakekeeper_client::ClientError> {
//! let client = LakekeeperClient::builder("http://localhost:8181", AccessTokenAuth::new("token"))
//!     .initial_bootstrap()
//!     .build()
//!     .await?;
//! let (warehouses, _) = client.warehouse().list(&Default::default(), &[]).await?;
//! # let _ = warehouses;
//! # Ok(())
//! # }
//! ```
//!
//! The wire model lives in `lakekeeper-domain` and is re-exported as
//! [`model`].

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod services;

pub use lakekeeper_domain as model;

pub use auth::{
    AccessTokenAuth, AuthSource, ClientCredentialsTokenSource, NoAuth, OAuthTokenAuth, Token,
    TokenSource,
};
pub use client::{ClientBuilder, LakekeeperClient};
pub use config::ClientConfig;
pub use errors::{is_conflict, is_not_found, ApiError, ClientError, ErrorCategory, Response};
pub use http::{
    with_cancellation, with_check_retry, with_context, with_header, with_project_id,
    with_query_param, with_timeout, RequestContext, RequestOption,
};
