//! Service surface of the management API
//!
//! Each service borrows the client's [`Transport`](crate::http::Transport)
//! and groups the operations that share a base path. Every operation returns
//! the decoded value together with the response metadata.

pub mod project;
pub mod role;
pub mod server;
pub mod user;
pub mod warehouse;

use std::borrow::Cow;

pub use project::ProjectService;
pub use role::RoleService;
pub use server::ServerService;
pub use user::UserService;
pub use warehouse::WarehouseService;

use crate::errors::ClientError;
use crate::http::{with_project_id, RequestOption};

/// Upper bound on pages fetched by one listing call
pub const MAX_PAGES: usize = 1_000;

/// Percent-encode an id for use as a path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Prepend an `x-project-id` option when a project is selected
///
/// Options passed by the caller come later and therefore win.
pub(crate) fn project_scoped(project_id: Option<&str>, options: &[RequestOption]) -> Vec<RequestOption> {
    let mut all = Vec::with_capacity(options.len() + 1);
    if let Some(project_id) = project_id.filter(|id| !id.is_empty()) {
        all.push(with_project_id(project_id));
    }
    all.extend_from_slice(options);
    all
}

/// Stops token-based pagination that loops or runs away
#[derive(Debug)]
pub(crate) struct PageGuard {
    pages: usize,
    current: Option<String>,
}

impl PageGuard {
    pub(crate) fn new(start: Option<String>) -> Self {
        Self { pages: 0, current: start }
    }

    /// Record a fetched page; returns the token of the next page, if any
    pub(crate) fn advance(&mut self, next: Option<String>) -> Result<Option<String>, ClientError> {
        self.pages += 1;
        let Some(next) = next.filter(|token| !token.is_empty()) else {
            return Ok(None);
        };
        if self.current.as_deref() == Some(next.as_str()) {
            return Err(ClientError::Usage(format!(
                "pagination made no progress: server returned page token {next:?} twice"
            )));
        }
        if self.pages >= MAX_PAGES {
            return Err(ClientError::Usage(format!("pagination exceeded {MAX_PAGES} pages")));
        }
        self.current = Some(next.clone());
        Ok(Some(next))
    }
}
