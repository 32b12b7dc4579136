use lakekeeper_domain::{ListUsersOptions, ListUsersResponse, ProvisionUserOptions, UpdateUserOptions, User};
use reqwest::Method;
use tracing::instrument;

use super::{segment, PageGuard};
use crate::errors::{ClientError, Response};
use crate::http::{RequestOption, Transport, NO_PAYLOAD};

/// Users known to the catalog
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    transport: &'a Transport,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    #[instrument(skip(self, options))]
    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<(User, Response), ClientError> {
        let path = format!("user/{}", segment(id));
        self.transport.request(Method::GET, &path, NO_PAYLOAD, options).await
    }

    /// The user behind the client's credentials
    #[instrument(skip(self, options))]
    pub async fn whoami(&self, options: &[RequestOption]) -> Result<(User, Response), ClientError> {
        self.transport.request(Method::GET, "whoami", NO_PAYLOAD, options).await
    }

    /// Register a user; with empty options the caller registers itself
    #[instrument(skip(self, options))]
    pub async fn provision(
        &self,
        opts: &ProvisionUserOptions,
        options: &[RequestOption],
    ) -> Result<(User, Response), ClientError> {
        self.transport.request(Method::POST, "user", Some(opts), options).await
    }

    #[instrument(skip(self, options))]
    pub async fn update(
        &self,
        id: &str,
        opts: &UpdateUserOptions,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        if id.is_empty() {
            return Err(ClientError::Usage("user id must not be empty".into()));
        }
        let path = format!("user/{}", segment(id));
        self.transport.request_discard(Method::PUT, &path, Some(opts), options).await
    }

    /// All users matching the filter, following `next-page-token`
    ///
    /// The response of the last page is returned.
    #[instrument(skip(self, options))]
    pub async fn list(
        &self,
        opts: &ListUsersOptions,
        options: &[RequestOption],
    ) -> Result<(Vec<User>, Response), ClientError> {
        let mut query = opts.clone();
        let mut guard = PageGuard::new(query.page_token.clone());
        let mut users = Vec::new();
        loop {
            let (page, response): (ListUsersResponse, _) =
                self.transport.request(Method::GET, "user", Some(&query), options).await?;
            users.extend(page.users);
            match guard.advance(page.next_page_token)? {
                Some(next) => query.page_token = Some(next),
                None => return Ok((users, response)),
            }
        }
    }

    #[instrument(skip(self, options))]
    pub async fn delete(&self, id: &str, options: &[RequestOption]) -> Result<Response, ClientError> {
        let path = format!("user/{}", segment(id));
        self.transport.request_discard(Method::DELETE, &path, NO_PAYLOAD, options).await
    }
}
