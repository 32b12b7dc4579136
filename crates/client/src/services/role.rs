use lakekeeper_domain::{CreateRoleOptions, ListRolesOptions, ListRolesResponse, Role, UpdateRoleOptions};
use reqwest::Method;
use tracing::instrument;

use super::{project_scoped, segment, PageGuard};
use crate::errors::{ClientError, Response};
use crate::http::{RequestOption, Transport, NO_PAYLOAD};

/// Roles of a project
#[derive(Debug, Clone, Copy)]
pub struct RoleService<'a> {
    transport: &'a Transport,
}

impl<'a> RoleService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    #[instrument(skip(self, options))]
    pub async fn get(
        &self,
        id: &str,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<(Role, Response), ClientError> {
        let path = format!("role/{}", segment(id));
        let options = project_scoped(project_id, options);
        self.transport.request(Method::GET, &path, NO_PAYLOAD, &options).await
    }

    /// All roles matching the filter, following `next-page-token`
    #[instrument(skip(self, options))]
    pub async fn list(
        &self,
        opts: &ListRolesOptions,
        options: &[RequestOption],
    ) -> Result<(Vec<Role>, Response), ClientError> {
        let options = project_scoped(opts.project_id.as_deref(), options);
        let mut query = opts.clone();
        let mut guard = PageGuard::new(query.page_token.clone());
        let mut roles = Vec::new();
        loop {
            let (page, response): (ListRolesResponse, _) =
                self.transport.request(Method::GET, "role", Some(&query), &options).await?;
            roles.extend(page.roles);
            match guard.advance(page.next_page_token)? {
                Some(next) => query.page_token = Some(next),
                None => return Ok((roles, response)),
            }
        }
    }

    #[instrument(skip(self, options))]
    pub async fn create(
        &self,
        opts: &CreateRoleOptions,
        options: &[RequestOption],
    ) -> Result<(Role, Response), ClientError> {
        if opts.name.is_empty() {
            return Err(ClientError::Usage("role name must not be empty".into()));
        }
        let options = project_scoped(opts.project_id.as_deref(), options);
        self.transport.request(Method::POST, "role", Some(opts), &options).await
    }

    #[instrument(skip(self, options))]
    pub async fn update(
        &self,
        id: &str,
        opts: &UpdateRoleOptions,
        options: &[RequestOption],
    ) -> Result<(Role, Response), ClientError> {
        if id.is_empty() {
            return Err(ClientError::Usage("role id must not be empty".into()));
        }
        let path = format!("role/{}", segment(id));
        let options = project_scoped(opts.project_id.as_deref(), options);
        self.transport.request(Method::POST, &path, Some(opts), &options).await
    }

    #[instrument(skip(self, options))]
    pub async fn delete(
        &self,
        id: &str,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let path = format!("role/{}", segment(id));
        let options = project_scoped(project_id, options);
        self.transport.request_discard(Method::DELETE, &path, NO_PAYLOAD, &options).await
    }
}
