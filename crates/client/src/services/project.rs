//! Projects
//!
//! Most project endpoints address "the current project", selected with the
//! `x-project-id` header rather than a path segment.

use lakekeeper_domain::{
    CreateProjectOptions, CreateProjectResponse, ListProjectsResponse, Project, RenameOptions,
};
use reqwest::Method;
use tracing::instrument;

use super::project_scoped;
use crate::errors::{ClientError, Response};
use crate::http::{RequestOption, Transport, NO_PAYLOAD};

#[derive(Debug, Clone, Copy)]
pub struct ProjectService<'a> {
    transport: &'a Transport,
}

impl<'a> ProjectService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    #[instrument(skip(self, options))]
    pub async fn get(&self, id: &str, options: &[RequestOption]) -> Result<(Project, Response), ClientError> {
        let options = project_scoped(Some(id), options);
        self.transport.request(Method::GET, "project", NO_PAYLOAD, &options).await
    }

    /// Project used when no `x-project-id` is sent
    ///
    /// The server marks this endpoint deprecated.
    #[instrument(skip(self, options))]
    pub async fn get_default(&self, options: &[RequestOption]) -> Result<(Project, Response), ClientError> {
        self.transport.request(Method::GET, "default-project", NO_PAYLOAD, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn list(&self, options: &[RequestOption]) -> Result<(Vec<Project>, Response), ClientError> {
        let (page, response): (ListProjectsResponse, _) =
            self.transport.request(Method::GET, "project-list", NO_PAYLOAD, options).await?;
        Ok((page.projects, response))
    }

    /// Create a project and fetch the stored record
    ///
    /// The returned response is the one of the follow-up `GET`.
    #[instrument(skip(self, options))]
    pub async fn create(
        &self,
        opts: &CreateProjectOptions,
        options: &[RequestOption],
    ) -> Result<(Project, Response), ClientError> {
        let (created, _): (CreateProjectResponse, _) =
            self.transport.request(Method::POST, "project", Some(opts), options).await?;
        self.get(&created.project_id, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn rename(
        &self,
        id: &str,
        opts: &RenameOptions,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let options = project_scoped(Some(id), options);
        self.transport.request_discard(Method::POST, "project/rename", Some(opts), &options).await
    }

    #[instrument(skip(self, options))]
    pub async fn delete(&self, id: &str, options: &[RequestOption]) -> Result<Response, ClientError> {
        let options = project_scoped(Some(id), options);
        self.transport.request_discard(Method::DELETE, "project", NO_PAYLOAD, &options).await
    }
}
