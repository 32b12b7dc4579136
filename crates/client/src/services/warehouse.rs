//! Warehouses
//!
//! Lifecycle: `active ⇄ inactive` through activate/deactivate, and delete is
//! terminal. A protected warehouse can only be deleted with `force`.

use lakekeeper_domain::{
    CreateWarehouseOptions, CreateWarehouseResponse, DeleteWarehouseOptions, ListWarehousesOptions,
    ListWarehousesResponse, ProtectionResponse, RenameOptions, SetProtectionOptions,
    UpdateDeleteProfileOptions, UpdateStorageCredentialOptions, UpdateStorageProfileOptions,
    Warehouse,
};
use reqwest::Method;
use tracing::instrument;

use super::{project_scoped, segment};
use crate::errors::{ClientError, Response};
use crate::http::{RequestOption, Transport, NO_PAYLOAD};

#[derive(Debug, Clone, Copy)]
pub struct WarehouseService<'a> {
    transport: &'a Transport,
}

impl<'a> WarehouseService<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    fn path(id: &str, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("warehouse/{}/{action}", segment(id)),
            None => format!("warehouse/{}", segment(id)),
        }
    }

    #[instrument(skip(self, options))]
    pub async fn get(
        &self,
        id: &str,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<(Warehouse, Response), ClientError> {
        let options = project_scoped(project_id, options);
        self.transport.request(Method::GET, &Self::path(id, None), NO_PAYLOAD, &options).await
    }

    #[instrument(skip(self, options))]
    pub async fn list(
        &self,
        opts: &ListWarehousesOptions,
        options: &[RequestOption],
    ) -> Result<(Vec<Warehouse>, Response), ClientError> {
        let (page, response): (ListWarehousesResponse, _) =
            self.transport.request(Method::GET, "warehouse", Some(opts), options).await?;
        Ok((page.warehouses, response))
    }

    /// Validate, create, then fetch the stored warehouse
    ///
    /// The server checks that the storage is reachable before accepting it.
    #[instrument(skip(self, opts, options), fields(name = %opts.name))]
    pub async fn create(
        &self,
        opts: &CreateWarehouseOptions,
        options: &[RequestOption],
    ) -> Result<(Warehouse, Response), ClientError> {
        opts.validate()?;
        let options = project_scoped(opts.project_id.as_deref(), options);
        let (created, _): (CreateWarehouseResponse, _) =
            self.transport.request(Method::POST, "warehouse", Some(opts), &options).await?;
        self.get(&created.warehouse_id, None, &options).await
    }

    /// Delete a warehouse; `force` overrides protection
    #[instrument(skip(self, options))]
    pub async fn delete(
        &self,
        id: &str,
        opts: &DeleteWarehouseOptions,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let options = project_scoped(opts.project_id.as_deref(), options);
        self.transport.request_discard(Method::DELETE, &Self::path(id, None), Some(opts), &options).await
    }

    #[instrument(skip(self, options))]
    pub async fn set_protection(
        &self,
        id: &str,
        protected: bool,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<(ProtectionResponse, Response), ClientError> {
        let options = project_scoped(project_id, options);
        let body = SetProtectionOptions { protected };
        self.transport
            .request(Method::POST, &Self::path(id, Some("protection")), Some(&body), &options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn activate(
        &self,
        id: &str,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(Method::POST, &Self::path(id, Some("activate")), NO_PAYLOAD, &options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn deactivate(
        &self,
        id: &str,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(Method::POST, &Self::path(id, Some("deactivate")), NO_PAYLOAD, &options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn rename(
        &self,
        id: &str,
        opts: &RenameOptions,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(Method::POST, &Self::path(id, Some("rename")), Some(opts), &options)
            .await
    }

    /// Replace the storage profile, optionally with new credentials
    #[instrument(skip(self, opts, options))]
    pub async fn update_storage_profile(
        &self,
        id: &str,
        opts: &UpdateStorageProfileOptions,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        opts.validate()?;
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(Method::POST, &Self::path(id, Some("storage")), Some(opts), &options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn update_delete_profile(
        &self,
        id: &str,
        opts: &UpdateDeleteProfileOptions,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        opts.delete_profile.validate()?;
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(Method::POST, &Self::path(id, Some("delete-profile")), Some(opts), &options)
            .await
    }

    #[instrument(skip(self, opts, options))]
    pub async fn update_storage_credential(
        &self,
        id: &str,
        opts: &UpdateStorageCredentialOptions,
        project_id: Option<&str>,
        options: &[RequestOption],
    ) -> Result<Response, ClientError> {
        if let Some(credential) = &opts.new_storage_credential {
            credential.validate()?;
        }
        let options = project_scoped(project_id, options);
        self.transport
            .request_discard(
                Method::POST,
                &Self::path(id, Some("storage-credential")),
                Some(opts),
                &options,
            )
            .await
    }
}
