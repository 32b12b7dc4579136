//! Warehouses and the bodies of their management endpoints
//!
//! Update bodies omit absent optional fields instead of sending `null`. The
//! API has no way to unset a single field of a storage profile; send the full
//! profile again through [`UpdateStorageProfileOptions`] instead.

use chrono::{DateTime, Utc};
use lakekeeper_common::validation::{StringValidator, Validator};
use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, Result};
use crate::impl_wire_enum;
use crate::types::delete_profile::DeleteProfile;
use crate::types::storage_credential::StorageCredential;
use crate::types::storage_profile::StorageProfile;

/// `active ⇄ inactive`; deletion is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseStatus {
    Active,
    Inactive,
}

impl_wire_enum!(WarehouseStatus {
    Active => "active",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Warehouse {
    #[serde(alias = "warehouse-id")]
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub protected: bool,
    pub status: WarehouseStatus,
    pub storage_profile: StorageProfile,
    /// `None` means the server default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_profile: Option<DeleteProfile>,
}

impl Warehouse {
    pub fn is_active(&self) -> bool {
        self.status == WarehouseStatus::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWarehousesResponse {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
}

/// Query of `GET /warehouse`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListWarehousesOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// Repeated once per status
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warehouse_status: Vec<WarehouseStatus>,
}

/// Body of `POST /warehouse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateWarehouseOptions {
    #[serde(rename = "warehouse-name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub storage_profile: StorageProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_credential: Option<StorageCredential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_profile: Option<DeleteProfile>,
}

impl CreateWarehouseOptions {
    pub fn new(name: impl Into<String>, storage_profile: impl Into<StorageProfile>) -> Self {
        Self {
            name: name.into(),
            project_id: None,
            storage_profile: storage_profile.into(),
            storage_credential: None,
            delete_profile: None,
        }
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_storage_credential(mut self, credential: StorageCredential) -> Self {
        self.storage_credential = Some(credential);
        self
    }

    pub fn with_delete_profile(mut self, profile: DeleteProfile) -> Self {
        self.delete_profile = Some(profile);
        self
    }

    /// Check every nested invariant, reporting all failures at once
    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        validator.validate_field("warehouse-name", &self.name, &StringValidator::new().not_empty());
        validator.validate_nested("storage-profile", |v| self.storage_profile.collect_errors(v));
        if let Some(credential) = &self.storage_credential {
            validator.validate_nested("storage-credential", |v| credential.collect_errors(v));
        }
        if let Some(profile) = &self.delete_profile {
            validator.validate_nested("delete-profile", |v| profile.collect_errors(v));
        }
        validator.finalize().map_err(ModelError::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateWarehouseResponse {
    pub warehouse_id: String,
}

/// Options of `DELETE /warehouse/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteWarehouseOptions {
    /// Delete even when the warehouse is protected
    pub force: bool,
    /// Sent as the `x-project-id` header
    #[serde(skip)]
    pub project_id: Option<String>,
}

/// Body of `POST /warehouse/{id}/protection`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetProtectionOptions {
    pub protected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProtectionResponse {
    pub protected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /warehouse/{id}/storage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateStorageProfileOptions {
    pub storage_profile: StorageProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_credential: Option<StorageCredential>,
}

impl UpdateStorageProfileOptions {
    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        validator.validate_nested("storage-profile", |v| self.storage_profile.collect_errors(v));
        if let Some(credential) = &self.storage_credential {
            validator.validate_nested("storage-credential", |v| credential.collect_errors(v));
        }
        validator.finalize().map_err(ModelError::from)
    }
}

/// Body of `POST /warehouse/{id}/delete-profile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateDeleteProfileOptions {
    pub delete_profile: DeleteProfile,
}

/// Body of `POST /warehouse/{id}/storage-credential`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UpdateStorageCredentialOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_storage_credential: Option<StorageCredential>,
}
