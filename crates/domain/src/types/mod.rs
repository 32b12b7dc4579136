//! Wire types of the management API
//!
//! Plain entities (projects, users, roles, warehouses) are ordinary serde
//! structs. Storage profiles, storage credentials and delete profiles are
//! sum types encoded through [`tagged`].

pub mod delete_profile;
pub mod project;
pub mod role;
pub mod server;
pub mod storage_credential;
pub mod storage_profile;
pub mod tagged;
pub mod user;
pub mod warehouse;

pub use delete_profile::{DeleteProfile, HardDeleteProfile, SoftDeleteProfile};
pub use project::{
    CreateProjectOptions, CreateProjectResponse, ListProjectsResponse, Project, RenameOptions,
};
pub use role::{CreateRoleOptions, ListRolesOptions, ListRolesResponse, Role, UpdateRoleOptions};
pub use server::{BootstrapOptions, ServerInfo};
pub use storage_credential::{
    AzClientCredentials, AzSharedAccessKeyCredential, AzureSystemIdentityCredential,
    CloudflareR2Credential, GcpSystemIdentityCredential, GcsServiceAccountKey,
    GcsServiceAccountKeyCredential, S3AccessKeyCredential, S3AwsSystemIdentityCredential,
    StorageCredential,
};
pub use storage_profile::{
    AdlsStorageProfile, AdlsStorageProfileBuilder, GcsStorageProfile, RemoteSigningUrlStyle,
    S3Flavor, S3StorageProfile, S3StorageProfileBuilder, StorageProfile,
};
pub use tagged::Variant;
pub use user::{
    LastUpdatedWith, ListUsersOptions, ListUsersResponse, ProvisionUserOptions, UpdateUserOptions,
    User, UserType,
};
pub use warehouse::{
    CreateWarehouseOptions, CreateWarehouseResponse, DeleteWarehouseOptions, ListWarehousesOptions,
    ListWarehousesResponse, ProtectionResponse, SetProtectionOptions, UpdateDeleteProfileOptions,
    UpdateStorageCredentialOptions, UpdateStorageProfileOptions, Warehouse, WarehouseStatus,
};
