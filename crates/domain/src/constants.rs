//! Wire-level constants
//!
//! Header names, discriminator keys and limits shared by the model and the
//! client.

/// Header carrying the project selector
pub const PROJECT_ID_HEADER: &str = "x-project-id";

/// Key of the primary discriminator on every polymorphic value
pub const TYPE_KEY: &str = "type";
/// Key of the secondary discriminator on storage credentials
pub const CREDENTIAL_TYPE_KEY: &str = "credential-type";

// Storage discriminators
pub const STORAGE_TYPE_S3: &str = "s3";
pub const STORAGE_TYPE_ADLS: &str = "adls";
pub const STORAGE_TYPE_GCS: &str = "gcs";
/// Azure credentials use `az`, not `adls`
pub const CREDENTIAL_TYPE_AZ: &str = "az";

// Delete profile discriminators
pub const DELETE_PROFILE_HARD: &str = "hard";
pub const DELETE_PROFILE_SOFT: &str = "soft";

/// Soft delete expiration key as emitted
pub const SOFT_DELETE_EXPIRATION_KEY: &str = "expired-seconds";
/// Spelling accepted on read in addition to [`SOFT_DELETE_EXPIRATION_KEY`]
pub const SOFT_DELETE_EXPIRATION_ALIAS: &str = "expiration-seconds";

// Bucket name limits (inclusive)
pub const BUCKET_MIN_LENGTH: usize = 3;
pub const BUCKET_MAX_LENGTH: usize = 64;

/// API error type returned when bootstrap already happened
pub const CATALOG_ALREADY_BOOTSTRAPPED: &str = "CatalogAlreadyBootstrapped";
