//! Storage credentials: secret material for a storage profile
//!
//! Credentials are discriminated by the pair `(type, credential-type)` and are
//! write-only: the server never returns them. `Debug` output redacts secrets.

use std::fmt;

use lakekeeper_common::validation::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{CREDENTIAL_TYPE_AZ, STORAGE_TYPE_GCS, STORAGE_TYPE_S3};
use crate::errors::{ModelError, Result};
use crate::types::tagged::{decode_variant, impl_tagged_serde, Peek, Variant};

const FAMILY: &str = "storage credential";
const REDACTED: &str = "<redacted>";

/// `(s3, access-key)`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct S3AccessKeyCredential {
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Variant for S3AccessKeyCredential {
    const TYPE: &'static str = STORAGE_TYPE_S3;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("access-key");
}

impl S3AccessKeyCredential {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            aws_access_key_id: access_key_id.into(),
            aws_secret_access_key: secret_access_key.into(),
            external_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }
}

impl fmt::Debug for S3AccessKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3AccessKeyCredential")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &REDACTED)
            .field("external_id", &self.external_id)
            .finish()
    }
}

/// `(s3, aws-system-identity)`: use the server's own AWS identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct S3AwsSystemIdentityCredential {
    pub external_id: String,
}

impl Variant for S3AwsSystemIdentityCredential {
    const TYPE: &'static str = STORAGE_TYPE_S3;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("aws-system-identity");
}

/// `(s3, cloudflare-r2)`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CloudflareR2Credential {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub account_id: String,
    pub token: String,
}

impl Variant for CloudflareR2Credential {
    const TYPE: &'static str = STORAGE_TYPE_S3;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("cloudflare-r2");
}

impl fmt::Debug for CloudflareR2Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareR2Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("account_id", &self.account_id)
            .field("token", &REDACTED)
            .finish()
    }
}

/// `(az, client-credentials)`: an Azure service principal
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AzClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}

impl Variant for AzClientCredentials {
    const TYPE: &'static str = CREDENTIAL_TYPE_AZ;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("client-credentials");
}

impl fmt::Debug for AzClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// `(az, shared-access-key)`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzSharedAccessKeyCredential {
    pub key: String,
}

impl Variant for AzSharedAccessKeyCredential {
    const TYPE: &'static str = CREDENTIAL_TYPE_AZ;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("shared-access-key");
}

impl fmt::Debug for AzSharedAccessKeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzSharedAccessKeyCredential").field("key", &REDACTED).finish()
    }
}

/// `(az, azure-system-identity)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureSystemIdentityCredential {}

impl Variant for AzureSystemIdentityCredential {
    const TYPE: &'static str = CREDENTIAL_TYPE_AZ;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("azure-system-identity");
}

/// Google service-account key file, field for field
///
/// Keys keep Google's snake_case spelling.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcsServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe_domain: Option<String>,
}

impl GcsServiceAccountKey {
    /// Parse a downloaded key file
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ModelError::invalid("gcs service account key", e.to_string()))
    }
}

impl fmt::Debug for GcsServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &REDACTED)
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// `(gcs, service-account-key)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcsServiceAccountKeyCredential {
    pub key: GcsServiceAccountKey,
}

impl Variant for GcsServiceAccountKeyCredential {
    const TYPE: &'static str = STORAGE_TYPE_GCS;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("service-account-key");
}

/// `(gcs, gcp-system-identity)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcpSystemIdentityCredential {}

impl Variant for GcpSystemIdentityCredential {
    const TYPE: &'static str = STORAGE_TYPE_GCS;
    const CREDENTIAL_TYPE: Option<&'static str> = Some("gcp-system-identity");
}

/// Credential attached to a warehouse's storage profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCredential {
    S3AccessKey(S3AccessKeyCredential),
    S3AwsSystemIdentity(S3AwsSystemIdentityCredential),
    CloudflareR2(CloudflareR2Credential),
    AzClientCredentials(AzClientCredentials),
    AzSharedAccessKey(AzSharedAccessKeyCredential),
    AzureSystemIdentity(AzureSystemIdentityCredential),
    GcsServiceAccountKey(GcsServiceAccountKeyCredential),
    GcpSystemIdentity(GcpSystemIdentityCredential),
}

impl_tagged_serde!(StorageCredential {
    S3AccessKey,
    S3AwsSystemIdentity,
    CloudflareR2,
    AzClientCredentials,
    AzSharedAccessKey,
    AzureSystemIdentity,
    GcsServiceAccountKey,
    GcpSystemIdentity,
});

impl StorageCredential {
    pub fn s3_access_key(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self::S3AccessKey(S3AccessKeyCredential::new(access_key_id, secret_access_key))
    }

    pub fn aws_system_identity(external_id: impl Into<String>) -> Self {
        Self::S3AwsSystemIdentity(S3AwsSystemIdentityCredential { external_id: external_id.into() })
    }

    pub fn cloudflare_r2(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        account_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self::CloudflareR2(CloudflareR2Credential {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            account_id: account_id.into(),
            token: token.into(),
        })
    }

    pub fn az_client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Self {
        Self::AzClientCredentials(AzClientCredentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            tenant_id: tenant_id.into(),
        })
    }

    pub fn az_shared_access_key(key: impl Into<String>) -> Self {
        Self::AzSharedAccessKey(AzSharedAccessKeyCredential { key: key.into() })
    }

    pub fn azure_system_identity() -> Self {
        Self::AzureSystemIdentity(AzureSystemIdentityCredential {})
    }

    pub fn gcs_service_account_key(key: GcsServiceAccountKey) -> Self {
        Self::GcsServiceAccountKey(GcsServiceAccountKeyCredential { key })
    }

    pub fn gcp_system_identity() -> Self {
        Self::GcpSystemIdentity(GcpSystemIdentityCredential {})
    }

    /// `(type, credential-type)` discriminator pair
    pub fn discriminator(&self) -> (&'static str, &'static str) {
        fn pair<T: Variant>() -> (&'static str, &'static str) {
            (T::TYPE, T::CREDENTIAL_TYPE.unwrap_or_default())
        }

        match self {
            Self::S3AccessKey(_) => pair::<S3AccessKeyCredential>(),
            Self::S3AwsSystemIdentity(_) => pair::<S3AwsSystemIdentityCredential>(),
            Self::CloudflareR2(_) => pair::<CloudflareR2Credential>(),
            Self::AzClientCredentials(_) => pair::<AzClientCredentials>(),
            Self::AzSharedAccessKey(_) => pair::<AzSharedAccessKeyCredential>(),
            Self::AzureSystemIdentity(_) => pair::<AzureSystemIdentityCredential>(),
            Self::GcsServiceAccountKey(_) => pair::<GcsServiceAccountKeyCredential>(),
            Self::GcpSystemIdentity(_) => pair::<GcpSystemIdentityCredential>(),
        }
    }

    /// Reject credentials whose required secrets are blank
    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    pub(crate) fn collect_errors(&self, validator: &mut Validator) {
        match self {
            Self::S3AccessKey(c) => {
                validator.validate_not_empty("aws-access-key-id", &c.aws_access_key_id);
                validator.validate_not_empty("aws-secret-access-key", &c.aws_secret_access_key);
            }
            Self::S3AwsSystemIdentity(c) => validator.validate_not_empty("external-id", &c.external_id),
            Self::CloudflareR2(c) => {
                validator.validate_not_empty("access-key-id", &c.access_key_id);
                validator.validate_not_empty("secret-access-key", &c.secret_access_key);
                validator.validate_not_empty("account-id", &c.account_id);
                validator.validate_not_empty("token", &c.token);
            }
            Self::AzClientCredentials(c) => {
                validator.validate_not_empty("client-id", &c.client_id);
                validator.validate_not_empty("client-secret", &c.client_secret);
                validator.validate_not_empty("tenant-id", &c.tenant_id);
            }
            Self::AzSharedAccessKey(c) => validator.validate_not_empty("key", &c.key),
            Self::GcsServiceAccountKey(c) => {
                validator.validate_nested("key", |v| {
                    v.validate_not_empty("private_key", &c.key.private_key);
                    v.validate_not_empty("client_email", &c.key.client_email);
                });
            }
            Self::AzureSystemIdentity(_) | Self::GcpSystemIdentity(_) => {}
        }
    }

    /// Decode from a JSON value, dispatching on `(type, credential-type)`
    pub fn from_value(value: Value) -> Result<Self> {
        let peek = Peek::read(FAMILY, &value)?;
        let Some(credential_type) = peek.credential_type.as_deref() else {
            return Err(ModelError::unknown(FAMILY, peek.describe()));
        };
        match (peek.kind.as_str(), credential_type) {
            (STORAGE_TYPE_S3, "access-key") => decode_variant(FAMILY, value).map(Self::S3AccessKey),
            (STORAGE_TYPE_S3, "aws-system-identity") => {
                decode_variant(FAMILY, value).map(Self::S3AwsSystemIdentity)
            }
            (STORAGE_TYPE_S3, "cloudflare-r2") => decode_variant(FAMILY, value).map(Self::CloudflareR2),
            (CREDENTIAL_TYPE_AZ, "client-credentials") => {
                decode_variant(FAMILY, value).map(Self::AzClientCredentials)
            }
            (CREDENTIAL_TYPE_AZ, "shared-access-key") => {
                decode_variant(FAMILY, value).map(Self::AzSharedAccessKey)
            }
            (CREDENTIAL_TYPE_AZ, "azure-system-identity") => {
                decode_variant(FAMILY, value).map(Self::AzureSystemIdentity)
            }
            (STORAGE_TYPE_GCS, "service-account-key") => {
                decode_variant(FAMILY, value).map(Self::GcsServiceAccountKey)
            }
            (STORAGE_TYPE_GCS, "gcp-system-identity") => {
                decode_variant(FAMILY, value).map(Self::GcpSystemIdentity)
            }
            _ => Err(ModelError::unknown(FAMILY, peek.describe())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value = serde_json::from_str(json).map_err(|e| ModelError::invalid(FAMILY, e.to_string()))?;
        Self::from_value(value)
    }
}
