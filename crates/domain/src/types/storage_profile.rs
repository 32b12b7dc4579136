//! Storage profiles: where a warehouse keeps its data
//!
//! `{"type": "s3" | "adls" | "gcs", ...variant fields}`

use lakekeeper_common::validation::{RangeValidator, StringValidator, UrlValidator, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    BUCKET_MAX_LENGTH, BUCKET_MIN_LENGTH, STORAGE_TYPE_ADLS, STORAGE_TYPE_GCS, STORAGE_TYPE_S3,
};
use crate::errors::{ModelError, Result};
use crate::impl_wire_enum;
use crate::types::tagged::{decode_variant, impl_tagged_serde, Peek, Variant};

const FAMILY: &str = "storage profile";

/// S3 implementation flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum S3Flavor {
    Aws,
    S3Compat,
}

impl_wire_enum!(S3Flavor {
    Aws => "aws",
    S3Compat => "s3-compat",
});

/// Addressing style of remote-signing URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSigningUrlStyle {
    Auto,
    PathStyle,
    VirtualHost,
}

impl_wire_enum!(RemoteSigningUrlStyle {
    Auto => "auto",
    PathStyle => "path-style",
    VirtualHost => "virtual-host",
});

/// S3 (or S3-compatible) storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct S3StorageProfile {
    pub bucket: String,
    pub region: String,
    pub sts_enabled: bool,
    /// Must end with `/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_style_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<S3Flavor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_s3_delete_disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_kms_key_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_signing_url_style: Option<RemoteSigningUrlStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_token_validity_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_alternative_protocols: Option<bool>,
}

impl Variant for S3StorageProfile {
    const TYPE: &'static str = STORAGE_TYPE_S3;
}

impl S3StorageProfile {
    /// Profile with only the required fields set and STS disabled
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            sts_enabled: false,
            endpoint: None,
            key_prefix: None,
            path_style_access: None,
            flavor: None,
            push_s3_delete_disabled: None,
            assume_role_arn: None,
            aws_kms_key_arn: None,
            remote_signing_url_style: None,
            sts_role_arn: None,
            sts_token_validity_seconds: None,
            allow_alternative_protocols: None,
        }
    }

    pub fn builder(bucket: impl Into<String>, region: impl Into<String>) -> S3StorageProfileBuilder {
        S3StorageProfileBuilder { profile: Self::new(bucket, region) }
    }

    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    fn collect_errors(&self, validator: &mut Validator) {
        validate_bucket(validator, &self.bucket);
        validator.validate_not_empty("region", &self.region);
        validate_endpoint(validator, self.endpoint.as_ref());
        validator.ensure(
            !self.sts_enabled || self.sts_role_arn.is_some() || self.assume_role_arn.is_some(),
            "sts-role-arn",
            "sts-role-arn or assume-role-arn is required when sts-enabled is set",
        );
        validator.validate_optional(
            "sts-token-validity-seconds",
            self.sts_token_validity_seconds.as_ref(),
            &RangeValidator::empty().min(1),
        );
    }
}

/// Fluent builder for [`S3StorageProfile`]; `build` enforces the invariants
#[derive(Debug, Clone)]
pub struct S3StorageProfileBuilder {
    profile: S3StorageProfile,
}

impl S3StorageProfileBuilder {
    pub fn sts_enabled(mut self, enabled: bool) -> Self {
        self.profile.sts_enabled = enabled;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.profile.endpoint = Some(endpoint.into());
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.profile.key_prefix = Some(prefix.into());
        self
    }

    pub fn path_style_access(mut self, enabled: bool) -> Self {
        self.profile.path_style_access = Some(enabled);
        self
    }

    pub fn flavor(mut self, flavor: S3Flavor) -> Self {
        self.profile.flavor = Some(flavor);
        self
    }

    pub fn push_s3_delete_disabled(mut self, disabled: bool) -> Self {
        self.profile.push_s3_delete_disabled = Some(disabled);
        self
    }

    pub fn assume_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.profile.assume_role_arn = Some(arn.into());
        self
    }

    pub fn aws_kms_key_arn(mut self, arn: impl Into<String>) -> Self {
        self.profile.aws_kms_key_arn = Some(arn.into());
        self
    }

    pub fn remote_signing_url_style(mut self, style: RemoteSigningUrlStyle) -> Self {
        self.profile.remote_signing_url_style = Some(style);
        self
    }

    pub fn sts_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.profile.sts_role_arn = Some(arn.into());
        self
    }

    pub fn sts_token_validity_seconds(mut self, seconds: i64) -> Self {
        self.profile.sts_token_validity_seconds = Some(seconds);
        self
    }

    pub fn allow_alternative_protocols(mut self, allow: bool) -> Self {
        self.profile.allow_alternative_protocols = Some(allow);
        self
    }

    pub fn build(self) -> Result<S3StorageProfile> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}

/// Azure Data Lake Storage Gen2
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdlsStorageProfile {
    pub account_name: String,
    pub filesystem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sas_token_validity_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_alternative_protocols: Option<bool>,
}

impl Variant for AdlsStorageProfile {
    const TYPE: &'static str = STORAGE_TYPE_ADLS;
}

impl AdlsStorageProfile {
    pub fn new(account_name: impl Into<String>, filesystem: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            filesystem: filesystem.into(),
            authority_host: None,
            host: None,
            key_prefix: None,
            sas_token_validity_seconds: None,
            allow_alternative_protocols: None,
        }
    }

    pub fn builder(
        account_name: impl Into<String>,
        filesystem: impl Into<String>,
    ) -> AdlsStorageProfileBuilder {
        AdlsStorageProfileBuilder { profile: Self::new(account_name, filesystem) }
    }

    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    fn collect_errors(&self, validator: &mut Validator) {
        validator.validate_not_empty("account-name", &self.account_name);
        validator.validate_not_empty("filesystem", &self.filesystem);
        validator.validate_optional(
            "sas-token-validity-seconds",
            self.sas_token_validity_seconds.as_ref(),
            &RangeValidator::empty().min(1),
        );
    }
}

#[derive(Debug, Clone)]
pub struct AdlsStorageProfileBuilder {
    profile: AdlsStorageProfile,
}

impl AdlsStorageProfileBuilder {
    pub fn authority_host(mut self, host: impl Into<String>) -> Self {
        self.profile.authority_host = Some(host.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.profile.host = Some(host.into());
        self
    }

    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.profile.key_prefix = Some(prefix.into());
        self
    }

    pub fn sas_token_validity_seconds(mut self, seconds: i64) -> Self {
        self.profile.sas_token_validity_seconds = Some(seconds);
        self
    }

    pub fn allow_alternative_protocols(mut self, allow: bool) -> Self {
        self.profile.allow_alternative_protocols = Some(allow);
        self
    }

    pub fn build(self) -> Result<AdlsStorageProfile> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}

/// Google Cloud Storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GcsStorageProfile {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_prefix: Option<String>,
}

impl Variant for GcsStorageProfile {
    const TYPE: &'static str = STORAGE_TYPE_GCS;
}

impl GcsStorageProfile {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self { bucket: bucket.into(), key_prefix: None }
    }

    /// Set the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    fn collect_errors(&self, validator: &mut Validator) {
        validate_bucket(validator, &self.bucket);
    }
}

fn validate_bucket(validator: &mut Validator, bucket: &String) {
    validator.validate_field(
        "bucket",
        bucket,
        &StringValidator::new().min_length(BUCKET_MIN_LENGTH).max_length(BUCKET_MAX_LENGTH),
    );
}

fn validate_endpoint(validator: &mut Validator, endpoint: Option<&String>) {
    validator.validate_optional("endpoint", endpoint, &UrlValidator::new());
    validator.validate_optional("endpoint", endpoint, &StringValidator::new().ends_with("/"));
}

/// Storage backend of a warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProfile {
    S3(S3StorageProfile),
    Adls(AdlsStorageProfile),
    Gcs(GcsStorageProfile),
}

impl_tagged_serde!(StorageProfile { S3, Adls, Gcs });

impl StorageProfile {
    /// Value of the `type` discriminator
    pub fn storage_type(&self) -> &'static str {
        match self {
            Self::S3(_) => S3StorageProfile::TYPE,
            Self::Adls(_) => AdlsStorageProfile::TYPE,
            Self::Gcs(_) => GcsStorageProfile::TYPE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    pub(crate) fn collect_errors(&self, validator: &mut Validator) {
        match self {
            Self::S3(profile) => profile.collect_errors(validator),
            Self::Adls(profile) => profile.collect_errors(validator),
            Self::Gcs(profile) => profile.collect_errors(validator),
        }
    }

    /// Decode from a JSON value, dispatching on `type`
    pub fn from_value(value: Value) -> Result<Self> {
        let peek = Peek::read(FAMILY, &value)?;
        match peek.kind.as_str() {
            STORAGE_TYPE_S3 => decode_variant(FAMILY, value).map(Self::S3),
            STORAGE_TYPE_ADLS => decode_variant(FAMILY, value).map(Self::Adls),
            STORAGE_TYPE_GCS => decode_variant(FAMILY, value).map(Self::Gcs),
            _ => Err(ModelError::unknown(FAMILY, peek.describe())),
        }
    }

    /// Decode from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value = serde_json::from_str(json).map_err(|e| ModelError::invalid(FAMILY, e.to_string()))?;
        Self::from_value(value)
    }
}

impl From<S3StorageProfile> for StorageProfile {
    fn from(profile: S3StorageProfile) -> Self {
        Self::S3(profile)
    }
}

impl From<AdlsStorageProfile> for StorageProfile {
    fn from(profile: AdlsStorageProfile) -> Self {
        Self::Adls(profile)
    }
}

impl From<GcsStorageProfile> for StorageProfile {
    fn from(profile: GcsStorageProfile) -> Self {
        Self::Gcs(profile)
    }
}
