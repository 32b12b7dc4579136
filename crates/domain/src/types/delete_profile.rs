//! Delete profiles: what happens to tables dropped from a warehouse
//!
//! `hard` deletes immediately. `soft` keeps dropped tables for a retention
//! window before purging them.

use lakekeeper_common::validation::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{
    DELETE_PROFILE_HARD, DELETE_PROFILE_SOFT, SOFT_DELETE_EXPIRATION_ALIAS,
    SOFT_DELETE_EXPIRATION_KEY,
};
use crate::errors::{ModelError, Result};
use crate::types::tagged::{as_object, decode_variant, impl_tagged_serde, Peek, Variant};

const FAMILY: &str = "delete profile";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardDeleteProfile {}

impl Variant for HardDeleteProfile {
    const TYPE: &'static str = DELETE_PROFILE_HARD;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftDeleteProfile {
    /// Retention window in seconds
    #[serde(rename = "expired-seconds", alias = "expiration-seconds")]
    pub expiration_seconds: i32,
}

impl Variant for SoftDeleteProfile {
    const TYPE: &'static str = DELETE_PROFILE_SOFT;
}

/// Deletion policy of a warehouse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteProfile {
    Hard(HardDeleteProfile),
    Soft(SoftDeleteProfile),
}

impl_tagged_serde!(DeleteProfile { Hard, Soft });

impl DeleteProfile {
    pub fn hard() -> Self {
        Self::Hard(HardDeleteProfile {})
    }

    pub fn soft(expiration_seconds: i32) -> Self {
        Self::Soft(SoftDeleteProfile { expiration_seconds })
    }

    pub fn profile_type(&self) -> &'static str {
        match self {
            Self::Hard(_) => HardDeleteProfile::TYPE,
            Self::Soft(_) => SoftDeleteProfile::TYPE,
        }
    }

    /// Retention window, `None` for hard deletes
    pub fn expiration_seconds(&self) -> Option<i32> {
        match self {
            Self::Hard(_) => None,
            Self::Soft(soft) => Some(soft.expiration_seconds),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut validator = Validator::new();
        self.collect_errors(&mut validator);
        validator.finalize().map_err(ModelError::from)
    }

    pub(crate) fn collect_errors(&self, validator: &mut Validator) {
        if let Self::Soft(soft) = self {
            validator.ensure(
                soft.expiration_seconds > 0,
                SOFT_DELETE_EXPIRATION_KEY,
                "must be positive",
            );
        }
    }

    /// Decode from a JSON value, dispatching on `type`
    ///
    /// A `hard` profile that carries an expiration is rejected rather than
    /// silently dropping the field.
    pub fn from_value(value: Value) -> Result<Self> {
        let peek = Peek::read(FAMILY, &value)?;
        match peek.kind.as_str() {
            DELETE_PROFILE_HARD => {
                let object = as_object(FAMILY, &value)?;
                let has_expiration = [SOFT_DELETE_EXPIRATION_KEY, SOFT_DELETE_EXPIRATION_ALIAS]
                    .iter()
                    .any(|key| object.get(*key).is_some_and(|v| !v.is_null()));
                if has_expiration {
                    return Err(ModelError::invalid(
                        FAMILY,
                        "expiration seconds are not allowed for a hard delete profile",
                    ));
                }
                decode_variant(FAMILY, value).map(Self::Hard)
            }
            DELETE_PROFILE_SOFT => decode_variant(FAMILY, value).map(Self::Soft),
            _ => Err(ModelError::unknown(FAMILY, peek.describe())),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value = serde_json::from_str(json).map_err(|e| ModelError::invalid(FAMILY, e.to_string()))?;
        Self::from_value(value)
    }
}

impl Default for DeleteProfile {
    fn default() -> Self {
        Self::hard()
    }
}
