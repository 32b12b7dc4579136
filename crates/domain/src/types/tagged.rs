//! Discriminated (tagged) encoding shared by the polymorphic wire types
//!
//! A polymorphic value travels as one flat JSON object: the discriminator
//! keys come first, followed by the fields of the selected variant.
//!
//! ```json
//! {"type":"s3","credential-type":"access-key","aws-access-key-id":"..."}
//! ```
//!
//! Encoding wraps the variant in [`Tagged`], which serde flattens after the
//! discriminators. Decoding reads a [`Peek`] of the discriminators first and
//! only then parses the full object as the selected variant, so an unknown
//! discriminator is reported as such instead of as a missing field.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{CREDENTIAL_TYPE_KEY, TYPE_KEY};
use crate::errors::{ModelError, Result};

/// A variant struct of a polymorphic wire type
pub trait Variant: Serialize + DeserializeOwned {
    /// Value of the `type` key
    const TYPE: &'static str;
    /// Value of the `credential-type` key, for credential variants
    const CREDENTIAL_TYPE: Option<&'static str> = None;
}

/// Borrowed encoder: discriminators followed by the flattened variant
#[derive(Serialize)]
pub(crate) struct Tagged<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "credential-type", skip_serializing_if = "Option::is_none")]
    credential_type: Option<&'static str>,
    #[serde(flatten)]
    inner: &'a T,
}

impl<'a, T: Variant> Tagged<'a, T> {
    pub(crate) fn new(inner: &'a T) -> Self {
        Self { kind: T::TYPE, credential_type: T::CREDENTIAL_TYPE, inner }
    }
}

/// The discriminators of an encoded value, read before anything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Peek {
    pub kind: String,
    pub credential_type: Option<String>,
}

impl Peek {
    /// Read the discriminators of `value` without consuming it
    pub(crate) fn read(family: &'static str, value: &Value) -> Result<Self> {
        let object = as_object(family, value)?;
        let kind = match object.get(TYPE_KEY) {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => {
                return Err(ModelError::invalid(
                    family,
                    format!("'{TYPE_KEY}' must be a string, got {other}"),
                ))
            }
            None => return Err(ModelError::invalid(family, format!("missing '{TYPE_KEY}'"))),
        };
        let credential_type = match object.get(CREDENTIAL_TYPE_KEY) {
            Some(Value::String(credential_type)) => Some(credential_type.clone()),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(ModelError::invalid(
                    family,
                    format!("'{CREDENTIAL_TYPE_KEY}' must be a string, got {other}"),
                ))
            }
        };
        Ok(Self { kind, credential_type })
    }

    /// Discriminator as reported in `UnknownVariant` errors
    pub(crate) fn describe(&self) -> String {
        match &self.credential_type {
            Some(credential_type) => format!("{}/{}", self.kind, credential_type),
            None => self.kind.clone(),
        }
    }
}

/// Parse the full object as variant `T`
pub(crate) fn decode_variant<T: Variant>(family: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ModelError::invalid(family, e.to_string()))
}

pub(crate) fn as_object<'v>(family: &'static str, value: &'v Value) -> Result<&'v Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ModelError::invalid(family, format!("expected a JSON object, got {value}")))
}

/// Implements `Serialize` through [`Tagged`] and `Deserialize` through the
/// sum type's own `from_value` dispatcher.
macro_rules! impl_tagged_serde {
    ($sum:ident { $($variant:ident),+ $(,)? }) => {
        impl serde::Serialize for $sum {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(inner) => serde::Serialize::serialize(
                        &$crate::types::tagged::Tagged::new(inner),
                        serializer,
                    ),)+
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $sum {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_value(value).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_tagged_serde;

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    struct Sample {
        first: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        second: Option<i64>,
    }

    impl Variant for Sample {
        const TYPE: &'static str = "sample";
        const CREDENTIAL_TYPE: Option<&'static str> = Some("sub");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Empty {}

    impl Variant for Empty {
        const TYPE: &'static str = "empty";
    }

    #[test]
    fn test_discriminators_come_first() {
        let sample = Sample { first: "a".into(), second: Some(2) };
        let encoded = serde_json::to_string(&Tagged::new(&sample)).unwrap();
        assert_eq!(encoded, r#"{"type":"sample","credential-type":"sub","first":"a","second":2}"#);
    }

    #[test]
    fn test_empty_variant_is_only_discriminators() {
        let encoded = serde_json::to_string(&Tagged::new(&Empty {})).unwrap();
        assert_eq!(encoded, r#"{"type":"empty"}"#);
    }

    #[test]
    fn test_peek_reads_both_discriminators() {
        let peek = Peek::read("sample", &json!({"type": "s3", "credential-type": "access-key"})).unwrap();
        assert_eq!(peek.kind, "s3");
        assert_eq!(peek.credential_type.as_deref(), Some("access-key"));
        assert_eq!(peek.describe(), "s3/access-key");
    }

    #[test]
    fn test_peek_rejects_missing_or_mistyped_type() {
        assert!(matches!(
            Peek::read("sample", &json!({"bucket": "b"})),
            Err(ModelError::InvalidPayload { .. })
        ));
        assert!(matches!(
            Peek::read("sample", &json!({"type": 3})),
            Err(ModelError::InvalidPayload { .. })
        ));
        assert!(matches!(Peek::read("sample", &json!([1])), Err(ModelError::InvalidPayload { .. })));
    }

    #[test]
    fn test_decode_variant_reports_missing_fields() {
        let err = decode_variant::<Sample>("sample", json!({"type": "sample"})).unwrap_err();
        match err {
            ModelError::InvalidPayload { family, message } => {
                assert_eq!(family, "sample");
                assert!(message.contains("first"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
