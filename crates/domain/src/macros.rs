//! Macro for string-valued wire enums
//!
//! Several fields of the management API are closed sets of strings
//! (`warehouse-status`, `user-type`, `flavor`, ...). The macro gives each of
//! them one mapping table that drives `Display`, `FromStr` and serde, so the
//! printed form and the wire form can never drift apart.
//!
//! # Example
//!
//! ```rust
//! use lakekeeper_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Tier {
//!     Hot,
//!     Cold,
//! }
//!
//! impl_wire_enum!(Tier {
//!     Hot => "hot",
//!     Cold => "cold",
//! });
//!
//! assert_eq!(Tier::Cold.to_string(), "cold");
//! assert_eq!("HOT".parse::<Tier>().unwrap(), Tier::Hot);
//! ```

/// Implements `as_str`, `Display`, `FromStr`, `Serialize` and `Deserialize`
/// for a fieldless enum from a `Variant => "wire-name"` table.
///
/// Parsing is case-insensitive; output always uses the table spelling.
/// Unknown strings fail with [`ModelError::UnknownVariant`](crate::ModelError).
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Wire spelling of the variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::ModelError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::core::result::Result::Ok(Self::$variant),)+
                    _ => ::core::result::Result::Err($crate::ModelError::UnknownVariant {
                        family: stringify!($enum_name),
                        discriminator: ::std::string::ToString::to_string(s),
                    }),
                }
            }
        }

        impl $crate::__serde::Serialize for $enum_name {
            fn serialize<S: $crate::__serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: $crate::__serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
                let raw = <::std::string::String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                ::core::str::FromStr::from_str(&raw).map_err($crate::__serde::de::Error::custom)
            }
        }
    };
}
