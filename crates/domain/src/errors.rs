//! Error types raised while building, validating or decoding wire models

use lakekeeper_common::validation::ValidationError;
use thiserror::Error;

/// Errors produced by the wire model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The discriminator of a polymorphic value is not recognised
    #[error("unknown {family} variant: {discriminator}")]
    UnknownVariant { family: &'static str, discriminator: String },

    /// The payload is not a valid encoding of the value
    #[error("invalid {family} payload: {message}")]
    InvalidPayload { family: &'static str, message: String },

    /// A client-side invariant does not hold
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ModelError {
    pub(crate) fn invalid(family: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload { family, message: message.into() }
    }

    pub(crate) fn unknown(family: &'static str, discriminator: impl Into<String>) -> Self {
        Self::UnknownVariant { family, discriminator: discriminator.into() }
    }
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
