//! # Lakekeeper Domain
//!
//! Wire model of the Lakekeeper management API.
//!
//! This crate contains:
//! - Entity types (Project, User, Role, Warehouse, ServerInfo)
//! - Request and response bodies of the management endpoints
//! - The polymorphic storage profile, storage credential and delete profile
//!   types with their discriminated JSON encoding
//! - Model errors and wire constants
//!
//! ## Architecture
//! - No I/O; the HTTP client lives in `lakekeeper-client`
//! - Client-side invariants are checked with the `lakekeeper-common`
//!   validation framework

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;

#[doc(hidden)]
pub use serde as __serde;
