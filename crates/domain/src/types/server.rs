//! Server information and the bootstrap handshake

use serde::{Deserialize, Serialize};

use crate::types::user::UserType;

/// Response of `GET /info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerInfo {
    pub version: String,
    pub bootstrapped: bool,
    pub server_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project_id: Option<String>,
    pub authz_backend: String,
    #[serde(default)]
    pub aws_system_identities_enabled: bool,
    #[serde(default)]
    pub azure_system_identities_enabled: bool,
    #[serde(default)]
    pub gcp_system_identities_enabled: bool,
}

/// Body of `POST /bootstrap`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BootstrapOptions {
    pub accept_terms_of_use: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_operator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
}

impl BootstrapOptions {
    /// Accept the terms of use and register the caller as an operator
    /// application, as the client's initial bootstrap does
    pub fn operator_application() -> Self {
        Self {
            accept_terms_of_use: true,
            is_operator: Some(true),
            user_name: None,
            user_email: None,
            user_type: Some(UserType::Application),
        }
    }
}
