//! Projects: the top-level tenancy boundary

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project-id")]
    pub id: String,
    #[serde(rename = "project-name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Body of `POST /project`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateProjectOptions {
    pub project_name: String,
    /// Requested id; the server generates one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl CreateProjectOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self { project_name: name.into(), project_id: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CreateProjectResponse {
    pub project_id: String,
}

/// Body of the rename endpoints (projects and warehouses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenameOptions {
    pub new_name: String,
}

impl RenameOptions {
    pub fn new(new_name: impl Into<String>) -> Self {
        Self { new_name: new_name.into() }
    }
}
