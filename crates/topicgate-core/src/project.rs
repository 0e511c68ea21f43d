//! Facts mirrored from the project directory

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the project that owns a topic or a user membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub i32);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProjectId {
    fn from(id: i32) -> Self {
        ProjectId(id)
    }
}

pub const DATA_OWNER: &str = "Data owner";
pub const DATA_SCIENTIST: &str = "Data scientist";

/// A user's role inside the project they belong to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectRole {
    /// Full control over the project's topics
    DataOwner,
    /// Read-only member
    DataScientist,
    /// Any role name the directory reports that has no permissions here
    Other(String),
}

impl ProjectRole {
    pub fn from_name(name: &str) -> Self {
        match name {
            DATA_OWNER => ProjectRole::DataOwner,
            DATA_SCIENTIST => ProjectRole::DataScientist,
            other => ProjectRole::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ProjectRole::DataOwner => DATA_OWNER,
            ProjectRole::DataScientist => DATA_SCIENTIST,
            ProjectRole::Other(name) => name,
        }
    }
}

impl From<String> for ProjectRole {
    fn from(name: String) -> Self {
        ProjectRole::from_name(&name)
    }
}

impl From<ProjectRole> for String {
    fn from(role: ProjectRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project membership of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserProject {
    pub project: ProjectId,
    pub role: ProjectRole,
}

impl UserProject {
    pub fn new(project: impl Into<ProjectId>, role: ProjectRole) -> Self {
        Self {
            project: project.into(),
            role,
        }
    }
}

pub const READ_ONLY: &str = "READ_ONLY";

/// Permission a topic's project grants to another project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SharePermission {
    ReadOnly,
    /// Sharing modes this engine does not understand; always denied
    Other(String),
}

impl SharePermission {
    pub fn from_name(name: &str) -> Self {
        match name {
            READ_ONLY => SharePermission::ReadOnly,
            other => SharePermission::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SharePermission::ReadOnly => READ_ONLY,
            SharePermission::Other(name) => name,
        }
    }
}

impl From<String> for SharePermission {
    fn from(name: String) -> Self {
        SharePermission::from_name(&name)
    }
}

impl From<SharePermission> for String {
    fn from(permission: SharePermission) -> Self {
        permission.as_str().to_string()
    }
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the project-share tier: (topic project, user project)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectPair {
    pub topic_project: ProjectId,
    pub user_project: ProjectId,
}

impl ProjectPair {
    pub fn new(topic_project: ProjectId, user_project: ProjectId) -> Self {
        Self {
            topic_project,
            user_project,
        }
    }
}

impl fmt::Display for ProjectPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.topic_project, self.user_project)
    }
}
