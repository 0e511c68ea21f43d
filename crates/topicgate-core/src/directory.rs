//! Project directory collaborator
//!
//! The directory is the source of truth for topic ownership, user
//! memberships and cross-project shares. The engine only reads from it,
//! through the loading caches in [`crate::cache`].

use crate::error::DirectoryError;
use crate::project::{ProjectId, ProjectPair, ProjectRole, SharePermission, UserProject};
use dashmap::DashMap;

/// Read access to the project directory.
///
/// Implementations apply their own timeouts; a timed out or failed call is
/// reported as [`DirectoryError::Backend`].
pub trait DirectoryClient: Send + Sync {
    /// Project owning `topic`
    fn lookup_topic_project(&self, topic: &str) -> Result<ProjectId, DirectoryError>;

    /// Project and role for a `<project>__<user>` identity key
    fn lookup_user_project(&self, identity_key: &str) -> Result<UserProject, DirectoryError>;

    /// Permission `topic_project` grants to members of `user_project`
    fn lookup_share_permission(
        &self,
        topic_project: ProjectId,
        user_project: ProjectId,
    ) -> Result<SharePermission, DirectoryError>;
}

/// Directory held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    topics: DashMap<String, ProjectId>,
    users: DashMap<String, UserProject>,
    shares: DashMap<ProjectPair, SharePermission>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_topic(&self, topic: impl Into<String>, project: impl Into<ProjectId>) {
        self.topics.insert(topic.into(), project.into());
    }

    pub fn insert_user(
        &self,
        identity_key: impl Into<String>,
        project: impl Into<ProjectId>,
        role: ProjectRole,
    ) {
        self.users
            .insert(identity_key.into(), UserProject::new(project, role));
    }

    pub fn insert_share(
        &self,
        topic_project: impl Into<ProjectId>,
        user_project: impl Into<ProjectId>,
        permission: SharePermission,
    ) {
        self.shares.insert(
            ProjectPair::new(topic_project.into(), user_project.into()),
            permission,
        );
    }

    pub fn remove_topic(&self, topic: &str) -> Option<ProjectId> {
        self.topics.remove(topic).map(|(_, project)| project)
    }

    pub fn remove_user(&self, identity_key: &str) -> Option<UserProject> {
        self.users.remove(identity_key).map(|(_, user)| user)
    }

    pub fn remove_share(
        &self,
        topic_project: ProjectId,
        user_project: ProjectId,
    ) -> Option<SharePermission> {
        self.shares
            .remove(&ProjectPair::new(topic_project, user_project))
            .map(|(_, permission)| permission)
    }
}

impl DirectoryClient for InMemoryDirectory {
    fn lookup_topic_project(&self, topic: &str) -> Result<ProjectId, DirectoryError> {
        self.topics
            .get(topic)
            .map(|entry| *entry.value())
            .ok_or(DirectoryError::NotFound)
    }

    fn lookup_user_project(&self, identity_key: &str) -> Result<UserProject, DirectoryError> {
        self.users
            .get(identity_key)
            .map(|entry| entry.value().clone())
            .ok_or(DirectoryError::NotFound)
    }

    fn lookup_share_permission(
        &self,
        topic_project: ProjectId,
        user_project: ProjectId,
    ) -> Result<SharePermission, DirectoryError> {
        self.shares
            .get(&ProjectPair::new(topic_project, user_project))
            .map(|entry| entry.value().clone())
            .ok_or(DirectoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups() {
        let dir = InMemoryDirectory::new();
        dir.insert_topic("orders", 119);
        dir.insert_user("demo__alice", 119, ProjectRole::DataOwner);
        dir.insert_share(119, 120, SharePermission::ReadOnly);

        assert_eq!(dir.lookup_topic_project("orders"), Ok(ProjectId(119)));
        assert_eq!(
            dir.lookup_user_project("demo__alice"),
            Ok(UserProject::new(119, ProjectRole::DataOwner))
        );
        assert_eq!(
            dir.lookup_share_permission(ProjectId(119), ProjectId(120)),
            Ok(SharePermission::ReadOnly)
        );
    }

    #[test]
    fn test_missing_records_are_not_found() {
        let dir = InMemoryDirectory::new();
        dir.insert_share(119, 120, SharePermission::ReadOnly);

        assert_eq!(dir.lookup_topic_project("orders"), Err(DirectoryError::NotFound));
        assert_eq!(
            dir.lookup_user_project("demo__alice"),
            Err(DirectoryError::NotFound)
        );
        // shares are directional
        assert_eq!(
            dir.lookup_share_permission(ProjectId(120), ProjectId(119)),
            Err(DirectoryError::NotFound)
        );
    }

    #[test]
    fn test_remove() {
        let dir = InMemoryDirectory::new();
        dir.insert_topic("orders", 119);
        assert_eq!(dir.remove_topic("orders"), Some(ProjectId(119)));
        assert_eq!(dir.remove_topic("orders"), None);
        assert_eq!(dir.lookup_topic_project("orders"), Err(DirectoryError::NotFound));
    }
}
