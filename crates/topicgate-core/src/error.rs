use std::fmt;
use thiserror::Error;

/// Which resolution tier produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveKind {
    TopicProject,
    UserProject,
    ProjectShare,
}

impl fmt::Display for ResolveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolveKind::TopicProject => "topic project",
            ResolveKind::UserProject => "user project",
            ResolveKind::ProjectShare => "project share",
        };
        f.write_str(name)
    }
}

/// Failure to resolve a fact through one of the caches.
///
/// `NotFound` is terminal. `Unavailable` means the directory call itself
/// failed and the lookup may be attempted once more.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No {kind} record for '{key}'")]
    NotFound { kind: ResolveKind, key: String },

    #[error("Failed to load {kind} for '{key}': {reason}")]
    Unavailable {
        kind: ResolveKind,
        key: String,
        reason: String,
    },
}

impl ResolveError {
    pub fn not_found(kind: ResolveKind, key: impl fmt::Display) -> Self {
        ResolveError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn unavailable(
        kind: ResolveKind,
        key: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        ResolveError::Unavailable {
            kind,
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Transient failures get exactly one more attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::Unavailable { .. })
    }

    pub fn kind(&self) -> ResolveKind {
        match self {
            ResolveError::NotFound { kind, .. } | ResolveError::Unavailable { kind, .. } => *kind,
        }
    }
}

/// Errors surfaced by a [`DirectoryClient`](crate::directory::DirectoryClient)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("No matching record")]
    NotFound,

    #[error("Directory backend error: {0}")]
    Backend(String),
}

impl DirectoryError {
    /// Attach the tier and key the failed lookup was made for
    pub fn into_resolve(self, kind: ResolveKind, key: impl fmt::Display) -> ResolveError {
        match self {
            DirectoryError::NotFound => ResolveError::not_found(kind, key),
            DirectoryError::Backend(reason) => ResolveError::unavailable(kind, key, reason),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid principal '{0}': expected 'type:name'")]
    InvalidPrincipal(String),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retryable() {
        let missing = ResolveError::not_found(ResolveKind::TopicProject, "orders");
        let flaky = ResolveError::unavailable(ResolveKind::TopicProject, "orders", "timeout");

        assert!(!missing.is_retryable());
        assert!(flaky.is_retryable());
        assert_eq!(flaky.kind(), ResolveKind::TopicProject);
    }

    #[test]
    fn test_directory_error_conversion() {
        let err = DirectoryError::NotFound.into_resolve(ResolveKind::UserProject, "p__u");
        assert_eq!(err, ResolveError::not_found(ResolveKind::UserProject, "p__u"));

        let err = DirectoryError::Backend("connection reset".into())
            .into_resolve(ResolveKind::ProjectShare, "119->120");
        assert!(err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Failed to load project share for '119->120': connection reset"
        );
    }
}
