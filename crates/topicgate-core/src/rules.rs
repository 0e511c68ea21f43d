//! Decision rules
//!
//! Turns resolved directory facts into a verdict. Everything here is a pure
//! function of its inputs; resolution and caching live elsewhere.
//!
//! | resource | rule |
//! |----------|------|
//! | `CLUSTER` | only `IDEMPOTENT_WRITE` |
//! | `GROUP` | always allowed (groups are not project scoped) |
//! | `TOPIC`, same project | role table |
//! | `TOPIC`, other project | share table |
//! | anything else | denied |

use crate::action::{AuthorizationResult, Operation, ResourceType};
use crate::project::{ProjectId, ProjectRole, SharePermission, UserProject};

/// Topic operations each project role may perform inside its own project
const ROLE_PERMISSIONS: &[(&ProjectRole, &[Operation])] = &[
    (
        &ProjectRole::DataOwner,
        &[
            Operation::Read,
            Operation::Describe,
            Operation::Write,
            Operation::Create,
        ],
    ),
    (
        &ProjectRole::DataScientist,
        &[Operation::Read, Operation::Describe],
    ),
];

/// Topic operations a share permission grants to another project
const SHARE_PERMISSIONS: &[(&SharePermission, &[Operation])] = &[(
    &SharePermission::ReadOnly,
    &[Operation::Read, Operation::Describe],
)];

/// Cluster operations any authenticated principal may perform
const CLUSTER_PERMISSIONS: &[Operation] = &[Operation::IdempotentWrite];

/// Everything the topic rules need about the requester and the topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFacts {
    pub topic_project: ProjectId,
    pub user: UserProject,
    /// Only resolved when the topic lives in another project
    pub share: Option<SharePermission>,
}

impl TopicFacts {
    pub fn same_project(&self) -> bool {
        self.topic_project == self.user.project
    }
}

pub fn role_allows(role: &ProjectRole, operation: Operation) -> bool {
    ROLE_PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .is_some_and(|(_, ops)| ops.contains(&operation))
}

pub fn share_allows(share: Option<&SharePermission>, operation: Operation) -> bool {
    let Some(share) = share else {
        return false;
    };
    SHARE_PERMISSIONS
        .iter()
        .find(|(s, _)| *s == share)
        .is_some_and(|(_, ops)| ops.contains(&operation))
}

pub fn decide_cluster(operation: Operation) -> AuthorizationResult {
    AuthorizationResult::from_allowed(CLUSTER_PERMISSIONS.contains(&operation))
}

pub fn decide_group(_operation: Operation) -> AuthorizationResult {
    AuthorizationResult::Allowed
}

pub fn decide_topic(operation: Operation, facts: &TopicFacts) -> AuthorizationResult {
    let allowed = if facts.same_project() {
        role_allows(&facts.user.role, operation)
    } else {
        share_allows(facts.share.as_ref(), operation)
    };
    AuthorizationResult::from_allowed(allowed)
}

/// Verdict for an authenticated, non-superuser principal.
///
/// `facts` is only consulted for topics; a topic without facts is denied.
pub fn decide(
    resource_type: ResourceType,
    operation: Operation,
    facts: Option<&TopicFacts>,
) -> AuthorizationResult {
    match resource_type {
        ResourceType::Cluster => decide_cluster(operation),
        ResourceType::Group => decide_group(operation),
        ResourceType::Topic => match facts {
            Some(facts) => decide_topic(operation, facts),
            None => AuthorizationResult::Denied,
        },
        _ => AuthorizationResult::Denied,
    }
}
