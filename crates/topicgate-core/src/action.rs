//! Requested actions and the verdicts returned for them

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Operations
// ============================================================================

/// Operations a client may request on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    Unknown,
    Any,
    All,
    Read,
    Write,
    Create,
    Delete,
    Alter,
    Describe,
    ClusterAction,
    DescribeConfigs,
    AlterConfigs,
    IdempotentWrite,
    CreateTokens,
    DescribeTokens,
}

impl Operation {
    const NAMES: &'static [(Operation, &'static str)] = &[
        (Operation::Unknown, "UNKNOWN"),
        (Operation::Any, "ANY"),
        (Operation::All, "ALL"),
        (Operation::Read, "READ"),
        (Operation::Write, "WRITE"),
        (Operation::Create, "CREATE"),
        (Operation::Delete, "DELETE"),
        (Operation::Alter, "ALTER"),
        (Operation::Describe, "DESCRIBE"),
        (Operation::ClusterAction, "CLUSTER_ACTION"),
        (Operation::DescribeConfigs, "DESCRIBE_CONFIGS"),
        (Operation::AlterConfigs, "ALTER_CONFIGS"),
        (Operation::IdempotentWrite, "IDEMPOTENT_WRITE"),
        (Operation::CreateTokens, "CREATE_TOKENS"),
        (Operation::DescribeTokens, "DESCRIBE_TOKENS"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(op, _)| op == self)
            .map(|(_, name)| *name)
            .unwrap_or("UNKNOWN")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Case-insensitive; `-` and `_` are interchangeable
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(op, _)| *op)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

// ============================================================================
// Resource Types
// ============================================================================

/// Kinds of resources an action can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Unknown,
    Any,
    Topic,
    Group,
    Cluster,
    TransactionalId,
    DelegationToken,
    User,
}

impl ResourceType {
    const NAMES: &'static [(ResourceType, &'static str)] = &[
        (ResourceType::Unknown, "UNKNOWN"),
        (ResourceType::Any, "ANY"),
        (ResourceType::Topic, "TOPIC"),
        (ResourceType::Group, "GROUP"),
        (ResourceType::Cluster, "CLUSTER"),
        (ResourceType::TransactionalId, "TRANSACTIONAL_ID"),
        (ResourceType::DelegationToken, "DELEGATION_TOKEN"),
        (ResourceType::User, "USER"),
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(rt, _)| rt == self)
            .map(|(_, name)| *name)
            .unwrap_or("UNKNOWN")
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == wanted)
            .map(|(rt, _)| *rt)
            .ok_or_else(|| Error::UnknownResourceType(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}

// ============================================================================
// Actions and Verdicts
// ============================================================================

/// A single operation requested on a named resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub operation: Operation,
    pub resource_type: ResourceType,
    pub resource_name: String,
}

impl Action {
    pub fn new(
        operation: Operation,
        resource_type: ResourceType,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            resource_type,
            resource_name: resource_name.into(),
        }
    }

    pub fn topic(operation: Operation, topic: impl Into<String>) -> Self {
        Self::new(operation, ResourceType::Topic, topic)
    }

    pub fn group(operation: Operation, group: impl Into<String>) -> Self {
        Self::new(operation, ResourceType::Group, group)
    }

    pub fn cluster(operation: Operation) -> Self {
        Self::new(operation, ResourceType::Cluster, CLUSTER_RESOURCE_NAME)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}:{}",
            self.operation, self.resource_type, self.resource_name
        )
    }
}

/// Resource name brokers use for cluster-level actions
pub const CLUSTER_RESOURCE_NAME: &str = "kafka-cluster";

/// Outcome of authorizing one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationResult {
    Allowed,
    Denied,
}

impl AuthorizationResult {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            AuthorizationResult::Allowed
        } else {
            AuthorizationResult::Denied
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationResult::Allowed)
    }
}

impl fmt::Display for AuthorizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationResult::Allowed => f.write_str("ALLOWED"),
            AuthorizationResult::Denied => f.write_str("DENIED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parse() {
        assert_eq!("describe".parse::<Operation>().unwrap(), Operation::Describe);
        assert_eq!(
            "IDEMPOTENT_WRITE".parse::<Operation>().unwrap(),
            Operation::IdempotentWrite
        );
        assert_eq!(
            "idempotent-write".parse::<Operation>().unwrap(),
            Operation::IdempotentWrite
        );
        assert!("frobnicate".parse::<Operation>().is_err());
    }

    #[test]
    fn test_resource_type_parse() {
        assert_eq!("TOPIC".parse::<ResourceType>().unwrap(), ResourceType::Topic);
        assert_eq!("group".parse::<ResourceType>().unwrap(), ResourceType::Group);
        assert_eq!(
            "transactional_id".parse::<ResourceType>().unwrap(),
            ResourceType::TransactionalId
        );
        assert!(matches!(
            "queue".parse::<ResourceType>(),
            Err(Error::UnknownResourceType(_))
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        for (op, _) in Operation::NAMES {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), *op);
        }
        assert_eq!(
            Action::cluster(Operation::IdempotentWrite).to_string(),
            "IDEMPOTENT_WRITE on CLUSTER:kafka-cluster"
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Operation::IdempotentWrite).unwrap();
        assert_eq!(json, "\"IDEMPOTENT_WRITE\"");
        let verdict: AuthorizationResult = serde_json::from_str("\"DENIED\"").unwrap();
        assert_eq!(verdict, AuthorizationResult::Denied);
    }
}
