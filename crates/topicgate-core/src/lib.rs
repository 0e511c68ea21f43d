//! Topicgate core
//!
//! Authorization decision engine for topic brokers whose tenancy lives in an
//! external project directory. Every check resolves three kinds of facts
//! through expiring caches (topic -> project, user -> project and role,
//! project pair -> share permission) and feeds them to a fixed rule table.
//!
//! The engine fails closed: a missing fact, a directory outage, an unknown
//! role or an unsupported share mode all deny.
//!
//! ```rust
//! use std::sync::Arc;
//! use topicgate_core::{
//!     Action, AuthorizationResult, AuthorizerConfig, ConnectionContext, InMemoryDirectory,
//!     Operation, Principal, ProjectAuthorizer, ProjectRole,
//! };
//!
//! let directory = Arc::new(InMemoryDirectory::new());
//! directory.insert_topic("orders", 119);
//! directory.insert_user("demo__alice", 119, ProjectRole::DataScientist);
//!
//! let authorizer = ProjectAuthorizer::from_config(&AuthorizerConfig::default(), directory)?;
//! let ctx = ConnectionContext::for_principal(Principal::user("CN=demo__alice,O=hops"));
//!
//! let verdicts = authorizer.authorize(
//!     &ctx,
//!     &[
//!         Action::topic(Operation::Read, "orders"),
//!         Action::topic(Operation::Write, "orders"),
//!     ],
//! );
//! assert_eq!(
//!     verdicts,
//!     vec![AuthorizationResult::Allowed, AuthorizationResult::Denied]
//! );
//! # Ok::<(), topicgate_core::Error>(())
//! ```

pub mod action;
pub mod authorizer;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod principal;
pub mod project;
pub mod rules;
pub mod serde_utils;
pub mod superuser;

pub use action::{Action, AuthorizationResult, Operation, ResourceType, CLUSTER_RESOURCE_NAME};
pub use authorizer::{
    ProjectAuthorizer, ProjectShareResolver, TopicProjectResolver, UserProjectResolver,
};
pub use cache::{
    project_share_cache, retry_transient, topic_project_cache, user_project_cache, LoadingCache,
    Resolver,
};
pub use config::{AuthorizerConfig, CacheConfig, MAX_CACHE_TTL, SUPER_USERS_PROPERTY};
pub use directory::{DirectoryClient, InMemoryDirectory};
pub use error::{DirectoryError, Error, ResolveError, ResolveKind, Result};
pub use principal::{ConnectionContext, Principal};
pub use project::{ProjectId, ProjectPair, ProjectRole, SharePermission, UserProject};
pub use rules::TopicFacts;
pub use superuser::{SuperUserRegistry, SuperUsers};
