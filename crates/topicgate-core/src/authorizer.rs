//! Project-scoped authorizer
//!
//! Answers broker authorization requests from facts mirrored out of the
//! project directory instead of a local ACL store.
//!
//! ## Decision flow
//!
//! ```text
//! authorize(ctx, actions)
//!   for each action:
//!     anonymous principal ............................ DENIED
//!     canonical or alternate name is a superuser ..... ALLOWED
//!     CLUSTER / GROUP ................................ rules::decide
//!     TOPIC:
//!       topic  -> project         (topic cache)
//!       user   -> project, role   (user cache)
//!       if projects differ:
//!         (topic project, user project) -> share  (share cache)
//!       rules::decide_topic
//! ```
//!
//! Any resolution failure denies. A transient directory failure repeats the
//! whole resolution pass once; `NotFound` stops immediately.

use crate::action::{Action, AuthorizationResult, ResourceType};
use crate::cache::{
    project_share_cache, retry_transient, topic_project_cache, user_project_cache, Resolver,
};
use crate::config::AuthorizerConfig;
use crate::directory::DirectoryClient;
use crate::error::{ResolveError, Result};
use crate::principal::ConnectionContext;
use crate::project::{ProjectId, ProjectPair, SharePermission, UserProject};
use crate::rules::{self, TopicFacts};
use crate::superuser::{SuperUserRegistry, SuperUsers};
use std::sync::Arc;
use tracing::{debug, warn};

pub type TopicProjectResolver = Box<dyn Resolver<String, ProjectId>>;
pub type UserProjectResolver = Box<dyn Resolver<String, UserProject>>;
pub type ProjectShareResolver = Box<dyn Resolver<ProjectPair, SharePermission>>;

/// The authorization service. Owns its superuser set and the three
/// resolution tiers.
pub struct ProjectAuthorizer {
    super_users: SuperUserRegistry,
    topic_projects: TopicProjectResolver,
    user_projects: UserProjectResolver,
    project_shares: ProjectShareResolver,
}

impl ProjectAuthorizer {
    /// Create an authorizer over the given resolvers with no superusers
    pub fn new(
        topic_projects: TopicProjectResolver,
        user_projects: UserProjectResolver,
        project_shares: ProjectShareResolver,
    ) -> Self {
        Self {
            super_users: SuperUserRegistry::new(),
            topic_projects,
            user_projects,
            project_shares,
        }
    }

    /// Create an authorizer backed by loading caches over `directory`
    pub fn from_config(
        config: &AuthorizerConfig,
        directory: Arc<dyn DirectoryClient>,
    ) -> Result<Self> {
        config.validate()?;

        let authorizer = Self::new(
            Box::new(topic_project_cache(
                Arc::clone(&directory),
                &config.topic_cache,
            )),
            Box::new(user_project_cache(
                Arc::clone(&directory),
                &config.user_cache,
            )),
            Box::new(project_share_cache(directory, &config.share_cache)),
        );
        authorizer.set_super_users(&config.super_users)?;

        Ok(authorizer)
    }

    // ========================================================================
    // Superusers
    // ========================================================================

    /// Replace the superuser set. Takes effect for subsequent calls only.
    pub fn set_super_users(&self, spec: &str) -> Result<()> {
        self.super_users.set(spec)
    }

    pub fn super_users(&self) -> Arc<SuperUsers> {
        self.super_users.snapshot()
    }

    /// True if any candidate name matches any configured superuser
    pub fn is_super_user<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        self.super_users.is_super_user(candidates)
    }

    // ========================================================================
    // Authorization
    // ========================================================================

    /// Authorize a batch of actions. Returns one verdict per action, in order.
    pub fn authorize(
        &self,
        ctx: &ConnectionContext,
        actions: &[Action],
    ) -> Vec<AuthorizationResult> {
        actions
            .iter()
            .map(|action| self.authorize_in_context(ctx, action))
            .collect()
    }

    fn authorize_in_context(
        &self,
        ctx: &ConnectionContext,
        action: &Action,
    ) -> AuthorizationResult {
        if ctx.principal.is_anonymous() {
            debug!(
                "Denying {} for anonymous principal from {} on {}",
                action,
                ctx.client_address,
                ctx.listener.as_deref().unwrap_or("-")
            );
            return AuthorizationResult::Denied;
        }

        if self.is_super_user(ctx.superuser_candidates().as_slice()) {
            debug!("Allowing {} for superuser {}", action, ctx.principal);
            return AuthorizationResult::Allowed;
        }

        self.authorize_action(ctx.identity_key(), action)
    }

    /// Authorize a single action for a `<project>__<user>` identity key,
    /// without the anonymous and superuser checks.
    pub fn authorize_action(&self, identity_key: &str, action: &Action) -> AuthorizationResult {
        let verdict = match action.resource_type {
            ResourceType::Topic => self.authorize_topic(identity_key, action),
            other => rules::decide(other, action.operation, None),
        };
        debug!("{} for '{}': {}", action, identity_key, verdict);
        verdict
    }

    fn authorize_topic(&self, identity_key: &str, action: &Action) -> AuthorizationResult {
        match retry_transient(|| self.resolve_topic_facts(identity_key, &action.resource_name)) {
            Ok(facts) => rules::decide_topic(action.operation, &facts),
            Err(err) => {
                warn!("Denying {} for '{}': {}", action, identity_key, err);
                AuthorizationResult::Denied
            }
        }
    }

    fn resolve_topic_facts(
        &self,
        identity_key: &str,
        topic: &str,
    ) -> std::result::Result<TopicFacts, ResolveError> {
        let topic_project = self.topic_projects.resolve(&topic.to_string())?;
        let user = self.user_projects.resolve(&identity_key.to_string())?;

        let share = if topic_project == user.project {
            None
        } else {
            let pair = ProjectPair::new(topic_project, user.project);
            Some(self.project_shares.resolve(&pair)?)
        };

        debug!(
            "Resolved topic '{}' -> project {}, '{}' -> project {} as {}",
            topic, topic_project, identity_key, user.project, user.role
        );

        Ok(TopicFacts {
            topic_project,
            user,
            share,
        })
    }

    // ========================================================================
    // Cache maintenance
    // ========================================================================

    pub fn invalidate_topic(&self, topic: &str) {
        self.topic_projects.invalidate(&topic.to_string());
    }

    pub fn invalidate_user(&self, identity_key: &str) {
        self.user_projects.invalidate(&identity_key.to_string());
    }

    pub fn invalidate_share(&self, topic_project: ProjectId, user_project: ProjectId) {
        self.project_shares
            .invalidate(&ProjectPair::new(topic_project, user_project));
    }

    /// Forget every cached directory fact
    pub fn invalidate_all(&self) {
        self.topic_projects.invalidate_all();
        self.user_projects.invalidate_all();
        self.project_shares.invalidate_all();
    }
}

impl std::fmt::Debug for ProjectAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectAuthorizer")
            .field("super_users", &self.super_users.snapshot().len())
            .finish_non_exhaustive()
    }
}
