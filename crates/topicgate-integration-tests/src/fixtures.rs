//! Test fixtures for integration tests
//!
//! Provides a seeded two-project directory and an authorizer wired to it
//! through the real loading caches.

use crate::mocks::MockDirectory;
use anyhow::Result;
use std::sync::Arc;
use topicgate_core::{AuthorizerConfig, ProjectAuthorizer, ProjectRole, SharePermission};

/// Project owning `ORDERS_TOPIC`
pub const OWNER_PROJECT: i32 = 119;
/// Project the orders topic is shared with, read-only
pub const PARTNER_PROJECT: i32 = 120;
/// Project the orders topic is shared with in an unsupported mode
pub const EDITOR_PROJECT: i32 = 121;
/// Project with no relation to the orders topic
pub const STRANGER_PROJECT: i32 = 122;

pub const ORDERS_TOPIC: &str = "orders";
pub const PARTNER_TOPIC: &str = "partner-events";

pub const OWNER: &str = "demo__alice";
pub const SCIENTIST: &str = "demo__bob";
pub const PARTNER_OWNER: &str = "partner__carol";
pub const PARTNER_SCIENTIST: &str = "partner__dave";
pub const EDITOR: &str = "editor__erin";
pub const STRANGER: &str = "stranger__frank";

pub const ADMIN_PRINCIPAL: &str = "User:CN=admin,O=hops";

// ============================================================================
// TestDirectory - seeded project directory
// ============================================================================

/// Seed a mock directory with the standard projects, users and shares
pub fn seeded_directory() -> Arc<MockDirectory> {
    let directory = MockDirectory::new();
    let records = directory.records();

    records.insert_topic(ORDERS_TOPIC, OWNER_PROJECT);
    records.insert_topic(PARTNER_TOPIC, PARTNER_PROJECT);

    records.insert_user(OWNER, OWNER_PROJECT, ProjectRole::DataOwner);
    records.insert_user(SCIENTIST, OWNER_PROJECT, ProjectRole::DataScientist);
    records.insert_user(PARTNER_OWNER, PARTNER_PROJECT, ProjectRole::DataOwner);
    records.insert_user(PARTNER_SCIENTIST, PARTNER_PROJECT, ProjectRole::DataScientist);
    records.insert_user(EDITOR, EDITOR_PROJECT, ProjectRole::DataOwner);
    records.insert_user(STRANGER, STRANGER_PROJECT, ProjectRole::DataOwner);

    records.insert_share(OWNER_PROJECT, PARTNER_PROJECT, SharePermission::ReadOnly);
    records.insert_share(
        OWNER_PROJECT,
        EDITOR_PROJECT,
        SharePermission::from_name("EDITABLE"),
    );

    directory
}

// ============================================================================
// TestAuthorizer - authorizer over the seeded directory
// ============================================================================

/// An authorizer backed by real caches over a [`MockDirectory`]
pub struct TestAuthorizer {
    pub authorizer: ProjectAuthorizer,
    pub directory: Arc<MockDirectory>,
}

impl TestAuthorizer {
    /// Authorizer over the seeded directory, with `ADMIN_PRINCIPAL` as superuser
    pub fn start() -> Result<Self> {
        Self::start_with_config(AuthorizerConfig::default().with_super_users(ADMIN_PRINCIPAL))
    }

    pub fn start_with_config(config: AuthorizerConfig) -> Result<Self> {
        let directory = seeded_directory();
        let authorizer = ProjectAuthorizer::from_config(&config, directory.clone())?;
        Ok(Self {
            authorizer,
            directory,
        })
    }
}
