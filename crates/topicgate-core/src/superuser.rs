//! Superuser registry
//!
//! Superusers are configured as a `;`-separated list of canonical principal
//! strings (`User:admin;User:CN=broker,O=acme`). A request's candidate names
//! match an entry when they equal its canonical string, its principal name,
//! or the `CN` of a certificate-style name. There is no wildcarding.

use crate::error::Result;
use crate::principal::Principal;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Separator between configured superuser entries
pub const SUPER_USER_SEPARATOR: char = ';';

/// Immutable snapshot of the configured superusers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperUsers {
    principals: Vec<Principal>,
    names: HashSet<String>,
}

impl SuperUsers {
    /// Parse a `;`-separated superuser list. Blank entries are skipped;
    /// any malformed entry fails the whole list.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut principals = Vec::new();
        let mut names = HashSet::new();

        for entry in spec.split(SUPER_USER_SEPARATOR) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let principal = Principal::parse(entry)?;
            names.insert(principal.to_string());
            names.insert(principal.name.clone());
            if let Some(cn) = principal.common_name() {
                names.insert(cn.to_string());
            }
            principals.push(principal);
        }

        Ok(Self { principals, names })
    }

    pub fn principals(&self) -> &[Principal] {
        &self.principals
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// True if any candidate matches any configured entry
    pub fn matches_any<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        candidates
            .iter()
            .any(|candidate| self.names.contains(candidate.as_ref()))
    }
}

/// Holds the active superuser snapshot; replaced wholesale on reconfiguration
#[derive(Debug, Default)]
pub struct SuperUserRegistry {
    current: RwLock<Arc<SuperUsers>>,
}

impl SuperUserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set. On error the previous set stays in effect.
    pub fn set(&self, spec: &str) -> Result<()> {
        let parsed = SuperUsers::parse(spec)?;
        info!("Configured {} superuser(s)", parsed.len());
        *self.current.write() = Arc::new(parsed);
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<SuperUsers> {
        Arc::clone(&self.current.read())
    }

    pub fn is_super_user<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        let matched = self.snapshot().matches_any(candidates);
        if matched {
            debug!(
                "Superuser match among {:?}",
                candidates.iter().map(AsRef::as_ref).collect::<Vec<_>>()
            );
        }
        matched
    }
}
