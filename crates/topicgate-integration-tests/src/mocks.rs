//! Mock directory implementations for testing

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use topicgate_core::{
    DirectoryClient, DirectoryError, InMemoryDirectory, ProjectId, SharePermission, UserProject,
};

/// Which lookup a counter or fault refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Topic,
    User,
    Share,
}

/// Wraps an [`InMemoryDirectory`], counting every lookup and optionally
/// failing the next N calls of a given lookup with a backend error.
#[derive(Debug, Default)]
pub struct MockDirectory {
    inner: InMemoryDirectory,
    topic_calls: AtomicUsize,
    user_calls: AtomicUsize,
    share_calls: AtomicUsize,
    faults: Mutex<HashMap<Lookup, usize>>,
    latency: Mutex<Option<Duration>>,
}

impl MockDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The backing records
    pub fn records(&self) -> &InMemoryDirectory {
        &self.inner
    }

    /// Fail the next `count` calls of `lookup` with a backend error
    pub fn fail_next(&self, lookup: Lookup, count: usize) {
        self.faults.lock().insert(lookup, count);
    }

    /// Delay every lookup, to widen race windows
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    pub fn calls(&self, lookup: Lookup) -> usize {
        self.counter(lookup).load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.topic_calls.store(0, Ordering::SeqCst);
        self.user_calls.store(0, Ordering::SeqCst);
        self.share_calls.store(0, Ordering::SeqCst);
    }

    fn counter(&self, lookup: Lookup) -> &AtomicUsize {
        match lookup {
            Lookup::Topic => &self.topic_calls,
            Lookup::User => &self.user_calls,
            Lookup::Share => &self.share_calls,
        }
    }

    fn enter(&self, lookup: Lookup) -> Result<(), DirectoryError> {
        self.counter(lookup).fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            std::thread::sleep(latency);
        }

        let mut faults = self.faults.lock();
        match faults.get_mut(&lookup) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(DirectoryError::Backend(format!(
                    "injected {:?} lookup failure",
                    lookup
                )))
            }
            _ => Ok(()),
        }
    }
}

impl DirectoryClient for MockDirectory {
    fn lookup_topic_project(&self, topic: &str) -> Result<ProjectId, DirectoryError> {
        self.enter(Lookup::Topic)?;
        self.inner.lookup_topic_project(topic)
    }

    fn lookup_user_project(&self, identity_key: &str) -> Result<UserProject, DirectoryError> {
        self.enter(Lookup::User)?;
        self.inner.lookup_user_project(identity_key)
    }

    fn lookup_share_permission(
        &self,
        topic_project: ProjectId,
        user_project: ProjectId,
    ) -> Result<SharePermission, DirectoryError> {
        self.enter(Lookup::Share)?;
        self.inner
            .lookup_share_permission(topic_project, user_project)
    }
}
