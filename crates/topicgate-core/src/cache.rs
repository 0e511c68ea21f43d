//! Resolution caches in front of the project directory
//!
//! Each tier is a [`LoadingCache`]: a miss calls the directory, a hit is
//! served from memory until the entry expires. Failed loads are never
//! cached. Concurrent first access to one key collapses into a single
//! directory call.
//!
//! Retrying is not the cache's job. Callers wrap a whole resolution pass in
//! [`retry_transient`] so `NotFound` costs one attempt and a transient
//! failure costs exactly two.

use crate::config::CacheConfig;
use crate::directory::DirectoryClient;
use crate::error::{ResolveError, ResolveKind};
use crate::project::{ProjectId, ProjectPair, SharePermission, UserProject};
use moka::sync::Cache;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that resolves a key to a directory fact
pub trait Resolver<K, V>: Send + Sync {
    fn resolve(&self, key: &K) -> Result<V, ResolveError>;

    /// Drop any memoized value for `key`
    fn invalidate(&self, _key: &K) {}

    /// Drop every memoized value
    fn invalidate_all(&self) {}
}

type Loader<K, V> = Arc<dyn Fn(&K) -> Result<V, ResolveError> + Send + Sync>;

/// A bounded, expiring cache that loads misses through a loader function
pub struct LoadingCache<K, V> {
    kind: ResolveKind,
    cache: Cache<K, V>,
    loader: Loader<K, V>,
}

impl<K, V> LoadingCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F>(kind: ResolveKind, config: &CacheConfig, loader: F) -> Self
    where
        F: Fn(&K) -> Result<V, ResolveError> + Send + Sync + 'static,
    {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            kind,
            cache,
            loader: Arc::new(loader),
        }
    }

    pub fn kind(&self) -> ResolveKind {
        self.kind
    }

    /// Approximate number of cached entries
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }
}

impl<K, V> Resolver<K, V> for LoadingCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Display + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn resolve(&self, key: &K) -> Result<V, ResolveError> {
        self.cache
            .try_get_with(key.clone(), || {
                debug!("Loading {} for '{}'", self.kind, key);
                (self.loader)(key)
            })
            .map_err(|err| (*err).clone())
    }

    fn invalidate(&self, key: &K) {
        self.cache.invalidate(key);
    }

    fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<K, V> fmt::Debug for LoadingCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingCache")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tier constructors
// ============================================================================

/// Topic name -> owning project
pub fn topic_project_cache(
    directory: Arc<dyn DirectoryClient>,
    config: &CacheConfig,
) -> LoadingCache<String, ProjectId> {
    let kind = ResolveKind::TopicProject;
    LoadingCache::new(kind, config, move |topic: &String| {
        directory
            .lookup_topic_project(topic)
            .map_err(|err| err.into_resolve(kind, topic))
    })
}

/// `<project>__<user>` identity key -> (project, role)
pub fn user_project_cache(
    directory: Arc<dyn DirectoryClient>,
    config: &CacheConfig,
) -> LoadingCache<String, UserProject> {
    let kind = ResolveKind::UserProject;
    LoadingCache::new(kind, config, move |identity_key: &String| {
        directory
            .lookup_user_project(identity_key)
            .map_err(|err| err.into_resolve(kind, identity_key))
    })
}

/// (topic project, user project) -> share permission
pub fn project_share_cache(
    directory: Arc<dyn DirectoryClient>,
    config: &CacheConfig,
) -> LoadingCache<ProjectPair, SharePermission> {
    let kind = ResolveKind::ProjectShare;
    LoadingCache::new(kind, config, move |pair: &ProjectPair| {
        directory
            .lookup_share_permission(pair.topic_project, pair.user_project)
            .map_err(|err| err.into_resolve(kind, pair))
    })
}

// ============================================================================
// Retry
// ============================================================================

/// Run `operation`, and run it exactly once more if it failed transiently.
///
/// `NotFound` is returned after the first attempt. The outcome of the second
/// attempt is final whatever kind of failure it is.
pub fn retry_transient<T, F>(mut operation: F) -> Result<T, ResolveError>
where
    F: FnMut() -> Result<T, ResolveError>,
{
    match operation() {
        Err(err) if err.is_retryable() => {
            warn!("Retrying after transient failure: {}", err);
            operation()
        }
        outcome => outcome,
    }
}
