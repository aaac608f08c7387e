use crate::archive::CodeStructure;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

/// A decoded repository together with the moment it stops being valid
#[derive(Debug, Clone)]
struct CacheEntry {
    structure: CodeStructure,
    expires_at: Instant,
}

/// In-memory store of decoded repositories keyed by `owner/name`
///
/// Entries expire a fixed time after insertion. Reads do not extend that
/// window. Expired entries are invisible to lookups and are dropped by
/// [`RepoCache::purge_expired`], which runs on every insert and from the
/// background sweeper.
#[derive(Debug, Clone)]
pub struct RepoCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl RepoCache {
    /// Creates a new cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Retention window applied to new entries
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a decoded repository, replacing any previous entry and restarting its window
    pub async fn put(&self, repo_id: &str, structure: CodeStructure) {
        let now = Instant::now();
        let mut store = self.store.write().await;
        store.retain(|_, entry| entry.expires_at > now);
        store.insert(
            repo_id.to_string(),
            CacheEntry {
                structure,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Removes an entry; returns whether one was present
    pub async fn evict(&self, repo_id: &str) -> bool {
        let mut store = self.store.write().await;
        store.remove(repo_id).is_some()
    }

    /// Returns a copy of an unexpired entry
    pub async fn get(&self, repo_id: &str) -> Option<CodeStructure> {
        let store = self.store.read().await;
        store
            .get(repo_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.structure.clone())
    }

    /// Checks for an unexpired entry
    pub async fn contains(&self, repo_id: &str) -> bool {
        let store = self.store.read().await;
        store
            .get(repo_id)
            .map(|entry| entry.expires_at > Instant::now())
            .unwrap_or(false)
    }

    /// Number of stored entries, expired ones included until purged
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Checks if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Removes expired entries and returns how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut store = self.store.write().await;
        let before_len = store.len();
        store.retain(|_, entry| entry.expires_at > now);
        before_len - store.len()
    }

    /// Spawns a task that purges expired entries every `interval`
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    debug!("Evicted {} expired repositories from cache", removed);
                }
            }
        })
    }
}
