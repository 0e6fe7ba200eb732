//! TTL cache storage and the periodic sweeper.

use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::hash::CacheKey;

/// Default time-to-live for cached result sets.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) <= ttl
    }
}

/// Key → value store whose entries expire after a fixed TTL.
///
/// Entries are never updated in place; `set` replaces the whole entry and
/// restarts its clock.
#[derive(Debug)]
pub struct TtlCache<V> {
    namespace: &'static str,
    ttl: Duration,
    entries: DashMap<CacheKey, CacheEntry<V>>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(namespace: &'static str, ttl: Duration) -> Self {
        Self { namespace, ttl, entries: DashMap::new() }
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh value.
    ///
    /// An expired entry is removed as a side effect and reported as absent.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                tracing::debug!(namespace = self.namespace, %key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                tracing::debug!(namespace = self.namespace, %key, "cache miss");
                return None;
            }
        }

        self.entries.remove_if(key, |_, entry| !entry.is_fresh(now, self.ttl));
        tracing::debug!(namespace = self.namespace, %key, "cache entry expired");
        None
    }

    /// Store a value, overwriting any prior entry for the key.
    pub fn set(&self, key: CacheKey, value: V) {
        self.entries.insert(key, CacheEntry { value, stored_at: Instant::now() });
    }

    /// Remove every expired entry.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(namespace = self.namespace, removed, "swept expired cache entries");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Start a background task that sweeps this cache every `every`.
    ///
    /// The task holds only a weak reference and stops once the cache is
    /// dropped. Dropping the returned handle stops it as well.
    ///
    /// # Panics
    ///
    /// Panics if `every` is zero, or when called outside a tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> SweepHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        let namespace = self.namespace;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                cache.sweep();
            }
            tracing::debug!(namespace, "cache sweeper stopped");
        });
        SweepHandle { task }
    }
}

/// Owner of a running sweep task; aborts the task on drop.
#[derive(Debug)]
pub struct SweepHandle {
    task: JoinHandle<()>,
}

impl SweepHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
