//! Cache layer: fingerprints `(bytes, options)` pairs, memoizes the full
//! chunk list, and enforces size/byte/TTL bounds with LRU eviction. The only
//! mutable shared resource in the pipeline; guarded internally so callers
//! never observe a partial write.

mod fingerprint;

pub use fingerprint::fingerprint;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use crate::types::DocumentChunk;

/// Options bounding the cache's footprint and eviction behavior.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Maximum number of entries before LRU eviction kicks in.
    pub max_entries: usize,
    /// Maximum total bytes across all entries.
    pub max_bytes: u64,
    /// Per-entry byte cap; a value larger than this is not cached at all.
    pub max_entry_bytes: u64,
    /// How many entries a single eviction sweep removes.
    pub sweep_batch_size: usize,
    /// How long an entry survives even without eviction pressure.
    pub ttl: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_bytes: 500 * 1024 * 1024,
            max_entry_bytes: 50 * 1024 * 1024,
            sweep_batch_size: 50,
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

#[derive(Debug)]
struct Entry {
    chunks: Arc<Vec<DocumentChunk>>,
    byte_size: u64,
    created_at: Instant,
    last_access: Instant,
}

/// An in-process, in-memory chunk cache keyed by content+options fingerprint.
///
/// At most one build per key is ever in flight: concurrent callers racing on
/// a miss for the same key block on the first caller's build rather than
/// duplicating work, via a per-key lock held only for the duration of the
/// build.
#[derive(Debug)]
pub struct Cache {
    options: CacheOptions,
    entries: RwLock<HashMap<String, Entry>>,
    build_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Cache {
    /// Creates an empty cache with the given bounds.
    #[must_use]
    pub fn new(options: CacheOptions) -> Self {
        Self { options, entries: RwLock::new(HashMap::new()), build_locks: Mutex::new(HashMap::new()) }
    }

    /// Returns the cached chunk list for `key` if present, fresh, and not
    /// expired, bumping its last-access time.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<Vec<DocumentChunk>>> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(key)?;
        if entry.created_at.elapsed() > self.options.ttl {
            entries.remove(key);
            return None;
        }
        entry.last_access = Instant::now();
        Some(entries.get(key).unwrap().chunks.clone())
    }

    /// Returns the cached value for `key`, or runs `build` to produce one,
    /// inserting it (subject to size bounds) and returning it.
    ///
    /// Concurrent callers for the same missing key block on the first
    /// caller's `build` rather than racing.
    pub fn get_or_build(
        &self,
        key: &str,
        build: impl FnOnce() -> Vec<DocumentChunk>,
    ) -> Arc<Vec<DocumentChunk>> {
        if let Some(hit) = self.get(key) {
            tracing::debug!(key, "cache hit");
            return hit;
        }

        let lock = {
            let mut locks = self.build_locks.lock();
            locks.entry(key.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        let _guard = lock.lock();

        if let Some(hit) = self.get(key) {
            self.build_locks.lock().remove(key);
            return hit;
        }

        tracing::debug!(key, "cache miss, building");
        let chunks = Arc::new(build());
        self.insert(key, chunks.clone());
        self.build_locks.lock().remove(key);
        chunks
    }

    fn insert(&self, key: &str, chunks: Arc<Vec<DocumentChunk>>) {
        let byte_size: u64 =
            chunks.iter().map(|c| c.content.len() as u64).sum::<u64>().max(1);
        if byte_size > self.options.max_entry_bytes {
            return;
        }

        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.insert(
            key.to_string(),
            Entry { chunks, byte_size, created_at: now, last_access: now },
        );
        self.evict_if_needed(&mut entries);
    }

    fn evict_if_needed(&self, entries: &mut HashMap<String, Entry>) {
        let total_bytes: u64 = entries.values().map(|e| e.byte_size).sum();
        let over_count = entries.len() > self.options.max_entries;
        let over_bytes = total_bytes > self.options.max_bytes;
        if !over_count && !over_bytes {
            return;
        }

        let mut by_age: Vec<(String, Instant)> =
            entries.iter().map(|(k, e)| (k.clone(), e.last_access)).collect();
        by_age.sort_by_key(|(_, last_access)| *last_access);

        let evicting: Vec<String> =
            by_age.into_iter().take(self.options.sweep_batch_size).map(|(k, _)| k).collect();
        tracing::debug!(count = evicting.len(), "evicting lru cache entries");
        for key in evicting {
            entries.remove(&key);
        }
    }

    /// Removes every entry whose `created_at` has exceeded the configured
    /// TTL. Intended to be called periodically by a background sweep.
    pub fn sweep_expired(&self) {
        let mut entries = self.entries.write();
        entries.retain(|_, e| e.created_at.elapsed() <= self.options.ttl);
    }

    /// Removes a single key, if present.
    pub fn evict(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache currently holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkQuality, PropertyBag};

    fn chunk(id: &str) -> DocumentChunk {
        DocumentChunk {
            id: id.to_string(),
            content: "hello world".to_string(),
            start: 0,
            end: 11,
            page: None,
            heading_path: vec![],
            sequence: 0,
            total: 1,
            quality: ChunkQuality::default(),
            strategy: "fixed".into(),
            tokens: 2,
            props: PropertyBag::new(),
            parent_id: None,
        }
    }

    #[test]
    fn second_build_reuses_the_cached_value() {
        let cache = Cache::new(CacheOptions::default());
        let mut build_calls = 0;
        let key = "k1";

        let first = cache.get_or_build(key, || {
            build_calls += 1;
            vec![chunk("a")]
        });
        let second = cache.get_or_build(key, || {
            build_calls += 1;
            vec![chunk("a")]
        });

        assert_eq!(build_calls, 1);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn eviction_respects_the_entry_count_bound() {
        let cache = Cache::new(CacheOptions { max_entries: 2, sweep_batch_size: 1, ..CacheOptions::default() });
        cache.get_or_build("a", || vec![chunk("a")]);
        cache.get_or_build("b", || vec![chunk("b")]);
        cache.get_or_build("c", || vec![chunk("c")]);
        assert!(cache.len() <= 2);
    }

    #[test]
    fn evict_then_rebuild_is_idempotent() {
        let cache = Cache::new(CacheOptions::default());
        let first = cache.get_or_build("k", || vec![chunk("a")]);
        cache.evict("k");
        let second = cache.get_or_build("k", || vec![chunk("a")]);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn oversized_entries_are_not_cached() {
        let cache = Cache::new(CacheOptions { max_entry_bytes: 1, ..CacheOptions::default() });
        cache.get_or_build("k", || vec![chunk("a")]);
        assert!(cache.is_empty());
    }
}
