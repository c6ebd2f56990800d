use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::storage::Storage;

const ENTRY_VERSION: u32 = 1;

/// Persisted cache payload. `md` is the raw markdown source, never the
/// converted HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Schema version; entries with an unknown version read as absent.
    pub v: u32,
    /// Fetch time, milliseconds since the Unix epoch.
    pub t: u64,
    pub md: String,
}

impl CacheEntry {
    pub fn is_fresh(&self, now_ms: u64, ttl: Duration) -> bool {
        now_ms.saturating_sub(self.t) < ttl.as_millis() as u64
    }
}

/// Wraps one storage slot holding the last fetched README.
///
/// Entries are never evicted, only superseded by the next successful
/// fetch; a stale entry simply reads as absent.
pub struct CacheStore {
    storage: Arc<dyn Storage>,
    key: String,
    ttl: Duration,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn Storage>, key: &str, ttl: Duration) -> Self {
        Self {
            storage,
            key: key.to_string(),
            ttl,
        }
    }

    /// Returns the cached markdown if a fresh, well-formed entry exists.
    ///
    /// A malformed entry reads as a miss: a corrupt cache must never block
    /// a reload.
    pub fn read(&self) -> Option<String> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %format!("{e:#}"), "cache read failed");
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %Error::CacheDecode(e),
                    "discarding malformed cache entry"
                );
                return None;
            }
        };
        if entry.v != ENTRY_VERSION {
            tracing::warn!(key = %self.key, version = entry.v, "discarding cache entry with unknown version");
            return None;
        }
        if !entry.is_fresh(now_ms(), self.ttl) {
            tracing::debug!(key = %self.key, "cache entry expired");
            return None;
        }
        Some(entry.md)
    }

    /// Stores `markdown` stamped with the current time, superseding any
    /// previous entry.
    pub fn write(&self, markdown: &str) -> anyhow::Result<()> {
        let entry = CacheEntry {
            v: ENTRY_VERSION,
            t: now_ms(),
            md: markdown.to_string(),
        };
        let raw = serde_json::to_string(&entry).context("encode cache entry")?;
        self.storage.write(&self.key, &raw)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStorage;

    const TTL: Duration = Duration::from_secs(24 * 60 * 60);

    fn store() -> CacheStore {
        CacheStore::new(Arc::new(MemStorage::default()), "readme", TTL)
    }

    fn seed(cache: &CacheStore, entry: &CacheEntry) {
        cache
            .storage
            .write("readme", &serde_json::to_string(entry).unwrap())
            .unwrap();
    }

    #[test]
    fn round_trip_is_exact() {
        let cache = store();
        let md = "# Skills\n\nnon-ascii: héllo\n";
        cache.write(md).unwrap();
        assert_eq!(cache.read().as_deref(), Some(md));
    }

    #[test]
    fn stale_entry_reads_as_absent() {
        let cache = store();
        seed(
            &cache,
            &CacheEntry {
                v: ENTRY_VERSION,
                t: now_ms() - TTL.as_millis() as u64,
                md: "old".to_string(),
            },
        );
        assert!(cache.read().is_none());
    }

    #[test]
    fn entry_just_inside_window_is_used() {
        let cache = store();
        seed(
            &cache,
            &CacheEntry {
                v: ENTRY_VERSION,
                t: now_ms() - TTL.as_millis() as u64 + 60_000,
                md: "recent".to_string(),
            },
        );
        assert_eq!(cache.read().as_deref(), Some("recent"));
    }

    #[test]
    fn freshness_boundary() {
        let entry = CacheEntry {
            v: ENTRY_VERSION,
            t: 1_000,
            md: String::new(),
        };
        let ttl_ms = TTL.as_millis() as u64;
        assert!(entry.is_fresh(1_000 + ttl_ms - 1, TTL));
        assert!(!entry.is_fresh(1_000 + ttl_ms, TTL));
    }

    #[test]
    fn malformed_entry_reads_as_absent() {
        let cache = store();
        cache.storage.write("readme", "{not json").unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn unknown_version_reads_as_absent() {
        let cache = store();
        seed(
            &cache,
            &CacheEntry {
                v: 99,
                t: now_ms(),
                md: "future".to_string(),
            },
        );
        assert!(cache.read().is_none());
    }
}
