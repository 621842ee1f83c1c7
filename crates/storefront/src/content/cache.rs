//! Feed cache: persisted `{ data, timestamp }` records behind an in-process
//! `moka` cache.
//!
//! A record is fresh while `now - timestamp < ttl`. Stale or unreadable
//! records count as misses and are left for the next write to replace.

use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::sheets::SheetKind;
use crate::storage::SharedStore;

/// One cached feed result as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub data: Value,
    /// Unix time of the write, in milliseconds.
    pub timestamp: i64,
}

impl CacheRecord {
    /// Whether the record is younger than `ttl` at `now_ms`.
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) < ttl_ms
    }
}

/// Two-level cache for feed results.
#[derive(Clone)]
pub struct FeedCache {
    store: SharedStore,
    ttl: Duration,
    memory: Cache<SheetKind, CacheRecord>,
}

impl FeedCache {
    /// Create a cache persisting into `store`.
    #[must_use]
    pub fn new(store: SharedStore, ttl: Duration) -> Self {
        let memory = Cache::builder()
            .max_capacity(32)
            .time_to_live(ttl)
            .build();
        Self { store, ttl, memory }
    }

    /// Freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh cached data for `kind`, if any.
    pub async fn get<T: DeserializeOwned>(&self, kind: SheetKind) -> Option<T> {
        let now = Utc::now().timestamp_millis();

        let record = match self.memory.get(&kind).await {
            Some(record) => record,
            None => {
                let record = self.read_record(kind)?;
                self.memory.insert(kind, record.clone()).await;
                record
            }
        };

        if !record.is_fresh(now, self.ttl) {
            debug!(%kind, "Cache record is stale");
            return None;
        }

        match serde_json::from_value(record.data) {
            Ok(data) => {
                debug!(%kind, "Cache hit");
                Some(data)
            }
            Err(e) => {
                debug!(%kind, error = %e, "Cache record has unexpected shape");
                None
            }
        }
    }

    /// Store `data` for `kind`, stamped with the current time.
    ///
    /// Persistence failures are logged; the in-process entry is still set.
    pub async fn put<T: Serialize>(&self, kind: SheetKind, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                warn!(%kind, error = %e, "Failed to serialize cache record");
                return;
            }
        };
        let record = CacheRecord {
            data,
            timestamp: Utc::now().timestamp_millis(),
        };

        match serde_json::to_string(&record) {
            Ok(json) => {
                if let Err(e) = self.store.set(kind.cache_key(), &json) {
                    warn!(%kind, error = %e, "Failed to persist cache record");
                }
            }
            Err(e) => warn!(%kind, error = %e, "Failed to serialize cache record"),
        }

        self.memory.insert(kind, record).await;
    }

    /// Remove every cached feed, persisted and in-process.
    pub async fn clear_all(&self) {
        for kind in SheetKind::ALL {
            if let Err(e) = self.store.remove(kind.cache_key()) {
                warn!(%kind, error = %e, "Failed to remove cache record");
            }
        }
        self.memory.invalidate_all();
        self.memory.run_pending_tasks().await;
        debug!("All feed caches cleared");
    }

    fn read_record(&self, kind: SheetKind) -> Option<CacheRecord> {
        let raw = match self.store.get(kind.cache_key()) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(%kind, error = %e, "Failed to read cache record");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| debug!(%kind, error = %e, "Discarding malformed cache record"))
            .ok()
    }
}
