use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CacheTtl, KeyValueStore, StoreError};

/// Stored value with its expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Entry {
    pub(crate) value: Value,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn new(value: Value, ttl: CacheTtl, now: DateTime<Utc>) -> Self {
        let expires_at = match ttl {
            CacheTtl::Never => None,
            CacheTtl::Seconds(secs) => {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                Duration::try_seconds(secs).and_then(|ttl| now.checked_add_signed(ttl))
            }
        };
        Self { value, expires_at }
    }

    pub(crate) fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// In-process store with per-key expiry
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries, returning how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub(crate) fn get_entry(&self, key: &str) -> Option<Value> {
        let now = Utc::now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    pub(crate) fn set_entry(&self, key: &str, value: Value, ttl: CacheTtl) {
        let entry = Entry::new(value, ttl, Utc::now());
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Unexpired entries, for persistence
    pub(crate) fn snapshot(&self) -> HashMap<String, Entry> {
        let now = Utc::now();
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    pub(crate) fn from_entries(entries: HashMap<String, Entry>) -> Self {
        let store = Self::new();
        let now = Utc::now();
        store
            .entries
            .write()
            .extend(entries.into_iter().filter(|(_, entry)| entry.is_live(now)));
        store
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value = self.get_entry(key);
        if value.is_none() {
            tracing::trace!(target: "cache_store", key, "Cache miss");
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value, ttl: CacheTtl) -> Result<(), StoreError> {
        self.set_entry(key, value, ttl);
        Ok(())
    }
}
