//! Key-value cache store used by the proposal cache and the vote aggregator.
//!
//! Values are JSON documents. Every key carries its own expiry; an expired key
//! reads as a miss. There are no cross-key transactions.

mod file;
mod memory;

pub use file::{JsonFileStore, CACHE_PATH_ENV_VAR, DEFAULT_CACHE_PATH};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// How long a stored value stays readable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    Never,
    Seconds(u64),
}

impl CacheTtl {
    /// `0` means the value never expires
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            CacheTtl::Never
        } else {
            CacheTtl::Seconds(secs)
        }
    }

    pub fn as_secs(&self) -> u64 {
        match self {
            CacheTtl::Never => 0,
            CacheTtl::Seconds(secs) => *secs,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, CacheTtl::Never)
    }
}

/// Errors that can occur during cache store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read cache file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to write cache file '{path}': {reason}")]
    Write { path: String, reason: String },

    #[error("Failed to parse cached value for '{key}': {reason}")]
    Parse { key: String, reason: String },

    #[error("Failed to serialize value for '{key}': {reason}")]
    Serialize { key: String, reason: String },
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value, ttl: CacheTtl) -> Result<(), StoreError>;

    /// Write `entries` in order. Persistent stores override this to flush once
    /// for the whole batch.
    async fn set_many(&self, entries: Vec<(String, Value, CacheTtl)>) -> Result<(), StoreError> {
        for (key, value, ttl) in entries {
            self.set(&key, value, ttl).await?;
        }
        Ok(())
    }
}

/// Read `key` and deserialize it. A value of the wrong shape is an error, not a miss.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::Parse {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

pub fn to_json_value<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialize {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    ttl: CacheTtl,
) -> Result<(), StoreError> {
    let value = to_json_value(key, value)?;
    store.set(key, value, ttl).await
}
