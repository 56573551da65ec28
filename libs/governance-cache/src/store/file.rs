//! Durable store persisted to a JSON file.
//!
//! Reads are served from memory. Every write (or batch of writes) snapshots
//! the unexpired entries to disk with write-to-temp-then-rename on the
//! blocking pool, so a crash never leaves a torn file behind and the proposal
//! cache survives restarts.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::memory::{Entry, MemoryStore};
use super::{CacheTtl, KeyValueStore, StoreError};

/// Default path for the cache file
pub const DEFAULT_CACHE_PATH: &str = "./governance-cache.json";

/// Environment variable name for cache path configuration
pub const CACHE_PATH_ENV_VAR: &str = "CACHE_PATH";

pub struct JsonFileStore {
    path: PathBuf,
    memory: MemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing entries.
    ///
    /// A missing file starts an empty store; an unreadable or invalid file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::load(&path)?;

        tracing::info!(
            target: "cache_store",
            path = %path.display(),
            entries = entries.len(),
            "Opened cache file"
        );

        Ok(Self {
            path,
            memory: MemoryStore::from_entries(entries),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<HashMap<String, Entry>, StoreError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            key: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Flush the current contents to disk. Writers are serialized so a newer
    /// snapshot is never overwritten by an older one.
    async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let path_str = self.path.display().to_string();

        let expired = self.memory.cleanup();
        if expired > 0 {
            tracing::debug!(target: "cache_store", expired, "Dropped expired entries");
        }

        let json = serde_json::to_string_pretty(&self.memory.snapshot()).map_err(|e| {
            StoreError::Serialize {
                key: path_str.clone(),
                reason: e.to_string(),
            }
        })?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &json))
            .await
            .map_err(|e| StoreError::Write {
                path: path_str,
                reason: format!("Persist task failed: {}", e),
            })?
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    let path_str = path.display().to_string();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                path: path_str.clone(),
                reason: format!("Failed to create parent directories: {}", e),
            })?;
        }
    }

    let temp_path = PathBuf::from(format!("{}.tmp", path_str));
    let write_err = |e: std::io::Error| StoreError::Write {
        path: temp_path.display().to_string(),
        reason: e.to_string(),
    };

    let mut file = fs::File::create(&temp_path).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::Write {
        path: path_str,
        reason: format!("Failed to rename '{}': {}", temp_path.display(), e),
    })
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.memory.get_entry(key))
    }

    async fn set(&self, key: &str, value: Value, ttl: CacheTtl) -> Result<(), StoreError> {
        self.memory.set_entry(key, value, ttl);
        self.persist().await
    }

    async fn set_many(&self, entries: Vec<(String, Value, CacheTtl)>) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        for (key, value, ttl) in entries {
            self.memory.set_entry(&key, value, ttl);
        }
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn unique_temp_cache_path() -> PathBuf {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let mut path = std::env::temp_dir();
        path.push(format!(
            "governance_store_test_{}_{}.json",
            std::process::id(),
            counter
        ));
        path
    }

    fn cleanup_temp_file(path: &Path) {
        let _ = fs::remove_file(path);
        let _ = fs::remove_file(format!("{}.tmp", path.display()));
    }

    #[tokio::test]
    async fn test_open_nonexistent_file() {
        let path = unique_temp_cache_path();
        cleanup_temp_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let path = unique_temp_cache_path();
        cleanup_temp_file(&path);

        {
            let store = JsonFileStore::open(&path).unwrap();
            store
                .set("proposals:lastBlock:1", json!(1200), CacheTtl::Never)
                .await
                .unwrap();
            store
                .set("votes:7", json!({"forVotes": "1"}), CacheTtl::Seconds(300))
                .await
                .unwrap();
        }

        assert!(path.exists());
        assert!(!PathBuf::from(format!("{}.tmp", path.display())).exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("proposals:lastBlock:1").await.unwrap(),
            Some(json!(1200))
        );
        assert_eq!(
            reopened.get("votes:7").await.unwrap(),
            Some(json!({"forVotes": "1"}))
        );

        cleanup_temp_file(&path);
    }

    #[tokio::test]
    async fn test_set_many_is_written_in_one_snapshot() {
        let path = unique_temp_cache_path();
        cleanup_temp_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        store
            .set_many(vec![
                ("proposals:1:5".to_string(), json!({"title": "five"}), CacheTtl::Never),
                ("proposals:ids:1".to_string(), json!(["5"]), CacheTtl::Never),
                ("proposals:lastBlock:1".to_string(), json!(900), CacheTtl::Never),
            ])
            .await
            .unwrap();

        let on_disk: HashMap<String, Entry> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 3);
        assert_eq!(on_disk["proposals:lastBlock:1"].value, json!(900));
        assert!(on_disk["proposals:ids:1"].expires_at.is_none());

        cleanup_temp_file(&path);
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_create_file() {
        let path = unique_temp_cache_path();
        cleanup_temp_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        store.set_many(Vec::new()).await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_writes_keep_every_key() {
        let path = unique_temp_cache_path();
        cleanup_temp_file(&path);

        let store = std::sync::Arc::new(JsonFileStore::open(&path).unwrap());
        let writes = (0..8).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .set(&format!("votes:{}", i), json!(i), CacheTtl::Seconds(300))
                    .await
            })
        });
        for write in futures::future::join_all(writes).await {
            write.unwrap().unwrap();
        }

        let reopened = JsonFileStore::open(&path).unwrap();
        for i in 0..8 {
            assert_eq!(
                reopened.get(&format!("votes:{}", i)).await.unwrap(),
                Some(json!(i))
            );
        }

        cleanup_temp_file(&path);
    }

    #[test]
    fn test_open_invalid_file_is_error() {
        let path = unique_temp_cache_path();
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StoreError::Parse { .. })));

        cleanup_temp_file(&path);
    }
}
