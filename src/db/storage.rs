use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::{AppError, AppResult};

/// Durable string key-value storage
///
/// Values are plain strings; callers own their encoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores a value, overwriting any previous one
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Stores several values as one write where the backend allows it
    ///
    /// The default writes entries one at a time, attempting every entry and
    /// returning the last error.
    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        let mut result = Ok(());
        for (key, value) in entries {
            if let Err(e) = self.set(key, value).await {
                result = Err(e);
            }
        }
        result
    }

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Volatile storage, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> AppResult<()> {
        self.entries.write().await.extend(entries.iter().cloned());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Storage backed by a single JSON object on disk
///
/// The whole object is rewritten on every write, going through a temporary
/// file and a rename so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store, starting empty when the file is missing or unreadable
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed storage file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Storage file not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("Serialization error: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn set_many(&self, batch: &[(String, String)]) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        entries.extend(batch.iter().cloned());
        self.persist(&entries).await
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("mealmood-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_get_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("isVegan").await.unwrap(), None);

        store.set("isVegan", "true").await.unwrap();
        store.set("isVegan", "false").await.unwrap();
        assert_eq!(store.get("isVegan").await.unwrap(), Some("false".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let path = temp_path();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("isHalal").await.unwrap(), None);
        store.set("isHalal", "true").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("isHalal").await.unwrap(), Some("true".to_string()));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_ignores_malformed_file() {
        let path = temp_path();
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.get("isVegan").await.unwrap(), None);

        store.set("isVegan", "true").await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.get("isVegan").map(String::as_str), Some("true"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    fn batch(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_file_store_set_many_survives_reopen() {
        let path = temp_path();

        let store = FileStore::open(&path).await.unwrap();
        store.set("isVegan", "true").await.unwrap();
        store
            .set_many(&batch(&[("isVegan", "false"), ("isHalal", "true"), ("hasEggAllergy", "false")]))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("isVegan").await.unwrap(), Some("false".to_string()));
        assert_eq!(reopened.get("isHalal").await.unwrap(), Some("true".to_string()));
        assert_eq!(reopened.get("hasEggAllergy").await.unwrap(), Some("false".to_string()));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_set_many() {
        let store = MemoryStore::new();
        store
            .set_many(&batch(&[("isVegan", "true"), ("isHalal", "false")]))
            .await
            .unwrap();
        assert_eq!(store.get("isVegan").await.unwrap(), Some("true".to_string()));
        assert_eq!(store.get("isHalal").await.unwrap(), Some("false".to_string()));
    }

    /// Only implements the required methods; rejects one key
    struct PickyStore {
        inner: MemoryStore,
        rejected: &'static str,
    }

    #[async_trait]
    impl KeyValueStore for PickyStore {
        async fn get(&self, key: &str) -> AppResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> AppResult<()> {
            if key == self.rejected {
                return Err(AppError::Storage(format!("{} rejected", key)));
            }
            self.inner.set(key, value).await
        }

        fn name(&self) -> &'static str {
            "picky"
        }
    }

    #[tokio::test]
    async fn test_default_set_many_attempts_every_entry() {
        let store = PickyStore {
            inner: MemoryStore::new(),
            rejected: "isHalal",
        };
        let result = store
            .set_many(&batch(&[("isVegan", "true"), ("isHalal", "true"), ("hasNutAllergy", "true")]))
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(store.get("isVegan").await.unwrap(), Some("true".to_string()));
        assert_eq!(store.get("isHalal").await.unwrap(), None);
        assert_eq!(store.get("hasNutAllergy").await.unwrap(), Some("true".to_string()));
    }
}
