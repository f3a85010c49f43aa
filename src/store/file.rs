//! Key-value store backed by a single JSON file.

use super::{KeyValueStore, StoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Keeps every key in memory and writes the whole map on [`flush`](Self::flush).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open the store, starting empty when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let values = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Opened store {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Write pending changes to disk. A no-op when nothing changed.
    pub async fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&self.values)?;
        tokio::fs::write(&self.path, content).await?;
        self.dirty = false;

        debug!("Flushed {} keys to {}", self.values.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use tempfile::TempDir;
    use tokio_test::block_on;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = block_on(JsonFileStore::open(dir.path().join("store.json"))).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_flush_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = block_on(JsonFileStore::open(&path)).unwrap();
        store.set("food_entries:u", "[]".to_string());
        block_on(store.flush()).unwrap();
        assert!(path.exists());

        let reopened = block_on(JsonFileStore::open(&path)).unwrap();
        assert_eq!(reopened.get("food_entries:u").as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let result = block_on(JsonFileStore::open(&path));
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
