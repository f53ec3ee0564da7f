use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hyperdash_core::saved::{KeyValueStore, MemoryStore, NoopStore, SavedAddresses};
use hyperdash_core::{CoreError, CoreResult};
use parking_lot::Mutex;

use crate::config::{StorageBackend, StorageConfig};

/// Key-value store persisted as one JSON object on disk.
///
/// The whole file is rewritten on every change; a missing file reads as
/// empty.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> CoreResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "Store file is corrupt, starting empty");
                BTreeMap::new()
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| storage_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, e))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> CoreError {
    CoreError::Storage(format!("{}: {}", path.display(), e))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Build the saved-address list for the configured backend.
pub fn saved_addresses(config: &StorageConfig) -> SavedAddresses {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::File => {
            let store = FileStore::new(&config.path);
            tracing::info!(path = %store.path().display(), "Saved addresses persisted to file");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::info!("Saved addresses kept in memory");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::None => {
            tracing::info!("Saved addresses disabled");
            Arc::new(NoopStore)
        }
    };
    SavedAddresses::new(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const A: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("store.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get("anything").unwrap(), None);
        store.remove("anything").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let (store, _temp) = create_test_store();
        store.set("k", "v").unwrap();
        store.set("other", "w").unwrap();

        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));

        reopened.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_saved_addresses_on_disk() {
        let (store, _temp) = create_test_store();
        let path = store.path().to_path_buf();
        let saved = SavedAddresses::new(Arc::new(store));

        saved.add(A).unwrap();
        saved.add(A).unwrap();
        assert_eq!(saved.list(), vec![A]);

        let on_disk: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let list: Vec<String> =
            serde_json::from_str(&on_disk[hyperdash_core::saved::ADDRESSES_KEY]).unwrap();
        assert_eq!(list, vec![A]);

        saved.clear().unwrap();
        assert!(saved.list().is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let (store, _temp) = create_test_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_backend_selection() {
        let config = |backend| StorageConfig {
            backend,
            path: String::new(),
        };
        let memory = saved_addresses(&config(StorageBackend::Memory));
        memory.add(A).unwrap();
        assert_eq!(memory.list(), vec![A]);

        let none = saved_addresses(&config(StorageBackend::None));
        none.add(A).unwrap();
        assert!(none.list().is_empty());
    }
}
