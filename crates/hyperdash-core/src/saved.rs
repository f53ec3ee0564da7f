//! Saved-address list over an injected key-value store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::CoreResult;

/// Key the address list is stored under.
pub const ADDRESSES_KEY: &str = "hyperliquid_addresses";

/// Minimal string key-value capability backing the saved list.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Store for contexts without persistence: reads are empty, writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

impl KeyValueStore for NoopStore {
    fn get(&self, _key: &str) -> CoreResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> CoreResult<()> {
        Ok(())
    }
}

/// Ordered, duplicate-free list of addresses the user has looked up,
/// persisted as a JSON array of strings under [`ADDRESSES_KEY`].
///
/// Updates are serialized within a process through a lock shared by all
/// clones. Read-modify-write is not atomic across processes sharing one
/// backing store.
#[derive(Clone)]
pub struct SavedAddresses {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl SavedAddresses {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Saved addresses in insertion order. A missing, unreadable or
    /// malformed entry reads as an empty list.
    pub fn list(&self) -> Vec<String> {
        match self.store.get(ADDRESSES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_default(),
            Ok(None) | Err(_) => vec![],
        }
    }

    /// Append `address` unless an identical string is already saved.
    pub fn add(&self, address: &str) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut addresses = self.list();
        if addresses.iter().any(|a| a == address) {
            return Ok(());
        }
        addresses.push(address.to_string());
        self.write(&addresses)
    }

    /// Drop an exact match. Absent addresses are ignored.
    pub fn remove(&self, address: &str) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        let addresses: Vec<String> = self.list().into_iter().filter(|a| a != address).collect();
        self.write(&addresses)
    }

    pub fn clear(&self) -> CoreResult<()> {
        let _guard = self.write_lock.lock();
        self.store.remove(ADDRESSES_KEY)
    }

    fn write(&self, addresses: &[String]) -> CoreResult<()> {
        let raw = serde_json::to_string(addresses)?;
        self.store.set(ADDRESSES_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "0x1234567890abcdef1234567890abcdef12345678";
    const B: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

    fn memory_list() -> (SavedAddresses, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SavedAddresses::new(store.clone()), store)
    }

    #[test]
    fn test_add_is_deduplicated_and_ordered() {
        let (saved, store) = memory_list();
        saved.add(A).unwrap();
        saved.add(B).unwrap();
        saved.add(A).unwrap();

        assert_eq!(saved.list(), vec![A, B]);
        assert_eq!(
            store.get(ADDRESSES_KEY).unwrap().unwrap(),
            serde_json::to_string(&[A, B]).unwrap()
        );
    }

    #[test]
    fn test_remove() {
        let (saved, _) = memory_list();
        saved.add(A).unwrap();
        saved.add(B).unwrap();

        saved.remove("0xnot-saved").unwrap();
        assert_eq!(saved.list(), vec![A, B]);

        saved.remove(A).unwrap();
        assert_eq!(saved.list(), vec![B]);
    }

    #[test]
    fn test_clear() {
        let (saved, store) = memory_list();
        saved.add(A).unwrap();
        saved.clear().unwrap();

        assert!(saved.list().is_empty());
        assert_eq!(store.get(ADDRESSES_KEY).unwrap(), None);
    }

    #[test]
    fn test_malformed_entry_reads_empty() {
        let (saved, store) = memory_list();
        store.set(ADDRESSES_KEY, "{not json").unwrap();
        assert!(saved.list().is_empty());

        saved.add(A).unwrap();
        assert_eq!(saved.list(), vec![A]);
    }

    #[test]
    fn test_concurrent_adds_are_all_kept() {
        let (saved, _) = memory_list();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let saved = saved.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        saved.add(&format!("0x{:040x}", t * 1000 + i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let list = saved.list();
        assert_eq!(list.len(), 1600);
        let unique: std::collections::HashSet<_> = list.iter().collect();
        assert_eq!(unique.len(), 1600);
    }

    #[test]
    fn test_noop_store_lists_nothing() {
        let saved = SavedAddresses::new(Arc::new(NoopStore));
        saved.add(A).unwrap();
        assert!(saved.list().is_empty());
        saved.clear().unwrap();
    }
}
