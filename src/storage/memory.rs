//! In-memory storage

use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use super::{KeyValueStore, StorageError};

/// In-memory key-value store.
///
/// Clones share the same entries, the way every tab of an origin shares one
/// browser storage area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<FxHashMap<String, Vec<u8>>>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects values larger than `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Rc::default(),
            quota: Some(quota),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if let Some(limit) = self.quota
            && value.len() > limit
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                size: value.len(),
                limit,
            });
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_missing_key_returns_none() -> TestResult {
        let store = MemoryStore::new();

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let mut store = MemoryStore::new();

        store.set("cart", b"[]")?;

        assert_eq!(store.get("cart")?, Some(b"[]".to_vec()));
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[test]
    fn remove_deletes_value_and_tolerates_missing_keys() -> TestResult {
        let mut store = MemoryStore::new();

        store.set("cart", b"[]")?;
        store.remove("cart")?;
        store.remove("cart")?;

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn clones_share_entries() -> TestResult {
        let mut store = MemoryStore::new();
        let observer = store.clone();

        store.set("token", b"abc")?;

        assert_eq!(observer.get("token")?, Some(b"abc".to_vec()));

        Ok(())
    }

    #[test]
    fn quota_rejects_large_values() {
        let mut store = MemoryStore::with_quota(4);

        let result = store.set("cart", b"too large");

        assert!(
            matches!(
                result,
                Err(StorageError::QuotaExceeded { size: 9, limit: 4, .. })
            ),
            "expected QuotaExceeded, got {result:?}"
        );
        assert!(store.is_empty());
    }
}
