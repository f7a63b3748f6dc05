//! In-memory seen-event store, primarily for tests.

use super::SeenStore;
use crate::error::Result;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Non-durable seen-event store holding fingerprints in memory.
#[derive(Default)]
pub struct MemorySeenStore {
    seen: Mutex<BTreeSet<String>>,
}

impl MemorySeenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded fingerprints.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeenStore for MemorySeenStore {
    fn contains(&self, fingerprint: &str) -> Result<bool> {
        Ok(self.seen.lock().unwrap().contains(fingerprint))
    }

    fn insert(&self, fingerprint: &str) -> Result<()> {
        self.seen.lock().unwrap().insert(fingerprint.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_after_insert() {
        let store = MemorySeenStore::new();
        assert!(!store.contains("aaaa").unwrap());
        store.insert("aaaa").unwrap();
        assert!(store.contains("aaaa").unwrap());
        assert_eq!(store.len(), 1);
    }
}
