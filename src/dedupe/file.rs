//! File-backed seen-event store.

use super::SeenStore;
use crate::error::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Seen-event store persisted as a JSON array of hex digests.
///
/// The file holds a sorted array so it stays human-inspectable and diffs
/// cleanly. It is rewritten wholesale on every insert; this store is the
/// file's sole owner.
pub struct FileSeenStore {
    path: PathBuf,
}

impl FileSeenStore {
    /// Create a store backed by the given file. The file is created lazily
    /// on the first insert.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<BTreeSet<String>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let seen: Vec<String> = serde_json::from_str(&content)?;
        Ok(seen.into_iter().collect())
    }

    fn save(&self, seen: &BTreeSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // BTreeSet iterates in sorted order, so the array is stored sorted.
        let entries: Vec<&String> = seen.iter().collect();
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

impl SeenStore for FileSeenStore {
    fn contains(&self, fingerprint: &str) -> Result<bool> {
        Ok(self.load()?.contains(fingerprint))
    }

    fn insert(&self, fingerprint: &str) -> Result<()> {
        let mut seen = self.load()?;
        seen.insert(fingerprint.to_string());
        self.save(&seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSeenStore::new(dir.path().join("seen.json"));
        assert!(!store.contains("deadbeef").unwrap());
    }

    #[test]
    fn test_round_trip_independent_of_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let store = FileSeenStore::new(path.clone());
        store.insert("ffff").unwrap();
        store.insert("0000").unwrap();
        store.insert("aaaa").unwrap();

        // Stored sorted regardless of insertion order.
        let content = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<String> = serde_json::from_str(&content).unwrap();
        assert_eq!(entries, vec!["0000", "aaaa", "ffff"]);

        // A fresh store over the same file sees the same set.
        let reloaded = FileSeenStore::new(path);
        assert!(reloaded.contains("aaaa").unwrap());
        assert!(reloaded.contains("ffff").unwrap());
        assert!(!reloaded.contains("bbbb").unwrap());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let store = FileSeenStore::new(path.clone());
        store.insert("aaaa").unwrap();
        store.insert("aaaa").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<String> = serde_json::from_str(&content).unwrap();
        assert_eq!(entries, vec!["aaaa"]);
    }
}
