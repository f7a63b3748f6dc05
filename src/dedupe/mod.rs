//! Duplicate suppression for created calendar events.
//!
//! Each created event is identified by a fingerprint of its (title, start,
//! end) triple. A `SeenStore` records fingerprints of events already created,
//! so repeated runs never create the same event twice.

mod file;
mod memory;

pub use file::FileSeenStore;
pub use memory::MemorySeenStore;

use crate::error::Result;
use sha1::{Digest, Sha1};

/// Compute the fingerprint of a calendar event.
///
/// The digest is SHA-1 over `"{title}|{start}|{end}"`, hex-encoded. Inputs
/// must already be normalized (see `agent::tools::normalize_iso8601`): the
/// comparison is textual, so two spellings of the same instant with different
/// offsets fingerprint differently.
pub fn fingerprint(title: &str, start_iso: &str, end_iso: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("{}|{}|{}", title, start_iso, end_iso).as_bytes());
    hex::encode(hasher.finalize())
}

/// Trait for seen-event store implementations.
///
/// The check-then-insert sequence around event creation is not atomic: two
/// concurrent processes sharing one store can both pass `contains` and both
/// create the event. Single-process use only; a transactional backing store
/// can be substituted through this trait without touching tool logic.
pub trait SeenStore: Send + Sync {
    /// Whether this fingerprint has already been recorded.
    fn contains(&self, fingerprint: &str) -> Result<bool>;

    /// Record a fingerprint, persisting if the store is durable.
    fn insert(&self, fingerprint: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let a = fingerprint("Study: Linear Algebra", "2025-03-01T15:00:00Z", "2025-03-01T17:00:00Z");
        let b = fingerprint("Study: Linear Algebra", "2025-03-01T15:00:00Z", "2025-03-01T17:00:00Z");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_sensitive_to_each_field() {
        let base = fingerprint("Study", "2025-03-01T15:00:00Z", "2025-03-01T17:00:00Z");
        assert_ne!(
            base,
            fingerprint("Review", "2025-03-01T15:00:00Z", "2025-03-01T17:00:00Z")
        );
        assert_ne!(
            base,
            fingerprint("Study", "2025-03-01T16:00:00Z", "2025-03-01T17:00:00Z")
        );
        assert_ne!(
            base,
            fingerprint("Study", "2025-03-01T15:00:00Z", "2025-03-01T18:00:00Z")
        );
    }
}
