//! On-disk snapshot format.
//!
//! The store persists its full state as `{ "items": [...], "next_id": n }`.
//! Earlier deployments wrote a bare JSON array of items with no counter;
//! those files still load, with `next_id` recomputed from the highest
//! existing identifier.

use crate::models::Item;
use serde::{Deserialize, Serialize};

/// Full serialized state of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All item records, in insertion order.
    pub items: Vec<Item>,
    /// The identifier the next created item will receive.
    pub next_id: u64,
}

/// Either snapshot format accepted on load.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SnapshotFile {
    /// Current format: items plus the persisted counter.
    Current(Snapshot),
    /// Legacy format: a bare array of items, counter recomputed on load.
    Legacy(Vec<Item>),
}

impl SnapshotFile {
    /// Normalizes either format into a [`Snapshot`].
    ///
    /// For the legacy form the counter is `max(existing ids) + 1`, or `0`
    /// for an empty array, so identifiers stay unique across restarts.
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            Self::Current(snapshot) => snapshot,
            Self::Legacy(items) => {
                let next_id = items
                    .iter()
                    .map(|i| i.id.saturating_add(1))
                    .max()
                    .unwrap_or(0);
                Snapshot { items, next_id }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_format_keeps_counter() {
        let raw = r#"{"items": [{"id": 4, "name": "Saw"}], "next_id": 9}"#;
        let file: SnapshotFile = serde_json::from_str(raw).unwrap();
        let snapshot = file.into_snapshot();
        assert_eq!(snapshot.next_id, 9);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[test]
    fn legacy_array_recomputes_counter() {
        let raw = r#"[{"id": 0, "name": "Saw"}, {"id": 7, "name": "Drill"}]"#;
        let file: SnapshotFile = serde_json::from_str(raw).unwrap();
        let snapshot = file.into_snapshot();
        assert_eq!(snapshot.next_id, 8);
        assert_eq!(snapshot.items[1].name, "Drill");
    }

    #[test]
    fn empty_legacy_array_starts_at_zero() {
        let file: SnapshotFile = serde_json::from_str("[]").unwrap();
        assert_eq!(file.into_snapshot().next_id, 0);
    }

    #[test]
    fn legacy_max_id_saturates_instead_of_overflowing() {
        let raw = format!(r#"[{{"id": {}, "name": "Saw"}}]"#, u64::MAX);
        let file: SnapshotFile = serde_json::from_str(&raw).unwrap();
        // Load must never panic; the counter pins at the ceiling.
        assert_eq!(file.into_snapshot().next_id, u64::MAX);
    }
}
