//! Snapshot file I/O.

use crate::models::{Snapshot, SnapshotFile};
use crate::{Error, Result};
use std::path::Path;

/// Fixed name of the snapshot file inside the cache directory.
pub const SNAPSHOT_FILE: &str = "inventory.json";

/// Loads a snapshot, tolerating every failure mode.
///
/// A missing file is a fresh deployment; a corrupt or unreadable file is
/// logged and treated as empty. Startup never aborts over snapshot
/// contents.
pub fn load(path: &Path) -> Snapshot {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No snapshot file, starting empty");
        return Snapshot::default();
    }

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read snapshot, starting empty");
            return Snapshot::default();
        }
    };

    match serde_json::from_str::<SnapshotFile>(&raw) {
        Ok(file) => file.into_snapshot(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt snapshot, starting empty");
            Snapshot::default()
        }
    }
}

/// Writes the full snapshot, replacing the previous file atomically.
///
/// The serialized state goes to a sibling temp path first and is renamed
/// over the snapshot file, so a concurrent load sees either the old state
/// or the new one, never a partial write.
///
/// # Errors
///
/// Returns `OperationFailed` if serialization, the write, or the rename
/// fails. Callers must surface this to the requester; a dropped persist
/// would let memory and disk diverge.
pub fn write(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| Error::operation("serialize_snapshot", e))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| Error::operation("write_snapshot", e))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::operation("replace_snapshot", e))?;

    tracing::trace!(items = snapshot.items.len(), "Snapshot persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        Snapshot {
            items: vec![Item {
                id: 0,
                name: "Drill".to_string(),
                description: String::new(),
                photo: None,
            }],
            next_id: 1,
        }
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);

        let snapshot = sample();
        write(&path, &snapshot).unwrap();
        assert_eq!(load(&path), snapshot);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let snapshot = load(&dir.path().join(SNAPSHOT_FILE));
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(load(&path), Snapshot::default());
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SNAPSHOT_FILE);
        write(&path, &sample()).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
    }
}
