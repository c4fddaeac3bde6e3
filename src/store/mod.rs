//! Inventory store: the single source of truth for item records.
//!
//! The store owns the ordered collection of items and the next-identifier
//! counter behind one mutex. Every mutation runs as a critical section:
//! lock, mutate, persist the full snapshot, release. Two concurrent writers
//! can therefore never interleave an identifier assignment or a snapshot
//! write.
//!
//! The snapshot lives at `inventory.json` inside the cache directory and is
//! replaced atomically (write to a temp path, then rename), so a reader
//! never observes a partial write.

mod persist;

pub use persist::SNAPSHOT_FILE;

use crate::models::{Item, ItemDraft, ItemPatch, Snapshot};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory store state guarded by the mutex.
#[derive(Debug, Default)]
struct StoreState {
    /// All records, in insertion order.
    items: Vec<Item>,
    /// Identifier for the next created record. Monotonic for the lifetime
    /// of the store; restored from the snapshot on load.
    next_id: u64,
}

/// Mutex-guarded item collection with full-snapshot persistence.
#[derive(Debug)]
pub struct InventoryStore {
    state: Mutex<StoreState>,
    snapshot_path: PathBuf,
}

impl InventoryStore {
    /// Opens the store backed by `inventory.json` under `cache_dir`.
    ///
    /// A missing snapshot file yields an empty store. A corrupt or
    /// unreadable snapshot is logged and likewise degrades to an empty
    /// store; startup never fails over snapshot contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created.
    pub fn open(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| Error::operation("create_cache_dir", e))?;

        let snapshot_path = cache_dir.join(SNAPSHOT_FILE);
        let snapshot = persist::load(&snapshot_path);
        tracing::info!(
            items = snapshot.items.len(),
            next_id = snapshot.next_id,
            path = %snapshot_path.display(),
            "Inventory store opened"
        );

        Ok(Self {
            state: Mutex::new(StoreState {
                items: snapshot.items,
                next_id: snapshot.next_id,
            }),
            snapshot_path,
        })
    }

    /// Creates a new item from the draft.
    ///
    /// Assigns the next identifier, appends the record, and persists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is empty after trimming, or
    /// `OperationFailed` if the snapshot cannot be written.
    pub fn create(&self, draft: ItemDraft) -> Result<Item> {
        if draft.name.trim().is_empty() {
            return Err(Error::InvalidInput("inventory_name is required".to_string()));
        }

        let mut state = self.lock();
        let item = Item {
            id: state.next_id,
            name: draft.name,
            description: draft.description,
            photo: draft.photo,
        };
        state.next_id += 1;
        state.items.push(item.clone());
        self.persist(&state)?;

        tracing::info!(id = item.id, name = %item.name, "Item registered");
        Ok(item)
    }

    /// Fetches one item by identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record matches.
    pub fn get(&self, id: u64) -> Result<Item> {
        let state = self.lock();
        state
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("item {id}")))
    }

    /// Returns all items in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// Applies a patch to an item's name and description.
    ///
    /// A field absent from the patch leaves the stored value untouched. A
    /// field present and empty is an explicit value: it clears the
    /// description, and is rejected for the name (which must stay
    /// non-empty). A patch carrying no fields at all changes nothing and
    /// skips the snapshot write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown identifier, `InvalidInput` for an
    /// explicitly empty name, or `OperationFailed` if persisting fails.
    pub fn update(&self, id: u64, patch: ItemPatch) -> Result<Item> {
        if patch.is_empty() {
            return self.get(id);
        }

        if let Some(name) = &patch.name
            && name.trim().is_empty()
        {
            return Err(Error::InvalidInput("name cannot be empty".to_string()));
        }

        let mut state = self.lock();
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::NotFound(format!("item {id}")))?;

        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        let updated = item.clone();
        self.persist(&state)?;

        tracing::debug!(id, "Item updated");
        Ok(updated)
    }

    /// Rebinds an item's photo reference, returning the superseded one.
    ///
    /// This is the only way `photo` changes after creation; item updates
    /// never touch it. The caller is responsible for deleting the file
    /// behind the returned reference.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown identifier, or `OperationFailed`
    /// if persisting fails.
    pub fn set_photo(&self, id: u64, photo: Option<String>) -> Result<Option<String>> {
        let mut state = self.lock();
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::NotFound(format!("item {id}")))?;

        let previous = std::mem::replace(&mut item.photo, photo);
        self.persist(&state)?;
        Ok(previous)
    }

    /// Removes an item and returns the removed record.
    ///
    /// The returned record still carries its photo reference so the caller
    /// can release the file.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown identifier, or `OperationFailed`
    /// if persisting fails.
    pub fn delete(&self, id: u64) -> Result<Item> {
        let mut state = self.lock();
        let index = state
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| Error::NotFound(format!("item {id}")))?;

        let removed = state.items.remove(index);
        self.persist(&state)?;

        tracing::info!(id, "Item deleted");
        Ok(removed)
    }

    /// Returns the path of the snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // A poisoned mutex means another writer panicked mid-mutation; the
        // state itself is still a coherent Vec, so recover the guard.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        let snapshot = Snapshot {
            items: state.items.clone(),
            next_id: state.next_id,
        };
        persist::write(&self.snapshot_path, &snapshot)
    }
}
