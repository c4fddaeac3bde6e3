//! Core data types.

mod item;
mod snapshot;

pub use item::{Item, ItemDraft, ItemPatch};
pub use snapshot::{Snapshot, SnapshotFile};
