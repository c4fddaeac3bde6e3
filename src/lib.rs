//! # Stockroom
//!
//! A small inventory registry service with photo attachments.
//!
//! Stockroom keeps an ordered collection of inventory items in memory,
//! mirrors it to a single JSON snapshot file after every mutation, and
//! exposes the collection over a REST surface. Each item may own at most
//! one uploaded photo, stored next to the snapshot inside the cache
//! directory and deleted when superseded or when the item is removed.
//!
//! ## Features
//!
//! - Single-binary distribution, no external database
//! - Full-snapshot persistence with atomic replace (temp file + rename)
//! - Monotonic identifier assignment, restored from the snapshot on load
//! - Photo lifecycle bound to item lifecycle (replace and delete release
//!   the superseded file)
//! - Legacy bare-array snapshots load transparently
//!
//! ## Example
//!
//! ```rust,ignore
//! use stockroom::{InventoryStore, ItemDraft};
//!
//! let store = InventoryStore::open(cache_dir)?;
//! let item = store.create(ItemDraft {
//!     name: "Drill".to_string(),
//!     ..Default::default()
//! })?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod photo;
pub mod server;
pub mod store;

// Re-exports for convenience
pub use config::ServerConfig;
pub use models::{Item, ItemDraft, ItemPatch, Snapshot};
pub use photo::PhotoStore;
pub use server::build_router;
pub use store::InventoryStore;

/// Error type for stockroom operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing required fields, empty item names, malformed photo references |
/// | `NotFound` | Unknown item identifier, item without a photo, photo file gone from disk |
/// | `OperationFailed` | Snapshot write/rename fails, photo file I/O fails, listener cannot bind |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - The item name is missing or empty at creation
    /// - An update explicitly sets the name to an empty string
    /// - A photo upload carries no file
    /// - A photo reference contains path separators or `..`
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested entity does not exist.
    ///
    /// Raised when:
    /// - No item matches the requested identifier
    /// - An item owns no photo, or the owned file is missing from disk
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Snapshot serialization, write, or rename fails
    /// - Photo file I/O fails
    /// - The server cannot bind or serve
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Wraps an I/O or serialization failure with the operation name.
    pub(crate) fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for stockroom operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("name is required".to_string());
        assert_eq!(err.to_string(), "invalid input: name is required");

        let err = Error::NotFound("item 7".to_string());
        assert_eq!(err.to_string(), "not found: item 7");

        let err = Error::OperationFailed {
            operation: "persist".to_string(),
            cause: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'persist' failed: disk full");
    }
}
