//! Photo sidecar: file lifecycle for item photos.
//!
//! Each item owns at most one photo file inside the cache directory. The
//! sidecar names stored files `<uuid-v7><ext>` so concurrent uploads can
//! never collide, and it is the only code that creates or deletes those
//! files. References handed out are bare filenames; anything carrying a
//! path separator or `..` is rejected before it can touch the filesystem,
//! so no file outside the cache directory is ever read or written.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Longest extension carried over from an uploaded filename.
const MAX_EXT_LEN: usize = 8;

/// Stores and deletes photo files under the cache directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    cache_dir: PathBuf,
}

impl PhotoStore {
    /// Creates a sidecar rooted at `cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)
            .map_err(|e| Error::operation("create_cache_dir", e))?;
        Ok(Self { cache_dir })
    }

    /// Writes uploaded bytes to a fresh file and returns its reference.
    ///
    /// The filename is a v7 UUID plus the sanitized extension of the
    /// original upload, so files sort by upload time and two uploads in
    /// the same instant still get distinct names.
    ///
    /// # Errors
    ///
    /// Returns `OperationFailed` if the file cannot be written.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let reference = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::now_v7()),
            None => Uuid::now_v7().to_string(),
        };

        let path = self.cache_dir.join(&reference);
        std::fs::write(&path, bytes).map_err(|e| Error::operation("write_photo", e))?;

        tracing::debug!(reference = %reference, size = bytes.len(), "Photo stored");
        Ok(reference)
    }

    /// Deletes the file behind a reference.
    ///
    /// A missing file is not an error: the item record is already the
    /// authority, and a stray manual deletion must not wedge item removal.
    pub fn remove(&self, reference: &str) {
        let Ok(path) = self.resolve_any(reference) else {
            tracing::warn!(reference = %reference, "Refusing to remove unsafe photo reference");
            return;
        };

        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(reference = %reference, "Photo released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(reference = %reference, "Photo already absent");
            }
            Err(e) => tracing::warn!(reference = %reference, error = %e, "Failed to release photo"),
        }
    }

    /// Resolves a reference to the stored file's path, verifying existence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unsafe reference and `NotFound` when
    /// the file does not exist.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let path = self.resolve_any(reference)?;
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::NotFound(format!("photo {reference}")))
        }
    }

    /// Maps a reference to its path without checking existence.
    fn resolve_any(&self, reference: &str) -> Result<PathBuf> {
        if !is_safe_reference(reference) {
            return Err(Error::InvalidInput(format!(
                "photo reference contains invalid characters: {reference}"
            )));
        }
        Ok(self.cache_dir.join(reference))
    }
}

/// Checks that a reference is a bare filename with no traversal potential.
fn is_safe_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference != "."
        && reference != ".."
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Extracts a lowercased, alphanumeric extension from an uploaded filename.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > MAX_EXT_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_keeps_extension_and_resolves() {
        let dir = TempDir::new().unwrap();
        let photos = PhotoStore::new(dir.path()).unwrap();

        let reference = photos.save("drill.JPG", b"bytes").unwrap();
        assert!(reference.ends_with(".jpg"));

        let path = photos.resolve(&reference).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");
    }

    #[test]
    fn concurrent_style_saves_get_distinct_names() {
        let dir = TempDir::new().unwrap();
        let photos = PhotoStore::new(dir.path()).unwrap();

        let a = photos.save("a.jpg", b"a").unwrap();
        let b = photos.save("a.jpg", b"b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn odd_extensions_are_dropped() {
        let dir = TempDir::new().unwrap();
        let photos = PhotoStore::new(dir.path()).unwrap();

        let reference = photos.save("weird.j/p..g", b"x").unwrap();
        assert!(!reference.contains('/'));

        let reference = photos.save("noextension", b"x").unwrap();
        assert!(photos.resolve(&reference).is_ok());
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let photos = PhotoStore::new(dir.path()).unwrap();

        let reference = photos.save("a.jpg", b"a").unwrap();
        photos.remove(&reference);
        assert!(matches!(photos.resolve(&reference), Err(Error::NotFound(_))));

        // Second removal is a no-op, not a failure.
        photos.remove(&reference);
    }

    #[test]
    fn traversal_references_are_rejected() {
        let dir = TempDir::new().unwrap();
        let photos = PhotoStore::new(dir.path()).unwrap();

        for reference in ["../escape.jpg", "a/b.jpg", "..", ""] {
            assert!(matches!(
                photos.resolve(reference),
                Err(Error::InvalidInput(_) | Error::NotFound(_))
            ));
        }
        // remove() must not reach outside the cache dir either.
        photos.remove("../escape.jpg");
    }
}
