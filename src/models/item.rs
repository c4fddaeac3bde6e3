//! Inventory item record and its input shapes.

use serde::{Deserialize, Serialize};

/// One inventory record.
///
/// The `photo` field is the photo reference: the bare filename of the owned
/// file inside the cache directory. It never contains a path separator and
/// is only ever mutated by the photo-replace operation, not by item updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned from the store's monotonic counter.
    pub id: u64,
    /// Display name. Non-empty for the lifetime of the record.
    pub name: String,
    /// Free-form description. May be empty.
    #[serde(default)]
    pub description: String,
    /// Reference to the owned photo file, if any.
    #[serde(default)]
    pub photo: Option<String>,
}

impl Item {
    /// Returns the public URL path of the owned photo, if any.
    #[must_use]
    pub fn photo_url(&self) -> Option<String> {
        self.photo
            .as_ref()
            .map(|_| format!("/inventory/{}/photo", self.id))
    }
}

/// Input for creating an item.
#[derive(Debug, Clone, Default)]
pub struct ItemDraft {
    /// Display name; must be non-empty after trimming.
    pub name: String,
    /// Description; defaults to the empty string.
    pub description: String,
    /// Photo reference already stored by the sidecar, if the registration
    /// carried an upload.
    pub photo: Option<String>,
}

/// Input for updating an item.
///
/// `None` means "field absent from the payload, leave the stored value
/// untouched". `Some("")` is an explicit request to clear the field and is
/// applied (for `description`) or rejected (for `name`, which must stay
/// non-empty). The two cases are deliberately distinct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    /// Replacement name, if provided.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement description, if provided.
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemPatch {
    /// Returns `true` when the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_url_requires_owned_photo() {
        let mut item = Item {
            id: 3,
            name: "Drill".to_string(),
            description: String::new(),
            photo: None,
        };
        assert_eq!(item.photo_url(), None);

        item.photo = Some("0192fd9a.jpg".to_string());
        assert_eq!(item.photo_url().as_deref(), Some("/inventory/3/photo"));
    }

    #[test]
    fn patch_distinguishes_absent_from_empty() {
        let absent: ItemPatch = serde_json::from_str("{}").unwrap();
        assert!(absent.description.is_none());
        assert!(absent.is_empty());

        let empty: ItemPatch = serde_json::from_str(r#"{"description": ""}"#).unwrap();
        assert_eq!(empty.description.as_deref(), Some(""));
        assert!(!empty.is_empty());
    }

    #[test]
    fn item_deserializes_without_optional_fields() {
        let item: Item = serde_json::from_str(r#"{"id": 0, "name": "Saw"}"#).unwrap();
        assert_eq!(item.description, "");
        assert_eq!(item.photo, None);
    }
}
