//! Response presentation shapes.
//!
//! The store's [`Item`] is the canonical record; these views are the only
//! place response field naming lives, so presentation differences never
//! grow into a second store implementation.

use serde::Serialize;

use crate::models::Item;

/// An item as presented by the list and read endpoints.
#[derive(Debug, Serialize)]
pub struct ItemView {
    /// Item identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Description text.
    pub description: String,
    /// URL path of the owned photo, or null.
    pub photo_url: Option<String>,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        let photo_url = item.photo_url();
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            photo_url,
        }
    }
}

/// Response of the photo-replace endpoint.
#[derive(Debug, Serialize)]
pub struct PhotoUpdated {
    /// Human-readable confirmation.
    pub message: &'static str,
    /// Reference of the newly stored photo.
    pub photo: String,
}

/// Response of the search endpoint.
///
/// When the request asks for the photo, the link is embedded into the
/// description text rather than a separate field.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// Item identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Description, optionally with the photo link appended.
    pub description: String,
}

impl SearchResult {
    /// Builds the result, appending the photo link when requested.
    #[must_use]
    pub fn new(item: Item, wants_photo: bool) -> Self {
        let mut description = item.description.clone();
        if wants_photo && item.photo.is_some() {
            description.push_str(&format!(" [Photo: /inventory/{}/photo]", item.id));
        }
        Self {
            id: item.id,
            name: item.name,
            description,
        }
    }
}
