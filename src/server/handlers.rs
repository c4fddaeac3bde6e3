//! Route handlers.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::{Form, Json};
use serde::Deserialize;

use super::error::ApiError;
use super::views::{ItemView, PhotoUpdated, SearchResult};
use super::AppState;
use crate::models::{ItemDraft, ItemPatch};
use crate::Error;

/// Result alias local to handlers.
type HandlerResult<T> = std::result::Result<T, ApiError>;

/// Parses a path identifier. Non-numeric identifiers can never match a
/// record, so they answer 404 like any other unknown id.
fn parse_id(raw: &str) -> HandlerResult<u64> {
    raw.parse()
        .map_err(|_| ApiError(Error::NotFound(format!("item {raw}"))))
}

/// Maps a multipart decoding failure to a 400.
fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(Error::InvalidInput(format!("malformed multipart body: {e}")))
}

/// One uploaded file: original filename plus contents.
struct Upload {
    original_name: String,
    bytes: Bytes,
}

/// Fields collected from the registration form.
#[derive(Default)]
struct RegisterFields {
    name: Option<String>,
    description: String,
    upload: Option<Upload>,
}

impl RegisterFields {
    /// Drains a multipart body into the known form fields.
    ///
    /// Unknown fields are skipped; an empty file part counts as "no photo
    /// uploaded", which is how browsers submit an untouched file input.
    async fn collect(mut multipart: Multipart) -> HandlerResult<Self> {
        let mut fields = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some("inventory_name" | "name") => {
                    fields.name = Some(field.text().await.map_err(multipart_error)?);
                }
                Some("description" | "item_description") => {
                    fields.description = field.text().await.map_err(multipart_error)?;
                }
                Some("photo") => {
                    let original_name = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    if !bytes.is_empty() {
                        fields.upload = Some(Upload {
                            original_name,
                            bytes,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(fields)
    }
}

/// `POST /register` — create an item, optionally with a photo.
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> HandlerResult<impl IntoResponse> {
    let fields = RegisterFields::collect(multipart).await?;

    let photo = match &fields.upload {
        Some(upload) => Some(state.photos.save(&upload.original_name, &upload.bytes)?),
        None => None,
    };

    let draft = ItemDraft {
        name: fields.name.unwrap_or_default(),
        description: fields.description,
        photo: photo.clone(),
    };

    match state.store.create(draft) {
        Ok(item) => Ok((StatusCode::CREATED, Json(item))),
        Err(e) => {
            // The record never existed, so the stored file has no owner.
            if let Some(reference) = photo {
                state.photos.remove(&reference);
            }
            Err(e.into())
        }
    }
}

/// `GET /inventory` — list all items.
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<ItemView>> {
    let views = state.store.list().into_iter().map(ItemView::from).collect();
    Json(views)
}

/// `GET /inventory/{id}` — fetch one item.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<ItemView>> {
    let item = state.store.get(parse_id(&id)?)?;
    Ok(Json(ItemView::from(item)))
}

/// `PUT /inventory/{id}` — update name and description.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ItemPatch>,
) -> HandlerResult<Json<ItemView>> {
    let item = state.store.update(parse_id(&id)?, patch)?;
    Ok(Json(ItemView::from(item)))
}

/// `DELETE /inventory/{id}` — remove an item and release its photo.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<crate::models::Item>> {
    let removed = state.store.delete(parse_id(&id)?)?;
    if let Some(reference) = &removed.photo {
        state.photos.remove(reference);
    }
    Ok(Json(removed))
}

/// `GET /inventory/{id}/photo` — stream the owned photo.
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<impl IntoResponse> {
    let item = state.store.get(parse_id(&id)?)?;
    let reference = item
        .photo
        .as_deref()
        .ok_or_else(|| Error::NotFound(format!("photo of item {}", item.id)))?;

    let path = state.photos.resolve(reference)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::operation("read_photo", e))?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// `PUT /inventory/{id}/photo` — replace the owned photo.
///
/// The superseded file is deleted only after the store has committed the
/// new reference, so a failed persist never orphans the current photo.
pub async fn put_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> HandlerResult<Json<PhotoUpdated>> {
    let id = parse_id(&id)?;
    // Item existence first: an upload for an unknown item is 404, not 400.
    state.store.get(id)?;

    let mut upload: Option<Upload> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("photo") {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !bytes.is_empty() {
                upload = Some(Upload {
                    original_name,
                    bytes,
                });
            }
        }
    }
    let upload =
        upload.ok_or_else(|| Error::InvalidInput("no photo file provided".to_string()))?;

    let reference = state.photos.save(&upload.original_name, &upload.bytes)?;
    match state.store.set_photo(id, Some(reference.clone())) {
        Ok(previous) => {
            if let Some(old) = previous {
                state.photos.remove(&old);
            }
            Ok(Json(PhotoUpdated {
                message: "photo updated",
                photo: reference,
            }))
        }
        Err(e) => {
            // Store rejected the rebind; the new file has no owner.
            state.photos.remove(&reference);
            Err(e.into())
        }
    }
}

/// Form body of the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Identifier to look up.
    id: Option<String>,
    /// Checkbox flag; browsers post "on", scripts post "true" or "1".
    has_photo: Option<String>,
}

/// `POST /search` — look up one item by id.
pub async fn search(
    State(state): State<AppState>,
    Form(query): Form<SearchQuery>,
) -> HandlerResult<Json<SearchResult>> {
    let raw_id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| Error::InvalidInput("id is required".to_string()))?;

    let item = state.store.get(parse_id(&raw_id)?)?;
    let wants_photo = query
        .has_photo
        .is_some_and(|v| matches!(v.to_lowercase().as_str(), "true" | "on" | "1"));

    Ok(Json(SearchResult::new(item, wants_photo)))
}

/// `GET /RegisterForm.html` — the registration form.
pub async fn register_form() -> Html<&'static str> {
    Html(include_str!("../assets/RegisterForm.html"))
}

/// `GET /SearchForm.html` — the search form.
pub async fn search_form() -> Html<&'static str> {
    Html(include_str!("../assets/SearchForm.html"))
}

/// Fallback for unknown paths.
pub async fn unrouted() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Error: endpoint not found")
}
