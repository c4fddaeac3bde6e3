//! HTTP surface.
//!
//! Handlers are thin: one request maps to one store or sidecar operation
//! plus presentation. All state lives in [`AppState`], constructed once at
//! startup and cloned into every handler; there are no ambient globals.
//!
//! Method mismatches on known paths produce 405 through axum's method
//! routing; unknown paths fall through to a plain-text 404.

mod error;
mod handlers;
mod views;

pub use error::ApiError;
pub use views::{ItemView, PhotoUpdated, SearchResult};

use crate::photo::PhotoStore;
use crate::store::InventoryStore;
use crate::{Error, Result, ServerConfig};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The item store.
    pub store: Arc<InventoryStore>,
    /// The photo sidecar.
    pub photos: PhotoStore,
}

/// Builds the application router over the given state.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/inventory", get(handlers::list_items))
        .route(
            "/inventory/{id}",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route(
            "/inventory/{id}/photo",
            get(handlers::get_photo).put(handlers::put_photo),
        )
        .route("/search", post(handlers::search))
        .route("/RegisterForm.html", get(handlers::register_form))
        .route("/SearchForm.html", get(handlers::search_form))
        .fallback(handlers::unrouted)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves requests until the process exits.
///
/// # Errors
///
/// Returns `OperationFailed` if the listener cannot bind or the server
/// loop fails.
pub async fn run(config: &ServerConfig, state: AppState) -> Result<()> {
    let app = build_router(state);
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::operation("bind", e))?;

    tracing::info!(addr = %addr, cache_dir = %config.cache_dir.display(), "Stockroom listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::operation("serve", e))
}
