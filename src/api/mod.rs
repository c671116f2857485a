//! HTTP interface - axum router, shared state, and per-resource handlers.
//!
//! Resource roots keep the path segments the original mobile clients already
//! speak (`/usuarios`, `/reactivos`, ...); handlers translate between those
//! requests and the framework-agnostic core operations.

pub mod announcements;
pub mod auth;
pub mod categories;
pub mod download;
pub mod extract;
pub mod health;
pub mod reagents;
pub mod requests;
pub mod submissions;
pub mod tasks;
pub mod users;

use crate::core::attachment::{AttachmentStore, MAX_UPLOAD_BYTES};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle
    pub db: DatabaseConnection,
    /// Attachment store rooted at the configured upload directory
    pub store: AttachmentStore,
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/healthcheck", get(health::healthcheck))
        .nest("/usuarios", users::routes())
        .nest("/categorias", categories::routes())
        .nest("/reactivos", reagents::routes())
        .nest("/solicitudes", requests::routes())
        .nest("/tareas", tasks::routes())
        .nest("/entregas", submissions::routes())
        .nest("/avisos", announcements::routes())
        .route("/download/:resource_type/:id", get(download::download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
