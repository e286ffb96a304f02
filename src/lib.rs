pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod services;
pub mod storage;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::index::FileIndex;
use crate::storage::{LinkSigner, ObjectStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub index: FileIndex,
    pub config: Arc<Config>,
    pub store: Arc<dyn ObjectStore>,
    pub signer: Arc<LinkSigner>,
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route("/files/:id", delete(handlers::file::delete_file));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/objects/:id", get(handlers::object::download_object))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
