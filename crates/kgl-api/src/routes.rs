//! Route table.

use crate::handlers::{autocomplete, index, query, AppState};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(query))
        .route("/autocomplete", post(autocomplete))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
