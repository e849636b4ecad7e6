//! Axum HTTP API for the KGL knowledge-graph query engine.

pub mod handlers;
pub mod models;
pub mod result_json;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use server::{KglServer, ServerConfig};
