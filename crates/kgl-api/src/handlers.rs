//! HTTP request handlers.

use crate::models::{AutocompleteRequest, QueryRequest};
use crate::result_json;
use axum::extract::State;
use axum::response::{Html, Json};
use kgl_core::{TripleStore, DEFAULT_NAMESPACE};
use kgl_query::Evaluator;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const INDEX_PAGE: &str = include_str!("index.html");

/// Shared application state: one in-memory graph, one evaluator.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TripleStore>>,
    pub evaluator: Arc<Evaluator>,
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn query(State(state): State<AppState>, Json(request): Json<QueryRequest>) -> Json<Value> {
    let mut store = state.store.lock().expect("graph store lock poisoned");

    match state.evaluator.evaluate(&request.query, &mut store, DEFAULT_NAMESPACE) {
        Ok(output) => {
            let dot = kgl_io::to_dot(&output.result, &request.query);
            Json(json!({
                "result": result_json::to_json(&output.result),
                "dot": dot,
                "time_taken": output.elapsed_seconds,
            }))
        }
        Err(_) => Json(json!({ "error": "Syntax error." })),
    }
}

pub async fn autocomplete(
    State(state): State<AppState>,
    Json(request): Json<AutocompleteRequest>,
) -> Json<Value> {
    let prefix = request.query.trim_start_matches(['{', ' ']).trim();
    let store = state.store.lock().expect("graph store lock poisoned");
    let completions = kgl_io::complete(&store, DEFAULT_NAMESPACE, prefix);
    Json(json!({ "completions": completions }))
}
