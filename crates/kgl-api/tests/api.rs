use axum::body::Body;
use axum::http::{Request, StatusCode};
use kgl_api::handlers::AppState;
use kgl_api::routes::create_router;
use kgl_core::{RawTriple, StoreConfig, TripleStore, DEFAULT_NAMESPACE};
use kgl_query::Evaluator;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

fn app() -> axum::Router {
    let mut store = TripleStore::new(StoreConfig {
        substring_search: true,
        ..StoreConfig::default()
    });
    store.add(RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE).unwrap();

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        evaluator: Arc::new(Evaluator::default()),
    };
    create_router(state)
}

#[tokio::test]
async fn get_root_serves_the_index_page() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn post_root_evaluates_a_query() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"query": "{ james -> likes }"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body.get("result").is_some());
    assert!(body.get("dot").is_some());
}

#[tokio::test]
async fn post_root_with_bad_query_returns_syntax_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"query": "{ james ->"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Syntax error.");
}

#[tokio::test]
async fn autocomplete_rejects_short_prefixes() {
    let request = Request::builder()
        .method("POST")
        .uri("/autocomplete")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"query": "j"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["completions"], serde_json::json!([]));
}
