//! HTTP API integration tests
//!
//! Drives the full router through `tower::ServiceExt::oneshot` with the
//! collection backed by the in-memory store and a stub remote fetcher.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

use qsync_common::store::MemoryStore;
use qsync_common::StateStore;
use qsync_qm::repository::QuoteRepository;
use qsync_qm::services::remote_client::{QuoteFetcher, RemoteError, RemotePost};
use qsync_qm::session::SessionTracker;
use qsync_qm::sync::SyncService;
use qsync_qm::{build_router, AppState};

/// Fetcher returning a fixed record set
struct StaticFetcher(Vec<RemotePost>);

#[async_trait]
impl QuoteFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<Vec<RemotePost>, RemoteError> {
        Ok(self.0.clone())
    }
}

/// Build an app over fresh in-memory state, syncing against `posts`
async fn setup_app(posts: Vec<RemotePost>) -> Router {
    let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
    let repo = Arc::new(QuoteRepository::load(store).await);
    let session = Arc::new(SessionTracker::new(Arc::new(MemoryStore::new())));
    let sync = Arc::new(SyncService::new(repo.clone(), Arc::new(StaticFetcher(posts))));
    build_router(AppState::new(repo, session, sync))
}

fn test_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(vec![]).await;

    let response = app
        .oneshot(test_request(Method::GET, "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "qsync-qm");
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_list_quotes_starts_with_defaults() {
    let app = setup_app(vec![]).await;

    let response = app
        .oneshot(test_request(Method::GET, "/quotes"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["count"], 10);
    assert_eq!(body["quotes"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_add_quote() {
    let app = setup_app(vec![]).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "  Fresh words  ", "category": "  Life  "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    // Trimmed before storing
    assert_eq!(body["quote"]["text"], "Fresh words");
    assert_eq!(body["quote"]["category"], "Life");
    assert_eq!(body["total"], 11);

    let listed = extract_json(
        app.oneshot(test_request(Method::GET, "/quotes"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["count"], 11);
}

#[tokio::test]
async fn test_add_quote_rejects_blank_and_duplicate() {
    let app = setup_app(vec![]).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "   ", "category": "Life"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "Once only", "category": "Life"}),
        ))
        .await
        .unwrap();

    // Duplicate text differing only in case is rejected
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "ONCE ONLY", "category": "Other"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response).await;
    assert!(body["error"]["message"].as_str().unwrap().contains("exists"));
}

#[tokio::test]
async fn test_random_quote_honors_category_param() {
    let app = setup_app(vec![]).await;

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "Only one here", "category": "Singular"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(test_request(Method::GET, "/quotes/random?category=Singular"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["text"], "Only one here");

    // Unknown category has no quotes
    let response = app
        .oneshot(test_request(Method::GET, "/quotes/random?category=Missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_random_quote_feeds_session() {
    let app = setup_app(vec![]).await;

    let before = extract_json(
        app.clone()
            .oneshot(test_request(Method::GET, "/session"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(before["view_count"], 0);
    assert!(before["last_viewed"].is_null());

    app.clone()
        .oneshot(test_request(Method::GET, "/quotes/random"))
        .await
        .unwrap();

    let after = extract_json(
        app.oneshot(test_request(Method::GET, "/session"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(after["view_count"], 1);
    assert!(after["last_viewed"].is_object());
}

#[tokio::test]
async fn test_categories_are_sorted_and_unique() {
    let app = setup_app(vec![]).await;

    let response = app
        .oneshot(test_request(Method::GET, "/quotes/categories"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    let categories: Vec<String> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    let mut sorted = categories.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(categories, sorted);
}

#[tokio::test]
async fn test_filter_roundtrip_and_validation() {
    let app = setup_app(vec![]).await;

    let body = extract_json(
        app.clone()
            .oneshot(test_request(Method::GET, "/filter"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["filter"], "all");
    assert_eq!(body["count"], 10);

    // Pick a category present in the defaults
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/filter",
            json!({"category": "Motivation"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["filter"], "Motivation");
    assert!(body["count"].as_u64().unwrap() >= 1);

    // Unknown category is rejected, filter unchanged
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/filter",
            json!({"category": "NoSuchCategory"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(
        app.oneshot(test_request(Method::GET, "/filter"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["filter"], "Motivation");
}

#[tokio::test]
async fn test_export_then_import_replace_restores_collection() {
    let app = setup_app(vec![]).await;

    let export_response = app
        .clone()
        .oneshot(test_request(Method::GET, "/quotes/export"))
        .await
        .unwrap();
    assert_eq!(export_response.status(), StatusCode::OK);
    assert_eq!(
        export_response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let exported = axum::body::to_bytes(export_response.into_body(), usize::MAX)
        .await
        .unwrap();

    // Disturb the collection, then restore it from the export
    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "Transient", "category": "Temp"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/quotes/import?mode=replace")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(exported))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["imported"], 10);
    assert_eq!(body["total"], 10);

    let listed = extract_json(
        app.oneshot(test_request(Method::GET, "/quotes"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["count"], 10);
}

#[tokio::test]
async fn test_import_merge_skips_duplicates_and_invalid() {
    let app = setup_app(vec![]).await;

    let payload = json!([
        {"text": "Brand new entry", "category": "Fresh"},
        {"text": "The only way to do great work is to love what you do.", "category": "Changed"},
        {"text": "", "category": "Fresh"},
        {"category": "missing text"}
    ]);

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/quotes/import", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response).await;
    assert_eq!(body["imported"], 1);
    // Default collection already holds the second entry's text
    assert_eq!(body["skipped_duplicates"], 1);
    assert_eq!(body["skipped_invalid"], 2);
    assert_eq!(body["total"], 11);
}

#[tokio::test]
async fn test_import_rejects_payload_with_no_valid_quotes() {
    let app = setup_app(vec![]).await;

    for payload in ["not json at all", "{\"text\": \"x\"}", "[{\"text\": \"\"}]"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/quotes/import")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Collection untouched
    let listed = extract_json(
        app.oneshot(test_request(Method::GET, "/quotes"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["count"], 10);
}

#[tokio::test]
async fn test_import_rejects_unknown_mode() {
    let app = setup_app(vec![]).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/quotes/import?mode=overwrite",
            json!([{"text": "x", "category": "y"}]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_restores_defaults_and_resets_session() {
    let app = setup_app(vec![]).await;

    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/quotes",
            json!({"text": "Extra", "category": "Temp"}),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(test_request(Method::GET, "/quotes/random"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(test_request(Method::DELETE, "/quotes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["total"], 10);

    let session = extract_json(
        app.oneshot(test_request(Method::GET, "/session"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(session["view_count"], 0);
    assert!(session["last_viewed"].is_null());
}

#[tokio::test]
async fn test_sync_endpoint_applies_remote_posts() {
    let app = setup_app(vec![RemotePost {
        id: Some(1),
        title: "Fresh remote wisdom".to_string(),
        body: Some("Remote thoughts\nrest of body".to_string()),
    }])
    .await;

    let response = app
        .clone()
        .oneshot(test_request(Method::POST, "/sync"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["fetched"], 1);
    assert_eq!(body["added"], 1);
    assert_eq!(body["merged"], false);

    let status = extract_json(
        app.clone()
            .oneshot(test_request(Method::GET, "/sync/status"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status["state"], "idle");
    assert!(status["last_sync_millis"].is_number());
    assert_eq!(status["last_report"]["added"], 1);

    let listed = extract_json(
        app.oneshot(test_request(Method::GET, "/quotes"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(listed["count"], 11);
}
