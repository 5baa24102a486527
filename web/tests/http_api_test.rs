//! HTTP API integration tests.
//!
//! Drive the full router (middleware included) with `tower::ServiceExt::oneshot`
//! against an in-memory registration store and a temporary static directory.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code uses unwrap/expect for setup

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use checkin_core::{RegistrationStore, NO_MANAGER_LABEL};
use checkin_testing::InMemoryRegistrationStore;
use checkin_web::handlers::scan::{
    ScanResponse, MESSAGE_DUPLICATE, MESSAGE_INCORRECT_PARAMS, MESSAGE_INVALID_JSON, MESSAGE_OK,
};
use checkin_web::{build_router, AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<InMemoryRegistrationStore>,
    _static_dir: TempDir,
}

fn setup() -> TestApp {
    let static_dir = TempDir::new().expect("temp dir");
    std::fs::write(static_dir.path().join("index.html"), "<h1>scanner</h1>").unwrap();
    std::fs::write(static_dir.path().join("doc.html"), "<h1>api docs</h1>").unwrap();
    std::fs::write(static_dir.path().join("app.js"), "console.log('scan');").unwrap();

    let store = Arc::new(InMemoryRegistrationStore::new());
    let router = build_router(AppState::from_shared(
        Arc::clone(&store),
        static_dir.path(),
    ));

    TestApp {
        router,
        store,
        _static_dir: static_dir,
    }
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn post_scan(router: &Router, body: &str) -> (StatusCode, ScanResponse) {
    let response = send(
        router,
        Request::builder()
            .method(Method::POST)
            .uri("/scan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;
    let status = response.status();
    let body = body_string(response).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn get(router: &Router, uri: &str) -> Response {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_scan_scenario() {
    let app = setup();

    let (status, response) = post_scan(
        &app.router,
        r#"{"event_id":"ev1","user_id":"u1","manager_name":"Alice"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.message, MESSAGE_OK);

    let (_, response) = post_scan(
        &app.router,
        r#"{"event_id":"ev1","user_id":"u1","manager_name":"Bob"}"#,
    )
    .await;
    assert_eq!(response.message, MESSAGE_DUPLICATE);

    let (_, response) =
        post_scan(&app.router, r#"{"event_id":"ev1","user_id":"u2","manager_name":""}"#).await;
    assert_eq!(response.message, MESSAGE_OK);

    let rows = app.store.query_by_event("ev1").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows.iter().find(|r| r.user_id == "u1").unwrap().manager_name,
        "Alice"
    );
}

#[tokio::test]
async fn test_scan_rejects_empty_fields() {
    let app = setup();

    let (status, response) =
        post_scan(&app.router, r#"{"event_id":"","user_id":"u1"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.message, MESSAGE_INCORRECT_PARAMS);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_scan_invalid_json() {
    let app = setup();

    let (status, response) = post_scan(&app.router, "{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.message, MESSAGE_INVALID_JSON);
}

#[tokio::test]
async fn test_scan_without_content_type() {
    let app = setup();

    let response = send(
        &app.router,
        Request::builder()
            .method(Method::POST)
            .uri("/scan")
            .body(Body::from(r#"{"event_id":"ev1","user_id":"u1"}"#))
            .unwrap(),
    )
    .await;
    let body: ScanResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.message, MESSAGE_OK);
}

#[tokio::test]
async fn test_scan_requires_post() {
    let app = setup();

    let response = get(&app.router, "/scan").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_scan_cors_preflight() {
    let app = setup();

    let response = send(
        &app.router,
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/scan")
            .header(header::ORIGIN, "https://scanner.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_results_page() {
    let app = setup();
    post_scan(
        &app.router,
        r#"{"event_id":"ev1","user_id":"u1","manager_name":"Alice"}"#,
    )
    .await;
    post_scan(&app.router, r#"{"event_id":"ev1","user_id":"u2"}"#).await;
    post_scan(&app.router, r#"{"event_id":"ev2","user_id":"other-user"}"#).await;

    let response = get(&app.router, "/results?event_id=ev1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let html = body_string(response).await;
    assert!(html.contains("Event: ev1"));
    assert!(html.contains("Alice"));
    assert!(html.contains(NO_MANAGER_LABEL));
    assert!(html.contains("u1"));
    assert!(html.contains("u2"));
    assert!(!html.contains("other-user"));
}

#[tokio::test]
async fn test_results_default_event() {
    let app = setup();
    post_scan(&app.router, r#"{"event_id":"default","user_id":"walk-in"}"#).await;

    for uri in ["/results", "/results?event_id="] {
        let html = body_string(get(&app.router, uri).await).await;
        assert!(html.contains("Event: default"));
        assert!(html.contains("walk-in"));
    }
}

#[tokio::test]
async fn test_results_empty_event() {
    let app = setup();

    let response = get(&app.router, "/results?event_id=nobody").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("No registrations yet"));
}

#[tokio::test]
async fn test_results_read_failure_is_not_rendered() {
    let app = setup();
    post_scan(&app.router, r#"{"event_id":"ev1","user_id":"u1"}"#).await;
    app.store.fail_reads(true);

    let response = get(&app.router, "/results?event_id=ev1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    assert!(!body.contains("<html"));
    assert!(body.contains("INTERNAL_SERVER_ERROR"));
    assert!(!body.contains("simulated"));
}

#[tokio::test]
async fn test_health() {
    let app = setup();

    let response = get(&app.router, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_static_pages() {
    let app = setup();

    assert_eq!(body_string(get(&app.router, "/").await).await, "<h1>scanner</h1>");
    assert_eq!(body_string(get(&app.router, "/doc").await).await, "<h1>api docs</h1>");
    assert_eq!(
        body_string(get(&app.router, "/static/app.js").await).await,
        "console.log('scan');"
    );
    assert_eq!(
        body_string(get(&app.router, "/anything/else").await).await,
        "<h1>scanner</h1>"
    );
}

#[tokio::test]
async fn test_static_missing_file() {
    let app = setup();

    let response = get(&app.router, "/static/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_set() {
    let app = setup();

    let response = get(&app.router, "/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let response = send(
        &app.router,
        Request::builder()
            .uri("/health")
            .header("x-request-id", "scanner-42")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.headers().get("x-request-id").unwrap(), "scanner-42");
}
