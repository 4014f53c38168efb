//! Integration tests for the relay endpoints.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;
use tower::ServiceExt;

use coderelay_core::config::AppConfig;
use coderelay_core::types::Clock;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_share_lifecycle() {
    let app = helpers::TestApp::new().await;
    let t0 = app.clock.now();

    let response = app.request("GET", "/check/ABC1", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "available": true }));

    let response = app.share("ABC1", "blob").await;
    assert_eq!(response.body["status"], "created");
    let expires_at: DateTime<Utc> = response.body["expires_at"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .expect("expires_at should be RFC 3339");
    assert_eq!(expires_at, t0 + chrono::Duration::minutes(10));

    app.clock.advance(Duration::from_secs(60));

    let response = app.request("GET", "/check/ABC1", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app.request("GET", "/receive/ABC1", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "data": "blob" }));

    app.clock.advance(Duration::from_secs(600));

    let response = app.request("GET", "/receive/ABC1", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Code not found or expired");

    // Still reserved until the sweeper removes it.
    let response = app.request("GET", "/check/ABC1", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    assert_eq!(app.store.purge_expired().await.unwrap(), 1);

    let response = app.request("GET", "/check/ABC1", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_share_overwrites_existing_code() {
    let app = helpers::TestApp::new().await;

    app.share("DUP", "first").await;
    app.share("DUP", "second").await;

    let response = app.request("GET", "/receive/DUP", None).await;
    assert_eq!(response.body["data"], "second");
}

#[tokio::test]
async fn test_share_with_custom_expiry() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "LONG", "data": "x", "expires_minutes": 30 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    app.clock.advance(Duration::from_secs(29 * 60));
    let response = app.request("GET", "/receive/LONG", None).await;
    assert_eq!(response.status, StatusCode::OK);

    app.clock.advance(Duration::from_secs(2 * 60));
    let response = app.request("GET", "/receive/LONG", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_code_or_data_is_rejected() {
    let app = helpers::TestApp::new().await;

    for body in [
        json!({ "code": "", "data": "x" }),
        json!({ "code": "K", "data": "" }),
        json!({ "data": "x" }),
        json!({}),
    ] {
        let response = app.request("POST", "/share", Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
        assert_eq!(response.body["message"], "Missing code or data");
    }
}

#[tokio::test]
async fn test_out_of_range_expiry_is_rejected() {
    let app = helpers::TestApp::new().await;

    for minutes in [0, 61] {
        let response = app
            .request(
                "POST",
                "/share",
                Some(json!({ "code": "K", "data": "x", "expires_minutes": minutes })),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    let response = app.request("GET", "/check/K", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = helpers::TestApp::new().await;

    let response = app
        .send_raw(helpers::CLIENT_A, "POST", "/share", "{not json".to_string(), &[])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_size_limits() {
    let mut config = AppConfig::default();
    config.share.max_code_length = 8;
    config.share.max_data_bytes = 16;
    let app = helpers::TestApp::with_config(config);

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "CODE-TOO-LONG", "data": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "K", "data": "x".repeat(17) })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "K", "data": "x".repeat(200 * 1024) })),
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.error_code(), Some("PAYLOAD_TOO_LARGE"));

    let response = app.request("GET", "/check/CODE-TOO-LONG", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = helpers::TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_sqlite_backed_lifecycle() {
    let app = helpers::TestApp::with_sqlite().await;

    let response = app.request("GET", "/check/SQL1", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    app.share("SQL1", "persisted").await;

    let response = app.request("GET", "/check/SQL1", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app.request("GET", "/receive/SQL1", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], "persisted");

    let response = app.request("GET", "/receive/NOPE", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    assert_eq!(app.store.purge_expired().await.unwrap(), 0);
}
