//! Integration tests for per-client admission control.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

use coderelay_core::config::AppConfig;
use helpers::{CLIENT_A, CLIENT_B, TestApp};

fn app_with_burst(burst: u32) -> TestApp {
    let mut config = AppConfig::default();
    config.rate_limit.burst = burst;
    TestApp::with_config(config)
}

#[tokio::test(start_paused = true)]
async fn test_burst_then_429() {
    let app = app_with_burst(3);

    for _ in 0..3 {
        let response = app.request("GET", "/receive/ANY", None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let response = app.request("GET", "/receive/ANY", None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), Some("RATE_LIMITED"));
    assert_eq!(response.body["message"], "Rate limit exceeded");
}

#[tokio::test(start_paused = true)]
async fn test_all_relay_routes_share_one_budget() {
    let app = app_with_burst(3);

    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::NOT_FOUND
    );
    app.share("K", "v").await;
    assert_eq!(
        app.request("GET", "/receive/K", None).await.status,
        StatusCode::OK
    );

    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test(start_paused = true)]
async fn test_rejected_share_never_reaches_store() {
    let app = app_with_burst(1);

    app.request("GET", "/check/OTHER", None).await;

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "BLOCKED", "data": "x" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(!app.store.exists("BLOCKED").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_throttled_client_gets_429_before_body_is_parsed() {
    let app = app_with_burst(1);

    app.request("GET", "/check/K", None).await;
    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );

    for _ in 0..5 {
        let response = app
            .send_raw(CLIENT_A, "POST", "/share", "{not json".to_string(), &[])
            .await;
        assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.error_code(), Some("RATE_LIMITED"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_throttled_client_oversized_body_gets_429() {
    let mut config = AppConfig::default();
    config.rate_limit.burst = 1;
    config.share.max_data_bytes = 16;
    let app = TestApp::with_config(config);

    app.request("GET", "/check/K", None).await;

    let response = app
        .request(
            "POST",
            "/share",
            Some(json!({ "code": "K", "data": "x".repeat(200 * 1024) })),
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_request_still_spends_a_token() {
    let app = app_with_burst(1);

    let response = app
        .send_raw(CLIENT_A, "POST", "/share", "{not json".to_string(), &[])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test(start_paused = true)]
async fn test_clients_have_independent_buckets() {
    let app = app_with_burst(1);

    let a = app.request_from(CLIENT_A, "GET", "/check/K", None, &[]).await;
    assert_eq!(a.status, StatusCode::NOT_FOUND);
    let a = app.request_from(CLIENT_A, "GET", "/check/K", None, &[]).await;
    assert_eq!(a.status, StatusCode::TOO_MANY_REQUESTS);

    let b = app.request_from(CLIENT_B, "GET", "/check/K", None, &[]).await;
    assert_eq!(b.status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn test_health_is_not_rate_limited() {
    let app = app_with_burst(1);

    app.request("GET", "/check/K", None).await;
    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );

    for _ in 0..5 {
        assert_eq!(
            app.request("GET", "/health", None).await.status,
            StatusCode::OK
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_tokens_refill_over_time() {
    let app = app_with_burst(2);

    app.request("GET", "/check/K", None).await;
    app.request("GET", "/check/K", None).await;
    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );

    // 10 tokens per 60 s: one token every 6 s.
    tokio::time::advance(Duration::from_secs(6)).await;
    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("GET", "/check/K", None).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_disabled_limiter_admits_everything() {
    let mut config = AppConfig::default();
    config.rate_limit.enabled = false;
    config.rate_limit.burst = 1;
    let app = TestApp::with_config(config);

    for _ in 0..20 {
        assert_eq!(
            app.request("GET", "/check/K", None).await.status,
            StatusCode::NOT_FOUND
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_forwarded_for_ignored_by_default() {
    let app = app_with_burst(1);

    let first = app
        .request_from(CLIENT_A, "GET", "/check/K", None, &[("x-forwarded-for", "203.0.113.1")])
        .await;
    assert_eq!(first.status, StatusCode::NOT_FOUND);

    let second = app
        .request_from(CLIENT_A, "GET", "/check/K", None, &[("x-forwarded-for", "203.0.113.2")])
        .await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test(start_paused = true)]
async fn test_forwarded_for_identifies_clients_when_trusted() {
    let mut config = AppConfig::default();
    config.rate_limit.burst = 1;
    config.server.trust_forwarded_for = true;
    let app = TestApp::with_config(config);

    let first = app
        .request_from(CLIENT_A, "GET", "/check/K", None, &[("x-forwarded-for", "203.0.113.1")])
        .await;
    assert_eq!(first.status, StatusCode::NOT_FOUND);

    let second = app
        .request_from(CLIENT_A, "GET", "/check/K", None, &[("x-forwarded-for", "203.0.113.2")])
        .await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);

    let repeat = app
        .request_from(CLIENT_A, "GET", "/check/K", None, &[("x-forwarded-for", "203.0.113.1, 10.0.0.9")])
        .await;
    assert_eq!(repeat.status, StatusCode::TOO_MANY_REQUESTS);
}
