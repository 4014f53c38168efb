//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use coderelay_cache::MemoryShareStore;
use coderelay_core::config::{AppConfig, DatabaseConfig};
use coderelay_core::traits::ShareStore;
use coderelay_core::types::ManualClock;
use coderelay_database::DatabasePool;
use coderelay_database::repositories::ShareRepository;
use coderelay_service::{RateLimiterRegistry, RelayService};

/// Default peer address for test requests.
pub const CLIENT_A: [u8; 4] = [10, 0, 0, 1];
/// A second, unrelated peer.
pub const CLIENT_B: [u8; 4] = [10, 0, 0, 2];

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router
    pub store: Arc<dyn ShareStore>,
    /// Clock driving the in-memory store
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// In-memory app with a limiter loose enough to stay out of the way.
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.rate_limit.burst = 1_000;
        config.rate_limit.refill_tokens = 1_000;
        Self::with_config(config)
    }

    /// In-memory app with the given config.
    pub fn with_config(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::default());
        let store: Arc<dyn ShareStore> = Arc::new(MemoryShareStore::with_clock(clock.clone()));
        Self::build(config, store, clock)
    }

    /// App backed by a private in-memory SQLite database.
    pub async fn with_sqlite() -> Self {
        let mut config = AppConfig::default();
        config.rate_limit.burst = 1_000;
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        coderelay_database::migration::run_migrations(pool.pool())
            .await
            .expect("Failed to run migrations");

        let store: Arc<dyn ShareStore> = Arc::new(ShareRepository::new(pool.into_pool()));
        Self::build(config, store, Arc::new(ManualClock::default()))
    }

    fn build(config: AppConfig, store: Arc<dyn ShareStore>, clock: Arc<ManualClock>) -> Self {
        let limiter = Arc::new(RateLimiterRegistry::new(&config.rate_limit));
        let relay = Arc::new(RelayService::new(
            Arc::clone(&store),
            limiter,
            config.share.clone(),
        ));
        let state = coderelay_api::AppState::new(Arc::new(config.clone()), relay);

        Self {
            router: coderelay_api::build_router(state),
            store,
            clock,
            config,
        }
    }

    /// Make a request from [`CLIENT_A`].
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        self.request_from(CLIENT_A, method, path, body, &[]).await
    }

    /// Make an HTTP request from a specific peer with extra headers.
    pub async fn request_from(
        &self,
        peer: [u8; 4],
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send_raw(peer, method, path, body_str, headers).await
    }

    /// Send a raw body string.
    pub async fn send_raw(
        &self,
        peer: [u8; 4],
        method: &str,
        path: &str,
        body: String,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .layer(MockConnectInfo(SocketAddr::from((peer, 40_000))))
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Store a share over HTTP and assert it was created.
    pub async fn share(&self, code: &str, data: &str) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/share",
                Some(serde_json::json!({ "code": code, "data": data })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Share failed: {:?}",
            response.body
        );
        response
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` code of an error body.
    pub fn error_code(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}
