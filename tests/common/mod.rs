//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use pulse_status::{
    config::{AppConfig, StatusMode},
    create_router,
    storage::{InMemoryStore, MonitorStore},
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-pulse-secret";

/// Test configuration builder
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.server.test_mode = true;
        config.pulse.secret = Some(TEST_SECRET.to_string());
        config.probes.timeout_secs = 2;
        Self { config }
    }

    pub fn with_secret(mut self, secret: Option<&str>) -> Self {
        self.config.pulse.secret = secret.map(str::to_string);
        self
    }

    pub fn with_status_mode(mut self, mode: StatusMode) -> Self {
        self.config.status.mode = mode;
        self
    }

    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.config.probes.website_url = url.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.config.probes.auth_url = Some(url.into());
        self
    }

    pub fn with_minecraft(mut self, api: impl Into<String>, address: impl Into<String>) -> Self {
        self.config.probes.minecraft_status_api = api.into();
        self.config.probes.minecraft_address = address.into();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An application wired to a seeded in-memory store, without a metrics recorder.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub store: Arc<dyn MonitorStore>,
}

impl TestApp {
    pub async fn new(config: AppConfig) -> Self {
        let store: Arc<dyn MonitorStore> = Arc::new(InMemoryStore::new());
        store
            .seed_monitors(&config.monitors)
            .await
            .expect("Failed to seed test store");
        let state = AppState::with_store(&config, store.clone(), None)
            .expect("Failed to build test state");
        Self {
            state: Arc::new(state),
            store,
        }
    }

    pub async fn default_app() -> Self {
        Self::new(TestConfigBuilder::new().build()).await
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router()
            .oneshot(request)
            .await
            .expect("Router should always produce a response")
    }
}

/// Test utilities for HTTP requests
pub mod http {
    use axum::{body::Body, http::Request};
    use serde_json::Value;

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

/// Test assertions and utilities
pub mod assertions {
    use axum::{body::to_bytes, response::Response};
    use serde_json::Value;

    pub async fn assert_json_response(response: Response, expected_status: u16) -> Value {
        assert_eq!(response.status().as_u16(), expected_status);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).expect("Response body should be valid JSON")
    }

    pub async fn assert_error_response(
        response: Response,
        expected_status: u16,
        error_type: &str,
    ) -> Value {
        let json = assert_json_response(response, expected_status).await;
        let error = &json["error"];
        assert!(error.is_object(), "Error response should have 'error' object");
        assert_eq!(error["type"].as_str(), Some(error_type), "Error type mismatch");
        json
    }
}
