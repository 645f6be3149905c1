// tests/status_tests.rs

mod common;

use chrono::Utc;
use common::{
    assertions::{assert_error_response, assert_json_response},
    http::{get_request, json_request},
    TestApp, TestConfigBuilder, TEST_SECRET,
};
use pulse_status::{
    config::StatusMode,
    handlers::stored_status,
    models::{Heartbeat, MonitorStatus, StatusEntry},
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn beat(monitor_id: &str, timestamp: i64, status: MonitorStatus, latency: u64) -> Heartbeat {
    Heartbeat {
        monitor_id: monitor_id.to_string(),
        timestamp,
        latency,
        status,
    }
}

fn entry<'a>(entries: &'a [StatusEntry], id: &str) -> &'a StatusEntry {
    entries.iter().find(|e| e.id == id).unwrap()
}

#[tokio::test]
async fn lists_every_monitor_ordered_by_id() {
    let app = TestApp::default_app().await;
    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    let ids: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["auth", "hub", "main", "proxy", "web"]);

    let first = &body[0];
    for field in ["id", "name", "type", "status", "uptime", "latency", "description"] {
        assert!(!first[field].is_null(), "missing field {field}");
    }
    assert_eq!(first["type"], "db");
}

#[tokio::test]
async fn never_seen_monitors_are_down() {
    let app = TestApp::default_app().await;
    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    for item in body.as_array().unwrap() {
        assert_eq!(item["status"], "down");
        assert_eq!(item["latency"], 0);
        assert_eq!(item["uptime"], 0.0);
    }
}

#[tokio::test]
async fn fresh_pulse_is_reflected() {
    let app = TestApp::default_app().await;
    let response = app
        .send(json_request(
            "POST",
            "/api/pulse",
            json!({"monitor_id": "proxy", "latency": 18, "status": "up", "secret": TEST_SECRET}),
        ))
        .await;
    assert_json_response(response, 200).await;

    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    let entries: Vec<StatusEntry> = serde_json::from_value(body).unwrap();
    let proxy = entry(&entries, "proxy");
    assert_eq!(proxy.status, MonitorStatus::Up);
    assert_eq!(proxy.latency, 18);
    assert_eq!(proxy.uptime, 100.0);
}

#[tokio::test]
async fn stale_monitor_is_reported_down_regardless_of_stored_status() {
    let app = TestApp::default_app().await;
    let now = Utc::now().timestamp_millis();
    app.store
        .record_pulse(&beat("web", now - 91_000, MonitorStatus::Up, 25))
        .await
        .unwrap();

    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    let entries: Vec<StatusEntry> = serde_json::from_value(body).unwrap();
    let web = entry(&entries, "web");
    assert_eq!(web.status, MonitorStatus::Down);
    assert_eq!(web.latency, 0);
}

#[tokio::test]
async fn staleness_boundary_is_exclusive() {
    let app = TestApp::default_app().await;
    let now = 1_700_000_000_000;
    app.store
        .record_pulse(&beat("main", now - 90_000, MonitorStatus::Up, 30))
        .await
        .unwrap();
    app.store
        .record_pulse(&beat("hub", now - 90_001, MonitorStatus::Up, 30))
        .await
        .unwrap();

    let entries = stored_status(&app.state, now).await.unwrap();
    assert_eq!(entry(&entries, "main").status, MonitorStatus::Up);
    assert_eq!(entry(&entries, "main").latency, 30);
    assert_eq!(entry(&entries, "hub").status, MonitorStatus::Down);
    assert_eq!(entry(&entries, "hub").latency, 0);
}

#[tokio::test]
async fn maintenance_is_passed_through_while_fresh() {
    let app = TestApp::default_app().await;
    let now = 1_700_000_000_000;
    app.store
        .record_pulse(&beat("auth", now - 5_000, MonitorStatus::Maintenance, 3))
        .await
        .unwrap();
    let entries = stored_status(&app.state, now).await.unwrap();
    assert_eq!(entry(&entries, "auth").status, MonitorStatus::Maintenance);
}

#[tokio::test]
async fn uptime_comes_from_history_inside_window() {
    let app = TestApp::default_app().await;
    let now = 1_700_000_000_000;
    let day_ms = 24 * 3_600 * 1_000;

    // Outside the 24h window: ignored.
    app.store
        .record_pulse(&beat("main", now - day_ms - 1, MonitorStatus::Down, 0))
        .await
        .unwrap();
    for (offset, status) in [
        (40_000, MonitorStatus::Up),
        (30_000, MonitorStatus::Up),
        (20_000, MonitorStatus::Down),
        (15_000, MonitorStatus::Maintenance),
        (10_000, MonitorStatus::Up),
    ] {
        app.store
            .record_pulse(&beat("main", now - offset, status, 12))
            .await
            .unwrap();
    }

    let entries = stored_status(&app.state, now).await.unwrap();
    assert_eq!(entry(&entries, "main").uptime, 75.0);
}

#[tokio::test]
async fn live_mode_probes_every_system() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mc/mc.example.net"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "online": true,
            "players": {"online": 3, "max": 100},
            "version": "Velocity 3.3.0"
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/site"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&upstream)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let config = TestConfigBuilder::new()
        .with_status_mode(StatusMode::Live)
        .with_minecraft(format!("{}/mc", upstream.uri()), "mc.example.net")
        .with_website_url(format!("{}/site", upstream.uri()))
        .with_auth_url(format!("{}/auth", upstream.uri()))
        .build();
    let app = TestApp::new(config).await;

    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    let entries: Vec<StatusEntry> = serde_json::from_value(body).unwrap();
    let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["main", "hub", "proxy", "web", "auth"]);

    for id in ["main", "hub", "proxy", "web"] {
        assert_eq!(entry(&entries, id).status, MonitorStatus::Up, "{id}");
        assert_eq!(entry(&entries, id).uptime, 100.0);
    }
    assert!(entry(&entries, "main").description.contains("3/100 players"));

    let auth = entry(&entries, "auth");
    assert_eq!(auth.status, MonitorStatus::Down);
    assert_eq!(auth.latency, 0);
    assert_eq!(auth.uptime, 0.0);
}

#[tokio::test]
async fn live_mode_auth_follows_website_without_auth_url() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mc/mc.example.net"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"online": false})))
        .mount(&upstream)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/site"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&upstream)
        .await;

    let config = TestConfigBuilder::new()
        .with_status_mode(StatusMode::Live)
        .with_minecraft(format!("{}/mc", upstream.uri()), "mc.example.net")
        .with_website_url(format!("{}/site", upstream.uri()))
        .build();
    let app = TestApp::new(config).await;

    let body = assert_json_response(app.send(get_request("/api/status")).await, 200).await;
    let entries: Vec<StatusEntry> = serde_json::from_value(body).unwrap();
    assert_eq!(entry(&entries, "main").status, MonitorStatus::Down);
    assert_eq!(entry(&entries, "proxy").latency, 0);
    assert_eq!(entry(&entries, "web").status, MonitorStatus::Up);
    assert_eq!(entry(&entries, "auth").status, MonitorStatus::Up);
}

#[tokio::test]
async fn history_endpoint_returns_newest_first() {
    let app = TestApp::default_app().await;
    for ts in [1_000, 2_000, 3_000] {
        app.store
            .record_pulse(&beat("hub", ts, MonitorStatus::Up, 5))
            .await
            .unwrap();
    }

    let body = assert_json_response(
        app.send(get_request("/api/monitors/hub/heartbeats?limit=2")).await,
        200,
    )
    .await;
    let stamps: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|hb| hb["timestamp"].as_i64().unwrap())
        .collect();
    assert_eq!(stamps, vec![3_000, 2_000]);

    let all = assert_json_response(
        app.send(get_request("/api/monitors/hub/heartbeats")).await,
        200,
    )
    .await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn history_endpoint_rejects_bad_input() {
    let app = TestApp::default_app().await;
    assert_error_response(
        app.send(get_request("/api/monitors/nether/heartbeats")).await,
        404,
        "UNKNOWN_MONITOR",
    )
    .await;
    assert_error_response(
        app.send(get_request("/api/monitors/hub/heartbeats?limit=0")).await,
        400,
        "BAD_REQUEST",
    )
    .await;
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::default_app().await;
    let body = assert_json_response(app.send(get_request("/health")).await, 200).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn metrics_without_recorder_is_not_found() {
    let app = TestApp::default_app().await;
    let response = app.send(get_request("/metrics")).await;
    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_allows_any_origin() {
    let app = TestApp::default_app().await;
    let request = axum::http::Request::builder()
        .uri("/api/status")
        .header("origin", "https://status.example.org")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
