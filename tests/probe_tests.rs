// tests/probe_tests.rs

use pulse_status::{
    config::ProbeConfig,
    models::MonitorStatus,
    probe::{ProbeOutcome, Prober},
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn prober_for(server: &MockServer) -> Prober {
    Prober::new(&ProbeConfig {
        minecraft_status_api: format!("{}/3", server.uri()),
        timeout_secs: 2,
        ..ProbeConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn head_success_is_up() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let outcome = prober_for(&server).head(&server.uri()).await;
    assert_eq!(outcome.status, MonitorStatus::Up);
}

#[tokio::test]
async fn head_error_status_is_down_with_zero_latency() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let prober = prober_for(&server);
    for p in ["/broken", "/missing"] {
        let outcome = prober.head(&format!("{}{p}", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::down(), "{p}");
    }
}

#[tokio::test]
async fn head_timeout_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&server)
        .await;

    let prober = Prober::new(&ProbeConfig {
        timeout_secs: 1,
        ..ProbeConfig::default()
    })
    .unwrap();
    assert_eq!(prober.head(&server.uri()).await, ProbeOutcome::down());
}

#[tokio::test]
async fn unreachable_host_is_down() {
    let server = MockServer::start().await;
    let outcome = prober_for(&server).head("http://127.0.0.1:1/").await;
    assert_eq!(outcome.status, MonitorStatus::Down);
    assert_eq!(outcome.latency_ms, 0);
}

#[tokio::test]
async fn minecraft_lookup_reports_players() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/mc.example.net"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "online": true,
            "players": {"online": 12, "max": 500},
            "version": "1.20.4"
        })))
        .mount(&server)
        .await;

    let probe = prober_for(&server).minecraft("mc.example.net").await;
    assert!(probe.is_online());
    assert_eq!(probe.players_label().as_deref(), Some("12/500 players"));
    assert_eq!(probe.status.version.as_deref(), Some("1.20.4"));
}

#[tokio::test]
async fn minecraft_lookup_failures_are_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/error.example.net"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/garbage.example.net"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let prober = prober_for(&server);
    for address in ["error.example.net", "garbage.example.net"] {
        let probe = prober.minecraft(address).await;
        assert!(!probe.is_online(), "{address}");
        assert_eq!(probe.latency_ms, 0);
    }
}
