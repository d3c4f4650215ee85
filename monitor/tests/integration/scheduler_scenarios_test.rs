//! Integration Test: ポーリングスケジューラー
//!
//! 経路ごとの障害の局所化、重なったサイクルの上書き順、到達不能バックエンド

use crate::support::backend::{
    config_for, healthy_body, mount_delayed_json, mount_healthy_routes, mount_json,
    unreachable_url,
};
use healthdash::scheduler::PollingScheduler;
use healthdash_common::config::MonitorConfig;
use healthdash_common::types::{ProbeStatus, UNKNOWN_SERVICE_STATE};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_route_timeout_is_localized() {
    let mock = MockServer::start().await;
    mount_json(&mock, "/", 200, json!({"message": "Hello from FastAPI"})).await;
    mount_json(&mock, "/health", 200, healthy_body()).await;
    mount_json(
        &mock,
        "/cache-check",
        200,
        json!({"status": "Redis connected", "value": "ok"}),
    )
    .await;
    mount_delayed_json(
        &mock,
        "/db-check",
        200,
        json!({"status": "DB connected"}),
        Duration::from_secs(3),
    )
    .await;

    let config = MonitorConfig {
        request_timeout_secs: Some(1),
        ..config_for(mock.uri())
    };
    let scheduler = PollingScheduler::new(&config).unwrap();
    assert!(scheduler.run_cycle().await);

    let state = scheduler.snapshot();
    assert_eq!(state.route_statuses.len(), 4);

    let db = state
        .route_statuses
        .iter()
        .find(|r| r.endpoint.path == "/db-check")
        .unwrap();
    assert_eq!(db.result.status, ProbeStatus::Unhealthy);
    assert_eq!(db.result.status_code, 0);
    assert!(db.result.response_time_ms.is_none());
    assert!(db.result.error.is_some());

    for route in state
        .route_statuses
        .iter()
        .filter(|r| r.endpoint.path != "/db-check")
    {
        assert!(route.is_healthy(), "{} should be healthy", route.endpoint.path);
    }

    assert!(!state.all_healthy());
    let record = state.health_record.unwrap();
    assert_eq!(record.status, ProbeStatus::Healthy);
}

#[tokio::test]
async fn test_overlapping_cycles_last_resolution_wins() {
    let mock = MockServer::start().await;
    mount_healthy_routes(&mock).await;

    // 1回目のサイクル: 遅い応答（A）
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "healthy", "services": {}, "marker": "A"}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .mount(&mock)
        .await;
    // 2回目以降: 速い応答（B）
    mount_json(
        &mock,
        "/health",
        200,
        json!({"status": "healthy", "services": {}, "marker": "B"}),
    )
    .await;

    let scheduler = PollingScheduler::new(&config_for(mock.uri())).unwrap();
    let mut rx = scheduler.subscribe();

    let first = scheduler.refresh_now();
    tokio::time::sleep(Duration::from_millis(150)).await;
    let second = scheduler.refresh_now();

    // B が先に着地するが、A がまだ未解決なのでローディングは継続
    let state = rx
        .wait_for(|s| s.health_record.is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(
        state.health_record.as_ref().unwrap().extra.get("marker"),
        Some(&json!("B"))
    );
    assert!(state.health_loading);

    assert!(second.await.unwrap());
    assert!(first.await.unwrap());

    let state = scheduler.snapshot();
    let record = state.health_record.unwrap();
    assert_eq!(record.extra.get("marker"), Some(&json!("A")));
    assert!(!state.health_loading);
    assert!(!state.routes_loading);
    assert!(state.last_update.is_some());
}

#[tokio::test]
async fn test_unreachable_backend_populates_every_slot() {
    let scheduler = PollingScheduler::new(&config_for(unreachable_url())).unwrap();
    assert!(scheduler.run_cycle().await);

    let state = scheduler.snapshot();
    let record = state.health_record.as_ref().unwrap();
    assert!(record.is_unreachable());
    assert_eq!(record.status, ProbeStatus::Unhealthy);
    assert_eq!(record.error.as_deref(), Some("Unable to reach backend"));
    assert_eq!(record.service_state("database"), UNKNOWN_SERVICE_STATE);
    assert_eq!(record.service_state("cache"), UNKNOWN_SERVICE_STATE);
    assert_eq!(record.issues.len(), 1);
    assert_eq!(record.issues[0].service, "backend");

    assert_eq!(state.route_statuses.len(), 4);
    for route in &state.route_statuses {
        assert_eq!(route.result.status, ProbeStatus::Unhealthy);
        assert_eq!(route.result.status_code, 0);
        assert!(route.result.response_time_ms.is_none());
    }
    assert!(!state.health_loading);
    assert!(!state.routes_loading);
    assert!(state.last_update.is_some());
    assert_eq!(state.overall_status(), Some(ProbeStatus::Unhealthy));
}

#[tokio::test]
async fn test_refresh_reflects_backend_recovery() {
    let mock = MockServer::start().await;
    mount_healthy_routes(&mock).await;
    mount_json(
        &mock,
        "/health",
        503,
        json!({
            "status": "unhealthy",
            "services": {"database": "unhealthy", "cache": "healthy"},
            "issues": [{"service": "database", "message": "Connection failed"}]
        }),
    )
    .await;

    let scheduler = PollingScheduler::new(&config_for(mock.uri())).unwrap();
    assert!(scheduler.run_cycle().await);
    let record = scheduler.snapshot().health_record.unwrap();
    assert_eq!(record.status, ProbeStatus::Unhealthy);
    assert_eq!(record.service_state("database"), "unhealthy");
    assert_eq!(record.issues.len(), 1);

    mock.reset().await;
    mount_healthy_routes(&mock).await;
    mount_json(&mock, "/health", 200, healthy_body()).await;

    assert!(scheduler.refresh_now().await.unwrap());
    let state = scheduler.snapshot();
    assert!(state.all_healthy());
    assert!(state.health_record.unwrap().issues.is_empty());
}
