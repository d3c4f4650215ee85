//! Integration Test: ステータスAPI
//!
//! 実ソケット上でルーターを起動し、スナップショット取得と手動リフレッシュを確認する

use crate::support::backend::{config_for, start_healthy_backend};
use crate::support::http::spawn_router;
use healthdash::api::create_router;
use healthdash::api::status::RefreshResponse;
use healthdash::scheduler::PollingScheduler;
use healthdash::AppState;
use healthdash_common::types::{EndpointSpec, PollingState};
use reqwest::StatusCode;
use std::time::Duration;

async fn wait_for_last_update(client: &reqwest::Client, url: &str) -> PollingState {
    for _ in 0..50 {
        let state: PollingState = client.get(url).send().await.unwrap().json().await.unwrap();
        if state.last_update.is_some() && !state.is_refreshing() {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("refresh cycle did not complete in time");
}

#[tokio::test]
async fn test_status_api_over_http() {
    let backend = start_healthy_backend().await;
    let scheduler = PollingScheduler::new(&config_for(backend.uri())).unwrap();
    let server = spawn_router(create_router(AppState {
        scheduler: scheduler.clone(),
    }))
    .await;
    let client = reqwest::Client::new();

    let endpoints: Vec<EndpointSpec> = client
        .get(server.url("/api/endpoints"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(endpoints, EndpointSpec::defaults());

    let initial: PollingState = client
        .get(server.url("/api/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(initial.health_loading);
    assert!(initial.last_update.is_none());

    let res = client
        .post(server.url("/api/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: RefreshResponse = res.json().await.unwrap();
    assert!(body.accepted);

    let state = wait_for_last_update(&client, &server.url("/api/status")).await;
    assert!(state.all_healthy());
    assert_eq!(state.route_statuses.len(), 4);

    scheduler.shutdown();
    let res = client
        .post(server.url("/api/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    server.stop().await;
}
