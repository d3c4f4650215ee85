//! 模擬バックエンド（wiremock）

use healthdash_common::config::MonitorConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 指定パスにJSONを返すモックを登録する
#[allow(dead_code)]
pub async fn mount_json(mock: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(mock)
        .await;
}

/// 指定パスに遅延付きでJSONを返すモックを登録する
#[allow(dead_code)]
pub async fn mount_delayed_json(
    mock: &MockServer,
    route: &str,
    status: u16,
    body: Value,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(mock)
        .await;
}

/// `/` 以外の既定ルート（/health を除く）を健全状態で登録する
#[allow(dead_code)]
pub async fn mount_healthy_routes(mock: &MockServer) {
    mount_json(mock, "/", 200, json!({"message": "Hello from FastAPI"})).await;
    mount_json(mock, "/db-check", 200, json!({"status": "DB connected"})).await;
    mount_json(
        mock,
        "/cache-check",
        200,
        json!({"status": "Redis connected", "value": "ok"}),
    )
    .await;
}

/// 全ルート健全なバックエンドを起動する
#[allow(dead_code)]
pub async fn start_healthy_backend() -> MockServer {
    let mock = MockServer::start().await;
    mount_healthy_routes(&mock).await;
    mount_json(&mock, "/health", 200, healthy_body()).await;
    mock
}

/// 健全な /health ボディ
#[allow(dead_code)]
pub fn healthy_body() -> Value {
    json!({
        "status": "healthy",
        "services": {"database": "healthy", "cache": "healthy"}
    })
}

/// 指定URLを監視する設定
#[allow(dead_code)]
pub fn config_for(base_url: impl Into<String>) -> MonitorConfig {
    MonitorConfig {
        base_url: base_url.into(),
        ..MonitorConfig::default()
    }
}

/// 何も待ち受けていないローカルURLを得る
#[allow(dead_code)]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
