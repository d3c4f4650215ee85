//! 共通型定義
//!
//! EndpointSpec, ProbeResult, HealthRecord, PollingState等のコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 状態が判定できないサービスに付与するトークン
pub const UNKNOWN_SERVICE_STATE: &str = "unknown";

/// プライマリヘルスチェックのパス
pub const HEALTH_PATH: &str = "/health";

/// ルートエンドポイントのパス
pub const ROOT_PATH: &str = "/";

/// `/health`が返す既定のサービス名
pub const DEFAULT_SERVICES: [&str; 2] = ["database", "cache"];

/// 監視対象エンドポイント
///
/// 起動時に決定し、以後変更しない。識別子は (method, path)。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EndpointSpec {
    /// HTTPメソッド
    pub method: String,
    /// パス ("/health" など)
    pub path: String,
    /// 説明
    pub description: String,
}

impl EndpointSpec {
    /// GETエンドポイントを作成
    pub fn get(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            description: description.into(),
        }
    }

    /// 既定の監視対象一覧（表示順）
    pub fn defaults() -> Vec<EndpointSpec> {
        vec![
            EndpointSpec::get(ROOT_PATH, "Root endpoint"),
            EndpointSpec::get(HEALTH_PATH, "Health check"),
            EndpointSpec::get("/db-check", "Database check"),
            EndpointSpec::get("/cache-check", "Cache check"),
        ]
    }
}

/// プローブ結果の状態
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// 正常
    Healthy,
    /// 異常（未知のトークンもこちらに倒す）
    #[default]
    #[serde(other)]
    Unhealthy,
}

impl ProbeStatus {
    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Healthy => "healthy",
            ProbeStatus::Unhealthy => "unhealthy",
        }
    }

    /// 正常かどうか
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    /// トークン文字列から変換（"healthy"以外はすべてUnhealthy）
    pub fn from_token(token: &str) -> Self {
        if token == "healthy" {
            ProbeStatus::Healthy
        } else {
            ProbeStatus::Unhealthy
        }
    }
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 単一プローブの結果
///
/// `status_code == 0` はHTTPレスポンスを受信できなかったことを表す。
/// その場合 `status` は常に `Unhealthy`、`response_time_ms` は `None`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    /// 判定結果
    pub status: ProbeStatus,
    /// HTTPステータスコード（0 = トランスポート障害）
    pub status_code: u16,
    /// 応答時間（ミリ秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// レスポンスボディ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// 失敗理由
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    /// HTTPレスポンスを受信した場合の結果
    ///
    /// 2xx以外のときは、ボディの`error`フィールド、なければ`HTTP {code}`を理由とする。
    pub fn from_response(status_code: u16, response_time_ms: u64, payload: Value) -> Self {
        let success = (200..300).contains(&status_code);
        let error = if success {
            None
        } else {
            Some(
                payload
                    .get("error")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status_code)),
            )
        };

        Self {
            status: if success {
                ProbeStatus::Healthy
            } else {
                ProbeStatus::Unhealthy
            },
            status_code,
            response_time_ms: Some(response_time_ms),
            payload: Some(payload),
            error,
        }
    }

    /// レスポンスを受信できなかった場合の結果
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            status: ProbeStatus::Unhealthy,
            status_code: 0,
            response_time_ms: None,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// トランスポート障害かどうか
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }
}

/// 劣化しているコンポーネントの詳細
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthIssue {
    /// サービス名
    pub service: String,
    /// 概要
    pub message: String,
    /// 元のエラー文字列
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// システム全体のヘルススナップショット
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    /// 全体ステータス
    pub status: ProbeStatus,
    /// `/health`のHTTPステータス（0 = 到達不能）
    pub http_status: u16,
    /// サービス名 → 状態トークン ("healthy" / "unhealthy" / "unknown")
    #[serde(default)]
    pub services: BTreeMap<String, String>,
    /// 問題の詳細（順序を保持）
    #[serde(default)]
    pub issues: Vec<HealthIssue>,
    /// トップレベルのエラーメッセージ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 取得時刻
    pub captured_at: DateTime<Utc>,
    /// ボディのその他のフィールド（`timestamp`など）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthRecord {
    /// バックエンドに到達できなかった場合のレコード
    pub fn unreachable(error: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        let services = DEFAULT_SERVICES
            .iter()
            .map(|name| (name.to_string(), UNKNOWN_SERVICE_STATE.to_string()))
            .collect();

        Self {
            status: ProbeStatus::Unhealthy,
            http_status: 0,
            services,
            issues: vec![HealthIssue {
                service: "backend".to_string(),
                message: "API connection failed".to_string(),
                error: Some(error.into()),
            }],
            error: Some("Unable to reach backend".to_string()),
            captured_at,
            extra: Map::new(),
        }
    }

    /// 到達不能レコードかどうか
    pub fn is_unreachable(&self) -> bool {
        self.http_status == 0
    }

    /// サービスの状態トークン（未登録なら"unknown"）
    pub fn service_state(&self, name: &str) -> &str {
        self.services
            .get(name)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SERVICE_STATE)
    }
}

/// 監視ルートごとの状態（EndpointSpec ⊕ ProbeResult）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStatus {
    /// エンドポイント定義
    #[serde(flatten)]
    pub endpoint: EndpointSpec,
    /// プローブ結果
    #[serde(flatten)]
    pub result: ProbeResult,
}

impl RouteStatus {
    /// 作成
    pub fn new(endpoint: EndpointSpec, result: ProbeResult) -> Self {
        Self { endpoint, result }
    }

    /// 正常かどうか
    pub fn is_healthy(&self) -> bool {
        self.result.status.is_healthy()
    }
}

/// ポーリング状態
///
/// スケジューラーが所有し、プレゼンターは読み取り専用スナップショットとして参照する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PollingState {
    /// 最新のヘルスレコード
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_record: Option<HealthRecord>,
    /// ルート状態（静的リストの順序）
    #[serde(default)]
    pub route_statuses: Vec<RouteStatus>,
    /// ヘルス集約が未完了
    pub health_loading: bool,
    /// ルート集約が未完了
    pub routes_loading: bool,
    /// 最終更新時刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl PollingState {
    /// マウント直後の状態（両方ロード中）
    pub fn initial() -> Self {
        Self {
            health_loading: true,
            routes_loading: true,
            ..Self::default()
        }
    }

    /// いずれかの集約が実行中か
    pub fn is_refreshing(&self) -> bool {
        self.health_loading || self.routes_loading
    }

    /// 全体ステータス（初回サイクル完了前は`None`）
    pub fn overall_status(&self) -> Option<ProbeStatus> {
        self.health_record.as_ref().map(|record| record.status)
    }

    /// ヘルスとすべてのルートが正常か
    pub fn all_healthy(&self) -> bool {
        self.overall_status().is_some_and(|s| s.is_healthy())
            && !self.route_statuses.is_empty()
            && self.route_statuses.iter().all(RouteStatus::is_healthy)
    }

    /// ルートエンドポイントが返したメッセージ
    pub fn backend_message(&self) -> Option<String> {
        self.route_statuses
            .iter()
            .find(|route| route.endpoint.path == ROOT_PATH)
            .and_then(|route| route.result.payload.as_ref())
            .and_then(crate::protocol::RootBody::from_payload)
            .map(|body| body.message)
    }
}
