//! ヘルスアグリゲーター
//!
//! プライマリの `/health` を呼び出し、ボディとトランスポート障害を
//! 単一の `HealthRecord` に正規化する。

use super::prober::{fetch_json, join_url};
use chrono::{DateTime, Utc};
use healthdash_common::protocol::HealthBody;
use healthdash_common::types::{HealthRecord, ProbeStatus, HEALTH_PATH};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// ヘルスチェッカー
#[derive(Debug, Clone)]
pub struct HealthChecker {
    /// HTTPクライアント
    client: Client,
}

impl HealthChecker {
    /// 新しいヘルスチェッカーを作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// `/health` を確認してレコードを生成
    ///
    /// 失敗はすべてレコードとして返す。`captured_at` は完了時刻。
    pub async fn check_health(&self, base_url: &str) -> HealthRecord {
        let url = join_url(base_url, HEALTH_PATH);

        match fetch_json(&self.client, &url).await {
            Ok(fetched) => {
                let record =
                    record_from_response(fetched.status.as_u16(), fetched.body, Utc::now());
                if record.status.is_healthy() {
                    debug!(http_status = record.http_status, "Health check succeeded");
                } else {
                    warn!(
                        http_status = record.http_status,
                        issues = record.issues.len(),
                        "Backend reported degraded services"
                    );
                }
                record
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Unable to reach backend health endpoint");
                HealthRecord::unreachable(e.to_string(), Utc::now())
            }
        }
    }
}

/// レスポンスボディをレコードへ取り込む
///
/// 2xx以外は `error` を "Services with issues (HTTP {code})" に置き換え、
/// ボディの申告に関わらず `Unhealthy` とする。
fn record_from_response(http_status: u16, body: Value, captured_at: DateTime<Utc>) -> HealthRecord {
    let body = HealthBody::from_value(body);
    let success = (200..300).contains(&http_status);

    let (status, error) = if success {
        (body.status, body.error)
    } else {
        (
            ProbeStatus::Unhealthy,
            Some(format!("Services with issues (HTTP {})", http_status)),
        )
    };

    HealthRecord {
        status,
        http_status,
        services: body.services,
        issues: body.issues,
        error,
        captured_at,
        extra: body.extra,
    }
}
