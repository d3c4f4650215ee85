//! 監視対象バックエンドのレスポンスボディ
//!
//! `/` と `/health` のボディを解釈する。`/health`は形が崩れていても
//! 取り込めるフィールドだけを取り込む。

use crate::types::{HealthIssue, ProbeStatus, UNKNOWN_SERVICE_STATE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `GET /` のボディ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootBody {
    /// バックエンドからのメッセージ
    pub message: String,
}

impl RootBody {
    /// プローブのペイロードから取り出す
    pub fn from_payload(payload: &Value) -> Option<Self> {
        serde_json::from_value(payload.clone()).ok()
    }
}

/// `GET /health` のボディ
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HealthBody {
    /// 全体ステータス
    pub status: ProbeStatus,
    /// サービス状態
    pub services: BTreeMap<String, String>,
    /// 問題の詳細
    pub issues: Vec<HealthIssue>,
    /// ボディ側のエラーメッセージ
    pub error: Option<String>,
    /// 上記以外のフィールド
    pub extra: Map<String, Value>,
}

impl HealthBody {
    /// JSON値から変換
    ///
    /// - `status` が無い、または"healthy"以外なら `Unhealthy`
    /// - 文字列でないサービス状態は "unknown"
    /// - 解釈できない issue は捨てる
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        let status = fields
            .remove("status")
            .as_ref()
            .and_then(Value::as_str)
            .map(ProbeStatus::from_token)
            .unwrap_or_default();

        let services = match fields.remove("services") {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(name, state)| {
                    let state = state
                        .as_str()
                        .unwrap_or(UNKNOWN_SERVICE_STATE)
                        .to_string();
                    (name, state)
                })
                .collect(),
            _ => BTreeMap::new(),
        };

        let issues = match fields.remove("issues") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value::<HealthIssue>(item).ok())
                .collect(),
            _ => Vec::new(),
        };

        let error = fields
            .remove("error")
            .and_then(|v| v.as_str().map(str::to_string));

        Self {
            status,
            services,
            issues,
            error,
            extra: fields,
        }
    }
}
