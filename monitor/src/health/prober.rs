//! エンドポイントプローバー
//!
//! 1エンドポイントへの計測付きGETを行い、結果を `ProbeResult` に正規化する。
//! 失敗はすべて結果レコードに畳み込み、呼び出し側へは伝播しない。

use healthdash_common::types::ProbeResult;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// HTTP取得の失敗種別
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// レスポンスを受信できなかった（接続失敗・タイムアウト等）
    #[error("{0}")]
    Transport(String),
    /// ボディをJSONとして解釈できなかった
    #[error("{0}")]
    Decode(String),
}

/// 受信・解析済みのレスポンス
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// HTTPステータス
    pub status: StatusCode,
    /// リクエスト送信からレスポンスヘッダ受信までの時間
    pub elapsed: Duration,
    /// JSONボディ
    pub body: Value,
}

/// ベースURLとパスを連結
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// GETしてボディをJSONとして読む
pub async fn fetch_json(client: &Client, url: &str) -> Result<FetchedBody, FetchError> {
    let start = Instant::now();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;
    let elapsed = start.elapsed();
    let status = response.status();

    let body = response
        .json::<Value>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    Ok(FetchedBody {
        status,
        elapsed,
        body,
    })
}

/// エンドポイントプローバー
#[derive(Debug, Clone)]
pub struct EndpointProber {
    /// HTTPクライアント
    client: Client,
}

impl EndpointProber {
    /// 新しいプローバーを作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 単一エンドポイントをプローブ
    pub async fn probe(&self, base_url: &str, path: &str) -> ProbeResult {
        let url = join_url(base_url, path);

        match fetch_json(&self.client, &url).await {
            Ok(fetched) => {
                let latency_ms = fetched.elapsed.as_millis() as u64;
                let result =
                    ProbeResult::from_response(fetched.status.as_u16(), latency_ms, fetched.body);
                debug!(
                    url = %url,
                    status_code = result.status_code,
                    latency_ms = latency_ms,
                    status = %result.status,
                    "Probe completed"
                );
                result
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Probe failed before a response was received");
                ProbeResult::transport_failure(e.to_string())
            }
        }
    }
}
