//! ポーリング状態APIハンドラー

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use healthdash_common::types::{EndpointSpec, PollingState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// POST /api/refresh のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshResponse {
    /// リフレッシュを受け付けたか
    pub accepted: bool,
}

/// GET /api/status - 現在のポーリング状態
pub async fn get_status(State(state): State<AppState>) -> Json<PollingState> {
    Json(state.scheduler.snapshot())
}

/// POST /api/refresh - 手動リフレッシュ
///
/// サイクルの完了は待たずに 202 を返す。停止後は 503。
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    if state.scheduler.is_shut_down() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(RefreshResponse { accepted: false }),
        );
    }

    debug!("Manual refresh requested via API");
    // 完了はスナップショット側で観測する
    drop(state.scheduler.refresh_now());
    (StatusCode::ACCEPTED, Json(RefreshResponse { accepted: true }))
}

/// GET /api/endpoints - 監視対象一覧
pub async fn list_endpoints(State(state): State<AppState>) -> Json<Vec<EndpointSpec>> {
    Json(state.scheduler.endpoints().to_vec())
}
