//! REST APIハンドラー
//!
//! ポーリング状態の参照と手動リフレッシュ

pub mod status;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status::get_status))
        .route("/api/refresh", post(status::refresh))
        .route("/api/endpoints", get(status::list_endpoints))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
