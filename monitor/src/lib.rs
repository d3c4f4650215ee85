//! healthdash
//!
//! HTTPバックエンドのヘルスチェックをポーリングし、全体状態とルートごとの状態を集約する

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// CLIインターフェース
pub mod cli;

/// エラー型
pub mod error;

/// ヘルスチェック（プローブ・集約）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// ターミナル表示
pub mod presenter;

/// ポーリングスケジューラー
pub mod scheduler;

/// APIサーバー
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// ポーリングスケジューラー
    pub scheduler: scheduler::PollingScheduler,
}
