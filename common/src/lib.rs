//! healthdash 共通ライブラリ
//!
//! 監視対象エンドポイント・プローブ結果・ポーリング状態などの共有型と設定

#![warn(missing_docs)]

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

/// 監視対象バックエンドのレスポンスボディ
pub mod protocol;

/// コアデータ型
pub mod types;
