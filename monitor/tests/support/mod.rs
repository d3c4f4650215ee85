//! テスト用サポートユーティリティ

pub mod backend;
pub mod http;
