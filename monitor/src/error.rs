//! モニター層のエラー型
//!
//! プローブ失敗は結果レコードに畳み込まれるため、ここに現れるのは
//! 起動・設定・サーバー周りのエラーのみ。

use healthdash_common::error::CommonError;
use thiserror::Error;

/// Monitor error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Common layer error
    #[error(transparent)]
    Common(#[from] CommonError),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// I/O error (listener bind etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging initialization error
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err.to_string())
    }
}

/// Monitor result type
pub type MonitorResult<T> = Result<T, MonitorError>;
