//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Common layer error type
#[derive(Debug, Error)]
pub enum CommonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for CommonError {
    fn from(err: config::ConfigError) -> Self {
        CommonError::Config(err.to_string())
    }
}

/// Common layer result type
pub type CommonResult<T> = Result<T, CommonError>;
