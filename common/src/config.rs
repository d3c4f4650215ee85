//! 設定管理
//!
//! MonitorConfig（監視対象・ポーリング間隔・API待受先）の読み込みと検証

use crate::error::{CommonError, CommonResult};
use crate::types::EndpointSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 環境変数のプレフィックス（`HEALTHDASH_BASE_URL` など）
pub const ENV_PREFIX: &str = "HEALTHDASH";

/// モニター設定
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    /// 監視対象バックエンドのベースURL (デフォルト: "http://localhost:8000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// ポーリング間隔（秒）(デフォルト: 30)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// リクエストタイムアウト（秒）。未設定ならトランスポート層に任せる
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// API待受ホスト (デフォルト: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// API待受ポート (デフォルト: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// 監視対象エンドポイント（起動時のみ読み込む）
    #[serde(default = "EndpointSpec::defaults")]
    pub endpoints: Vec<EndpointSpec>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: None,
            host: default_host(),
            port: default_port(),
            endpoints: EndpointSpec::defaults(),
        }
    }
}

impl MonitorConfig {
    /// 設定を読み込む
    ///
    /// 優先順位（低→高）: デフォルト値 → 設定ファイル → `HEALTHDASH_*` 環境変数。
    /// 読み込み後に [`MonitorConfig::validate`] を通す。
    pub fn load(path: Option<&Path>) -> CommonResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .ignore_empty(true),
        );

        let config: MonitorConfig = builder.build()?.try_deserialize()?;
        config.validate()
    }

    /// 値を検証し、正規化した設定を返す
    pub fn validate(mut self) -> CommonResult<Self> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(CommonError::Validation(
                "base_url must not be empty".to_string(),
            ));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CommonError::Validation(format!(
                "base_url must start with http:// or https:// (got {})",
                self.base_url
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(CommonError::Validation(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.endpoints.is_empty() {
            return Err(CommonError::Validation(
                "at least one endpoint must be configured".to_string(),
            ));
        }
        if let Some(endpoint) = self.endpoints.iter().find(|e| !e.path.starts_with('/')) {
            return Err(CommonError::Validation(format!(
                "endpoint path must start with '/' (got {})",
                endpoint.path
            )));
        }
        Ok(self)
    }

    /// ポーリング間隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// リクエストタイムアウト
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// API待受アドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
