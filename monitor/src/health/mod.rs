//! ヘルスチェック
//!
//! バックエンドの各ルートと `/health` をプル型で確認する。
//!
//! - [`prober`]: 1エンドポイントへの計測付きGET
//! - [`routes`]: 全ルートの並列プローブ
//! - [`checker`]: `/health` の集約レコード生成

pub mod checker;
pub mod prober;
pub mod routes;

pub use checker::HealthChecker;
pub use prober::{EndpointProber, FetchError};
pub use routes::probe_all;

use crate::error::MonitorResult;
use reqwest::Client;
use std::time::Duration;

/// プローブ用HTTPクライアントを作成
///
/// `timeout` が `None` の場合はタイムアウトを設定しない。
pub fn build_client(timeout: Option<Duration>) -> MonitorResult<Client> {
    let mut builder =
        Client::builder().user_agent(concat!("healthdash/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
