//! ルートアグリゲーター
//!
//! 静的なエンドポイント一覧に対してプローブを並列実行し、一覧と同じ順序で返す。

use super::prober::EndpointProber;
use futures::future::join_all;
use healthdash_common::types::{EndpointSpec, RouteStatus};
use tracing::debug;

/// 全ルートを並列にプローブ
///
/// すべてのプローブが完了するまで待つ（join）。出力の長さと順序は `endpoints` と一致し、
/// 個々の失敗は該当ルートの `Unhealthy` として表現される。
pub async fn probe_all(
    prober: &EndpointProber,
    base_url: &str,
    endpoints: &[EndpointSpec],
) -> Vec<RouteStatus> {
    let probes = endpoints.iter().map(|endpoint| async move {
        let result = prober.probe(base_url, &endpoint.path).await;
        RouteStatus::new(endpoint.clone(), result)
    });

    let statuses = join_all(probes).await;

    let healthy = statuses.iter().filter(|s| s.is_healthy()).count();
    debug!(
        total = statuses.len(),
        healthy = healthy,
        unhealthy = statuses.len() - healthy,
        "Route probes completed"
    );

    statuses
}
