//! Presenter API server.

use crate::error::MonitorResult;
use crate::scheduler::PollingScheduler;
use crate::{api, AppState};
use healthdash_common::config::MonitorConfig;
use tracing::{info, warn};

/// Start the scheduler and serve the API until a shutdown signal arrives.
pub async fn run_server(config: MonitorConfig) -> MonitorResult<()> {
    // バインドに失敗した場合はポーリングを開始しない
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    let scheduler = PollingScheduler::new(&config)?;
    let timer = scheduler.start();

    let app = api::create_router(AppState {
        scheduler: scheduler.clone(),
    });

    info!(
        addr = %bind_addr,
        backend = %config.base_url,
        "healthdash API listening"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.shutdown();
    if let Err(e) = timer.await {
        warn!(error = %e, "Polling task ended abnormally");
    }

    served?;
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the signal handler cannot be installed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
