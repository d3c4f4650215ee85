//! serve subcommand
//!
//! Runs the polling scheduler and the status API until Ctrl-C.

use super::TargetArgs;
use clap::Args;
use healthdash_common::config::MonitorConfig;

/// Arguments for the serve subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// API bind address
    #[arg(long)]
    pub host: Option<String>,

    /// API listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Backend overrides
    #[command(flatten)]
    pub target: TargetArgs,
}

impl ServeArgs {
    /// Apply the listener overrides.
    pub fn apply(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

/// Execute the serve command
pub async fn execute(config: MonitorConfig) -> Result<(), anyhow::Error> {
    crate::server::run_server(config).await?;
    Ok(())
}
