//! CLI module for healthdash
//!
//! Provides the `serve`, `check` and `watch` commands.

pub mod check;
pub mod serve;
pub mod watch;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use healthdash_common::config::MonitorConfig;
use std::path::PathBuf;

/// healthdash - Health dashboard for HTTP backends
#[derive(Parser, Debug)]
#[command(name = "healthdash")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    HEALTHDASH_CONFIG                Config file path
    HEALTHDASH_BASE_URL              Backend base URL (default: http://localhost:8000)
    HEALTHDASH_POLL_INTERVAL_SECS    Polling interval in seconds (default: 30)
    HEALTHDASH_REQUEST_TIMEOUT_SECS  Per-request timeout in seconds (default: none)
    HEALTHDASH_HOST                  API bind address (default: 127.0.0.1)
    HEALTHDASH_PORT                  API listen port (default: 3000)
    HEALTHDASH_LOG_LEVEL             Log level (default: info)
    HEALTHDASH_LOG_DIR               Also write logs to a daily rolling file here
"#)]
pub struct Cli {
    /// Config file (JSON, TOML or YAML)
    #[arg(long, global = true, env = "HEALTHDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the backend and serve the status API
    Serve(serve::ServeArgs),
    /// Run a single refresh cycle and print the result
    Check(check::CheckArgs),
    /// Poll the backend and render status to the terminal
    Watch(watch::WatchArgs),
}

/// Overrides shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Polling interval in seconds
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl TargetArgs {
    /// Apply the overrides on top of a loaded config.
    pub fn apply(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(secs) = self.interval_secs {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = Some(secs);
        }
        config
    }
}

/// Load the config file / environment and apply CLI overrides.
pub fn resolve_config(
    config_path: Option<&PathBuf>,
    target: &TargetArgs,
) -> anyhow::Result<MonitorConfig> {
    let config = MonitorConfig::load(config_path.map(PathBuf::as_path))
        .context("failed to load configuration")?;
    let config = target
        .apply(config)
        .validate()
        .context("invalid command-line override")?;
    Ok(config)
}
