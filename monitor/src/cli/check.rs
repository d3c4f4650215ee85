//! check subcommand
//!
//! Runs exactly one refresh cycle and prints the snapshot.

use super::TargetArgs;
use crate::presenter::render;
use crate::scheduler::PollingScheduler;
use clap::Args;
use healthdash_common::config::MonitorConfig;

/// Arguments for the check subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Backend overrides
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the check command
///
/// Returns whether the health record and every route are healthy.
pub async fn execute(config: MonitorConfig, args: &CheckArgs) -> Result<bool, anyhow::Error> {
    let scheduler = PollingScheduler::new(&config)?;
    scheduler.run_cycle().await;
    let state = scheduler.snapshot();
    scheduler.shutdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render(&state));
    }

    Ok(state.all_healthy())
}
