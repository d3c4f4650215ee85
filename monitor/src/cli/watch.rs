//! watch subcommand
//!
//! Polls the backend and re-renders the terminal on every state change.

use super::TargetArgs;
use crate::presenter::render;
use crate::scheduler::PollingScheduler;
use crate::server::shutdown_signal;
use clap::Args;
use healthdash_common::config::MonitorConfig;
use std::future::Future;
use std::io::Write;
use tracing::warn;

/// Clear screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Arguments for the watch subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Append renders instead of redrawing the screen
    #[arg(long)]
    pub no_clear: bool,

    /// Backend overrides
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the watch command
pub async fn execute(config: MonitorConfig, args: &WatchArgs) -> Result<(), anyhow::Error> {
    run(config, args, std::io::stdout(), shutdown_signal()).await
}

/// Re-render into `out` until `shutdown` resolves or a write fails.
///
/// The scheduler is torn down on every exit path.
pub async fn run<W, F>(
    config: MonitorConfig,
    args: &WatchArgs,
    mut out: W,
    shutdown: F,
) -> Result<(), anyhow::Error>
where
    W: Write,
    F: Future<Output = ()>,
{
    let scheduler = PollingScheduler::new(&config)?;
    let mut rx = scheduler.subscribe();
    let timer = scheduler.start();
    tokio::pin!(shutdown);

    let outcome = loop {
        let text = render(&rx.borrow_and_update());
        if let Err(e) = draw(&mut out, &text, !args.no_clear) {
            warn!(error = %e, "Terminal output failed; stopping watch");
            break Err(e);
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
            }
            _ = &mut shutdown => break Ok(()),
        }
    };

    scheduler.shutdown();
    timer.await?;
    outcome?;
    Ok(())
}

fn draw<W: Write>(out: &mut W, text: &str, clear: bool) -> std::io::Result<()> {
    if clear {
        write!(out, "{}", CLEAR_SCREEN)?;
    }
    writeln!(out, "{}", text)?;
    out.flush()
}
