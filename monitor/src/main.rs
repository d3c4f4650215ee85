//! healthdash Entry Point

use clap::Parser;
use healthdash::cli::{check, resolve_config, serve, watch, Cli, Commands};
use healthdash::logging;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(serve::ServeArgs::default()));

    let result = match command {
        Commands::Serve(args) => match resolve_config(cli.config.as_ref(), &args.target) {
            Ok(config) => serve::execute(args.apply(config)).await.map(|_| true),
            Err(e) => Err(e),
        },
        Commands::Check(args) => match resolve_config(cli.config.as_ref(), &args.target) {
            Ok(config) => check::execute(config, &args).await,
            Err(e) => Err(e),
        },
        Commands::Watch(args) => match resolve_config(cli.config.as_ref(), &args.target) {
            Ok(config) => watch::execute(config, &args).await.map(|_| true),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
