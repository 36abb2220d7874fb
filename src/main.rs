//! Car catalog CLI entry point.
//!
//! Parses arguments, loads configuration, and dispatches to command
//! handlers in `carmatch::cli::commands`.

use std::process::ExitCode;

use carmatch::Settings;
use carmatch::cli::{Cli, Commands, commands};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    carmatch::logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Init { force } => {
            commands::init::run_init(force);
            ExitCode::SUCCESS
        }
        Commands::Config => {
            commands::init::run_config(&config);
            ExitCode::SUCCESS
        }
        Commands::Serve { bind } => {
            commands::serve::run(bind, config).await;
            ExitCode::SUCCESS
        }
        Commands::Classify {
            price,
            seats,
            page,
            json,
        } => {
            // Model loading reads files; keep it off the async runtime
            let task = tokio::task::spawn_blocking(move || {
                commands::catalog::run_classify(&price, &seats, page, json, &config)
            });
            task.await.unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            })
        }
        Commands::List { page, json } => {
            let task =
                tokio::task::spawn_blocking(move || commands::catalog::run_list(page, json, &config));
            task.await.unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            })
        }
    }
}
