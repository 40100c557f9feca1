//! # flame
//!
//! Command-line client for browsing an API Registry.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point flame at a registry
//! flame init --address https://registry.example.com
//!
//! # List the products of a project
//! flame list projects/my-project/products
//!
//! # Show a single spec
//! flame get projects/my-project/products/petstore/versions/1.0.0/specs/openapi.yaml
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/flame/config.yaml` (or `$FLAME_CONFIG`).

use clap::Parser;
use flame_cli::{commands, Cli, LogLevel};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_filter();
        EnvFilter::new(format!("flame={level},flame_cli={level}"))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Cancel `token` on Ctrl+C so a running listing stops between records.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("received Ctrl+C, stopping");
                token.cancel();
            }
            Err(e) => tracing::error!(%e, "failed to install Ctrl+C handler"),
        }
    });
}

/// The one place errors reach the user.
fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("Error: {err:#}");
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let Some(cmd) = cli.cmd else {
        eprintln!("No command provided. Use --help to see available commands.");
        return ExitCode::FAILURE;
    };

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let session = commands::Session::new(cli.config, cli.address, cancel.clone());
    let result = tokio::select! {
        result = commands::run(cmd, &session) => result,
        _ = cancel.cancelled() => Err(flame_cli::Error::Cancelled.into()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}
