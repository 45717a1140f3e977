//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `main()`).
//!
//! Invariants:
//! - All commands receive the shared cancellation token

use std::time::Duration;

use anyhow::Result;
use apic_config::Config;

use crate::args::{Cli, Commands};
use crate::cancellation::CancellationToken;
use crate::commands;
use crate::commands::request::{Verb, read_body};

/// Dispatch a parsed command to its handler.
pub(crate) async fn run_command(
    cli: Cli,
    config: Config,
    cancel_token: &CancellationToken,
) -> Result<()> {
    match cli.command {
        Commands::Login => commands::login::run(config).await,
        Commands::Get { target } => {
            commands::request::run(config, Verb::Get, target, cancel_token).await
        }
        Commands::Post { target, data, file } => {
            let body = read_body(data, file)?;
            commands::request::run(config, Verb::Post(body), target, cancel_token).await
        }
        Commands::Delete { target } => {
            commands::request::run(config, Verb::Delete, target, cancel_token).await
        }
        Commands::Keepalive { duration } => {
            commands::keepalive::run(config, Duration::from_secs(duration), cancel_token).await
        }
    }
}
