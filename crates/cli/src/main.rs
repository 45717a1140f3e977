//! APIC CLI - authenticated sessions against an APIC controller.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Run a session command (login, request, keepalive) via the client library.
//! - Map failures to structured exit codes.
//!
//! Does NOT handle:
//! - Session lifecycle or request resolution (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod cancellation;
mod commands;
mod dispatch;
mod error;
mod prompt;

use std::time::Duration;

use apic_config::{CertVerification, ConfigLoader};
use args::Cli;
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::from(&e).as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut loader = match ConfigLoader::new().from_env() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to load configuration from environment: {:#}", e);
            std::process::exit(ExitCode::from(&e).as_i32());
        }
    };

    // Apply CLI overrides (highest priority)
    if let Some(ref host) = cli.host {
        loader = loader.with_controller(host.clone());
    }
    if let Some(ref username) = cli.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(ref password) = cli.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(ref cert) = cli.cert {
        let Ok(cert) = cert.parse::<CertVerification>();
        loader = loader.with_cert(cert);
    }
    if cli.challenge_token {
        loader = loader.with_challenge_token(true);
    }
    if let Some(ratio) = cli.refresh_ratio {
        loader = loader.with_refresh_ratio(ratio);
    }
    if let Some(timeout_secs) = cli.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout_secs));
    }

    let config = match loader.build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build configuration: {:#}", e);
            std::process::exit(ExitCode::from(&e).as_i32());
        }
    };

    // Create cancellation token and set up signal handling
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config, &cancel).await {
        Ok(()) => ExitCode::Success,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
