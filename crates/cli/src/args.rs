//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and the controller address variable.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not read the remaining `APIC_*` variables (see `apic_config::ConfigLoader`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apic-cli")]
#[command(about = "APIC CLI - Authenticated sessions against an APIC controller", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  apic-cli --host 10.0.0.1 login\n  apic-cli --host apic1 get api/class/fvTenant.json\n  apic-cli --host apic1 post api/mo/uni.xml --data '<fvTenant name=\"t1\"/>'\n  apic-cli --host apic1 --challenge-token keepalive --duration 1800\n"
)]
pub struct Cli {
    /// Controller host, IP address or URL (e.g., 10.0.0.1 or https://apic1:8443)
    #[arg(long, global = true, env = "APIC_HOST")]
    pub host: Option<String>,

    /// Login username (prompted for when absent)
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Login password (prompted for, masked, when absent)
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Certificate verification: false, true, or a path to a CA bundle
    #[arg(long, global = true, value_name = "PATH|false|true")]
    pub cert: Option<String>,

    /// Request a GUI challenge token at login and send it on every request
    #[arg(long, global = true)]
    pub challenge_token: bool,

    /// Fraction of the session timeout after which keepalive refresh fires
    #[arg(long, global = true)]
    pub refresh_ratio: Option<f64>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, report the session timeout and refresh schedule, then log out
    Login,

    /// GET a path or URL within a session
    Get {
        /// Path relative to the controller (e.g., api/mo/uni.json) or a full URL
        target: String,
    },

    /// POST a body to a path or URL within a session
    Post {
        /// Path relative to the controller (e.g., api/mo/uni.xml) or a full URL
        target: String,

        /// Request body (XML or JSON)
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        data: Option<String>,

        /// Read the request body from a file
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// DELETE a path or URL within a session
    Delete {
        /// Path relative to the controller or a full URL
        target: String,
    },

    /// Hold a session open with keepalive refreshes, then log out
    Keepalive {
        /// How long to hold the session, in seconds
        #[arg(long, default_value = "60")]
        duration: u64,
    },
}
