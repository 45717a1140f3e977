//! Configuration type definitions for the APIC session client.
//!
//! Responsibilities:
//! - Define the configuration bag handed to the session client.
//! - Model the certificate verification setting (`cert: path-or-false`).
//!
//! Does NOT handle:
//! - Loading values from the environment (see `loader` module).
//! - Building HTTP clients or performing TLS setup (see client crate).
//!
//! Invariants:
//! - Passwords use `secrecy::SecretString` to prevent accidental logging.
//! - Certificate verification defaults to disabled.

pub(crate) mod connection;
mod session;

pub use connection::CertVerification;
pub use session::{Config, SessionConfig};
