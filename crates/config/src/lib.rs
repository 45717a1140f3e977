//! Configuration management for the APIC session client.
//!
//! This crate provides the configuration bag a [`Config`] carries into the
//! client (credentials, certificate verification, challenge-token mode and
//! keepalive tuning) and a loader that assembles it from `.env` files,
//! environment variables and explicit overrides.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{CertVerification, Config, SessionConfig};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
