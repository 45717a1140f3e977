//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.
//! - Every environment test pins all `APIC_*` variables it does not set to unset.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// All variables the loader reads, paired with "unset".
pub fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
    vec![
        ("APIC_HOST", None),
        ("APIC_USERNAME", None),
        ("APIC_PASSWORD", None),
        ("APIC_CERT", None),
        ("APIC_CHALLENGE_TOKEN", None),
        ("APIC_REFRESH_RATIO", None),
        ("APIC_TIMEOUT", None),
    ]
}

/// Overlay `vars` onto the fully-unset environment.
pub fn with_env(
    vars: &[(&'static str, Option<&'static str>)],
) -> Vec<(&'static str, Option<&'static str>)> {
    let mut env = unset_all();
    for &(key, value) in vars {
        match env.iter_mut().find(|slot| slot.0 == key) {
            Some(slot) => slot.1 = value,
            None => env.push((key, value)),
        }
    }
    env
}
