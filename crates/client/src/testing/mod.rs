//! Testing utilities for APIC client tests.
//!
//! This module provides helpers for loading XML fixtures and building login
//! responses with chosen attributes. Available when running tests or when the
//! `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use apic_client::testing::{load_fixture, generators::LoginResponseGenerator};
//!
//! // Load a static fixture
//! let body = load_fixture("auth/login_success.xml");
//!
//! // Build a login response on the fly
//! let body = LoginResponseGenerator::new()
//!     .with_refresh_timeout(1)
//!     .with_url_token("challenge-abc")
//!     .generate();
//! ```

pub mod generators;

use std::path::Path;

/// Load a fixture file from the fixtures directory.
///
/// # Arguments
/// * `fixture_path` - Relative path within the fixtures directory (e.g., "auth/login_success.xml")
///
/// # Panics
/// - If the fixture file cannot be read
pub fn load_fixture(fixture_path: &str) -> String {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let fixture_dir = manifest_dir.join("fixtures");
    let full_path = fixture_dir.join(fixture_path);
    std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()))
}
