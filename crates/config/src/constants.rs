//! Centralized constants for the APIC session workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Session Defaults
// =============================================================================

/// Fraction of the server-declared session timeout after which the keepalive
/// refresh fires.
pub const DEFAULT_REFRESH_RATIO: f64 = 0.9;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

// =============================================================================
// Environment Variables
// =============================================================================

/// Controller host, IP address or URL.
pub const ENV_HOST: &str = "APIC_HOST";

/// Login username.
pub const ENV_USERNAME: &str = "APIC_USERNAME";

/// Login password.
pub const ENV_PASSWORD: &str = "APIC_PASSWORD";

/// Certificate verification: `false`, `true`, or a path to a CA bundle.
pub const ENV_CERT: &str = "APIC_CERT";

/// Enables the challenge-token login flow.
pub const ENV_CHALLENGE_TOKEN: &str = "APIC_CHALLENGE_TOKEN";

/// Keepalive refresh ratio override.
pub const ENV_REFRESH_RATIO: &str = "APIC_REFRESH_RATIO";

/// Request timeout in seconds.
pub const ENV_TIMEOUT: &str = "APIC_TIMEOUT";

/// Set to `1` or `true` to skip `.env` loading.
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";
