//! Connection-level settings.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Certificate verification setting for the controller connection.
///
/// Controllers commonly run with self-signed certificates, so verification
/// is disabled unless explicitly requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CertVerification {
    /// Accept any certificate presented by the controller.
    #[default]
    Disabled,
    /// Verify against the platform's trusted roots.
    SystemRoots,
    /// Verify against the CA certificates in a PEM bundle.
    CaBundle(PathBuf),
}

impl CertVerification {
    /// Returns true when certificates are checked at all.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl FromStr for CertVerification {
    type Err = Infallible;

    /// Parses `false`/`true` style flags, treating anything else as a bundle path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "false" | "0" | "no" | "off" => Self::Disabled,
            "true" | "1" | "yes" | "on" => Self::SystemRoots,
            _ => Self::CaBundle(PathBuf::from(trimmed)),
        })
    }
}

impl fmt::Display for CertVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("false"),
            Self::SystemRoots => f.write_str("true"),
            Self::CaBundle(path) => write!(f, "{}", path.display()),
        }
    }
}
