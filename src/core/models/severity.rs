//! Violation severity levels
//!
//! Only [`Severity::Error`] blocks a push.

use serde::{Deserialize, Serialize};

/// Violation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocking - verification fails and the push is refused
    #[default]
    Error,
    /// Informational - reported but never blocks
    Warning,
}

impl Severity {
    /// Whether this severity blocks a push
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            _ => Err(format!("Invalid severity: {s}. Use: error, warning")),
        }
    }
}
