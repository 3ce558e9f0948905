//! Verification result model
//!
//! [`VerificationResult`] is the only contract the gateway, the CLI and the
//! report writer consume. `passed` is derived from the violations and can't
//! be set on its own.

use serde::Serialize;

use super::Violation;

/// Which files a verification run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Files changed relative to the comparison branch (`verify`, `push`)
    #[default]
    Changed,
    /// Every tracked file (`scan`)
    Full,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Changed => write!(f, "changed"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Outcome of one verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    passed: bool,
    violations: Vec<Violation>,
}

impl VerificationResult {
    /// Build a result; `passed` is true iff no violation has `error` severity
    #[must_use]
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        let passed = !violations.iter().any(Violation::is_blocking);
        Self { passed, violations }
    }

    /// Whether verification found no blocking violation
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// All violations, in report order
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consume the result, returning its violations
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Number of blocking violations
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_blocking()).count()
    }

    /// Number of informational violations
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.violations.len() - self.error_count()
    }

    /// Obtain push clearance; `None` unless verification passed
    #[must_use]
    pub fn clearance(&self) -> Option<PushClearance> {
        self.passed.then(|| PushClearance {
            warnings: self.warning_count(),
        })
    }
}

/// Proof that the preceding verification passed.
///
/// Only [`VerificationResult::clearance`] can construct one, and
/// [`PushTransport::push`](crate::core::ports::PushTransport::push) requires
/// it, so no code path reaches the transport without a passing result.
/// Results are only built by the orchestrator and the gateway. The token
/// can't be copied or cloned.
#[allow(missing_copy_implementations)]
#[derive(Debug, PartialEq, Eq)]
pub struct PushClearance {
    warnings: usize,
}

impl PushClearance {
    /// Warnings that were present in the passing verification
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}
