//! Push transport port
//!
//! The underlying push mechanism. It can only be invoked with a
//! [`PushClearance`], which exists only for a passing verification.

use crate::core::models::PushClearance;

/// What to push where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    /// Remote name (e.g. `origin`)
    pub remote: String,
    /// Branch to push
    pub branch: String,
    /// Force push (with lease)
    pub force: bool,
}

/// Result of the underlying push command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

impl TransportOutput {
    /// Whether the push succeeded
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// The underlying push mechanism
pub trait PushTransport: Send + Sync {
    /// Push `request`; requires proof of a passing verification
    fn push(
        &self,
        clearance: &PushClearance,
        request: &PushRequest,
    ) -> std::io::Result<TransportOutput>;
}
