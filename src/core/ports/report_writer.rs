//! Report writer port

use std::path::PathBuf;

use crate::core::models::Violation;

/// Persists a human-readable report of a failed verification
pub trait ReportWriter: Send + Sync {
    /// Write a report and return where it was stored
    fn write(&self, violations: &[Violation]) -> anyhow::Result<PathBuf>;
}
