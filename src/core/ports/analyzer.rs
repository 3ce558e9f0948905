//! Analyzer port
//!
//! One implementation per external tool category. Analyzers never return
//! errors: every failure is converted into a blocking violation at this
//! boundary.

use crate::core::models::{ChangeSet, Scope, Violation};

/// A uniform invoke/parse/fail wrapper around one external tool
pub trait Analyzer: Send + Sync {
    /// Stable name used in logs and crash reports
    fn name(&self) -> &'static str;

    /// The subset of `change_set` this analyzer applies to.
    ///
    /// An empty selection means the analyzer is skipped, which is not a
    /// failure.
    fn select(&self, change_set: &ChangeSet, scope: Scope) -> Vec<String>;

    /// Run even when the selection is empty, e.g. project-wide commands
    fn runs_without_files(&self, _scope: Scope) -> bool {
        false
    }

    /// Analyze `files` and return normalized findings
    fn run(&self, files: &[String]) -> Vec<Violation>;
}
