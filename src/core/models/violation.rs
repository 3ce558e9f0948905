//! Violation model
//!
//! A violation is one normalized finding from an analyzer or an internal
//! check. The violation list is the only channel for blocking outcomes:
//! tool crashes, unparseable output and broken preconditions all become
//! `error` violations.

use serde::{Deserialize, Serialize};

use super::Severity;

/// Reserved rule identifiers for findings guardian produces itself
pub mod rules {
    /// The configured comparison reference does not resolve
    pub const COMPARE_BRANCH_MISSING: &str = "compare-branch-missing";
    /// git failed while computing the change-set
    pub const CHANGE_SET_UNRESOLVED: &str = "change-set-unresolved";
    /// The branch to push could not be determined
    pub const BRANCH_UNRESOLVED: &str = "branch-unresolved";
    /// Tracked files differ from the commit that would be pushed
    pub const WORKTREE_DIRTY: &str = "worktree-dirty";
    /// git failed while listing tracked files for a full scan
    pub const FILE_DISCOVERY_FAILED: &str = "file-discovery-failed";
    /// A tool could not be started or exited with an undefined status
    pub const TOOL_EXECUTION_ERROR: &str = "tool-execution-error";
    /// A tool produced output that is not the documented structure
    pub const TOOL_OUTPUT_PARSE: &str = "tool-output-parse";
    /// A tool's guardian-managed configuration file is missing
    pub const TOOL_CONFIG_MISSING: &str = "tool-config-missing";
    /// A tool did not finish within the configured timeout
    pub const TOOL_TIMEOUT: &str = "tool-timeout";
    /// An analyzer panicked
    pub const ANALYZER_CRASH: &str = "analyzer-crash";
    /// The coverage artifact diff-cover reads does not exist
    pub const COVERAGE_ARTIFACT_MISSING: &str = "coverage-artifact-missing";
    /// Coverage on changed lines is below the threshold
    pub const COVERAGE_DELTA: &str = "coverage-delta";
    /// A repository-defined quality command exited non-zero
    pub const QUALITY_COMMAND_FAILED: &str = "quality-command-failed";
    /// A protected file exists but has no baseline entry
    pub const CONFIG_BASELINE_MISSING: &str = "config-baseline-missing";
    /// The baseline file cannot be read or parsed
    pub const CONFIG_BASELINE_INVALID: &str = "config-baseline-invalid";
    /// A protected file no longer matches its baseline hash
    pub const CONFIG_DRIFT: &str = "config-drift";
}

/// Sentinel `file` for coverage findings
pub const COVERAGE_FILE: &str = "coverage";

/// Sentinel `file` for configuration-scoped findings
pub const CONFIG_FILE: &str = "config";

/// A single normalized finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Repository-relative path, or a sentinel such as `coverage`
    pub file: String,
    /// 1-based line, 0 when not applicable
    pub line: u32,
    /// 1-based column, 0 when not applicable
    pub column: u32,
    /// Tool rule code or a reserved guardian rule
    pub rule: String,
    /// Human-readable description
    pub message: String,
    /// Whether the finding blocks
    pub severity: Severity,
    /// Optional remediation hint
    #[serde(default)]
    pub suggestion: Option<String>,
}

impl Violation {
    /// Create a violation at a location
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        line: u32,
        column: u32,
        rule: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            rule: rule.into(),
            message: message.into(),
            severity,
            suggestion: None,
        }
    }

    /// Create a blocking violation that is not tied to a source location
    #[must_use]
    pub fn error(file: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(file, 0, 0, rule, message, Severity::Error)
    }

    /// Attach a remediation hint
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether this violation blocks a push
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Ordering key used to make analyzer output deterministic
    #[must_use]
    pub fn sort_key(&self) -> (&str, u32, u32, &str, &str) {
        (&self.file, self.line, self.column, &self.rule, &self.message)
    }
}
