//! Change-set model
//!
//! "Nothing changed" and "could not determine what changed" are different
//! values: the former is an empty [`ChangeSet`], the latter a
//! [`ChangeSetError`] that always becomes a blocking violation.

use thiserror::Error;

use super::violation::{CONFIG_FILE, rules};
use super::Violation;

/// Ordered, deduplicated repository-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    files: Vec<String>,
}

impl ChangeSet {
    /// Build a change-set, sorting and removing duplicates and blank entries.
    ///
    /// Paths are kept verbatim; file names may legitimately contain spaces.
    #[must_use]
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files: Vec<String> = files
            .into_iter()
            .map(Into::into)
            .filter(|f: &String| !f.trim().is_empty())
            .collect();
        files.sort();
        files.dedup();
        Self { files }
    }

    /// The paths in this change-set
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Number of paths
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths whose extension is one of `extensions` (without the dot)
    #[must_use]
    pub fn with_extensions(&self, extensions: &[&str]) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| {
                std::path::Path::new(f)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| extensions.contains(&e))
            })
            .cloned()
            .collect()
    }
}

/// Why a change-set could not be resolved
#[derive(Debug, Error)]
pub enum ChangeSetError {
    /// The comparison reference does not exist or is unreachable
    #[error("Compare branch '{branch}' is not available. Set analysis.compare_branch to a valid ref.")]
    CompareBranchMissing {
        /// The configured reference
        branch: String,
    },

    /// `git diff` against the comparison reference failed
    #[error("Git diff failed for compare branch '{branch}': {detail}")]
    DiffFailed {
        /// The configured reference
        branch: String,
        /// First line of git's stderr
        detail: String,
    },

    /// Listing tracked files failed
    #[error("git ls-files failed: {detail}")]
    ListFailed {
        /// First line of git's stderr
        detail: String,
    },

    /// git reported a path that is not valid UTF-8
    #[error("Git reported a path that is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// The path with invalid bytes replaced
        path: String,
    },

    /// git could not be executed at all
    #[error("Failed to run git: {0}")]
    Git(#[from] std::io::Error),
}

impl ChangeSetError {
    /// Convert the failure into the blocking violation that reports it
    #[must_use]
    pub fn to_violation(&self) -> Violation {
        let (rule, suggestion) = match self {
            Self::CompareBranchMissing { .. } => (
                rules::COMPARE_BRANCH_MISSING,
                "Fix compare_branch or fetch the configured branch before verifying.",
            ),
            Self::DiffFailed { .. } | Self::NonUtf8Path { .. } | Self::Git(_) => (
                rules::CHANGE_SET_UNRESOLVED,
                "Ensure git is installed and repository state is healthy.",
            ),
            Self::ListFailed { .. } => (
                rules::FILE_DISCOVERY_FAILED,
                "Resolve git file discovery errors and rerun the scan.",
            ),
        };
        Violation::error(CONFIG_FILE, rule, self.to_string()).with_suggestion(suggestion)
    }
}
