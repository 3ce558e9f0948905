//! Version control system port
//!
//! Defines the interface for inspecting repository state.

use std::path::PathBuf;

use crate::core::models::{ChangeSet, ChangeSetError};

/// Version control system abstraction
///
/// Implementations are read-only: nothing here mutates the repository.
pub trait VersionControl: Send + Sync {
    /// Files that differ between `compare_branch` and `HEAD`
    fn resolve_changes(&self, compare_branch: &str) -> Result<ChangeSet, ChangeSetError>;

    /// Every tracked file in the working tree
    fn tracked_files(&self) -> Result<ChangeSet, ChangeSetError>;

    /// Tracked files whose working-tree or staged content differs from `HEAD`
    fn uncommitted_changes(&self) -> anyhow::Result<Vec<String>>;

    /// Whether `name` is an acceptable branch name that can't be read as an option
    fn is_valid_branch_name(&self, name: &str) -> anyhow::Result<bool>;

    /// The checked-out branch, `None` on a detached HEAD
    fn current_branch(&self) -> anyhow::Result<Option<String>>;

    /// The repository root path
    fn repo_root(&self) -> anyhow::Result<PathBuf>;
}
