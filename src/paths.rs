//! Centralized path definitions for guardian
//!
//! This module provides a single source of truth for all filesystem paths used by guardian.
//!
//! ## Storage Layout
//!
//! ```text
//! repo/
//! └── .guardian/
//!     ├── config.toml                 # Committed configuration
//!     ├── eslint.config.js            # Analyzer configuration (protected)
//!     ├── ruff.toml                   # Analyzer configuration (protected)
//!     ├── semgrep-rules.yaml          # Analyzer configuration (protected)
//!     ├── baseline.json               # Approved hashes of protected files
//!     ├── baseline.meta.json          # Audit record of the last baseline update
//!     └── reports/
//!         ├── 2026-01-01T10-00-00.000.md
//!         └── latest.md               # Pointer to the newest report
//! ```
//!
//! The `*_CONFIG`/`*_RULES` constants are repository-relative so they can be
//! used both as paths and as `file` values in violations.

use std::path::{Path, PathBuf};

/// Directory holding all guardian state
pub const GUARDIAN_DIR: &str = ".guardian";

/// Configuration file, relative to the repository root
pub const CONFIG_TOML: &str = ".guardian/config.toml";

/// eslint flat config, relative to the repository root
pub const ESLINT_CONFIG: &str = ".guardian/eslint.config.js";

/// ruff config, relative to the repository root
pub const RUFF_CONFIG: &str = ".guardian/ruff.toml";

/// semgrep rules, relative to the repository root
pub const SEMGREP_RULES: &str = ".guardian/semgrep-rules.yaml";

/// Baseline file, relative to the repository root
pub const BASELINE_JSON: &str = ".guardian/baseline.json";

/// Baseline audit metadata, relative to the repository root
pub const BASELINE_META_JSON: &str = ".guardian/baseline.meta.json";

/// Reports directory name inside `.guardian`
const REPORTS_DIR: &str = "reports";

/// Name of the pointer to the newest report
pub const LATEST_REPORT: &str = "latest.md";

/// Get path to the `.guardian/` directory
#[must_use]
pub fn guardian_dir(root: &Path) -> PathBuf {
    root.join(GUARDIAN_DIR)
}

/// Get path to `.guardian/config.toml`
#[must_use]
pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_TOML)
}

/// Get path to `.guardian/baseline.json`
#[must_use]
pub fn baseline_file(root: &Path) -> PathBuf {
    root.join(BASELINE_JSON)
}

/// Get path to `.guardian/baseline.meta.json`
#[must_use]
pub fn baseline_meta_file(root: &Path) -> PathBuf {
    root.join(BASELINE_META_JSON)
}

/// Get path to `.guardian/reports/`
#[must_use]
pub fn reports_dir(root: &Path) -> PathBuf {
    guardian_dir(root).join(REPORTS_DIR)
}

/// Get path to the latest-report pointer
#[must_use]
pub fn latest_report(root: &Path) -> PathBuf {
    reports_dir(root).join(LATEST_REPORT)
}
