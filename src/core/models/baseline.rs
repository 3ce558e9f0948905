//! Baseline model
//!
//! Maps protected configuration files to the SHA-256 of their approved
//! content. Verification only reads it; it is written by `init` and by an
//! explicit `baseline update`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Protected file path -> content hash (lowercase hex)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline {
    entries: BTreeMap<String, String>,
}

impl Baseline {
    /// Create an empty baseline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the hash for a file
    pub fn insert(&mut self, file: impl Into<String>, hash: impl Into<String>) {
        self.entries.insert(file.into(), hash.into());
    }

    /// Look up the approved hash for a file
    #[must_use]
    pub fn get(&self, file: &str) -> Option<&str> {
        self.entries.get(file).map(String::as_str)
    }

    /// Files covered by this baseline, in path order
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the baseline has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Audit record written next to the baseline on every update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineMeta {
    /// The operator confirmed this is a policy change
    pub acknowledged_policy_change: bool,
    /// Why the baseline changed
    pub reason: String,
    /// When (RFC3339)
    pub updated_at: String,
    /// Files included in the new baseline
    pub files: Vec<String>,
}

/// Shortest reason accepted for a policy change, in characters
pub const MIN_REASON_CHARS: usize = 10;

impl BaselineMeta {
    /// Create metadata for a baseline written now
    #[must_use]
    pub fn now(reason: impl Into<String>, baseline: &Baseline, acknowledged: bool) -> Self {
        Self {
            acknowledged_policy_change: acknowledged,
            reason: reason.into(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            files: baseline.files().map(String::from).collect(),
        }
    }

    /// Whether `reason` says enough to audit a policy change later
    #[must_use]
    pub fn is_auditable_reason(reason: &str) -> bool {
        reason.trim().chars().count() >= MIN_REASON_CHARS
    }
}
