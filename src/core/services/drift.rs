//! Drift detection service
//!
//! Compares SHA-256 hashes of protected configuration files against the
//! stored baseline. Read-only: the baseline is only written by `init` and
//! `baseline update`.

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::DriftConfig;
use crate::core::models::{Baseline, Severity, Violation, rules};

/// SHA-256 of a file's content, lowercase hex
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// Protected paths in a stable order, without duplicates
fn ordered(protected: &[String]) -> Vec<&str> {
    let mut files: Vec<&str> = protected.iter().map(String::as_str).collect();
    files.sort_unstable();
    files.dedup();
    files
}

/// Compute a baseline for every protected file that currently exists
pub fn snapshot(root: &Path, protected: &[String]) -> io::Result<Baseline> {
    let mut baseline = Baseline::new();
    for file in ordered(protected) {
        let path = root.join(file);
        if path.is_file() {
            baseline.insert(file, hash_file(&path)?);
        }
    }
    Ok(baseline)
}

/// Check protected files against `baseline`
///
/// - existing file without an entry -> `config-baseline-missing` (error)
/// - existing file that can't be read -> `config-baseline-missing` (error)
/// - hash mismatch -> `config-drift` at the configured severity
/// - absent file -> nothing to check
#[must_use]
pub fn check(root: &Path, policy: &DriftConfig, baseline: &Baseline) -> Vec<Violation> {
    let mut violations = Vec::new();

    for file in ordered(&policy.protected) {
        let path = root.join(file);
        if !path.is_file() {
            continue;
        }

        let current = match hash_file(&path) {
            Ok(hash) => hash,
            Err(e) => {
                violations.push(
                    Violation::error(
                        file,
                        rules::CONFIG_BASELINE_MISSING,
                        format!("Protected file {file} could not be hashed: {e}"),
                    )
                    .with_suggestion("Fix file permissions so guardian can verify it."),
                );
                continue;
            },
        };

        match baseline.get(file) {
            None => {
                log::debug!("no baseline entry for protected file {file}");
                violations.push(
                    Violation::error(
                        file,
                        rules::CONFIG_BASELINE_MISSING,
                        format!("Baseline missing for protected file: {file}"),
                    )
                    .with_suggestion(
                        "Review the file, then record it with `guardian baseline update`.",
                    ),
                );
            },
            Some(expected) if expected != current => {
                log::debug!("protected file {file} drifted from baseline");
                violations.push(
                    Violation::new(
                        file,
                        0,
                        0,
                        rules::CONFIG_DRIFT,
                        format!("Config file modified: {file}"),
                        policy.severity_for(file),
                    )
                    .with_suggestion("Review config changes - quality gates may be weakened."),
                );
            },
            Some(_) => {},
        }
    }

    violations
}

/// Violation reported when the baseline itself is unusable
#[must_use]
pub fn invalid_baseline(reason: &str) -> Violation {
    Violation::new(
        crate::paths::BASELINE_JSON,
        0,
        0,
        rules::CONFIG_BASELINE_INVALID,
        format!("Baseline could not be loaded: {reason}"),
        Severity::Error,
    )
    .with_suggestion("Restore .guardian/baseline.json or rerun `guardian baseline update`.")
}
