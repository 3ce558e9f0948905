//! Verification orchestrator
//!
//! Sequences change-set resolution, analyzers and drift detection into one
//! [`VerificationResult`]. The orchestrator never spawns processes itself and
//! never returns an error: every expected failure is already a violation by
//! the time it gets here.

use std::path::PathBuf;
use std::thread;

use crate::config::{DriftConfig, GuardianConfig};
use crate::core::models::{
    Baseline, ChangeSet, ChangeSetError, Scope, VerificationResult, Violation, rules,
};
use crate::core::ports::{Analyzer, BaselineStore, VersionControl};
use crate::core::services::drift;

/// Runs one verification pass over a repository
pub struct Orchestrator<'a> {
    root: PathBuf,
    compare_branch: String,
    drift: DriftConfig,
    vcs: &'a dyn VersionControl,
    baselines: &'a dyn BaselineStore,
    analyzers: Vec<Box<dyn Analyzer + 'a>>,
}

impl std::fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("root", &self.root)
            .field("compare_branch", &self.compare_branch)
            .field("analyzers", &self.analyzers.iter().map(|a| a.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with no analyzers
    #[must_use]
    pub fn new(
        root: PathBuf,
        config: &GuardianConfig,
        vcs: &'a dyn VersionControl,
        baselines: &'a dyn BaselineStore,
    ) -> Self {
        Self {
            root,
            compare_branch: config.analysis.compare_branch.clone(),
            drift: config.drift.clone(),
            vcs,
            baselines,
            analyzers: Vec::new(),
        }
    }

    /// Set the analyzers, in report order
    #[must_use]
    pub fn with_analyzers(mut self, analyzers: Vec<Box<dyn Analyzer + 'a>>) -> Self {
        self.analyzers = analyzers;
        self
    }

    /// Verify the repository
    ///
    /// Violations are ordered: change-set failure first, then analyzers in
    /// their configured order, then drift.
    #[must_use]
    pub fn verify(&self, scope: Scope) -> VerificationResult {
        log::info!("verifying {scope} files against {}", self.compare_branch);
        let mut violations = Vec::new();

        match self.resolve(scope) {
            Ok(change_set) => {
                log::debug!("change-set has {} file(s)", change_set.len());
                violations.extend(self.run_analyzers(&change_set, scope));
            },
            Err(e) => {
                log::warn!("change-set unresolved: {e}");
                violations.push(e.to_violation());
            },
        }

        violations.extend(self.check_drift());

        let result = VerificationResult::new(violations);
        log::info!(
            "verification {}: {} error(s), {} warning(s)",
            if result.passed() { "passed" } else { "failed" },
            result.error_count(),
            result.warning_count()
        );
        result
    }

    fn resolve(&self, scope: Scope) -> Result<ChangeSet, ChangeSetError> {
        match scope {
            Scope::Changed => self.vcs.resolve_changes(&self.compare_branch),
            Scope::Full => self.vcs.tracked_files(),
        }
    }

    /// Run every applicable analyzer concurrently, then restore a fixed order
    fn run_analyzers(&self, change_set: &ChangeSet, scope: Scope) -> Vec<Violation> {
        let jobs: Vec<(usize, &dyn Analyzer, Vec<String>)> = self
            .analyzers
            .iter()
            .enumerate()
            .filter_map(|(index, analyzer)| {
                let files = analyzer.select(change_set, scope);
                if files.is_empty() && !analyzer.runs_without_files(scope) {
                    log::debug!("{}: no applicable files, skipping", analyzer.name());
                    None
                } else {
                    Some((index, analyzer.as_ref(), files))
                }
            })
            .collect();

        let mut results: Vec<(usize, Vec<Violation>)> = thread::scope(|s| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|(index, analyzer, files)| {
                    log::debug!("{}: analyzing {} file(s)", analyzer.name(), files.len());
                    (*index, analyzer.name(), s.spawn(move || analyzer.run(files)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(index, name, handle)| {
                    let found = handle.join().unwrap_or_else(|_| {
                        log::error!("{name} analyzer panicked");
                        vec![
                            Violation::error(
                                ".",
                                rules::ANALYZER_CRASH,
                                format!("{name} analyzer crashed"),
                            )
                            .with_suggestion("Fix the analyzer crash and retry verification."),
                        ]
                    });
                    (index, found)
                })
                .collect()
        });

        results.sort_by_key(|(index, _)| *index);
        results
            .into_iter()
            .flat_map(|(_, mut found)| {
                found.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
                found
            })
            .collect()
    }

    fn check_drift(&self) -> Vec<Violation> {
        let baseline = match self.baselines.load() {
            Ok(baseline) => baseline.unwrap_or_else(Baseline::new),
            Err(e) => return vec![drift::invalid_baseline(&e.to_string())],
        };
        drift::check(&self.root, &self.drift, &baseline)
    }
}
