//! Push gateway
//!
//! `START -> VERIFYING -> {BLOCKED | PUSHING} -> {PUSHED | PUSH_FAILED}`
//!
//! The transport is only reachable through a [`PushClearance`] obtained from
//! the verification that ran inside the same [`Gateway::push`] call. There is
//! no flag that skips verification.
//!
//! Analyzers read the working tree while `git push` sends commits, so the
//! gateway only pushes the checked-out branch, and only when tracked files
//! match `HEAD`.

use std::path::PathBuf;

use crate::core::models::{PushClearance, Scope, VerificationResult, Violation, rules};
use crate::core::ports::{PushRequest, PushTransport, ReportWriter, VersionControl};
use crate::core::services::Orchestrator;

/// Exit code for a push that was blocked by verification
pub const EXIT_BLOCKED: i32 = 1;

/// Exit code for a push whose transport failed after verification passed
pub const EXIT_PUSH_FAILED: i32 = 2;

/// Gateway states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushState {
    /// Resolving the target branch
    Start,
    /// Running verification
    Verifying,
    /// Verification failed; nothing pushed
    Blocked,
    /// Verification passed; invoking the transport
    Pushing,
    /// Verification passed and the push was skipped on request
    DryRun,
    /// The push succeeded
    Pushed,
    /// Verification passed but the transport failed
    PushFailed,
}

impl std::fmt::Display for PushState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::Verifying => "VERIFYING",
            Self::Blocked => "BLOCKED",
            Self::Pushing => "PUSHING",
            Self::DryRun => "DRY_RUN",
            Self::Pushed => "PUSHED",
            Self::PushFailed => "PUSH_FAILED",
        };
        f.write_str(name)
    }
}

/// Push flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushOptions {
    /// Force push (with lease)
    pub force: bool,
    /// Verify only; never push
    pub dry_run: bool,
}

/// Terminal result of a gateway run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Verification failed; the transport was never invoked
    Blocked {
        /// The failing verification
        verification: VerificationResult,
        /// Where the report was written, if writing succeeded
        report: Option<PathBuf>,
    },
    /// Verification passed and `dry_run` was set
    DryRunPassed {
        /// Target of the push that was skipped
        request: PushRequest,
        /// The passing verification
        verification: VerificationResult,
    },
    /// The push succeeded
    Pushed {
        /// What was pushed
        request: PushRequest,
        /// The passing verification
        verification: VerificationResult,
    },
    /// Verification passed but the transport failed
    PushFailed {
        /// What was attempted
        request: PushRequest,
        /// The passing verification
        verification: VerificationResult,
        /// Transport exit code, `None` if it never ran to completion
        exit_code: Option<i32>,
        /// Transport diagnostics
        stderr: String,
    },
}

impl PushOutcome {
    /// Terminal state of this outcome
    #[must_use]
    pub const fn state(&self) -> PushState {
        match self {
            Self::Blocked { .. } => PushState::Blocked,
            Self::DryRunPassed { .. } => PushState::DryRun,
            Self::Pushed { .. } => PushState::Pushed,
            Self::PushFailed { .. } => PushState::PushFailed,
        }
    }

    /// Process exit code: 0 pushed or dry-run, 1 blocked, 2 transport failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Blocked { .. } => EXIT_BLOCKED,
            Self::DryRunPassed { .. } | Self::Pushed { .. } => 0,
            Self::PushFailed { .. } => EXIT_PUSH_FAILED,
        }
    }

    /// The verification this outcome is based on
    #[must_use]
    pub const fn verification(&self) -> &VerificationResult {
        match self {
            Self::Blocked { verification, .. }
            | Self::DryRunPassed { verification, .. }
            | Self::Pushed { verification, .. }
            | Self::PushFailed { verification, .. } => verification,
        }
    }
}

/// Verifies, then pushes
pub struct Gateway<'a> {
    orchestrator: &'a Orchestrator<'a>,
    vcs: &'a dyn VersionControl,
    transport: &'a dyn PushTransport,
    reports: &'a dyn ReportWriter,
}

impl std::fmt::Debug for Gateway<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway").field("orchestrator", self.orchestrator).finish_non_exhaustive()
    }
}

impl<'a> Gateway<'a> {
    /// Create a gateway
    #[must_use]
    pub const fn new(
        orchestrator: &'a Orchestrator<'a>,
        vcs: &'a dyn VersionControl,
        transport: &'a dyn PushTransport,
        reports: &'a dyn ReportWriter,
    ) -> Self {
        Self {
            orchestrator,
            vcs,
            transport,
            reports,
        }
    }

    /// Verify the change-set and push only if it passes
    #[must_use]
    pub fn push(&self, remote: &str, branch: Option<&str>, options: PushOptions) -> PushOutcome {
        log::debug!("gateway {}", PushState::Start);
        let branch = match self.resolve_branch(branch) {
            Ok(branch) => branch,
            Err(reason) => return self.block_unresolved_branch(&reason),
        };
        let request = PushRequest {
            remote: remote.to_string(),
            branch,
            force: options.force,
        };

        log::debug!("gateway {}", PushState::Verifying);
        let mut violations = self.worktree_violations();
        violations.extend(self.orchestrator.verify(Scope::Changed).into_violations());
        let verification = VerificationResult::new(violations);
        let Some(clearance) = verification.clearance() else {
            return self.block(verification);
        };

        if options.dry_run {
            log::info!("dry run: verification passed, not pushing");
            return PushOutcome::DryRunPassed {
                request,
                verification,
            };
        }

        self.transmit(&clearance, request, verification)
    }

    /// The branch to push; an explicit name must be the checked-out branch
    fn resolve_branch(&self, requested: Option<&str>) -> Result<String, String> {
        let current = match self.vcs.current_branch() {
            Ok(Some(branch)) => branch,
            Ok(None) => return Err("HEAD is detached".to_string()),
            Err(e) => return Err(e.to_string()),
        };
        let Some(name) = requested else {
            return Ok(current);
        };

        match self.vcs.is_valid_branch_name(name) {
            Ok(true) => {},
            Ok(false) => return Err(format!("'{name}' is not a valid branch name")),
            Err(e) => return Err(format!("could not validate '{name}': {e}")),
        }
        if name != current {
            return Err(format!(
                "'{name}' is not checked out (HEAD is '{current}'); only the verified HEAD can be pushed"
            ));
        }
        Ok(current)
    }

    fn worktree_violations(&self) -> Vec<Violation> {
        let message = match self.vcs.uncommitted_changes() {
            Ok(files) if files.is_empty() => return Vec::new(),
            Ok(files) => format!(
                "Uncommitted changes to tracked files would not be pushed: {}",
                files.join(", ")
            ),
            Err(e) => format!("Could not compare the working tree with HEAD: {e}"),
        };
        vec![
            Violation::error(".", rules::WORKTREE_DIRTY, message)
                .with_suggestion("Commit or stash your changes, then push again."),
        ]
    }

    fn transmit(
        &self,
        clearance: &PushClearance,
        request: PushRequest,
        verification: VerificationResult,
    ) -> PushOutcome {
        log::debug!("gateway {}", PushState::Pushing);
        log::info!("pushing {} to {}", request.branch, request.remote);
        match self.transport.push(clearance, &request) {
            Ok(output) if output.success() => PushOutcome::Pushed {
                request,
                verification,
            },
            Ok(output) => PushOutcome::PushFailed {
                request,
                verification,
                exit_code: output.exit_code,
                stderr: output.stderr,
            },
            Err(e) => PushOutcome::PushFailed {
                request,
                verification,
                exit_code: None,
                stderr: format!("Failed to run push command: {e}"),
            },
        }
    }

    fn block(&self, verification: VerificationResult) -> PushOutcome {
        log::debug!("gateway {}", PushState::Blocked);
        let report = self
            .reports
            .write(verification.violations())
            .inspect_err(|e| log::warn!("failed to write report: {e}"))
            .ok();
        PushOutcome::Blocked {
            verification,
            report,
        }
    }

    fn block_unresolved_branch(&self, reason: &str) -> PushOutcome {
        let violation = Violation::error(
            ".",
            rules::BRANCH_UNRESOLVED,
            format!("Could not determine the branch to push: {reason}"),
        )
        .with_suggestion("Check out the branch you want to push, then push again.");
        self.block(VerificationResult::new(vec![violation]))
    }
}
