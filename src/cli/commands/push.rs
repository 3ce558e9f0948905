//! Verify, then push

use std::process::ExitCode;

use super::Workspace;
use guardian::adapters::{GitTransport, MarkdownReportWriter};
use guardian::core::services::{Gateway, Orchestrator, PushOptions};
use guardian::output::{OutputMode, VerificationOutput};

/// Push `branch` to `remote` only if verification passes
///
/// Exit codes: 0 pushed or dry run passed, 1 blocked, 2 push failed.
pub fn push(
    remote: &str,
    branch: Option<&str>,
    force: bool,
    dry_run: bool,
    mode: OutputMode,
) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open()?;
    let orchestrator = Orchestrator::new(
        workspace.root.clone(),
        &workspace.config,
        &workspace.vcs,
        &workspace.baselines,
    )
    .with_analyzers(workspace.analyzers());
    let transport = GitTransport::new(&workspace.root);
    let reports = MarkdownReportWriter::new(&workspace.root, workspace.config.reports.keep_count);

    let gateway = Gateway::new(&orchestrator, &workspace.vcs, &transport, &reports);
    let outcome = gateway.push(remote, branch, PushOptions { force, dry_run });

    let code = outcome.exit_code();
    VerificationOutput::from_push(outcome).render(mode);

    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
