//! Verify changed files (`verify`) or the whole tree (`scan`)

use std::process::ExitCode;

use super::Workspace;
use guardian::adapters::MarkdownReportWriter;
use guardian::core::models::Scope;
use guardian::core::ports::ReportWriter;
use guardian::core::services::Orchestrator;
use guardian::output::{OutputMode, VerificationOutput};

/// Run one verification pass; exit 0 iff it passed
pub fn verify(scope: Scope, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let workspace = Workspace::open()?;
    let orchestrator = Orchestrator::new(
        workspace.root.clone(),
        &workspace.config,
        &workspace.vcs,
        &workspace.baselines,
    )
    .with_analyzers(workspace.analyzers());

    let result = orchestrator.verify(scope);
    let passed = result.passed();

    let report = if passed {
        None
    } else {
        let writer = MarkdownReportWriter::new(&workspace.root, workspace.config.reports.keep_count);
        writer
            .write(result.violations())
            .inspect_err(|e| log::warn!("failed to write report: {e}"))
            .ok()
    };

    VerificationOutput::from_result(result, report.as_deref()).render(mode);

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
