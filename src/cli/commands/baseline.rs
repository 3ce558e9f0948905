//! Manage the approved configuration baseline

use super::Workspace;
use crate::cli::app::BaselineAction;
use guardian::core::models::{Baseline, BaselineMeta, MIN_REASON_CHARS};
use guardian::core::ports::BaselineStore;
use guardian::core::services::drift;
use guardian::output::{BaselineOutput, OperationResult, OutputMode};

/// Dispatch a `baseline` subcommand
pub fn baseline(action: BaselineAction, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        BaselineAction::Update {
            acknowledge_policy_change,
            reason,
        } => update(acknowledge_policy_change, &reason, mode),
        BaselineAction::Show => show(mode),
    }
}

fn update(acknowledged: bool, reason: &str, mode: OutputMode) -> anyhow::Result<()> {
    if !acknowledged {
        anyhow::bail!(
            "Refusing to update the baseline without --acknowledge-policy-change. \
             Updating it approves the current protected configuration as policy."
        );
    }
    let reason = reason.trim();
    if !BaselineMeta::is_auditable_reason(reason) {
        anyhow::bail!("--reason must be at least {MIN_REASON_CHARS} characters");
    }

    let workspace = Workspace::open()?;
    let baseline = drift::snapshot(&workspace.root, &workspace.config.drift.protected)?;
    let meta = BaselineMeta::now(reason, &baseline, true);
    workspace.baselines.save(&baseline, &meta)?;
    log::info!("baseline updated: {reason}");

    OperationResult {
        success: true,
        message: format!("Baseline updated ({} protected file(s)).", baseline.len()),
    }
    .render(mode);
    Ok(())
}

fn show(mode: OutputMode) -> anyhow::Result<()> {
    let workspace = Workspace::open()?;
    let baseline = workspace.baselines.load()?;
    let meta = workspace.baselines.load_meta()?;

    BaselineOutput {
        exists: baseline.is_some(),
        files: baseline.unwrap_or_else(Baseline::new),
        meta,
    }
    .render(mode);
    Ok(())
}
