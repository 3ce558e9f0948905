//! Print a verification report

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::json;

use super::repo_root;
use guardian::output::OutputMode;
use guardian::paths;

/// Print the report at `path`, or the latest one
pub fn report(path: Option<&Path>, mode: OutputMode) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => paths::latest_report(&repo_root()?),
    };
    let content = fs::read_to_string(&path)
        .with_context(|| format!("No report found at {}", path.display()))?;

    match mode {
        OutputMode::Human => print!("{content}"),
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "path": path.display().to_string(),
                "content": content,
            }))?
        ),
    }
    Ok(())
}
