//! Show the effective configuration

use super::Workspace;
use guardian::output::OutputMode;

/// Print the loaded configuration with defaults filled in
pub fn config_show(mode: OutputMode) -> anyhow::Result<()> {
    let workspace = Workspace::open()?;
    match mode {
        OutputMode::Human => print!("{}", workspace.config.to_toml()?),
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&workspace.config)?),
    }
    Ok(())
}
