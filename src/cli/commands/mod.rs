//! Command implementations

mod baseline;
mod config_show;
mod init;
mod push;
mod report;
mod verify;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use guardian::adapters::{self, GitVersionControl, JsonBaselineStore, SystemProcessRunner};
use guardian::config::GuardianConfig;
use guardian::core::ports::{Analyzer, VersionControl};

pub use baseline::baseline;
pub use config_show::config_show;
pub use init::init;
pub use push::push;
pub use report::report;
pub use verify::verify;

/// An initialized repository: its root, configuration and adapters
struct Workspace {
    root: PathBuf,
    config: GuardianConfig,
    vcs: GitVersionControl,
    baselines: JsonBaselineStore,
}

impl Workspace {
    /// Locate the repository and load its configuration
    fn open() -> anyhow::Result<Self> {
        let root = repo_root()?;
        let config = GuardianConfig::load(&root)?;
        log::debug!("loaded configuration from {}", root.display());
        Ok(Self {
            vcs: GitVersionControl::new(root.clone()),
            baselines: JsonBaselineStore::new(&root),
            root,
            config,
        })
    }

    fn analyzers(&self) -> Vec<Box<dyn Analyzer>> {
        adapters::build_analyzers(&self.config, &self.root, Arc::new(SystemProcessRunner::new()))
    }
}

/// Root of the repository containing the current directory
fn repo_root() -> anyhow::Result<PathBuf> {
    GitVersionControl::current_dir()?
        .repo_root()
        .context("guardian must run inside a git repository")
}
