//! Git integration adapter
//!
//! Implements `VersionControl` and `PushTransport` by shelling out to `git`.
//! The current branch is read through `git2`.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::core::models::{ChangeSet, ChangeSetError, PushClearance};
use crate::core::ports::{PushRequest, PushTransport, TransportOutput, VersionControl};

/// Git-based version control implementation
#[derive(Debug, Clone)]
pub struct GitVersionControl {
    /// Working directory
    workdir: PathBuf,
}

impl GitVersionControl {
    /// Create a new git version control adapter
    #[must_use]
    pub const fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    /// Create a git adapter for the current directory
    pub fn current_dir() -> anyhow::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn git(&self, args: &[&str]) -> std::io::Result<Output> {
        log::debug!("git {}", args.join(" "));
        Command::new("git").current_dir(&self.workdir).args(args).output()
    }
}

impl VersionControl for GitVersionControl {
    fn resolve_changes(&self, compare_branch: &str) -> Result<ChangeSet, ChangeSetError> {
        let target = format!("{compare_branch}^{{commit}}");
        let verify = self.git(&["rev-parse", "--verify", "--quiet", &target])?;
        if !verify.status.success() {
            return Err(ChangeSetError::CompareBranchMissing {
                branch: compare_branch.to_string(),
            });
        }

        // Deletions have nothing left to analyze
        let range = format!("{compare_branch}...HEAD");
        let diff = self.git(&["diff", "--name-only", "-z", "--diff-filter=d", &range])?;
        if !diff.status.success() {
            return Err(ChangeSetError::DiffFailed {
                branch: compare_branch.to_string(),
                detail: first_line(&diff.stderr),
            });
        }

        Ok(ChangeSet::new(split_paths(&diff.stdout)?))
    }

    fn tracked_files(&self) -> Result<ChangeSet, ChangeSetError> {
        let output = self.git(&["ls-files", "-z"])?;
        if !output.status.success() {
            return Err(ChangeSetError::ListFailed {
                detail: first_line(&output.stderr),
            });
        }

        let root = self.repo_root().unwrap_or_else(|_| self.workdir.clone());
        let mut files = split_paths(&output.stdout)?;
        files.retain(|f| {
            let present = root.join(f).exists();
            if !present {
                log::debug!("skipping {f}: deleted from the working tree");
            }
            present
        });
        Ok(ChangeSet::new(files))
    }

    fn uncommitted_changes(&self) -> anyhow::Result<Vec<String>> {
        let output = self.git(&["diff", "HEAD", "--name-only", "-z"])?;
        if !output.status.success() {
            anyhow::bail!("git diff HEAD failed: {}", first_line(&output.stderr));
        }
        Ok(split_paths(&output.stdout)?)
    }

    fn is_valid_branch_name(&self, name: &str) -> anyhow::Result<bool> {
        if name.starts_with('-') {
            return Ok(false);
        }
        let output = self.git(&["check-ref-format", "--branch", name])?;
        Ok(output.status.success())
    }

    fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let repo = git2::Repository::discover(&self.workdir)?;
        if repo.head_detached()? {
            return Ok(None);
        }
        let head = match repo.head() {
            Ok(head) => head,
            // Unborn branch: HEAD names a branch with no commits yet
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(head.shorthand().map(String::from))
    }

    fn repo_root(&self) -> anyhow::Result<PathBuf> {
        let output = self.git(&["rev-parse", "--show-toplevel"])?;

        if !output.status.success() {
            anyhow::bail!("Not a git repository");
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }
}

/// Split NUL-terminated `-z` output into paths
fn split_paths(stdout: &[u8]) -> Result<Vec<String>, ChangeSetError> {
    stdout
        .split(|b| *b == 0)
        .filter(|p| !p.is_empty())
        .map(|p| {
            String::from_utf8(p.to_vec()).map_err(|_| ChangeSetError::NonUtf8Path {
                path: String::from_utf8_lossy(p).into_owned(),
            })
        })
        .collect()
}

fn first_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output from git")
        .to_string()
}

/// Pushes with `git push`
#[derive(Debug, Clone)]
pub struct GitTransport {
    workdir: PathBuf,
}

impl GitTransport {
    /// Create a transport running in `workdir`
    #[must_use]
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    /// The argv used for `request`
    #[must_use]
    pub fn command(request: &PushRequest) -> Vec<String> {
        let mut argv = vec!["push".to_string()];
        if request.force {
            argv.push("--force-with-lease".to_string());
        }
        argv.push("--".to_string());
        argv.push(request.remote.clone());
        argv.push(request.branch.clone());
        argv
    }
}

impl PushTransport for GitTransport {
    fn push(
        &self,
        clearance: &PushClearance,
        request: &PushRequest,
    ) -> std::io::Result<TransportOutput> {
        log::debug!("push cleared with {} warning(s)", clearance.warnings());
        let output = Command::new("git")
            .current_dir(&self.workdir)
            .args(Self::command(request))
            .output()?;
        Ok(TransportOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
