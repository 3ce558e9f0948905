//! Temporary git repository helper

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary git repository on branch `main`
pub struct TempGitRepo {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl TempGitRepo {
    /// Create a new temporary git repository
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().to_path_buf();
        let repo = Self {
            _temp_dir: temp_dir,
            path,
        };

        repo.git(&["init", "--quiet"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo
    }

    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file to the repository
    pub fn write_file(&self, name: &str, content: &str) {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(file_path, content).expect("Failed to write file");
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        let output = self.git(&["commit", "--quiet", "--allow-empty", "-m", message]);
        assert!(output.status.success(), "commit failed: {output:?}");
    }

    /// Create a branch at HEAD without checking it out
    pub fn branch(&self, name: &str) {
        let output = self.git(&["branch", name]);
        assert!(output.status.success(), "branch failed: {output:?}");
    }

    /// Run a git command and return output
    pub fn git(&self, args: &[&str]) -> std::process::Output {
        Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .expect("Failed to run git")
    }
}

/// A bare repository to push to
pub struct BareRemote {
    _temp_dir: TempDir,
    path: PathBuf,
}

impl BareRemote {
    /// Create a bare repository and register it as `name` in `repo`
    pub fn attach(repo: &TempGitRepo, name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("remote.git");
        Command::new("git")
            .args(["init", "--quiet", "--bare"])
            .arg(&path)
            .output()
            .expect("Failed to init bare repo");
        repo.git(&["remote", "add", name, &path.to_string_lossy()]);
        Self {
            _temp_dir: temp_dir,
            path,
        }
    }

    /// Branches present on the remote
    pub fn branches(&self) -> Vec<String> {
        let output = Command::new("git")
            .args(["for-each-ref", "--format=%(refname:short)", "refs/heads"])
            .current_dir(&self.path)
            .output()
            .expect("Failed to list remote branches");
        String::from_utf8_lossy(&output.stdout).lines().map(String::from).collect()
    }
}
