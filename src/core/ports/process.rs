//! Subprocess port
//!
//! Every external tool runs through a [`ProcessRunner`], so adapters never
//! spawn processes directly and tests can script tool behavior.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.status, Some(0))
    }

    /// First non-empty stderr line, for violation messages
    #[must_use]
    pub fn stderr_summary(&self) -> String {
        self.stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("No stderr output available.")
            .to_string()
    }

    /// Exit status rendered for messages
    #[must_use]
    pub fn status_text(&self) -> String {
        self.status.map_or_else(|| "signal".to_string(), |c| c.to_string())
    }
}

/// Why a process produced no output at all
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The argv was empty
    #[error("empty command")]
    EmptyCommand,

    /// The program could not be started (usually missing from PATH)
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program name
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The program ran past its deadline and was killed
    #[error("'{program}' did not finish within {}s", timeout.as_secs())]
    TimedOut {
        /// Program name
        program: String,
        /// The deadline that expired
        timeout: Duration,
    },

    /// Waiting on the child failed
    #[error("failed waiting for '{program}': {source}")]
    Wait {
        /// Program name
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Runs external programs with a deadline
pub trait ProcessRunner: Send + Sync {
    /// Run `argv` in `cwd`, killing it if it outlives `timeout`
    fn run(
        &self,
        argv: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError>;
}
