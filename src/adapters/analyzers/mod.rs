//! Analyzer adapters
//!
//! One adapter per external tool, all built on [`ToolRunner`], which turns
//! every way a tool can fail into a blocking violation:
//!
//! - [`eslint`] - JavaScript/TypeScript linting
//! - [`ruff`] - Python linting
//! - [`semgrep`] - Pattern rules over every changed file
//! - [`coverage`] - diff-cover threshold on changed lines
//! - [`quality`] - Repository-defined commands

pub mod coverage;
pub mod eslint;
pub mod quality;
pub mod ruff;
pub mod semgrep;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::{GuardianConfig, Language};
use crate::core::models::{Violation, rules};
use crate::core::ports::{Analyzer, ProcessError, ProcessOutput, ProcessRunner};

pub use coverage::CoverageAnalyzer;
pub use eslint::EslintAnalyzer;
pub use quality::QualityAnalyzer;
pub use ruff::RuffAnalyzer;
pub use semgrep::SemgrepAnalyzer;

/// File used for violations about a tool as a whole
const TOOL_FILE: &str = ".";

/// Exit codes meaning "ran and reported" for linters
pub const LINT_EXITS: &[i32] = &[0, 1];

/// Shared invoke/parse/fail helper for analyzer adapters
#[derive(Clone)]
pub struct ToolRunner {
    runner: Arc<dyn ProcessRunner>,
    root: PathBuf,
    timeout: Duration,
}

impl std::fmt::Debug for ToolRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRunner")
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ToolRunner {
    /// Create a runner executing tools in `root`
    #[must_use]
    pub const fn new(runner: Arc<dyn ProcessRunner>, root: PathBuf, timeout: Duration) -> Self {
        Self {
            runner,
            root,
            timeout,
        }
    }

    /// Repository root the tools run in
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail with `tool-config-missing` unless `relative` exists under the root
    pub fn require_config(&self, tool: &str, relative: &str) -> Result<PathBuf, Violation> {
        let path = self.root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Violation::error(
                relative,
                rules::TOOL_CONFIG_MISSING,
                format!("{tool} configuration file {relative} is missing."),
            )
            .with_suggestion(format!("Run `guardian init` to restore {relative}.")))
        }
    }

    /// Run `argv`, accepting only the exit codes in `accepted`
    pub fn invoke(
        &self,
        tool: &str,
        argv: &[String],
        accepted: &[i32],
    ) -> Result<ProcessOutput, Violation> {
        let output = self.spawn(tool, argv)?;
        match output.status {
            Some(code) if accepted.contains(&code) => Ok(output),
            _ => Err(execution_error(
                tool,
                format!(
                    "{tool} exited with status {}: {}",
                    output.status_text(),
                    output.stderr_summary()
                ),
            )),
        }
    }

    /// Run `argv` and return whatever it produced, whatever the exit status
    pub fn spawn(&self, tool: &str, argv: &[String]) -> Result<ProcessOutput, Violation> {
        self.runner
            .run(argv, &self.root, self.timeout)
            .map_err(|e| match e {
                ProcessError::TimedOut { .. } => Violation::error(
                    TOOL_FILE,
                    rules::TOOL_TIMEOUT,
                    format!("{tool} timed out: {e}"),
                )
                .with_suggestion("Raise tools.timeout_secs or narrow the analyzed files."),
                ProcessError::EmptyCommand
                | ProcessError::Spawn { .. }
                | ProcessError::Wait { .. } => {
                    execution_error(tool, format!("Failed to execute {tool}: {e}"))
                },
            })
    }

    /// Parse stdout as JSON, citing the first stderr line on failure
    pub fn parse_json<T: DeserializeOwned>(
        tool: &str,
        output: &ProcessOutput,
    ) -> Result<T, Violation> {
        serde_json::from_str(&output.stdout).map_err(|e| {
            Violation::error(
                TOOL_FILE,
                rules::TOOL_OUTPUT_PARSE,
                format!(
                    "Failed to parse {tool} output: {e}. {}",
                    output.stderr_summary()
                ),
            )
            .with_suggestion(format!("Fix {tool} runtime or configuration issues and retry."))
        })
    }

    /// Make `path` relative to the repository root when it lies inside it
    #[must_use]
    pub fn relative(&self, path: &str) -> String {
        Path::new(path)
            .strip_prefix(&self.root)
            .map_or_else(|_| path.to_string(), |p| p.to_string_lossy().into_owned())
    }
}

fn execution_error(tool: &str, message: String) -> Violation {
    Violation::error(TOOL_FILE, rules::TOOL_EXECUTION_ERROR, message)
        .with_suggestion(format!("Ensure {tool} is installed and available to guardian."))
}

/// Configured tool command with `--no-install` forced onto `npx`
#[must_use]
pub fn tool_command(configured: &[String]) -> Vec<String> {
    let mut argv = configured.to_vec();
    let is_npx = argv
        .first()
        .and_then(|p| Path::new(p).file_stem())
        .is_some_and(|s| s == "npx");
    if is_npx && !argv.iter().any(|a| a == "--no-install") {
        argv.insert(1, "--no-install".to_string());
    }
    argv
}

/// Build the analyzers enabled by `config`, in report order
#[must_use]
pub fn build_analyzers(
    config: &GuardianConfig,
    root: &Path,
    runner: Arc<dyn ProcessRunner>,
) -> Vec<Box<dyn Analyzer>> {
    let tools = ToolRunner::new(runner, root.to_path_buf(), config.tools.timeout());
    let mut analyzers: Vec<Box<dyn Analyzer>> = Vec::new();

    if config.analysis.has_language(Language::Typescript) {
        analyzers.push(Box::new(EslintAnalyzer::new(tools.clone(), &config.tools.eslint)));
    }
    if config.analysis.has_language(Language::Python) {
        analyzers.push(Box::new(RuffAnalyzer::new(tools.clone(), &config.tools.ruff)));
    }
    analyzers.push(Box::new(SemgrepAnalyzer::new(tools.clone(), &config.tools.semgrep)));
    analyzers.push(Box::new(CoverageAnalyzer::new(
        tools.clone(),
        &config.tools.diff_cover,
        &config.analysis,
    )));
    for command in &config.quality.commands {
        analyzers.push(Box::new(QualityAnalyzer::new(tools.clone(), command)));
    }

    log::debug!("{} analyzer(s) enabled", analyzers.len());
    analyzers
}
