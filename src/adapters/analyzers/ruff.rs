//! ruff adapter
//!
//! `--ignore-noqa` is always passed: inline suppressions written by an
//! assistant must not hide findings.

use serde::Deserialize;

use super::{LINT_EXITS, ToolRunner, tool_command};
use crate::config::Language;
use crate::core::models::{ChangeSet, Scope, Severity, Violation};
use crate::core::ports::Analyzer;
use crate::paths;

const TOOL: &str = "ruff";

#[derive(Debug, Deserialize)]
struct Finding {
    filename: String,
    code: Option<String>,
    message: String,
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    row: u32,
    column: u32,
}

/// Lints Python files with ruff
#[derive(Debug)]
pub struct RuffAnalyzer {
    tools: ToolRunner,
    command: Vec<String>,
}

impl RuffAnalyzer {
    /// Create the adapter with the configured ruff command
    #[must_use]
    pub fn new(tools: ToolRunner, command: &[String]) -> Self {
        Self {
            tools,
            command: tool_command(command),
        }
    }

    fn analyze(&self, files: &[String]) -> Result<Vec<Violation>, Violation> {
        let config = self.tools.require_config(TOOL, paths::RUFF_CONFIG)?;

        let mut argv = self.command.clone();
        argv.push("check".to_string());
        argv.push("--config".to_string());
        argv.push(config.to_string_lossy().into_owned());
        argv.extend(["--output-format", "json", "--ignore-noqa"].map(String::from));
        argv.extend(files.iter().cloned());

        let output = self.tools.invoke(TOOL, &argv, LINT_EXITS)?;
        let findings: Vec<Finding> = ToolRunner::parse_json(TOOL, &output)?;

        Ok(findings
            .into_iter()
            .map(|f| {
                Violation::new(
                    self.tools.relative(&f.filename),
                    f.location.row,
                    f.location.column,
                    f.code.unwrap_or_else(|| "syntax-error".to_string()),
                    f.message,
                    Severity::Error,
                )
            })
            .collect())
    }
}

impl Analyzer for RuffAnalyzer {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn select(&self, change_set: &ChangeSet, _scope: Scope) -> Vec<String> {
        change_set.with_extensions(Language::Python.extensions())
    }

    fn run(&self, files: &[String]) -> Vec<Violation> {
        self.analyze(files).unwrap_or_else(|v| vec![v])
    }
}
