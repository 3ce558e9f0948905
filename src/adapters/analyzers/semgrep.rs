//! semgrep adapter

use serde::Deserialize;

use super::{LINT_EXITS, ToolRunner, tool_command};
use crate::core::models::{ChangeSet, Scope, Severity, Violation};
use crate::core::ports::Analyzer;
use crate::paths;

const TOOL: &str = "semgrep";

#[derive(Debug, Deserialize)]
struct Report {
    #[serde(default)]
    results: Vec<Finding>,
}

#[derive(Debug, Deserialize)]
struct Finding {
    path: String,
    check_id: String,
    start: Position,
    extra: Extra,
}

#[derive(Debug, Deserialize)]
struct Position {
    line: u32,
    col: u32,
}

#[derive(Debug, Deserialize)]
struct Extra {
    #[serde(default)]
    message: String,
    #[serde(default)]
    severity: String,
}

/// Applies the repository's semgrep rules to every changed file
#[derive(Debug)]
pub struct SemgrepAnalyzer {
    tools: ToolRunner,
    command: Vec<String>,
}

impl SemgrepAnalyzer {
    /// Create the adapter with the configured semgrep command
    #[must_use]
    pub fn new(tools: ToolRunner, command: &[String]) -> Self {
        Self {
            tools,
            command: tool_command(command),
        }
    }

    fn analyze(&self, files: &[String]) -> Result<Vec<Violation>, Violation> {
        let rules = self.tools.require_config(TOOL, paths::SEMGREP_RULES)?;

        let mut argv = self.command.clone();
        argv.push("--config".to_string());
        argv.push(rules.to_string_lossy().into_owned());
        argv.push("--json".to_string());
        argv.extend(files.iter().cloned());

        let output = self.tools.invoke(TOOL, &argv, LINT_EXITS)?;
        let report: Report = ToolRunner::parse_json(TOOL, &output)?;

        Ok(report
            .results
            .into_iter()
            .map(|f| {
                let severity = if f.extra.severity.eq_ignore_ascii_case("error") {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                Violation::new(
                    self.tools.relative(&f.path),
                    f.start.line,
                    f.start.col,
                    f.check_id,
                    f.extra.message,
                    severity,
                )
            })
            .collect())
    }
}

impl Analyzer for SemgrepAnalyzer {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn select(&self, change_set: &ChangeSet, _scope: Scope) -> Vec<String> {
        change_set.files().to_vec()
    }

    fn run(&self, files: &[String]) -> Vec<Violation> {
        self.analyze(files).unwrap_or_else(|v| vec![v])
    }
}
