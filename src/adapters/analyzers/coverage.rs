//! diff-cover adapter
//!
//! Coverage is measured on changed lines only. The artifact (e.g.
//! `coverage.xml`) is produced by the project's own test run; guardian only
//! reads it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{LINT_EXITS, ToolRunner, tool_command};
use crate::config::AnalysisConfig;
use crate::core::models::violation::COVERAGE_FILE;
use crate::core::models::{ChangeSet, Scope, Violation, rules};
use crate::core::ports::Analyzer;

const TOOL: &str = "diff-cover";

#[derive(Debug, Deserialize)]
struct Report {
    total_percent_covered: Option<f64>,
}

/// Enforces the coverage threshold on changed lines
#[derive(Debug)]
pub struct CoverageAnalyzer {
    tools: ToolRunner,
    command: Vec<String>,
    artifact: String,
    compare_branch: String,
    threshold: u32,
    extensions: Vec<&'static str>,
}

impl CoverageAnalyzer {
    /// Create the adapter from the configured command and analysis settings
    #[must_use]
    pub fn new(tools: ToolRunner, command: &[String], analysis: &AnalysisConfig) -> Self {
        Self {
            tools,
            command: tool_command(command),
            artifact: analysis.coverage_file.clone(),
            compare_branch: analysis.compare_branch.clone(),
            threshold: analysis.coverage_threshold,
            extensions: analysis.source_extensions(),
        }
    }

    fn analyze(&self) -> Result<Vec<Violation>, Violation> {
        let artifact = self.tools.root().join(&self.artifact);
        if !artifact.is_file() {
            return Err(Violation::error(
                &self.artifact,
                rules::COVERAGE_ARTIFACT_MISSING,
                format!("Coverage artifact {} was not found.", self.artifact),
            )
            .with_suggestion("Run the test suite with coverage enabled before verifying."));
        }

        let report_file = tempfile::Builder::new()
            .prefix("guardian-diff-cover-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| {
                Violation::error(
                    ".",
                    rules::TOOL_EXECUTION_ERROR,
                    format!("Failed to create a temporary report file for {TOOL}: {e}"),
                )
            })?;

        let mut argv = self.command.clone();
        argv.push(artifact.to_string_lossy().into_owned());
        argv.push("--compare-branch".to_string());
        argv.push(self.compare_branch.clone());
        argv.push("--json-report".to_string());
        argv.push(report_file.path().to_string_lossy().into_owned());
        argv.push("--fail-under".to_string());
        argv.push(self.threshold.to_string());

        let output = self.tools.invoke(TOOL, &argv, LINT_EXITS)?;
        let covered = self.read_report(report_file.path(), &output.stderr_summary())?;
        log::debug!("changed-line coverage {covered:.1}% (threshold {}%)", self.threshold);

        if covered < f64::from(self.threshold) {
            return Ok(vec![Violation::error(
                COVERAGE_FILE,
                rules::COVERAGE_DELTA,
                format!(
                    "Coverage on changed lines is {covered:.1}%, below threshold of {}%",
                    self.threshold
                ),
            )
            .with_suggestion("Add tests that exercise the changed lines.")]);
        }

        // Exit 1 without a breach means diff-cover failed for another reason
        if output.status == Some(1) {
            return Err(Violation::error(
                &self.artifact,
                rules::TOOL_EXECUTION_ERROR,
                format!(
                    "{TOOL} exited with status 1 but reported {covered:.1}% coverage: {}",
                    output.stderr_summary()
                ),
            ));
        }

        Ok(Vec::new())
    }

    fn read_report(&self, path: &Path, stderr: &str) -> Result<f64, Violation> {
        let parse_error = |detail: String| {
            Violation::error(
                &self.artifact,
                rules::TOOL_OUTPUT_PARSE,
                format!("Failed to read {TOOL} JSON report: {detail}. {stderr}"),
            )
            .with_suggestion("Ensure diff-cover can read the coverage artifact and compare branch.")
        };

        let text = fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
        if text.trim().is_empty() {
            return Err(parse_error("report is empty".to_string()));
        }
        let report: Report = serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?;
        report
            .total_percent_covered
            .ok_or_else(|| parse_error("total_percent_covered is missing".to_string()))
    }
}

impl Analyzer for CoverageAnalyzer {
    fn name(&self) -> &'static str {
        "coverage"
    }

    /// Applies only when source files of an enabled language changed
    fn select(&self, change_set: &ChangeSet, _scope: Scope) -> Vec<String> {
        change_set.with_extensions(&self.extensions)
    }

    fn run(&self, _files: &[String]) -> Vec<Violation> {
        self.analyze().unwrap_or_else(|v| vec![v])
    }
}
