//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{Baseline, BaselineMeta, Severity, VerificationResult, Violation};
use crate::core::services::PushOutcome;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Result of `verify`, `scan` and `push`
#[derive(Debug, Serialize)]
pub struct VerificationOutput {
    /// `passed`, `failed`, `blocked`, `dry_run`, `pushed` or `push_failed`
    pub status: &'static str,
    /// Whether verification found no blocking violation
    pub passed: bool,
    /// Number of violations of any severity
    pub violation_count: usize,
    /// All violations, in report order
    pub violations: Vec<Violation>,
    /// Report written for this run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Remote pushed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Branch pushed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Exit code of a failed push
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_exit_code: Option<i32>,
    /// Diagnostics of a failed push
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_error: Option<String>,
}

impl VerificationOutput {
    /// Output for a verification without push
    #[must_use]
    pub fn from_result(result: VerificationResult, report: Option<&Path>) -> Self {
        let status = if result.passed() { "passed" } else { "failed" };
        Self::base(status, result, report.map(|p| p.display().to_string()))
    }

    /// Output for a push attempt
    #[must_use]
    pub fn from_push(outcome: PushOutcome) -> Self {
        match outcome {
            PushOutcome::Blocked {
                verification,
                report,
            } => Self::base("blocked", verification, report.map(|p| p.display().to_string())),
            PushOutcome::DryRunPassed {
                request,
                verification,
            } => Self {
                remote: Some(request.remote),
                branch: Some(request.branch),
                ..Self::base("dry_run", verification, None)
            },
            PushOutcome::Pushed {
                request,
                verification,
            } => Self {
                remote: Some(request.remote),
                branch: Some(request.branch),
                ..Self::base("pushed", verification, None)
            },
            PushOutcome::PushFailed {
                request,
                verification,
                exit_code,
                stderr,
            } => Self {
                remote: Some(request.remote),
                branch: Some(request.branch),
                push_exit_code: exit_code,
                push_error: Some(stderr),
                ..Self::base("push_failed", verification, None)
            },
        }
    }

    fn base(status: &'static str, result: VerificationResult, report: Option<String>) -> Self {
        let passed = result.passed();
        let violations = result.into_violations();
        Self {
            status,
            passed,
            violation_count: violations.len(),
            violations,
            report,
            remote: None,
            branch: None,
            push_exit_code: None,
            push_error: None,
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        for v in &self.violations {
            let label = match v.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            println!("{label} {}:{}:{} [{}]", v.file, v.line, v.column, v.rule);
            println!("    {}", v.message);
            if let Some(suggestion) = &v.suggestion {
                println!("    {} {suggestion}", "hint:".dimmed());
            }
        }
        if !self.violations.is_empty() {
            println!();
        }

        let errors = self.violations.iter().filter(|v| v.is_blocking()).count();
        let warnings = self.violation_count - errors;
        let verdict = if self.passed {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!("Verification {verdict}: {errors} error(s), {warnings} warning(s)");

        let target = match (&self.remote, &self.branch) {
            (Some(remote), Some(branch)) => format!("{branch} to {remote}"),
            _ => String::new(),
        };
        match self.status {
            "blocked" => println!("{} nothing was pushed", "BLOCKED:".red().bold()),
            "dry_run" => println!("Dry run: would push {target}"),
            "pushed" => println!("{} {target}", "Pushed".green().bold()),
            "push_failed" => {
                println!("{} {target}", "Push failed:".red().bold());
                if let Some(error) = &self.push_error {
                    for line in error.lines() {
                        println!("    {line}");
                    }
                }
            },
            _ => {},
        }
        if let Some(report) = &self.report {
            println!("Report: {report}");
        }
    }
}

/// Result of `baseline show`
#[derive(Debug, Serialize)]
pub struct BaselineOutput {
    /// Whether a baseline exists
    pub exists: bool,
    /// Protected file hashes
    pub files: Baseline,
    /// Last update record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<BaselineMeta>,
}

impl BaselineOutput {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if !self.exists {
            println!("No baseline. Run 'guardian baseline update' to create one.");
            return;
        }
        println!("Baseline ({} file(s)):\n", self.files.len());
        for file in self.files.files() {
            let hash = self.files.get(file).unwrap_or_default();
            println!("  {}  {file}", hash.get(..12).unwrap_or(hash));
        }
        if let Some(meta) = &self.meta {
            println!("\nLast updated: {}", meta.updated_at);
            println!("Reason: {}", meta.reason);
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => print_json(self),
        }
    }
}
