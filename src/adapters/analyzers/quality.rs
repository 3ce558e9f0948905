//! Repository-defined quality commands
//!
//! Each configured command becomes its own analyzer so that it can be
//! selected and run independently of the others.

use glob::Pattern;

use super::ToolRunner;
use crate::config::{QualityCommand, RunOn};
use crate::core::models::{ChangeSet, Scope, Violation, rules};
use crate::core::ports::Analyzer;
use crate::paths;

/// Runs one quality command; any non-zero exit blocks
#[derive(Debug)]
pub struct QualityAnalyzer {
    tools: ToolRunner,
    name: String,
    run: Vec<String>,
    run_on: RunOn,
    include: Vec<Pattern>,
}

impl QualityAnalyzer {
    /// Create the analyzer for `command`
    #[must_use]
    pub fn new(tools: ToolRunner, command: &QualityCommand) -> Self {
        let include = command
            .include
            .iter()
            .filter_map(|g| {
                Pattern::new(g)
                    .inspect_err(|e| {
                        log::warn!("quality command '{}': ignoring glob '{g}': {e}", command.name);
                    })
                    .ok()
            })
            .collect();
        Self {
            tools,
            name: command.name.clone(),
            run: command.run.clone(),
            run_on: command.run_on,
            include,
        }
    }

    const fn applies_to(&self, scope: Scope) -> bool {
        matches!(
            (self.run_on, scope),
            (RunOn::Always, _) | (RunOn::Changed, Scope::Changed) | (RunOn::Full, Scope::Full)
        )
    }
}

impl Analyzer for QualityAnalyzer {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn select(&self, change_set: &ChangeSet, scope: Scope) -> Vec<String> {
        if !self.applies_to(scope) {
            return Vec::new();
        }
        change_set
            .files()
            .iter()
            .filter(|f| self.include.is_empty() || self.include.iter().any(|p| p.matches(f)))
            .cloned()
            .collect()
    }

    fn runs_without_files(&self, scope: Scope) -> bool {
        self.include.is_empty() && matches!(self.run_on, RunOn::Always) && self.applies_to(scope)
    }

    fn run(&self, _files: &[String]) -> Vec<Violation> {
        log::info!("running quality command '{}'", self.name);
        let output = match self.tools.spawn(&self.name, &self.run) {
            Ok(output) => output,
            Err(v) => return vec![v],
        };
        if output.success() {
            return Vec::new();
        }
        vec![Violation::error(
            paths::CONFIG_TOML,
            rules::QUALITY_COMMAND_FAILED,
            format!(
                "Quality command '{}' failed with exit code {}: {}",
                self.name,
                output.status_text(),
                self.run.join(" ")
            ),
        )
        .with_suggestion(format!("Run `{}` locally, fix the issues, then retry.", self.run.join(" ")))]
    }
}
