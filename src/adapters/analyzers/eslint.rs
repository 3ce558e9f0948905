//! eslint adapter

use serde::Deserialize;

use super::{LINT_EXITS, ToolRunner, tool_command};
use crate::config::Language;
use crate::core::models::{ChangeSet, Scope, Severity, Violation};
use crate::core::ports::Analyzer;
use crate::paths;

const TOOL: &str = "eslint";

/// Rule reported for messages eslint emits without a rule id because the file failed to parse
const PARSE_ERROR_RULE: &str = "eslint-parse-error";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file_path: String,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    rule_id: Option<String>,
    #[serde(default)]
    severity: u8,
    #[serde(default)]
    fatal: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    line: u32,
    #[serde(default)]
    column: u32,
}

/// Lints JavaScript and TypeScript files with eslint
#[derive(Debug)]
pub struct EslintAnalyzer {
    tools: ToolRunner,
    command: Vec<String>,
}

impl EslintAnalyzer {
    /// Create the adapter with the configured eslint command
    #[must_use]
    pub fn new(tools: ToolRunner, command: &[String]) -> Self {
        Self {
            tools,
            command: tool_command(command),
        }
    }

    fn analyze(&self, files: &[String]) -> Result<Vec<Violation>, Violation> {
        let config = self.tools.require_config(TOOL, paths::ESLINT_CONFIG)?;

        let mut argv = self.command.clone();
        argv.push("--config".to_string());
        argv.push(config.to_string_lossy().into_owned());
        argv.extend(["--format", "json"].map(String::from));
        argv.extend(files.iter().cloned());

        let output = self.tools.invoke(TOOL, &argv, LINT_EXITS)?;
        let reports: Vec<FileReport> = ToolRunner::parse_json(TOOL, &output)?;

        Ok(reports
            .into_iter()
            .flat_map(|report| {
                let file = self.tools.relative(&report.file_path);
                report.messages.into_iter().map(move |m| {
                    let rule = m.rule_id.unwrap_or_else(|| {
                        let fallback = if m.fatal { PARSE_ERROR_RULE } else { "unknown" };
                        fallback.to_string()
                    });
                    let severity = if m.severity == 2 || m.fatal {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    Violation::new(file.clone(), m.line, m.column, rule, m.message, severity)
                })
            })
            .collect())
    }
}

impl Analyzer for EslintAnalyzer {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn select(&self, change_set: &ChangeSet, _scope: Scope) -> Vec<String> {
        change_set.with_extensions(Language::Typescript.extensions())
    }

    fn run(&self, files: &[String]) -> Vec<Violation> {
        self.analyze(files).unwrap_or_else(|v| vec![v])
    }
}
