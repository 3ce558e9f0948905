//! Repository configuration
//!
//! Loaded from `.guardian/config.toml`. Every field has a default, so a
//! minimal file works, but unknown keys and out-of-range values are
//! rejected: a malformed configuration is a broken deployment and aborts
//! before any verification starts.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::Severity;
use crate::paths;

/// Default comparison reference
pub const DEFAULT_COMPARE_BRANCH: &str = "origin/main";

/// Default minimum coverage on changed lines, in percent
pub const DEFAULT_COVERAGE_THRESHOLD: u32 = 80;

/// Default coverage artifact read by diff-cover
pub const DEFAULT_COVERAGE_FILE: &str = "coverage.xml";

/// Default number of reports kept in `.guardian/reports`
pub const DEFAULT_KEEP_COUNT: usize = 10;

/// Default per-tool timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file
    #[error("Guardian config is missing at {}. Run `guardian init`.", .0.display())]
    Missing(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML of the expected shape
    #[error("Invalid .guardian/config.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range or inconsistent
    #[error("Invalid .guardian/config.toml: {0}")]
    Invalid(String),
}

/// Full validated guardian configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardianConfig {
    /// Configuration format version
    pub version: String,
    /// What to analyze and against which reference
    pub analysis: AnalysisConfig,
    /// External tool commands
    pub tools: ToolsConfig,
    /// Report retention
    pub reports: ReportsConfig,
    /// Protected files and drift severity
    pub drift: DriftConfig,
    /// Repository-defined quality gate commands
    pub quality: QualityConfig,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            version: "0.3".to_string(),
            analysis: AnalysisConfig::default(),
            tools: ToolsConfig::default(),
            reports: ReportsConfig::default(),
            drift: DriftConfig::default(),
            quality: QualityConfig::default(),
        }
    }
}

/// Languages with a dedicated linter adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// TypeScript and JavaScript, checked by eslint
    Typescript,
    /// Python, checked by ruff
    Python,
}

impl Language {
    /// File extensions that belong to this language
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Typescript => &["ts", "tsx", "js", "jsx", "mjs", "cjs"],
            Self::Python => &["py", "pyi"],
        }
    }
}

/// Analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Enabled languages
    pub languages: Vec<Language>,
    /// Reference the change-set is computed against
    pub compare_branch: String,
    /// Minimum coverage on changed lines (0-100)
    pub coverage_threshold: u32,
    /// Coverage artifact path, relative to the repository root
    pub coverage_file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            languages: vec![Language::Typescript, Language::Python],
            compare_branch: DEFAULT_COMPARE_BRANCH.to_string(),
            coverage_threshold: DEFAULT_COVERAGE_THRESHOLD,
            coverage_file: DEFAULT_COVERAGE_FILE.to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Whether `language` is enabled
    #[must_use]
    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    /// Extensions of every enabled language
    #[must_use]
    pub fn source_extensions(&self) -> Vec<&'static str> {
        self.languages.iter().flat_map(|l| l.extensions().iter().copied()).collect()
    }
}

/// External tool commands, as argv vectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// eslint command
    pub eslint: Vec<String>,
    /// ruff command
    pub ruff: Vec<String>,
    /// semgrep command
    pub semgrep: Vec<String>,
    /// diff-cover command
    pub diff_cover: Vec<String>,
    /// Deadline for any single tool invocation, in seconds
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            eslint: argv(&["npx", "--no-install", "eslint"]),
            ruff: argv(&["ruff"]),
            semgrep: argv(&["semgrep"]),
            diff_cover: argv(&["diff-cover"]),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ToolsConfig {
    /// Per-tool deadline
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

/// Report retention settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportsConfig {
    /// Reports to keep; older ones are deleted
    pub keep_count: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            keep_count: DEFAULT_KEEP_COUNT,
        }
    }
}

/// Drift detection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriftConfig {
    /// Severity of a hash mismatch
    pub severity: Severity,
    /// Protected files, relative to the repository root
    pub protected: Vec<String>,
    /// Per-file severity overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, Severity>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            severity: Severity::Warning,
            protected: argv(&[
                "tsconfig.json",
                "pyproject.toml",
                ".eslintrc.json",
                "eslint.config.js",
                paths::CONFIG_TOML,
                paths::ESLINT_CONFIG,
                paths::RUFF_CONFIG,
                paths::SEMGREP_RULES,
            ]),
            overrides: BTreeMap::new(),
        }
    }
}

impl DriftConfig {
    /// Severity of drift for one protected file
    #[must_use]
    pub fn severity_for(&self, file: &str) -> Severity {
        self.overrides.get(file).copied().unwrap_or(self.severity)
    }
}

/// Repository-defined quality gate commands
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Commands, run in order
    pub commands: Vec<QualityCommand>,
}

/// When a quality command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOn {
    /// On both `verify` and `scan`
    #[default]
    Always,
    /// Only on change-set verification
    Changed,
    /// Only on full scans
    Full,
}

/// One quality gate command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityCommand {
    /// Unique display name
    pub name: String,
    /// argv to execute from the repository root
    pub run: Vec<String>,
    /// Which scopes run this command
    #[serde(default)]
    pub run_on: RunOn,
    /// Only run when a file matching one of these globs is in scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

impl GuardianConfig {
    /// Load and validate `.guardian/config.toml` under `root`
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = paths::config_file(root);
        if !path.exists() {
            return Err(ConfigError::Missing(path));
        }
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values no deployment should run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.analysis.compare_branch.trim().is_empty() {
            return invalid("analysis.compare_branch cannot be empty".to_string());
        }
        if self.analysis.languages.is_empty() {
            return invalid("analysis.languages must contain at least one entry".to_string());
        }
        if self.analysis.coverage_threshold > 100 {
            return invalid(format!(
                "analysis.coverage_threshold must be <= 100, got {}",
                self.analysis.coverage_threshold
            ));
        }
        if self.analysis.coverage_file.trim().is_empty() {
            return invalid("analysis.coverage_file cannot be empty".to_string());
        }
        for (field, cmd) in [
            ("tools.eslint", &self.tools.eslint),
            ("tools.ruff", &self.tools.ruff),
            ("tools.semgrep", &self.tools.semgrep),
            ("tools.diff_cover", &self.tools.diff_cover),
        ] {
            if cmd.first().is_none_or(|program| program.trim().is_empty()) {
                return invalid(format!("{field} cannot be empty"));
            }
        }
        if self.tools.timeout_secs == 0 {
            return invalid("tools.timeout_secs must be >= 1".to_string());
        }
        if self.reports.keep_count == 0 {
            return invalid("reports.keep_count must be >= 1".to_string());
        }
        if let Some(file) = self.drift.overrides.keys().find(|f| !self.drift.protected.contains(f)) {
            return invalid(format!("drift.overrides names '{file}', which is not protected"));
        }

        let mut names = HashSet::new();
        for (index, command) in self.quality.commands.iter().enumerate() {
            if command.name.trim().is_empty() {
                return invalid(format!("quality.commands[{index}].name cannot be empty"));
            }
            if !names.insert(command.name.as_str()) {
                return invalid(format!("duplicate quality command name '{}'", command.name));
            }
            if command.run.first().is_none_or(|program| program.trim().is_empty()) {
                return invalid(format!("quality.commands[{index}].run cannot be empty"));
            }
            for pattern in &command.include {
                if let Err(e) = glob::Pattern::new(pattern) {
                    return invalid(format!(
                        "quality.commands[{index}].include has invalid glob '{pattern}': {e}"
                    ));
                }
            }
        }

        Ok(())
    }
}
