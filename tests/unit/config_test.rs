//! Tests for `.guardian/config.toml` loading

use std::collections::BTreeMap;

use guardian::config::{ConfigError, GuardianConfig, Language, RunOn};
use guardian::core::models::Severity;
use guardian::paths;
use tempfile::TempDir;

#[test]
fn test_missing_config_points_at_init() {
    let dir = TempDir::new().unwrap();
    let err = GuardianConfig::load(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
    assert!(err.to_string().contains("guardian init"));
}

#[test]
fn test_default_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let config = GuardianConfig::default();
    std::fs::create_dir_all(paths::guardian_dir(dir.path())).unwrap();
    std::fs::write(paths::config_file(dir.path()), config.to_toml().unwrap()).unwrap();

    let loaded = GuardianConfig::load(dir.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config = GuardianConfig::parse(
        r#"
[analysis]
languages = ["python"]
compare_branch = "origin/develop"

[drift]
severity = "error"

[[quality.commands]]
name = "mypy"
run = ["mypy", "."]
run_on = "full"
include = ["**/*.py"]
"#,
    )
    .unwrap();

    assert_eq!(config.analysis.languages, [Language::Python]);
    assert_eq!(config.analysis.compare_branch, "origin/develop");
    assert_eq!(config.analysis.coverage_threshold, 80);
    assert_eq!(config.tools.timeout_secs, 300);
    assert_eq!(config.reports.keep_count, 10);
    assert_eq!(config.drift.severity_for("tsconfig.json"), Severity::Error);
    assert_eq!(config.quality.commands[0].run_on, RunOn::Full);
}

#[test]
fn test_unknown_keys_rejected() {
    let err = GuardianConfig::parse("[analysis]\ncompare_brnch = \"main\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_drift_overrides() {
    let mut config = GuardianConfig::default();
    config.drift.overrides = BTreeMap::from([("tsconfig.json".to_string(), Severity::Error)]);
    assert!(config.validate().is_ok());
    assert_eq!(config.drift.severity_for("tsconfig.json"), Severity::Error);
    assert_eq!(config.drift.severity_for("pyproject.toml"), Severity::Warning);

    config.drift.overrides = BTreeMap::from([("src/main.ts".to_string(), Severity::Error)]);
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_values() {
    for content in [
        "[analysis]\ncoverage_threshold = 101\n",
        "[analysis]\nlanguages = []\n",
        "[tools]\nruff = []\n",
        "[tools]\ntimeout_secs = 0\n",
        "[reports]\nkeep_count = 0\n",
        "[[quality.commands]]\nname = \"x\"\nrun = [\"true\"]\ninclude = [\"[\"]\n",
    ] {
        assert!(
            matches!(GuardianConfig::parse(content), Err(ConfigError::Invalid(_))),
            "accepted: {content}"
        );
    }
}
