//! Initialize guardian in a repository

use std::fs;
use std::path::Path;

use super::repo_root;
use guardian::adapters::JsonBaselineStore;
use guardian::config::GuardianConfig;
use guardian::core::models::BaselineMeta;
use guardian::core::ports::BaselineStore;
use guardian::core::services::drift;
use guardian::output::{OperationResult, OutputMode};
use guardian::paths;

const ESLINT_TEMPLATE: &str = r#"// guardian eslint configuration (protected: changes require `guardian baseline update`)
export default [
  {
    files: ["**/*.{ts,tsx,js,jsx,mjs,cjs}"],
    rules: {
      "no-eval": "error",
      "no-implied-eval": "error",
      "no-debugger": "error",
      "no-unused-vars": "error",
      eqeqeq: "error",
      "no-console": "warn",
    },
  },
];
"#;

const RUFF_TEMPLATE: &str = r#"# guardian ruff configuration (protected: changes require `guardian baseline update`)
line-length = 100

[lint]
select = ["E", "F", "W", "B", "S", "UP"]
"#;

const SEMGREP_TEMPLATE: &str = r#"# guardian semgrep rules (protected: changes require `guardian baseline update`)
rules:
  - id: no-hardcoded-secret
    pattern-regex: '(?i)(api_key|secret|password)\s*=\s*["''][^"'']{8,}["'']'
    message: Possible hardcoded secret
    languages: [generic]
    severity: ERROR
"#;

const CONFIG_HEADER: &str = "# guardian configuration\n\
                             # Protected: changes require `guardian baseline update`.\n\n";

/// Initialize guardian in the current repository
pub fn init(force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let root = repo_root()?;
    let config_path = paths::config_file(&root);

    if config_path.exists() && !force {
        OperationResult {
            success: true,
            message: format!(
                "Already initialized ({} exists).\nUse --force to reinitialize.",
                paths::CONFIG_TOML
            ),
        }
        .render(mode);
        return Ok(());
    }

    let mut created = Vec::new();
    fs::create_dir_all(paths::reports_dir(&root))?;
    write_file(&root, ".guardian/.gitignore", "reports/\n", force, &mut created)?;

    let config = GuardianConfig::default();
    let config_toml = format!("{CONFIG_HEADER}{}", config.to_toml()?);
    write_file(&root, paths::CONFIG_TOML, &config_toml, force, &mut created)?;
    write_file(&root, paths::ESLINT_CONFIG, ESLINT_TEMPLATE, force, &mut created)?;
    write_file(&root, paths::RUFF_CONFIG, RUFF_TEMPLATE, force, &mut created)?;
    write_file(&root, paths::SEMGREP_RULES, SEMGREP_TEMPLATE, force, &mut created)?;

    // An existing baseline is only replaced by an acknowledged `baseline update`
    let store = JsonBaselineStore::new(&root);
    if matches!(store.load(), Ok(None)) {
        let baseline = drift::snapshot(&root, &config.drift.protected)?;
        let meta = BaselineMeta::now("initial baseline from guardian init", &baseline, false);
        store.save(&baseline, &meta)?;
        created.push(paths::BASELINE_JSON.to_string());
    } else {
        log::debug!("keeping existing {}", paths::BASELINE_JSON);
    }

    let mut message = String::from("Initializing guardian...\n\n");
    for file in &created {
        message.push_str(&format!("  Created {file}\n"));
    }
    message.push_str("\nguardian initialized!\n\nNext steps:\n");
    message.push_str("  guardian verify       # check changed files\n");
    message.push_str("  guardian push         # verify, then push");

    OperationResult {
        success: true,
        message,
    }
    .render(mode);
    Ok(())
}

fn write_file(
    root: &Path,
    relative: &str,
    content: &str,
    force: bool,
    created: &mut Vec<String>,
) -> anyhow::Result<()> {
    let path = root.join(relative);
    if path.exists() && !force {
        log::debug!("keeping existing {relative}");
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    created.push(relative.to_string());
    Ok(())
}
