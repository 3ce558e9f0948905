//! Integration tests for the guardian CLI
//!
//! Each test builds a real git repository with a comparison branch and runs
//! the binary against it. External tools are replaced by `sh` stand-ins, so
//! these tests need a POSIX shell and git.
#![cfg(unix)]

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use assert_cmd::cargo;
use predicates::prelude::*;
use serde_json::Value;

use common::fixtures::{RUFF_BROKEN, RUFF_CLEAN, stub_config, stub_tools};
use common::git_repo::{BareRemote, TempGitRepo};

/// Helper function to create a guardian command
fn guardian() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("guardian"))
}

/// A repository initialized with guardian, its configuration approved and
/// committed, with `base` pointing at that commit
fn setup(tools: &str) -> TempGitRepo {
    let repo = TempGitRepo::new();
    repo.write_file("README.md", "# demo\n");
    repo.commit_all("initial");

    guardian().arg("init").current_dir(repo.path()).assert().success();
    repo.write_file(".guardian/config.toml", &stub_config("base", tools));
    guardian()
        .args(["baseline", "update", "--acknowledge-policy-change", "--reason", "test setup"])
        .current_dir(repo.path())
        .assert()
        .success();

    repo.commit_all("add guardian");
    repo.branch("base");
    repo
}

fn verify_json(repo: &TempGitRepo) -> (i32, Value) {
    let output = guardian()
        .args(["--json", "verify"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    let json = serde_json::from_slice(&output.stdout).expect("verify --json prints JSON");
    (output.status.code().unwrap_or(-1), json)
}

fn rules(json: &Value) -> Vec<String> {
    json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["rule"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// VERIFY
// =============================================================================

#[test]
fn test_empty_diff_passes() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));

    let (code, json) = verify_json(&repo);
    assert_eq!(code, 0);
    assert_eq!(json["status"], "passed");
    assert_eq!(json["passed"], true);
    assert_eq!(json["violation_count"], 0);
}

#[test]
fn test_docs_only_change_passes() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 0));
    repo.write_file("docs/guide.md", "hello\n");
    repo.commit_all("docs");

    let (code, json) = verify_json(&repo);
    assert_eq!(code, 0, "{json}");
    assert!(rules(&json).is_empty());
}

#[test]
fn test_missing_compare_branch_blocks() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file(".guardian/config.toml", &stub_config("does-not-exist", &stub_tools(RUFF_CLEAN, 100)));
    guardian()
        .args(["baseline", "update", "--acknowledge-policy-change", "--reason", "switch branch"])
        .current_dir(repo.path())
        .assert()
        .success();

    let (code, json) = verify_json(&repo);
    assert_ne!(code, 0);
    assert_eq!(rules(&json), ["compare-branch-missing"]);
    assert!(json["report"].as_str().is_some());
}

#[test]
fn test_broken_linter_blocks() {
    let repo = setup(&stub_tools(RUFF_BROKEN, 100));
    repo.write_file("coverage.xml", "<coverage/>");
    repo.write_file("app/main.py", "print('hi')\n");
    repo.commit_all("feature");

    let (code, json) = verify_json(&repo);
    assert_ne!(code, 0);
    assert_eq!(json["violations"][0]["rule"], "tool-execution-error");
    assert!(
        json["violations"][0]["message"]
            .as_str()
            .unwrap()
            .contains("ruff: not installed")
    );
}

#[test]
fn test_coverage_threshold() {
    let low = setup(&stub_tools(RUFF_CLEAN, 50));
    low.write_file("coverage.xml", "<coverage/>");
    low.write_file("app/main.py", "print('hi')\n");
    low.commit_all("feature");

    let (code, json) = verify_json(&low);
    assert_ne!(code, 0);
    assert_eq!(rules(&json), ["coverage-delta"]);
    assert_eq!(
        json["violations"][0]["message"],
        "Coverage on changed lines is 50.0%, below threshold of 80%"
    );

    let full = setup(&stub_tools(RUFF_CLEAN, 100));
    full.write_file("coverage.xml", "<coverage/>");
    full.write_file("app/main.py", "print('hi')\n");
    full.commit_all("feature");

    let (code, json) = verify_json(&full);
    assert_eq!(code, 0, "{json}");
}

#[test]
fn test_missing_coverage_artifact_blocks() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file("app/main.py", "print('hi')\n");
    repo.commit_all("feature");

    let (_, json) = verify_json(&repo);
    assert_eq!(rules(&json), ["coverage-artifact-missing"]);
}

#[test]
fn test_human_output_and_report() {
    let repo = setup(&stub_tools(RUFF_BROKEN, 100));
    repo.write_file("coverage.xml", "<coverage/>");
    repo.write_file("app/main.py", "print('hi')\n");
    repo.commit_all("feature");

    guardian()
        .arg("verify")
        .current_dir(repo.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("tool-execution-error"))
        .stdout(predicate::str::contains("Report:"));

    guardian()
        .arg("report")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("# Guardian Verification Report"))
        .stdout(predicate::str::contains("`tool-execution-error`"));
}

#[test]
fn test_non_ascii_path_is_analyzed() {
    let repo = setup(&stub_tools(RUFF_BROKEN, 100));
    repo.write_file("coverage.xml", "<coverage/>");
    repo.write_file("app/café.py", "print('hi')\n");
    repo.commit_all("feature");

    let (code, json) = verify_json(&repo);
    assert_eq!(code, 1);
    assert!(rules(&json).contains(&"tool-execution-error".to_string()));
}

// =============================================================================
// DRIFT
// =============================================================================

#[test]
fn test_drift_warns_until_baseline_update() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file(".guardian/ruff.toml", "line-length = 400\n");

    let (code, json) = verify_json(&repo);
    assert_eq!(code, 0, "drift is a warning by default");
    assert_eq!(rules(&json), ["config-drift"]);
    assert_eq!(json["violations"][0]["severity"], "warning");
    assert_eq!(json["violations"][0]["file"], ".guardian/ruff.toml");

    guardian()
        .args(["baseline", "update", "--reason", "no ack"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--acknowledge-policy-change"));

    guardian()
        .args(["baseline", "update", "--acknowledge-policy-change", "--reason", "looser lines"])
        .current_dir(repo.path())
        .assert()
        .success();

    let (code, json) = verify_json(&repo);
    assert_eq!(code, 0);
    assert!(rules(&json).is_empty());
}

#[test]
fn test_baseline_reason_must_be_auditable() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    guardian()
        .args(["baseline", "update", "--acknowledge-policy-change", "--reason", "tweak"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 10 characters"));
}

#[test]
fn test_init_force_keeps_baseline() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file("tsconfig.json", "{\"strict\": true}\n");
    guardian()
        .args(["baseline", "update", "--acknowledge-policy-change", "--reason", "add tsconfig"])
        .current_dir(repo.path())
        .assert()
        .success();
    repo.write_file("tsconfig.json", "{\"strict\": false}\n");

    guardian().args(["init", "--force"]).current_dir(repo.path()).assert().success();

    let (code, json) = verify_json(&repo);
    assert_ne!(code, 0);
    let drifted: Vec<&str> = json["violations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|v| v["rule"] == "config-drift")
        .filter_map(|v| v["file"].as_str())
        .collect();
    assert!(drifted.contains(&"tsconfig.json"), "drift was re-approved: {json}");

    let meta: Value = serde_json::from_str(
        &std::fs::read_to_string(repo.path().join(".guardian/baseline.meta.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(meta["reason"], "add tsconfig");
    assert_eq!(meta["acknowledged_policy_change"], true);
}

#[test]
fn test_new_protected_file_needs_baseline() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file("tsconfig.json", "{}\n");

    let (code, json) = verify_json(&repo);
    assert_ne!(code, 0);
    assert_eq!(rules(&json), ["config-baseline-missing"]);
}

#[test]
fn test_corrupt_baseline_blocks() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file(".guardian/baseline.json", "{ broken");

    let (code, json) = verify_json(&repo);
    assert_ne!(code, 0);
    assert!(rules(&json).contains(&"config-baseline-invalid".to_string()));
}

// =============================================================================
// PUSH
// =============================================================================

#[test]
fn test_failing_push_never_reaches_remote() {
    let repo = setup(&stub_tools(RUFF_BROKEN, 100));
    let remote = BareRemote::attach(&repo, "origin");
    repo.write_file("coverage.xml", "<coverage/>");
    repo.write_file("app/main.py", "print('hi')\n");
    repo.commit_all("feature");

    for args in [
        vec!["push", "origin", "main"],
        vec!["push", "origin", "main", "--force"],
        vec!["push", "origin", "main", "--dry-run"],
    ] {
        guardian().args(&args).current_dir(repo.path()).assert().code(1);
    }
    assert!(remote.branches().is_empty());
}

#[test]
fn test_dry_run_never_reaches_remote() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    let remote = BareRemote::attach(&repo, "origin");

    guardian()
        .args(["--json", "push", "origin", "main", "--dry-run"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dry_run\""));
    assert!(remote.branches().is_empty());
}

#[test]
fn test_passing_push_reaches_remote() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    let remote = BareRemote::attach(&repo, "origin");

    guardian()
        .arg("push")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed"));
    assert_eq!(remote.branches(), ["main"]);
}

#[test]
fn test_push_failure_exit_code() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));

    guardian()
        .args(["push", "nowhere", "main"])
        .current_dir(repo.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Push failed"));
}

#[test]
fn test_push_rejects_branch_other_than_head() {
    let repo = setup(&stub_tools(RUFF_BROKEN, 100));
    let remote = BareRemote::attach(&repo, "origin");
    repo.git(&["checkout", "--quiet", "-b", "unverified"]);
    repo.write_file("app/main.py", "print('hi')\n");
    repo.commit_all("unverified work");
    repo.git(&["checkout", "--quiet", "main"]);

    // main itself passes; only the checked-out branch is verified
    let output = guardian()
        .args(["--json", "push", "origin", "unverified"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rules(&json), ["branch-unresolved"]);
    assert!(remote.branches().is_empty());
}

#[test]
fn test_push_rejects_option_like_branch() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    let remote = BareRemote::attach(&repo, "origin");
    repo.branch("other");

    guardian()
        .args(["push", "origin", "--", "--all"])
        .current_dir(repo.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("branch-unresolved"));
    assert!(remote.branches().is_empty());
}

#[test]
fn test_uncommitted_changes_block_push() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    let remote = BareRemote::attach(&repo, "origin");
    repo.write_file("README.md", "# edited but not committed\n");

    let output = guardian()
        .args(["--json", "push", "origin", "main"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "blocked");
    assert_eq!(rules(&json), ["worktree-dirty"]);
    assert!(json["violations"][0]["message"].as_str().unwrap().contains("README.md"));
    assert!(remote.branches().is_empty());

    repo.commit_all("edit readme");
    guardian().arg("push").current_dir(repo.path()).assert().success();
    assert_eq!(remote.branches(), ["main"]);
}

// =============================================================================
// SETUP COMMANDS
// =============================================================================

#[test]
fn test_init_creates_layout() {
    let repo = TempGitRepo::new();

    guardian()
        .arg("init")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created .guardian/config.toml"));

    for file in [
        ".guardian/config.toml",
        ".guardian/eslint.config.js",
        ".guardian/ruff.toml",
        ".guardian/semgrep-rules.yaml",
        ".guardian/baseline.json",
        ".guardian/baseline.meta.json",
    ] {
        assert!(repo.path().join(file).exists(), "{file} missing");
    }

    guardian()
        .arg("init")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn test_commands_require_init() {
    let repo = TempGitRepo::new();
    guardian()
        .arg("verify")
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("guardian init"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));
    repo.write_file(
        ".guardian/config.toml",
        "[analysis]\ncoverage_threshold = 150\n",
    );
    guardian()
        .arg("verify")
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("coverage_threshold"));
}

#[test]
fn test_baseline_and_config_show() {
    let repo = setup(&stub_tools(RUFF_CLEAN, 100));

    let output = guardian()
        .args(["--json", "baseline", "show"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["exists"], true);
    assert!(json["files"][".guardian/config.toml"].is_string());
    assert_eq!(json["meta"]["reason"], "test setup");

    guardian()
        .args(["config", "show"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("compare_branch = \"base\""));
}

#[test]
fn test_version() {
    guardian()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("guardian v"));
}
