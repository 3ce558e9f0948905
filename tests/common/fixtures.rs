//! Test data builders

/// Configuration comparing against `compare_branch`, with `tools` as the `[tools]` table
pub fn stub_config(compare_branch: &str, tools: &str) -> String {
    format!(
        r#"version = "1"

[analysis]
languages = ["typescript", "python"]
compare_branch = "{compare_branch}"
coverage_threshold = 80

{tools}
"#
    )
}

/// A `[tools]` table of stubs; `ruff` and `diff_cover` are replaceable
pub fn stub_tools(ruff: &str, coverage_percent: u32) -> String {
    format!(
        r#"[tools]
eslint = ["sh", "-c", "echo '[]'", "eslint"]
ruff = {ruff}
semgrep = ["sh", "-c", "echo '{{\"results\": []}}'", "semgrep"]
diff_cover = ["sh", "-c", "{script}", "diff-cover"]
timeout_secs = 30
"#,
        script = diff_cover_script(coverage_percent)
    )
}

/// A ruff stand-in reporting nothing
pub const RUFF_CLEAN: &str = r#"["sh", "-c", "echo '[]'", "ruff"]"#;

/// A ruff stand-in that fails as if the tool were broken
pub const RUFF_BROKEN: &str = r#"["sh", "-c", "echo 'ruff: not installed' >&2; exit 127", "ruff"]"#;

/// Shell that writes `{"total_percent_covered": N}` to the `--json-report` path
fn diff_cover_script(percent: u32) -> String {
    let status = if percent < 80 { 1 } else { 0 };
    format!(
        "while [ $# -gt 0 ]; do if [ \\\"$1\\\" = --json-report ]; then \
         echo '{{\\\"total_percent_covered\\\": {percent}}}' > \\\"$2\\\"; fi; shift; done; exit {status}"
    )
}
