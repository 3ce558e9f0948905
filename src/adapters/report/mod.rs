//! Markdown report adapter
//!
//! Implements `ReportWriter`. Reports are written for the assistant to read
//! after a blocked push, so they are plain Markdown with a fixed layout.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::models::{Severity, Violation};
use crate::core::ports::ReportWriter;
use crate::paths;

/// UTC, so names sort chronologically across DST changes
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Writes timestamped reports into `.guardian/reports/`
#[derive(Debug, Clone)]
pub struct MarkdownReportWriter {
    dir: PathBuf,
    keep_count: usize,
}

impl MarkdownReportWriter {
    /// Writer for the repository at `root`, retaining `keep_count` reports
    #[must_use]
    pub fn new(root: &Path, keep_count: usize) -> Self {
        Self {
            dir: paths::reports_dir(root),
            keep_count: keep_count.max(1),
        }
    }

    /// Report path for `now`; same-millisecond reports get an increasing `_NNN` suffix
    fn unique_path(&self, now: &DateTime<Utc>) -> PathBuf {
        let stamp = now.format(TIMESTAMP_FORMAT).to_string();
        let taken = fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                let rest = name.strip_prefix(&stamp)?.strip_suffix(".md")?;
                if rest.is_empty() {
                    Some(0)
                } else {
                    rest.strip_prefix('_')?.parse::<u32>().ok()
                }
            })
            .max();
        let name = taken.map_or_else(|| format!("{stamp}.md"), |n| format!("{stamp}_{:03}.md", n + 1));
        self.dir.join(name)
    }

    fn update_latest(&self, report: &Path) -> std::io::Result<()> {
        let latest = self.dir.join(paths::LATEST_REPORT);
        if latest.symlink_metadata().is_ok() {
            fs::remove_file(&latest)?;
        }
        point_to(report, &latest)
    }

    /// Delete all but the newest `keep_count` reports
    fn prune(&self) -> std::io::Result<()> {
        let mut reports: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension().is_some_and(|e| e == "md")
                    && p.file_name().is_some_and(|n| n != paths::LATEST_REPORT)
            })
            .collect();
        // Timestamped names sort chronologically
        reports.sort();
        let excess = reports.len().saturating_sub(self.keep_count);
        for old in reports.into_iter().take(excess) {
            log::debug!("removing old report {}", old.display());
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn point_to(report: &Path, latest: &Path) -> std::io::Result<()> {
    let target = report.file_name().map_or_else(|| report.to_path_buf(), PathBuf::from);
    std::os::unix::fs::symlink(target, latest)
}

#[cfg(not(unix))]
fn point_to(report: &Path, latest: &Path) -> std::io::Result<()> {
    fs::copy(report, latest).map(|_| ())
}

impl ReportWriter for MarkdownReportWriter {
    fn write(&self, violations: &[Violation]) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let now = Utc::now();
        let path = self.unique_path(&now);
        fs::write(&path, render(violations, &now))?;
        log::info!("report written to {}", path.display());

        if let Err(e) = self.update_latest(&path) {
            log::warn!("failed to update {}: {e}", paths::LATEST_REPORT);
        }
        if let Err(e) = self.prune() {
            log::warn!("failed to prune old reports: {e}");
        }
        Ok(path)
    }
}

/// Render a report
#[must_use]
pub fn render(violations: &[Violation], generated: &DateTime<Utc>) -> String {
    let errors = violations.iter().filter(|v| v.is_blocking()).count();
    let warnings = violations.len() - errors;
    let status = if errors == 0 { "PASSED" } else { "FAILED" };

    let mut out = String::new();
    let _ = writeln!(out, "# Guardian Verification Report\n");
    let _ = writeln!(out, "**Generated**: {}", generated.to_rfc3339());
    let _ = writeln!(out, "**Status**: {status}\n");
    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Check | Status | Count |");
    let _ = writeln!(out, "|-------|--------|-------|");
    let _ = writeln!(out, "| Errors | {} | {errors} |", if errors > 0 { "Fail" } else { "Pass" });
    let _ = writeln!(
        out,
        "| Warnings | {} | {warnings} |",
        if warnings > 0 { "Warn" } else { "Pass" }
    );
    let _ = writeln!(out, "| **Total** | | **{}** |\n", violations.len());

    let _ = writeln!(out, "## Violations\n");
    if violations.is_empty() {
        let _ = writeln!(out, "None.\n");
    }
    for (i, v) in violations.iter().enumerate() {
        let label = match v.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        let _ = writeln!(out, "### {}. [{label}] {}:{}\n", i + 1, v.file, v.line);
        let _ = writeln!(out, "**Rule**: `{}`", v.rule);
        let _ = writeln!(out, "**Message**: {}\n", v.message);
        if let Some(suggestion) = &v.suggestion {
            let _ = writeln!(out, "**Suggestion**: {suggestion}\n");
        }
    }

    let _ = writeln!(out, "## Next Steps\n");
    let _ = writeln!(out, "1. Review each violation above");
    let _ = writeln!(out, "2. Fix the issues in your code");
    let _ = writeln!(out, "3. Commit the fixes");
    let _ = writeln!(out, "4. Retry: `guardian push`\n");
    let _ = writeln!(out, "---\n");
    let _ = writeln!(
        out,
        "*If you believe a violation is a false positive, consult a human developer. \
         Do not edit protected configuration to make it pass.*"
    );
    out
}
