//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `git/` - Change-set resolution, current branch, `git push`
//! - `process` - Subprocess execution with deadlines
//! - `analyzers/` - eslint, ruff, semgrep, diff-cover and quality commands
//! - `file/` - JSON baseline storage
//! - `report/` - Markdown verification reports

pub mod analyzers;
pub mod file;
pub mod git;
pub mod process;
pub mod report;

pub use analyzers::build_analyzers;
pub use file::JsonBaselineStore;
pub use git::{GitTransport, GitVersionControl};
pub use process::SystemProcessRunner;
pub use report::MarkdownReportWriter;
