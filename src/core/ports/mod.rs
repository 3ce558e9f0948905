//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core business logic
//! and external systems (git, subprocesses, the filesystem).
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core domain logic depends only on these traits, never on concrete
//! implementations, so every service can be tested with scripted fakes.

mod analyzer;
mod baseline_store;
mod process;
mod report_writer;
mod transport;
mod vcs;

pub use analyzer::Analyzer;
pub use baseline_store::{BaselineError, BaselineStore};
pub use process::{ProcessError, ProcessOutput, ProcessRunner};
pub use report_writer::ReportWriter;
pub use transport::{PushRequest, PushTransport, TransportOutput};
pub use vcs::VersionControl;
