//! Domain models for guardian
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Violation`] - One normalized finding
//! - [`Severity`] - Whether a finding blocks
//! - [`ChangeSet`] - The files a verification run is scoped to
//! - [`Baseline`] - Approved hashes of protected configuration files
//! - [`VerificationResult`] - The verdict the gateway acts on

mod baseline;
mod change_set;
mod severity;
mod verification;
pub mod violation;

pub use baseline::{Baseline, BaselineMeta, MIN_REASON_CHARS};
pub use change_set::{ChangeSet, ChangeSetError};
pub use severity::Severity;
pub use verification::{PushClearance, Scope, VerificationResult};
pub use violation::{Violation, rules};
