//! Business logic services
//!
//! Orchestration logic that operates on domain models through port traits.
//!
//! - [`drift`] - Compare protected files against the baseline
//! - [`orchestrator`] - Aggregate one verification run into a verdict
//! - [`gateway`] - Push only after a passing verification

pub mod drift;
pub mod gateway;
pub mod orchestrator;

pub use gateway::{Gateway, PushOptions, PushOutcome, PushState};
pub use orchestrator::Orchestrator;
