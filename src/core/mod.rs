//! Core domain logic for guardian
//!
//! This module contains the verification logic. All external interactions
//! (git, subprocesses, storage) are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Violation, ChangeSet, Baseline, VerificationResult)
//! - `services/` - Drift detection, orchestration and the push gateway
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
