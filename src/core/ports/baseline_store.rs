//! Baseline store port
//!
//! Defines the interface for persisting drift baselines.

use thiserror::Error;

use crate::core::models::{Baseline, BaselineMeta};

/// Baseline persistence errors
#[derive(Debug, Error)]
pub enum BaselineError {
    /// Reading or writing the baseline failed
    #[error("baseline io error: {0}")]
    Io(#[from] std::io::Error),

    /// The baseline file is not valid JSON of the expected shape
    #[error("baseline is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Durable storage for the drift baseline
pub trait BaselineStore: Send + Sync {
    /// Load the baseline, `None` if none has been written yet
    fn load(&self) -> Result<Option<Baseline>, BaselineError>;

    /// Load the audit metadata of the last update
    fn load_meta(&self) -> Result<Option<BaselineMeta>, BaselineError>;

    /// Persist a baseline together with its audit metadata
    fn save(&self, baseline: &Baseline, meta: &BaselineMeta) -> Result<(), BaselineError>;
}
