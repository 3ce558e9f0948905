//! File-based baseline storage
//!
//! Implements `BaselineStore` with pretty-printed JSON files under `.guardian/`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::core::models::{Baseline, BaselineMeta};
use crate::core::ports::{BaselineError, BaselineStore};
use crate::paths;

/// JSON baseline store rooted at a repository
#[derive(Debug, Clone)]
pub struct JsonBaselineStore {
    baseline: PathBuf,
    meta: PathBuf,
}

impl JsonBaselineStore {
    /// Store for the repository at `root`
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            baseline: paths::baseline_file(root),
            meta: paths::baseline_meta_file(root),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, BaselineError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), BaselineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

impl BaselineStore for JsonBaselineStore {
    fn load(&self) -> Result<Option<Baseline>, BaselineError> {
        read_json(&self.baseline)
    }

    fn load_meta(&self) -> Result<Option<BaselineMeta>, BaselineError> {
        read_json(&self.meta)
    }

    fn save(&self, baseline: &Baseline, meta: &BaselineMeta) -> Result<(), BaselineError> {
        write_json(&self.baseline, baseline)?;
        write_json(&self.meta, meta)?;
        log::info!("baseline saved with {} file(s)", baseline.len());
        Ok(())
    }
}
