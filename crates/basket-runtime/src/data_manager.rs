//! Load-once holder for the transaction dataset.
//!
//! The bakery export is static for the lifetime of the process, so the
//! manager reads it on the first [`DataManager::get_data`] call and hands out
//! the same [`Arc<Dataset>`] afterwards. Callers never mutate the dataset and
//! never receive a copy of it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use basket_core::error::DataLoadError;
use basket_core::models::Dataset;
use basket_data::reader;

// ── DataManager ───────────────────────────────────────────────────────────────

/// Cached wrapper around [`reader::load`].
///
/// # Example
/// ```no_run
/// use basket_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new("Bakery.csv");
/// let dataset = mgr.get_data().expect("dataset loads");
/// println!("rows: {}", dataset.len());
/// ```
pub struct DataManager {
    path: PathBuf,
    cache: OnceLock<Arc<Dataset>>,
}

impl DataManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    /// Return the dataset, loading it on first use.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get_data(&self) -> Result<Arc<Dataset>, DataLoadError> {
        if let Some(dataset) = self.cache.get() {
            tracing::debug!(path = %self.path.display(), "returning cached dataset");
            return Ok(Arc::clone(dataset));
        }

        let loaded = Arc::new(reader::load(&self.path)?);
        tracing::debug!(
            path = %self.path.display(),
            rows = loaded.len(),
            "dataset cached"
        );
        // A concurrent first caller may have won the race; keep its copy.
        Ok(Arc::clone(self.cache.get_or_init(|| loaded)))
    }

    /// `true` once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
