//! Lifter baseline weight persistence.
//!
//! Baselines are the starting weights entered before the first session.
//! They are stored as a single JSON document with shared-lock reads and
//! atomic tempfile-rename writes, so a torn write can never clobber the
//! only copy. A missing or unreadable file degrades to an empty map -
//! the engine then falls back to built-in defaults.

use crate::error::{Error, Result};
use crate::types::BaselineWeights;
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Abstract baseline store consumed when seeding first-time weights.
pub trait BaselineStore {
    /// Current baseline map, possibly empty.
    fn get(&self) -> Result<BaselineWeights>;

    /// Replace the baseline map.
    fn set(&mut self, weights: &BaselineWeights) -> Result<()>;
}

/// JSON-file-backed baseline store.
pub struct JsonBaselineStore {
    path: PathBuf,
}

impl JsonBaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_inner(&self) -> BaselineWeights {
        if !self.path.exists() {
            tracing::debug!("no baseline file at {:?}, using empty map", self.path);
            return BaselineWeights::default();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("unable to open baseline file {:?}: {}", self.path, e);
                return BaselineWeights::default();
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("unable to lock baseline file {:?}: {}", self.path, e);
            return BaselineWeights::default();
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("failed to read baseline file {:?}: {}", self.path, e);
            return BaselineWeights::default();
        }
        let _ = file.unlock();

        match serde_json::from_str::<BaselineWeights>(&contents) {
            Ok(weights) => weights,
            Err(e) => {
                tracing::warn!("failed to parse baseline file {:?}: {}", self.path, e);
                BaselineWeights::default()
            }
        }
    }

    fn save_inner(&self, weights: &BaselineWeights) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Unique temp file in the same directory so the rename is atomic.
        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "baseline path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(weights)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("saved {} baseline weights to {:?}", weights.len(), self.path);
        Ok(())
    }
}

impl BaselineStore for JsonBaselineStore {
    fn get(&self) -> Result<BaselineWeights> {
        Ok(self.load_inner())
    }

    fn set(&mut self, weights: &BaselineWeights) -> Result<()> {
        self.save_inner(weights)
            .map_err(|e| Error::Store(format!("save baselines to {}: {}", self.path.display(), e)))
    }
}
