//! Durable JSON sink for the enriched store collection.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use thriftmap_core::StoreRecord;

use crate::error::PipelineError;

/// Writes the enriched collection to a JSON file.
///
/// The write is atomic: the full payload is serialized in memory, written to
/// a temp file in the destination's directory, then renamed into place. A
/// failed run never leaves a truncated or half-written `stores.json` behind.
/// Serialization order follows `StoreRecord`'s field order, so output is
/// byte-for-byte reproducible for the same records.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The destination path records are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `records` and atomically replaces the destination file.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Serialize`] — the records cannot be serialized.
    /// - [`PipelineError::Persist`] — the temp file cannot be created,
    ///   written, or renamed over the destination.
    pub fn write(&self, records: &[StoreRecord]) -> Result<(), PipelineError> {
        let payload = serde_json::to_vec_pretty(records)?;

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new_in("."),
        }
        .map_err(|e| self.persist_error(e))?;

        tmp.write_all(&payload).map_err(|e| self.persist_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.persist_error(e.error))?;

        Ok(())
    }

    fn persist_error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}
