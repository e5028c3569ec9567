//! Local fixture generation.
//!
//! A fixture is up to date when a regular file with the entry's name exists
//! in the output directory and has exactly the entry's size. Contents are not
//! inspected. Anything else (missing file, wrong size, a partial file left by
//! an interrupted run) is rewritten from scratch.

use crate::error::{FixtureError, Result};
use bridge_traits::storage::FileSystemAccess;
use core_catalog::{Catalog, CatalogEntry};
use core_runtime::events::{CoreEvent, EventBus, FixtureEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

/// Largest buffer used while writing a fixture (1 MiB).
pub const WRITE_CHUNK_SIZE: usize = 1024 * 1024;

/// What [`FileMaterializer::materialize`] did for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// The file was written.
    Created,
    /// The file already had the expected size.
    Skipped,
}

/// Result of materializing a whole catalog.
///
/// Every entry is attempted; failures are collected instead of aborting the
/// remaining entries.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, FixtureError)>,
}

impl MaterializeReport {
    /// True when no entry failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.created.len() + self.skipped.len() + self.failed.len()
    }
}

/// Writes zero-filled files matching catalog entries.
pub struct FileMaterializer {
    fs: Arc<dyn FileSystemAccess>,
    output_dir: PathBuf,
    event_bus: Option<EventBus>,
}

impl FileMaterializer {
    pub fn new(fs: Arc<dyn FileSystemAccess>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            output_dir: output_dir.into(),
            event_bus: None,
        }
    }

    /// Publish a [`FixtureEvent`] for every entry handled by
    /// [`materialize_all`](Self::materialize_all).
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Ensures the file for `entry` exists with exactly `entry.bytes()` bytes.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::Io`] when the file cannot be inspected or written
    /// - [`FixtureError::NotAFile`] when a directory occupies the file name
    /// - [`FixtureError::SizeMismatch`] when the written file has the wrong length
    #[instrument(skip(self, entry), fields(file = entry.filename()))]
    pub async fn materialize(&self, entry: &CatalogEntry) -> Result<MaterializeOutcome> {
        let path = self.output_dir.join(entry.filename());

        if self.is_up_to_date(&path, entry.bytes()).await? {
            debug!(bytes = entry.bytes(), "Fixture already has the expected size");
            return Ok(MaterializeOutcome::Skipped);
        }

        self.write_zeros(&path, entry.bytes()).await?;

        let actual = self
            .fs
            .metadata(&path)
            .await
            .map_err(|e| FixtureError::io(&path, e))?
            .size;
        if actual != entry.bytes() {
            return Err(FixtureError::SizeMismatch {
                path,
                expected: entry.bytes(),
                actual,
            });
        }

        info!(bytes = entry.bytes(), "Created fixture");
        Ok(MaterializeOutcome::Created)
    }

    /// Materializes every entry in catalog order.
    ///
    /// Creates the output directory first; if that fails nothing else is
    /// attempted. Per-entry failures are collected in the report.
    pub async fn materialize_all(&self, catalog: &Catalog) -> Result<MaterializeReport> {
        self.fs
            .create_dir_all(&self.output_dir)
            .await
            .map_err(|e| FixtureError::io(&self.output_dir, e))?;

        let mut report = MaterializeReport::default();

        for entry in catalog {
            let filename = entry.filename().to_string();
            match self.materialize(entry).await {
                Ok(MaterializeOutcome::Created) => {
                    self.publish(FixtureEvent::Created {
                        filename: filename.clone(),
                        bytes: entry.bytes(),
                    });
                    report.created.push(filename);
                }
                Ok(MaterializeOutcome::Skipped) => {
                    self.publish(FixtureEvent::Skipped {
                        filename: filename.clone(),
                    });
                    report.skipped.push(filename);
                }
                Err(error) => {
                    warn!(file = %filename, error = %error, "Failed to materialize fixture");
                    self.publish(FixtureEvent::Failed {
                        filename: filename.clone(),
                        message: error.to_string(),
                    });
                    report.failed.push((filename, error));
                }
            }
        }

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Materialization finished"
        );

        Ok(report)
    }

    async fn is_up_to_date(&self, path: &Path, expected: u64) -> Result<bool> {
        let exists = self
            .fs
            .exists(path)
            .await
            .map_err(|e| FixtureError::io(path, e))?;
        if !exists {
            return Ok(false);
        }

        let metadata = self
            .fs
            .metadata(path)
            .await
            .map_err(|e| FixtureError::io(path, e))?;
        if metadata.is_directory {
            return Err(FixtureError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        if metadata.size != expected {
            debug!(actual = metadata.size, expected, "Size mismatch, rewriting");
        }
        Ok(metadata.size == expected)
    }

    async fn write_zeros(&self, path: &Path, bytes: u64) -> Result<()> {
        let mut writer = self
            .fs
            .open_write_stream(path)
            .await
            .map_err(|e| FixtureError::io(path, e))?;

        let chunk_len = usize::try_from(bytes).map_or(WRITE_CHUNK_SIZE, |b| b.min(WRITE_CHUNK_SIZE));
        let chunk = vec![0u8; chunk_len];

        let mut remaining = bytes;
        while remaining > 0 {
            let len = remaining.min(chunk.len() as u64) as usize;
            writer
                .write_all(&chunk[..len])
                .await
                .map_err(|e| FixtureError::io(path, e))?;
            remaining -= len as u64;
        }

        writer
            .shutdown()
            .await
            .map_err(|e| FixtureError::io(path, e))
    }

    fn publish(&self, event: FixtureEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(CoreEvent::Fixture(event));
        }
    }
}
