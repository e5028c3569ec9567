//! Content digests and the checksum manifest.
//!
//! The manifest is plain UTF-8 text named [`CHECKSUM_MANIFEST_NAME`], one
//! line per fixture in catalog order:
//!
//! ```text
//! <sha256 hex>  <filename>
//! ```

use crate::error::{FixtureError, Result};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use core_catalog::Catalog;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// File name of the manifest written next to the fixtures.
pub const CHECKSUM_MANIFEST_NAME: &str = "checksums.txt";

const READ_CHUNK_SIZE: usize = 1024 * 1024;

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub digest: String,
    pub filename: String,
}

impl ManifestEntry {
    pub fn new(digest: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            filename: filename.into(),
        }
    }
}

/// Renders manifest lines, each terminated by a newline.
pub fn render_manifest(entries: &[ManifestEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}  {}\n", entry.digest, entry.filename))
        .collect()
}

/// Computes digests of generated fixtures and persists the manifest.
pub struct ChecksumIndex {
    fs: Arc<dyn FileSystemAccess>,
}

impl ChecksumIndex {
    pub fn new(fs: Arc<dyn FileSystemAccess>) -> Self {
        Self { fs }
    }

    /// SHA-256 of the file at `path` as lowercase hex.
    ///
    /// The file is streamed in bounded chunks.
    pub async fn digest(&self, path: &Path) -> Result<String> {
        let mut reader = self
            .fs
            .open_read_stream(path)
            .await
            .map_err(|e| FixtureError::io(path, e))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];
        loop {
            let read = reader
                .read(&mut buffer)
                .await
                .map_err(|e| FixtureError::io(path, e))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Digests every catalog entry in `output_dir`, in catalog order.
    ///
    /// Files in the directory that are not part of the catalog are ignored.
    pub async fn build_manifest(
        &self,
        output_dir: &Path,
        catalog: &Catalog,
    ) -> Result<Vec<ManifestEntry>> {
        let mut entries = Vec::with_capacity(catalog.len());
        for entry in catalog {
            let digest = self.digest(&output_dir.join(entry.filename())).await?;
            debug!(file = entry.filename(), digest = %digest, "Digested fixture");
            entries.push(ManifestEntry::new(digest, entry.filename()));
        }
        Ok(entries)
    }

    /// Writes `entries` to `<output_dir>/checksums.txt` and returns its path.
    pub async fn write_manifest(
        &self,
        output_dir: &Path,
        entries: &[ManifestEntry],
    ) -> Result<PathBuf> {
        let path = output_dir.join(CHECKSUM_MANIFEST_NAME);
        self.fs
            .write_file(&path, Bytes::from(render_manifest(entries)))
            .await
            .map_err(|e| FixtureError::io(&path, e))?;

        info!(files = entries.len(), path = %path.display(), "Wrote checksum manifest");
        Ok(path)
    }

    /// Builds and writes the manifest for `catalog`.
    pub async fn index(&self, output_dir: &Path, catalog: &Catalog) -> Result<PathBuf> {
        let entries = self.build_manifest(output_dir, catalog).await?;
        self.write_manifest(output_dir, &entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_manifest_format() {
        let rendered = render_manifest(&[
            ManifestEntry::new("aaa", "p-100kb.bin"),
            ManifestEntry::new("bbb", "p-1mb.bin"),
        ]);
        assert_eq!(rendered, "aaa  p-100kb.bin\nbbb  p-1mb.bin\n");
    }

    #[test]
    fn test_render_empty_manifest() {
        assert_eq!(render_manifest(&[]), "");
    }
}
