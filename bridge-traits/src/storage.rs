//! Storage Abstractions
//!
//! Provides host-agnostic traits for local file I/O and for the remote store
//! that holds a release's published assets.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File system access trait
///
/// Abstracts the file I/O needed to materialize fixtures and digest them.
/// Large files must go through the streaming methods so memory stays bounded.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn write_note(fs: &dyn FileSystemAccess, dir: &Path) -> Result<()> {
///     fs.create_dir_all(dir).await?;
///     fs.write_file(&dir.join("NOTE.txt"), "hello".into()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write data to a file, replacing any previous contents
    ///
    /// Intended for small files such as the checksum manifest.
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Open a file for streaming reads
    async fn open_read_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;

    /// Open a file for streaming writes, truncating it if it already exists
    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> Result<Box<dyn tokio::io::AsyncWrite + Send + Unpin>>;
}

/// An asset published on a remote release.
///
/// A read-only snapshot refreshed on every reconciliation pass; the core never
/// owns or caches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Opaque store-specific handle used for deletion
    pub id: String,
    /// Asset file name
    pub name: String,
    /// Size in bytes as reported by the store
    pub size: u64,
}

impl RemoteAsset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
        }
    }
}

/// Remote release asset store
///
/// Abstracts the store that publishes the generated fixtures. Implementations
/// must not retry internally: the reconciler issues a single attempt per asset
/// and callers re-run the whole pass to converge.
#[async_trait]
pub trait ReleaseAssetStore: Send + Sync {
    /// Return a snapshot of every asset currently attached to the release
    ///
    /// An error means the listing is incomplete or unknown; callers must not
    /// make destructive decisions from it.
    async fn list_assets(&self) -> Result<Vec<RemoteAsset>>;

    /// Delete a single asset by its opaque id
    async fn delete_asset(&self, asset_id: &str) -> Result<()>;
}
