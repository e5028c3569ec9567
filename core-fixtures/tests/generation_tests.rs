//! Fixture generation against a real temporary directory

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{FileMetadata, FileSystemAccess};
use bytes::Bytes;
use core_catalog::{Catalog, CatalogValidator};
use core_fixtures::checksum::render_manifest;
use core_fixtures::{
    ChecksumIndex, FileMaterializer, FixtureError, MaterializeOutcome, CHECKSUM_MANIFEST_NAME,
    WRITE_CHUNK_SIZE,
};
use core_runtime::config::CatalogLimits;
use core_runtime::events::{CoreEvent, EventBus, FixtureEvent};
use std::path::Path;
use std::sync::Arc;

fn catalog(sizes: &[&str]) -> Catalog {
    CatalogValidator::new("turbospeed", CatalogLimits::default())
        .build(sizes)
        .unwrap()
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).unwrap().len()
}

/// Delegates to the real file system but refuses to open one file for writing.
struct FailingFileSystem {
    inner: TokioFileSystem,
    poisoned: &'static str,
}

#[async_trait]
impl FileSystemAccess for FailingFileSystem {
    async fn exists(&self, path: &Path) -> BridgeResult<bool> {
        self.inner.exists(path).await
    }

    async fn metadata(&self, path: &Path) -> BridgeResult<FileMetadata> {
        self.inner.metadata(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> BridgeResult<()> {
        self.inner.create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
        self.inner.write_file(path, data).await
    }

    async fn open_read_stream(
        &self,
        path: &Path,
    ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        self.inner.open_read_stream(path).await
    }

    async fn open_write_stream(
        &self,
        path: &Path,
    ) -> BridgeResult<Box<dyn tokio::io::AsyncWrite + Send + Unpin>> {
        if path.ends_with(self.poisoned) {
            return Err(BridgeError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        self.inner.open_write_stream(path).await
    }
}

#[tokio::test]
async fn test_writes_exact_sizes_across_chunk_boundary() {
    let dir = tempfile::tempdir().unwrap();
    // 100KB is the minimum, 2.5MB spans three write chunks
    let catalog = catalog(&["100KB", "1MB", "2.5MB"]);
    assert!(catalog.entries()[2].bytes() > 2 * WRITE_CHUNK_SIZE as u64);

    let materializer = FileMaterializer::new(Arc::new(TokioFileSystem::new()), dir.path());
    let report = materializer.materialize_all(&catalog).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.created.len(), 3);
    for entry in &catalog {
        assert_eq!(file_len(&dir.path().join(entry.filename())), entry.bytes());
    }

    let contents = std::fs::read(dir.path().join("turbospeed-100kb.bin")).unwrap();
    assert!(contents.iter().all(|&b| b == 0));
}

#[tokio::test]
async fn test_second_run_performs_no_writes() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(&["100KB", "1MB"]);
    let materializer = FileMaterializer::new(Arc::new(TokioFileSystem::new()), dir.path());

    materializer.materialize_all(&catalog).await.unwrap();
    let second = materializer.materialize_all(&catalog).await.unwrap();

    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), 2);
}

#[tokio::test]
async fn test_truncated_file_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(&["1MB"]);
    let path = dir.path().join("turbospeed-1mb.bin");
    std::fs::write(&path, vec![7u8; 4096]).unwrap();

    let materializer = FileMaterializer::new(Arc::new(TokioFileSystem::new()), dir.path());
    let outcome = materializer
        .materialize(&catalog.entries()[0])
        .await
        .unwrap();

    assert_eq!(outcome, MaterializeOutcome::Created);
    assert_eq!(file_len(&path), 1024 * 1024);
}

#[tokio::test]
async fn test_oversized_file_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(&["100KB"]);
    let path = dir.path().join("turbospeed-100kb.bin");
    std::fs::write(&path, vec![0u8; 200 * 1024]).unwrap();

    let materializer = FileMaterializer::new(Arc::new(TokioFileSystem::new()), dir.path());
    materializer.materialize_all(&catalog).await.unwrap();

    assert_eq!(file_len(&path), 100 * 1024);
}

#[tokio::test]
async fn test_failures_are_collected_and_others_continue() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(&["100KB", "1MB", "2MB"]);
    let fs = FailingFileSystem {
        inner: TokioFileSystem::new(),
        poisoned: "turbospeed-1mb.bin",
    };

    let bus = EventBus::new(16);
    let mut events = bus.subscribe();

    let materializer = FileMaterializer::new(Arc::new(fs), dir.path()).with_event_bus(bus);
    let report = materializer.materialize_all(&catalog).await.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.attempted(), 3);
    assert_eq!(report.created, vec!["turbospeed-100kb.bin", "turbospeed-2mb.bin"]);
    assert_eq!(report.failed.len(), 1);

    let (name, error) = &report.failed[0];
    assert_eq!(name, "turbospeed-1mb.bin");
    assert!(matches!(error, FixtureError::Io { .. }));
    assert!(error.path().ends_with("turbospeed-1mb.bin"));

    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Fixture(FixtureEvent::Created { .. })
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        CoreEvent::Fixture(FixtureEvent::Failed { ref filename, .. }) if filename == "turbospeed-1mb.bin"
    ));
}

#[tokio::test]
async fn test_manifest_lists_catalog_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog(&["1MB", "100KB"]);
    let fs: Arc<dyn FileSystemAccess> = Arc::new(TokioFileSystem::new());

    FileMaterializer::new(fs.clone(), dir.path())
        .materialize_all(&catalog)
        .await
        .unwrap();
    std::fs::write(dir.path().join("stray.bin"), b"not in the catalog").unwrap();

    let index = ChecksumIndex::new(fs);
    let path = index.index(dir.path(), &catalog).await.unwrap();
    assert_eq!(path, dir.path().join(CHECKSUM_MANIFEST_NAME));

    let manifest = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = manifest.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("  turbospeed-100kb.bin"));
    assert!(lines[1].ends_with("  turbospeed-1mb.bin"));
    assert!(manifest.ends_with('\n'));
    assert!(!manifest.contains("stray.bin"));

    let entries = index.build_manifest(dir.path(), &catalog).await.unwrap();
    assert_eq!(render_manifest(&entries), manifest);
}

#[tokio::test]
async fn test_digest_is_deterministic_sha256() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, b"hello").unwrap();

    let index = ChecksumIndex::new(Arc::new(TokioFileSystem::new()));
    let first = index.digest(&path).await.unwrap();
    let second = index.digest(&path).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[tokio::test]
async fn test_digest_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let index = ChecksumIndex::new(Arc::new(TokioFileSystem::new()));

    let err = index
        .digest(&dir.path().join("missing.bin"))
        .await
        .unwrap_err();
    assert!(matches!(err, FixtureError::Io { .. }));
}
