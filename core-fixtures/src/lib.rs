//! # Fixture Files Module
//!
//! Writes the local files described by a [`Catalog`](core_catalog::Catalog)
//! and indexes their contents.
//!
//! ## Overview
//!
//! - [`materializer`] creates or rewrites one zero-filled file per catalog
//!   entry, skipping files that already have the expected size. Files are
//!   written in chunks of at most [`WRITE_CHUNK_SIZE`] bytes, so memory use
//!   does not grow with the file size.
//! - [`checksum`] digests generated files and writes the `checksums.txt`
//!   manifest next to them.
//!
//! All file access goes through
//! [`FileSystemAccess`](bridge_traits::storage::FileSystemAccess).

pub mod checksum;
pub mod error;
pub mod materializer;

pub use checksum::{ChecksumIndex, ManifestEntry, CHECKSUM_MANIFEST_NAME};
pub use error::{FixtureError, Result};
pub use materializer::{FileMaterializer, MaterializeOutcome, MaterializeReport, WRITE_CHUNK_SIZE};
