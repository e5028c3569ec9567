//! # Host Bridge Traits
//!
//! Capability traits the fixture core depends on but never implements itself.
//!
//! ## Overview
//!
//! This crate defines the contract between the catalog reconciliation core and
//! the host that runs it. Each trait represents a capability that the core
//! requires but that is supplied from outside (desktop adapters, test mocks,
//! or a different remote store).
//!
//! ## Traits
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with bearer auth and TLS
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Streaming file I/O for generated fixtures
//!
//! ### Remote Stores
//! - [`ReleaseAssetStore`](storage::ReleaseAssetStore) - List and delete the assets of a published release
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Implementations
//!
//! | Capability | Implementation Crate |
//! |------------|---------------------|
//! | `HttpClient`, `FileSystemAccess` | `bridge-desktop` |
//! | `ReleaseAssetStore` | `provider-github` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths, HTTP status)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so they can be shared as
//! `Arc<dyn Trait>` across async tasks.
//!
//! ## Examples
//!
//! ### Implementing ReleaseAssetStore
//!
//! ```ignore
//! use bridge_traits::storage::{ReleaseAssetStore, RemoteAsset};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct InMemoryStore {
//!     assets: Vec<RemoteAsset>,
//! }
//!
//! #[async_trait]
//! impl ReleaseAssetStore for InMemoryStore {
//!     async fn list_assets(&self) -> Result<Vec<RemoteAsset>> {
//!         Ok(self.assets.clone())
//!     }
//!
//!     async fn delete_asset(&self, asset_id: &str) -> Result<()> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::{FileMetadata, FileSystemAccess, ReleaseAssetStore, RemoteAsset};
