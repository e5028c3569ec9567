//! # GitHub Releases Provider
//!
//! Implements `ReleaseAssetStore` for the assets of a GitHub release.
//!
//! ## Overview
//!
//! This module provides:
//! - Release lookup by tag
//! - Paginated asset listing (name, size, id)
//! - Asset deletion by id
//!
//! Requests carry the bearer token supplied by the host and are sent exactly
//! once; convergence comes from re-running reconciliation, not from retries
//! inside the connector.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{GitHubReleaseConnector, GITHUB_API_BASE};
pub use error::{GitHubError, Result};
