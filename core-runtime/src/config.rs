//! # Fixture Configuration Module
//!
//! Provides configuration management for the fixture catalog.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `FixtureConfig` holding the raw size list, the project prefix used for
//! file names, the output directory, the catalog limits, and the optional
//! release the fixtures are published to. `build()` validates eagerly so an
//! inconsistent configuration never reaches the pipeline.
//!
//! Configurations can also be loaded from the YAML document hosts keep next
//! to their fixtures. The document is parsed into typed structs right here at
//! the boundary; nothing downstream sees untyped data.
//!
//! ## Usage
//!
//! ### Builder
//!
//! ```
//! use core_runtime::config::FixtureConfig;
//!
//! let config = FixtureConfig::builder()
//!     .project_name("turbospeed")
//!     .sizes(["100KB", "1MB", "1.5GB"])
//!     .output_dir("./generated")
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.sizes.len(), 3);
//! ```
//!
//! ### YAML
//!
//! ```
//! use core_runtime::config::FixtureConfig;
//!
//! let config = FixtureConfig::from_yaml_str(
//!     "project_name: speedtest\nfiles:\n  - 1MB\n  - 10MB\n",
//! )
//! .expect("valid document");
//! assert_eq!(config.project_name, "speedtest");
//! ```
//!
//! ## Limits
//!
//! Size and count limits are configuration, not constants: deployments
//! disagree on the minimum file size, so [`CatalogLimits`] only provides
//! defaults (100 KB minimum, 2 GiB maximum, 1000 files per release).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default project prefix for generated file names
pub const DEFAULT_PROJECT_NAME: &str = "turbospeed";

/// Default directory generated files are written to
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Default minimum size of a single fixture (100 KB)
pub const DEFAULT_MIN_FILE_SIZE_BYTES: u64 = 100 * 1024;

/// Default maximum size of a single fixture (2 GiB, the per-asset cap of free release hosting)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Default maximum number of assets a release may carry
pub const DEFAULT_MAX_FILES_PER_RELEASE: usize = 1000;

/// Bounds every catalog must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogLimits {
    /// Smallest allowed fixture, inclusive
    pub min_file_size_bytes: u64,

    /// Largest allowed fixture, inclusive
    pub max_file_size_bytes: u64,

    /// Maximum number of entries in one catalog
    pub max_files_per_release: usize,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            min_file_size_bytes: DEFAULT_MIN_FILE_SIZE_BYTES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_files_per_release: DEFAULT_MAX_FILES_PER_RELEASE,
        }
    }
}

impl CatalogLimits {
    /// Validates that the limits describe a non-empty range.
    pub fn validate(&self) -> Result<()> {
        if self.min_file_size_bytes > self.max_file_size_bytes {
            return Err(Error::Config(format!(
                "Minimum file size ({} bytes) exceeds maximum file size ({} bytes)",
                self.min_file_size_bytes, self.max_file_size_bytes
            )));
        }

        if self.max_files_per_release == 0 {
            return Err(Error::Config(
                "Maximum files per release must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// The remote release generated fixtures are published to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseTarget {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Release tag
    pub tag: String,
}

impl ReleaseTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            tag: tag.into(),
        }
    }

    /// Validates that every coordinate is present.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("owner", &self.owner), ("repo", &self.repo), ("tag", &self.tag)] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("Release {} cannot be empty", field)));
            }
        }
        Ok(())
    }
}

/// Fixture configuration.
///
/// Use [`FixtureConfigBuilder`] or [`FixtureConfig::from_yaml_str`] to
/// construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Prefix of every generated file name (`<project_name>-<size>.bin`)
    pub project_name: String,

    /// Raw, human-readable sizes exactly as configured
    pub sizes: Vec<String>,

    /// Directory generated files and the checksum manifest are written to
    pub output_dir: PathBuf,

    /// Catalog bounds
    pub limits: CatalogLimits,

    /// Release to reconcile against, if any
    pub release: Option<ReleaseTarget>,
}

/// On-disk shape of the YAML configuration document.
#[derive(Debug, Deserialize)]
struct FixtureDocument {
    project_name: Option<String>,
    files: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    #[serde(default)]
    limits: CatalogLimits,
    release: Option<ReleaseTarget>,
}

impl FixtureConfig {
    /// Creates a new builder for constructing a `FixtureConfig`.
    pub fn builder() -> FixtureConfigBuilder {
        FixtureConfigBuilder::default()
    }

    /// Parses a YAML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document is malformed, when the
    /// `files` key is missing, or when the resulting configuration is invalid.
    pub fn from_yaml_str(document: &str) -> Result<Self> {
        let document: Option<FixtureDocument> = serde_yaml::from_str(document)
            .map_err(|e| Error::Config(format!("Invalid configuration document: {}", e)))?;

        let document = document
            .ok_or_else(|| Error::Config("Invalid configuration: document is empty".to_string()))?;

        let sizes = document
            .files
            .ok_or_else(|| Error::Config("Invalid configuration: 'files' key missing".to_string()))?;

        let mut builder = FixtureConfig::builder().sizes(sizes).limits(document.limits);

        if let Some(project_name) = document.project_name {
            builder = builder.project_name(project_name);
        }
        if let Some(output_dir) = document.output_dir {
            builder = builder.output_dir(output_dir);
        }
        if let Some(release) = document.release {
            builder = builder.release(release);
        }

        builder.build()
    }

    /// Reads and parses a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Configuration file {} could not be read: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Project name is a usable file name prefix
    /// - Output directory is not empty
    /// - Limits are consistent
    /// - Release coordinates are complete, when present
    ///
    /// Individual sizes are validated later by the catalog validator so that
    /// the offending raw entry is reported verbatim.
    pub fn validate(&self) -> Result<()> {
        let project_name = self.project_name.trim();
        if project_name.is_empty() {
            return Err(Error::Config("Project name cannot be empty".to_string()));
        }

        if project_name.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "Project name '{}' cannot contain path separators",
                self.project_name
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("Output directory cannot be empty".to_string()));
        }

        self.limits.validate()?;

        if let Some(release) = &self.release {
            release.validate()?;
        }

        Ok(())
    }
}

/// Builder for constructing [`FixtureConfig`] instances.
#[derive(Debug, Default)]
pub struct FixtureConfigBuilder {
    project_name: Option<String>,
    sizes: Vec<String>,
    output_dir: Option<PathBuf>,
    limits: Option<CatalogLimits>,
    release: Option<ReleaseTarget>,
}

impl FixtureConfigBuilder {
    /// Sets the file name prefix. Default: `turbospeed`.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Replaces the list of raw sizes.
    pub fn sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one raw size.
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.sizes.push(size.into());
        self
    }

    /// Sets the output directory. Default: `generated`.
    pub fn output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Overrides the catalog limits.
    pub fn limits(mut self, limits: CatalogLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Sets the release to reconcile against.
    pub fn release(mut self, release: ReleaseTarget) -> Self {
        self.release = Some(release);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<FixtureConfig> {
        let config = FixtureConfig {
            project_name: self
                .project_name
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            sizes: self.sizes,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            limits: self.limits.unwrap_or_default(),
            release: self.release,
        };

        config.validate()?;

        Ok(config)
    }
}
