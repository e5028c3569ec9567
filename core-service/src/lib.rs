//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, filesystem)
//! into the fixture pipeline and exposes the operations a host runs:
//!
//! - [`FixtureService::validate`]: build the catalog and summarize it
//! - [`FixtureService::calculate_total`]: human-readable total size
//! - [`FixtureService::generate`]: write the fixtures and `checksums.txt`
//! - [`FixtureService::sync_release`]: delete stale release assets
//! - [`FixtureService::release_status`]: read-only view of the release
//!
//! Every operation rebuilds the catalog from the configuration, so a
//! validation error stops the run before any file is written or any remote
//! asset is touched.
//!
//! Desktop and CI hosts typically enable the `desktop-shims` feature (which
//! depends on `bridge-desktop`) and call [`bootstrap_desktop`].

pub mod error;

pub use error::{CoreError, Result};

use std::path::PathBuf;
use std::sync::Arc;

use bridge_traits::{
    http::HttpClient,
    storage::{FileSystemAccess, ReleaseAssetStore},
};
use core_catalog::{format_bytes, Catalog, CatalogValidator};
use core_fixtures::{ChecksumIndex, FileMaterializer};
use core_runtime::config::FixtureConfig;
use core_runtime::events::{CoreEvent, EventBus, FixtureEvent};
use core_sync::{ReconcileReport, RemoteReconciler, StatusReport};
use provider_github::GitHubReleaseConnector;
use serde::Serialize;
use tracing::{info, warn};

/// Total reported by [`FixtureService::calculate_total`] when the
/// configuration does not validate.
pub const UNKNOWN_TOTAL: &str = "Unknown";

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub filesystem: Arc<dyn FileSystemAccess>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(http_client: Arc<dyn HttpClient>, filesystem: Arc<dyn FileSystemAccess>) -> Self {
        Self {
            http_client,
            filesystem,
        }
    }
}

/// What a validated catalog amounts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub project_name: String,
    pub files: usize,
    pub total_bytes: u64,
    /// Raw sizes that were accepted but not written canonically
    pub non_canonical: Vec<String>,
}

/// Result of [`FixtureService::generate`].
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub manifest: PathBuf,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct FixtureService {
    deps: Arc<CoreDependencies>,
    config: Arc<FixtureConfig>,
    event_bus: EventBus,
}

impl FixtureService {
    /// Create a new service from the provided dependencies and configuration.
    pub fn new(deps: CoreDependencies, config: FixtureConfig) -> Self {
        Self {
            deps: Arc::new(deps),
            config: Arc::new(config),
            event_bus: EventBus::default(),
        }
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Event bus progress is published on.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Builds the catalog from the configured sizes.
    pub fn catalog(&self) -> Result<Catalog> {
        let catalog = CatalogValidator::from_config(&self.config).build(&self.config.sizes)?;
        Ok(catalog)
    }

    /// Validates the configuration and summarizes the catalog.
    pub fn validate(&self) -> Result<CatalogSummary> {
        let catalog = self.catalog()?;

        let summary = CatalogSummary {
            project_name: catalog.project_name().to_string(),
            files: catalog.len(),
            total_bytes: catalog.total_bytes(),
            non_canonical: catalog
                .style_violations()
                .iter()
                .map(|entry| entry.raw().to_string())
                .collect(),
        };

        info!(
            project = %summary.project_name,
            files = summary.files,
            total = %format_bytes(summary.total_bytes),
            "Configuration valid"
        );

        Ok(summary)
    }

    /// Total size of all fixtures, e.g. `"3.50GB"`.
    ///
    /// Read-only: returns [`UNKNOWN_TOTAL`] instead of failing when the
    /// configuration does not validate.
    pub fn calculate_total(&self) -> String {
        match self.catalog() {
            Ok(catalog) => format_bytes(catalog.total_bytes()),
            Err(e) => {
                warn!(error = %e, "Cannot calculate total size");
                UNKNOWN_TOTAL.to_string()
            }
        }
    }

    /// Writes every fixture into the output directory, then the checksum
    /// manifest.
    ///
    /// All entries are attempted. If any fails, the manifest is not written
    /// and [`CoreError::Generation`] names the failed files.
    pub async fn generate(&self) -> Result<GenerateReport> {
        let catalog = self.catalog()?;
        let output_dir = &self.config.output_dir;

        let report = FileMaterializer::new(Arc::clone(&self.deps.filesystem), output_dir)
            .with_event_bus(self.event_bus.clone())
            .materialize_all(&catalog)
            .await?;

        if !report.is_complete() {
            for (filename, error) in &report.failed {
                warn!(file = %filename, error = %error, "Fixture not generated");
            }
            return Err(CoreError::Generation {
                failed: report.failed.into_iter().map(|(name, _)| name).collect(),
            });
        }

        let manifest = ChecksumIndex::new(Arc::clone(&self.deps.filesystem))
            .index(output_dir, &catalog)
            .await?;
        self.event_bus
            .publish(CoreEvent::Fixture(FixtureEvent::ManifestWritten {
                path: manifest.display().to_string(),
                files: catalog.len(),
            }));

        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            "Generation complete"
        );

        Ok(GenerateReport {
            created: report.created,
            skipped: report.skipped,
            manifest,
        })
    }

    /// GitHub store for the configured release, authenticated with `token`.
    pub fn github_store(&self, token: &str) -> Result<Arc<dyn ReleaseAssetStore>> {
        let target = self
            .config
            .release
            .clone()
            .ok_or_else(|| CoreError::CapabilityMissing {
                capability: "release".to_string(),
                message: "no release configured".to_string(),
            })?;

        Ok(Arc::new(GitHubReleaseConnector::new(
            Arc::clone(&self.deps.http_client),
            token,
            target,
        )))
    }

    /// Deletes release assets that do not match the catalog.
    pub async fn sync_release(
        &self,
        store: Arc<dyn ReleaseAssetStore>,
    ) -> Result<ReconcileReport> {
        let catalog = self.catalog()?;
        let report = self.reconciler(store).reconcile(&catalog).await?;

        if !report.plan.missing.is_empty() {
            info!(
                missing = report.plan.missing.len(),
                "Catalog entries still need uploading"
            );
        }

        Ok(report)
    }

    /// Read-only comparison of the release against the catalog.
    pub async fn release_status(&self, store: Arc<dyn ReleaseAssetStore>) -> Result<StatusReport> {
        let catalog = self.catalog()?;
        Ok(self.reconciler(store).status(&catalog).await)
    }

    fn reconciler(&self, store: Arc<dyn ReleaseAssetStore>) -> RemoteReconciler {
        RemoteReconciler::new(store).with_event_bus(self.event_bus.clone())
    }
}

/// Dependencies backed by `reqwest` and `tokio::fs`.
#[cfg(feature = "desktop-shims")]
pub fn desktop_dependencies() -> CoreDependencies {
    CoreDependencies::new(
        Arc::new(bridge_desktop::ReqwestHttpClient::new()),
        Arc::new(bridge_desktop::TokioFileSystem::new()),
    )
}

/// Convenience bootstrapper for desktop and CI hosts.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_service::bootstrap_desktop;
///
/// let service = bootstrap_desktop("fixtures.yaml")?;
/// let report = service.generate().await?;
/// println!("wrote {}", report.manifest.display());
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(config_path: impl AsRef<std::path::Path>) -> Result<FixtureService> {
    let config = FixtureConfig::load(config_path)?;
    Ok(FixtureService::new(desktop_dependencies(), config))
}
