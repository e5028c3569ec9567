//! # Remote Reconciler
//!
//! Diffs the catalog against a remote release and deletes stale assets.
//!
//! ## Rules
//!
//! - An asset is valid when its name equals a catalog entry's file name and
//!   its size equals that entry's byte count. Everything else is deleted,
//!   including a second asset with an already matched name.
//! - The checksum manifest is never deleted.
//! - A catalog entry without a valid asset is missing.
//! - Deletions are attempted once each; a failure is recorded and the pass
//!   continues. Callers re-run the pass until nothing fails.
//! - A failed listing aborts [`RemoteReconciler::reconcile`] before anything is
//!   deleted. Only the read-only [`RemoteReconciler::status`] falls back to an
//!   empty listing.

use crate::error::{Result, SyncError};
use bridge_traits::storage::{ReleaseAssetStore, RemoteAsset};
use core_catalog::{Catalog, CatalogEntry};
use core_fixtures::CHECKSUM_MANIFEST_NAME;
use core_runtime::events::{CoreEvent, EventBus, ReleaseEvent};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Identifies one reconciliation pass in logs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Plans and Reports
// ============================================================================

/// Actions needed to converge the remote release on the catalog.
///
/// Computed fresh on every pass and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Remote assets to delete, in listing order
    pub to_delete: Vec<RemoteAsset>,
    /// Catalog entries with no valid remote asset, in catalog order
    pub missing: Vec<CatalogEntry>,
}

impl ReconciliationPlan {
    /// True when the remote release already matches the catalog.
    pub fn is_converged(&self) -> bool {
        self.to_delete.is_empty() && self.missing.is_empty()
    }
}

/// Outcome of applying a plan's deletions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub deleted: usize,
    /// Names of assets whose deletion failed
    pub failed: Vec<String>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a full reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub run_id: RunId,
    pub plan: ReconciliationPlan,
    pub applied: ApplyReport,
}

/// Read-only view of how far the remote release is from the catalog.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// False when the listing failed and `plan` assumes an empty release
    pub remote_known: bool,
    pub plan: ReconciliationPlan,
}

/// Computes the plan that converges `remote` on `catalog`.
pub fn plan(catalog: &Catalog, remote: &[RemoteAsset]) -> ReconciliationPlan {
    let expected: HashMap<&str, u64> = catalog
        .iter()
        .map(|entry| (entry.filename(), entry.bytes()))
        .collect();

    let mut matched: HashSet<&str> = HashSet::with_capacity(expected.len());
    let mut to_delete = Vec::new();

    for asset in remote {
        if asset.name == CHECKSUM_MANIFEST_NAME {
            continue;
        }

        let valid = expected.get(asset.name.as_str()) == Some(&asset.size);
        if valid && matched.insert(asset.name.as_str()) {
            continue;
        }

        to_delete.push(asset.clone());
    }

    let missing = catalog
        .iter()
        .filter(|entry| !matched.contains(entry.filename()))
        .cloned()
        .collect();

    ReconciliationPlan { to_delete, missing }
}

// ============================================================================
// Reconciler
// ============================================================================

/// Reconciles a catalog against one remote release.
pub struct RemoteReconciler {
    store: Arc<dyn ReleaseAssetStore>,
    event_bus: Option<EventBus>,
}

impl RemoteReconciler {
    pub fn new(store: Arc<dyn ReleaseAssetStore>) -> Self {
        Self {
            store,
            event_bus: None,
        }
    }

    /// Publish [`ReleaseEvent`]s while reconciling.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Lists the remote release and deletes every stale asset.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] when the listing fails. No deletion is
    /// attempted in that case.
    #[instrument(skip(self, catalog), fields(project = catalog.project_name()))]
    pub async fn reconcile(&self, catalog: &Catalog) -> Result<ReconcileReport> {
        let run_id = RunId::new();

        let remote = self.store.list_assets().await.map_err(|e| {
            warn!(run_id = %run_id, error = %e, "Remote listing failed; nothing deleted");
            self.publish(ReleaseEvent::ListingUnavailable {
                message: e.to_string(),
            });
            SyncError::Remote(format!("Failed to list release assets: {}", e))
        })?;

        let plan = plan(catalog, &remote);
        info!(
            run_id = %run_id,
            remote = remote.len(),
            to_delete = plan.to_delete.len(),
            missing = plan.missing.len(),
            "Reconciliation planned"
        );
        self.publish(ReleaseEvent::Planned {
            run_id: run_id.to_string(),
            to_delete: plan.to_delete.len(),
            missing: plan.missing.len(),
        });

        let applied = self.apply(&plan, run_id).await;

        Ok(ReconcileReport {
            run_id,
            plan,
            applied,
        })
    }

    /// Deletes every asset in `plan.to_delete`, one attempt each.
    ///
    /// Failures are collected; they never stop the remaining deletions.
    pub async fn apply(&self, plan: &ReconciliationPlan, run_id: RunId) -> ApplyReport {
        let mut report = ApplyReport::default();

        for asset in &plan.to_delete {
            match self.store.delete_asset(&asset.id).await {
                Ok(()) => {
                    info!(run_id = %run_id, asset = %asset.name, "Deleted stale asset");
                    self.publish(ReleaseEvent::AssetDeleted {
                        run_id: run_id.to_string(),
                        name: asset.name.clone(),
                    });
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(run_id = %run_id, asset = %asset.name, error = %e, "Failed to delete asset");
                    self.publish(ReleaseEvent::DeleteFailed {
                        run_id: run_id.to_string(),
                        name: asset.name.clone(),
                        message: e.to_string(),
                    });
                    report.failed.push(asset.name.clone());
                }
            }
        }

        report
    }

    /// Computes the plan without deleting anything.
    ///
    /// A failed listing is reported as an empty release with
    /// `remote_known == false`, so every entry shows up as missing.
    pub async fn status(&self, catalog: &Catalog) -> StatusReport {
        match self.store.list_assets().await {
            Ok(remote) => StatusReport {
                remote_known: true,
                plan: plan(catalog, &remote),
            },
            Err(e) => {
                warn!(error = %e, "Remote listing unavailable; treating release as empty");
                self.publish(ReleaseEvent::ListingUnavailable {
                    message: e.to_string(),
                });
                StatusReport {
                    remote_known: false,
                    plan: plan(catalog, &[]),
                }
            }
        }
    }

    fn publish(&self, event: ReleaseEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(CoreEvent::Release(event));
        }
    }
}
