//! # Release Reconciliation Module
//!
//! Converges a remote release towards the catalog.
//!
//! ## Overview
//!
//! Each pass is derived from scratch: the remote listing is fetched, diffed
//! against the [`Catalog`](core_catalog::Catalog), and every asset that does
//! not match a catalog entry by both name and size is deleted. Catalog
//! entries without a matching asset are reported as missing; uploading them
//! is up to the caller.
//!
//! ## Components
//!
//! - [`plan`](reconciler::plan): pure diff of catalog and listing
//! - [`RemoteReconciler`]: fetches the listing, applies deletions best-effort
//!   and reports progress on the event bus

pub mod error;
pub mod reconciler;

pub use error::{Result, SyncError};
pub use reconciler::{
    plan, ApplyReport, ReconcileReport, ReconciliationPlan, RemoteReconciler, RunId, StatusReport,
};
