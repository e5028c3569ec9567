//! Reconciliation passes against a mocked release store

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::storage::{ReleaseAssetStore, RemoteAsset};
use core_catalog::{Catalog, CatalogValidator};
use core_runtime::config::CatalogLimits;
use core_runtime::events::{CoreEvent, EventBus, ReleaseEvent};
use core_sync::{RemoteReconciler, SyncError};
use mockall::mock;
use std::sync::Arc;

mock! {
    Store {}

    #[async_trait]
    impl ReleaseAssetStore for Store {
        async fn list_assets(&self) -> BridgeResult<Vec<RemoteAsset>>;
        async fn delete_asset(&self, asset_id: &str) -> BridgeResult<()>;
    }
}

fn catalog() -> Catalog {
    CatalogValidator::new("turbospeed", CatalogLimits::default())
        .build(&["100KB", "1MB"])
        .unwrap()
}

fn remote() -> Vec<RemoteAsset> {
    vec![
        RemoteAsset::new("1", "turbospeed-100kb.bin", 100 * 1024),
        RemoteAsset::new("2", "turbospeed-1mb.bin", 12),
        RemoteAsset::new("3", "turbospeed-10mb.bin", 10 * 1024 * 1024),
        RemoteAsset::new("4", "checksums.txt", 120),
    ]
}

#[tokio::test]
async fn test_reconcile_deletes_stale_assets() {
    let mut store = MockStore::new();
    store.expect_list_assets().times(1).returning(|| Ok(remote()));
    store
        .expect_delete_asset()
        .withf(|id| id == "2" || id == "3")
        .times(2)
        .returning(|_| Ok(()));

    let report = RemoteReconciler::new(Arc::new(store))
        .reconcile(&catalog())
        .await
        .unwrap();

    assert_eq!(report.applied.deleted, 2);
    assert!(report.applied.is_clean());
    assert_eq!(report.plan.missing.len(), 1);
    assert_eq!(report.plan.missing[0].filename(), "turbospeed-1mb.bin");
}

#[tokio::test]
async fn test_failed_deletion_does_not_stop_the_pass() {
    let mut store = MockStore::new();
    store.expect_list_assets().returning(|| Ok(remote()));
    store
        .expect_delete_asset()
        .times(2)
        .returning(|id| {
            if id == "2" {
                Err(BridgeError::OperationFailed("API error (status 500)".to_string()))
            } else {
                Ok(())
            }
        });

    let bus = EventBus::new(16);
    let mut events = bus.subscribe();

    let report = RemoteReconciler::new(Arc::new(store))
        .with_event_bus(bus)
        .reconcile(&catalog())
        .await
        .unwrap();

    assert_eq!(report.applied.deleted, 1);
    assert_eq!(report.applied.failed, vec!["turbospeed-1mb.bin"]);

    let run_id = report.run_id.to_string();
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Release(ReleaseEvent::Planned {
            run_id: run_id.clone(),
            to_delete: 2,
            missing: 1,
        })
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Release(ReleaseEvent::DeleteFailed {
            run_id: run_id.clone(),
            name: "turbospeed-1mb.bin".to_string(),
            message: "Bridge operation failed: API error (status 500)".to_string(),
        })
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Release(ReleaseEvent::AssetDeleted {
            run_id,
            name: "turbospeed-10mb.bin".to_string(),
        })
    );
}

#[tokio::test]
async fn test_listing_failure_aborts_without_deleting() {
    let mut store = MockStore::new();
    store
        .expect_list_assets()
        .returning(|| Err(BridgeError::OperationFailed("timeout".to_string())));
    store.expect_delete_asset().never();

    let err = RemoteReconciler::new(Arc::new(store))
        .reconcile(&catalog())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Remote(ref msg) if msg.contains("timeout")));
}

#[tokio::test]
async fn test_status_degrades_to_empty_listing() {
    let mut store = MockStore::new();
    store
        .expect_list_assets()
        .returning(|| Err(BridgeError::NotAvailable("offline".to_string())));
    store.expect_delete_asset().never();

    let status = RemoteReconciler::new(Arc::new(store))
        .status(&catalog())
        .await;

    assert!(!status.remote_known);
    assert!(status.plan.to_delete.is_empty());
    assert_eq!(status.plan.missing.len(), 2);
}

#[tokio::test]
async fn test_status_never_deletes() {
    let mut store = MockStore::new();
    store.expect_list_assets().returning(|| Ok(remote()));
    store.expect_delete_asset().never();

    let status = RemoteReconciler::new(Arc::new(store))
        .status(&catalog())
        .await;

    assert!(status.remote_known);
    assert_eq!(status.plan.to_delete.len(), 2);
}

#[tokio::test]
async fn test_rerun_after_convergence_is_a_no_op() {
    let mut store = MockStore::new();
    store.expect_list_assets().returning(|| {
        Ok(vec![
            RemoteAsset::new("1", "turbospeed-100kb.bin", 100 * 1024),
            RemoteAsset::new("5", "turbospeed-1mb.bin", 1024 * 1024),
            RemoteAsset::new("4", "checksums.txt", 120),
        ])
    });
    store.expect_delete_asset().never();

    let report = RemoteReconciler::new(Arc::new(store))
        .reconcile(&catalog())
        .await
        .unwrap();

    assert!(report.plan.is_converged());
    assert_eq!(report.applied.deleted, 0);
}
