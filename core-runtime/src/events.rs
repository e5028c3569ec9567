//! # Event Bus System
//!
//! Provides progress reporting for the fixture pipeline using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! Components publish strongly-typed [`CoreEvent`]s as they work; hosts
//! subscribe to render progress, write CI annotations, or collect metrics.
//! Publishing is best-effort: having no subscriber is not an error, and a
//! slow subscriber receives `RecvError::Lagged` instead of blocking the
//! pipeline.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, FixtureEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(16);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus.publish(CoreEvent::Fixture(FixtureEvent::Skipped {
//!     filename: "turbospeed-1mb.bin".to_string(),
//! }));
//!
//! let event = stream.recv().await.unwrap();
//! assert_eq!(event.description(), "Fixture already up to date");
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Local fixture generation events
    Fixture(FixtureEvent),
    /// Remote release reconciliation events
    Release(ReleaseEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Fixture(e) => e.description(),
            CoreEvent::Release(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Fixture(FixtureEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Release(ReleaseEvent::DeleteFailed { .. }) => EventSeverity::Error,
            CoreEvent::Release(ReleaseEvent::ListingUnavailable { .. }) => EventSeverity::Warning,
            CoreEvent::Fixture(FixtureEvent::Skipped { .. }) => EventSeverity::Debug,
            _ => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Fixture Events
// ============================================================================

/// Events emitted while materializing local files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum FixtureEvent {
    /// A file was written (new, or rewritten after a size mismatch).
    Created {
        filename: String,
        bytes: u64,
    },
    /// An existing file already had the expected size.
    Skipped {
        filename: String,
    },
    /// Writing a file failed; generation continues with the next entry.
    Failed {
        filename: String,
        message: String,
    },
    /// The checksum manifest was written.
    ManifestWritten {
        path: String,
        files: usize,
    },
}

impl FixtureEvent {
    fn description(&self) -> &str {
        match self {
            FixtureEvent::Created { .. } => "Fixture written",
            FixtureEvent::Skipped { .. } => "Fixture already up to date",
            FixtureEvent::Failed { .. } => "Fixture could not be written",
            FixtureEvent::ManifestWritten { .. } => "Checksum manifest written",
        }
    }
}

// ============================================================================
// Release Events
// ============================================================================

/// Events emitted while reconciling a remote release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ReleaseEvent {
    /// A reconciliation plan was computed.
    Planned {
        run_id: String,
        to_delete: usize,
        missing: usize,
    },
    /// A stale asset was deleted.
    AssetDeleted {
        run_id: String,
        name: String,
    },
    /// Deleting a stale asset failed; the pass continues.
    DeleteFailed {
        run_id: String,
        name: String,
        message: String,
    },
    /// The remote listing could not be fetched.
    ListingUnavailable {
        message: String,
    },
}

impl ReleaseEvent {
    fn description(&self) -> &str {
        match self {
            ReleaseEvent::Planned { .. } => "Reconciliation planned",
            ReleaseEvent::AssetDeleted { .. } => "Stale asset deleted",
            ReleaseEvent::DeleteFailed { .. } => "Stale asset deletion failed",
            ReleaseEvent::ListingUnavailable { .. } => "Remote listing unavailable",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for [`CoreEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Publishes an event, ignoring the absence of subscribers.
    pub fn publish(&self, event: CoreEvent) {
        let _ = self.sender.send(event);
    }

    /// Creates a new subscriber that receives all future events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_errors() {
        let bus = EventBus::new(4);
        let result = bus.emit(CoreEvent::Fixture(FixtureEvent::Skipped {
            filename: "a.bin".to_string(),
        }));
        assert!(result.is_err());

        // publish swallows the same condition
        bus.publish(CoreEvent::Fixture(FixtureEvent::Skipped {
            filename: "a.bin".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(CoreEvent::Release(ReleaseEvent::Planned {
            run_id: "run-1".to_string(),
            to_delete: 1,
            missing: 2,
        }));
        bus.publish(CoreEvent::Release(ReleaseEvent::AssetDeleted {
            run_id: "run-1".to_string(),
            name: "old.bin".to_string(),
        }));

        assert!(matches!(
            rx.recv().await.unwrap(),
            CoreEvent::Release(ReleaseEvent::Planned { to_delete: 1, .. })
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            CoreEvent::Release(ReleaseEvent::AssetDeleted { .. })
        ));
    }

    #[test]
    fn test_severity() {
        let failed = CoreEvent::Release(ReleaseEvent::DeleteFailed {
            run_id: "r".to_string(),
            name: "x.bin".to_string(),
            message: "HTTP 500".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Error);

        let created = CoreEvent::Fixture(FixtureEvent::Created {
            filename: "a.bin".to_string(),
            bytes: 1024,
        });
        assert_eq!(created.severity(), EventSeverity::Info);
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = CoreEvent::Fixture(FixtureEvent::ManifestWritten {
            path: "generated/checksums.txt".to_string(),
            files: 3,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Fixture");
        assert_eq!(json["payload"]["event"], "ManifestWritten");
        assert_eq!(json["payload"]["files"], 3);
    }
}
