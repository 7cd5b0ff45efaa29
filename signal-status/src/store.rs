//! Status store
//!
//! Holds the current status of every signal. Updates are copy-on-write: a
//! [`Snapshot`] taken before an update keeps observing the old map.

use crate::admission::{self, Admission, RejectReason};
use crate::classifier::Classifier;
use crate::types::{SignalEvent, SignalId, SignalStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

/// Mapping from signal identifier to its current status
pub type StatusMap = HashMap<SignalId, SignalStatus>;

/// Immutable view of the store at one point in time
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    statuses: Arc<StatusMap>,
    version: u64,
}

impl Snapshot {
    /// The underlying map (unordered)
    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    /// Store version this snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// True if both snapshots share the same map instance
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.statuses, &other.statuses)
    }
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event replaced the signal's status
    Accepted,
    /// The event was filtered out; the store is unchanged
    Rejected(RejectReason),
}

impl ApplyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ApplyOutcome::Accepted)
    }
}

/// The status store
///
/// `version` counts mutations (accepted events and clears) and is what
/// observers compare to detect a change.
#[derive(Debug, Default)]
pub struct StatusStore {
    current: Snapshot,
}

impl StatusStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify, admit and, if accepted, record an event
    pub fn apply(&mut self, event: &SignalEvent) -> ApplyOutcome {
        let signal_id = event.signal_id();
        let (kind, value) = Classifier::classify(event);

        if let Admission::Reject(reason) = admission::admit(signal_id, kind, &self.current.statuses) {
            log::trace!("Rejected {} event for {}: {}", kind, signal_id, reason);
            return ApplyOutcome::Rejected(reason);
        }

        log::debug!("{} <- {} ({})", signal_id, value, kind);

        let status = SignalStatus {
            signal_id: signal_id.clone(),
            kind,
            value,
            updated_at: Utc::now(),
        };

        // Clones the map only while a snapshot still holds the previous one
        Arc::make_mut(&mut self.current.statuses).insert(signal_id.clone(), status);
        self.current.version += 1;

        ApplyOutcome::Accepted
    }

    /// Replace the map with an empty one
    pub fn clear(&mut self) {
        self.current.statuses = Arc::new(StatusMap::new());
        self.current.version += 1;
    }

    /// Current snapshot (cheap: clones an `Arc`)
    pub fn snapshot(&self) -> Snapshot {
        self.current.clone()
    }

    /// Number of mutations applied so far
    pub fn version(&self) -> u64 {
        self.current.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SignalKind, SignalValue};

    fn stored(store: &StatusStore, signal_id: &str) -> Option<SignalStatus> {
        store.snapshot().statuses().get(&SignalId::from(signal_id)).cloned()
    }

    #[test]
    fn test_analog_domain_float_domain_scenario() {
        let mut store = StatusStore::new();
        assert!(store.apply(&SignalEvent::domain("AI 0", "CURRENT")).is_accepted());
        assert!(store.apply(&SignalEvent::float("AI 0", 12.5)).is_accepted());
        assert_eq!(
            store.apply(&SignalEvent::domain("AI 0", "VOLTAGE")),
            ApplyOutcome::Rejected(RejectReason::DomainAfterFloat)
        );

        let status = stored(&store, "AI 0").unwrap();
        assert_eq!(status.kind, SignalKind::Float);
        assert_eq!(status.value, SignalValue::Float(12.5));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_digital_float_is_rejected() {
        let mut store = StatusStore::new();
        let outcome = store.apply(&SignalEvent::float("DO 0", 3.3));
        assert_eq!(outcome, ApplyOutcome::Rejected(RejectReason::NonBooleanDigital));
        assert!(stored(&store, "DO 0").is_none());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_last_writer_wins_within_kind() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DI 1", true));
        store.apply(&SignalEvent::boolean("DI 1", false));
        assert_eq!(stored(&store, "DI 1").unwrap().value, SignalValue::Boolean(false));
    }

    #[test]
    fn test_order_changes_mutation_count_not_result() {
        let mut domain_first = StatusStore::new();
        domain_first.apply(&SignalEvent::domain("AI 0", "CURRENT"));
        domain_first.apply(&SignalEvent::float("AI 0", 4.0));

        let mut float_first = StatusStore::new();
        float_first.apply(&SignalEvent::float("AI 0", 4.0));
        float_first.apply(&SignalEvent::domain("AI 0", "CURRENT"));

        assert_eq!(stored(&domain_first, "AI 0").unwrap().value, SignalValue::Float(4.0));
        assert_eq!(stored(&float_first, "AI 0").unwrap().value, SignalValue::Float(4.0));
        assert_eq!(domain_first.version(), 2);
        assert_eq!(float_first.version(), 1);
    }

    #[test]
    fn test_digital_only_ever_holds_booleans() {
        let mut store = StatusStore::new();
        let events = [
            SignalEvent::float("DO 1", 1.0),
            SignalEvent::boolean("DO 1", true),
            SignalEvent::domain("DO 1", "CURRENT"),
            SignalEvent::Unrecognized { signal_id: "DO 1".into(), kind: "weird".into() },
            SignalEvent::float("DO 1", 0.0),
        ];
        for event in &events {
            store.apply(event);
            if let Some(status) = stored(&store, "DO 1") {
                assert_eq!(status.kind, SignalKind::Boolean);
            }
        }
        assert_eq!(stored(&store, "DO 1").unwrap().value, SignalValue::Boolean(true));
    }

    #[test]
    fn test_unknown_kind_is_stored_as_unknown() {
        let mut store = StatusStore::new();
        let event = SignalEvent::Unrecognized { signal_id: "AI 1".into(), kind: "signal_integer_value".into() };
        assert!(store.apply(&event).is_accepted());
        let status = stored(&store, "AI 1").unwrap();
        assert_eq!(status.kind, SignalKind::Unknown);
        assert_eq!(status.value.to_string(), "Unknown");
    }

    #[test]
    fn test_snapshot_is_copy_on_write() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DO 0", true));
        let before = store.snapshot();

        store.apply(&SignalEvent::boolean("DO 0", false));
        store.apply(&SignalEvent::boolean("DO 1", true));

        assert_eq!(before.len(), 1);
        assert_eq!(
            before.statuses().get(&SignalId::from("DO 0")).unwrap().value,
            SignalValue::Boolean(true)
        );
        assert!(!before.ptr_eq(&store.snapshot()));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_rejected_event_keeps_map_instance() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::float("AI 0", 1.0));
        let before = store.snapshot();
        store.apply(&SignalEvent::domain("AI 0", "CURRENT"));
        assert!(before.ptr_eq(&store.snapshot()));
        assert_eq!(before.version(), store.version());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = StatusStore::new();
        store.apply(&SignalEvent::boolean("DO 0", true));
        store.apply(&SignalEvent::float("AI 0", 2.0));
        let before = store.snapshot();

        store.clear();
        assert!(store.snapshot().is_empty());
        assert_eq!(before.len(), 2);
        assert_eq!(store.version(), 3);
    }
}
