//! Event classification
//!
//! Determines the payload kind of an event and extracts its scalar value.
//! Classification never fails: unrecognized events degrade to an `Unknown`
//! value so the fault stays visible to the consumer.

use crate::types::{SignalEvent, SignalKind, SignalValue};

/// Event classifier - maps an event onto `(kind, value)`
pub struct Classifier;

impl Classifier {
    /// Classify a single event
    ///
    /// # Returns
    /// * `(SignalKind::Unknown, SignalValue::Unknown)` for unrecognized events
    /// * the matching kind and extracted value otherwise
    pub fn classify(event: &SignalEvent) -> (SignalKind, SignalValue) {
        match event {
            SignalEvent::Boolean { value, .. } => (SignalKind::Boolean, SignalValue::Boolean(*value)),
            SignalEvent::Float { value, .. } => (SignalKind::Float, SignalValue::Float(*value)),
            SignalEvent::Domain { domain, .. } => (SignalKind::Domain, SignalValue::Domain(domain.clone())),
            SignalEvent::Unrecognized { signal_id, kind } => {
                log::debug!("Unrecognized event kind {:?} for {}", kind, signal_id);
                (SignalKind::Unknown, SignalValue::Unknown)
            }
        }
    }
}
