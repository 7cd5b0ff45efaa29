//! Signal record decoding
//!
//! Converts JSON signal records into typed [`SignalEvent`]s:
//!
//! ```text
//! {"signal_id": "AI 0", "kind": "signal_float_value", "value": 12.5}
//! ```
//!
//! A record with an unknown kind, or a known kind carrying a value of the wrong
//! shape, decodes to [`SignalEvent::Unrecognized`] instead of failing.

use crate::types::{Result, SignalEvent, SignalId, SignalKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A signal record as found on the wire or in a replay log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRecord {
    #[serde(alias = "signalIdentifier")]
    pub signal_id: SignalId,
    pub kind: String,
    #[serde(default)]
    pub value: Value,
}

impl SignalRecord {
    /// Convert the record into a typed event
    pub fn into_event(self) -> SignalEvent {
        let SignalRecord { signal_id, kind, value } = self;

        let known = if kind == SignalKind::Boolean.as_str() {
            value.as_bool().map(|value| SignalEvent::Boolean { signal_id: signal_id.clone(), value })
        } else if kind == SignalKind::Float.as_str() {
            value.as_f64().map(|value| SignalEvent::Float { signal_id: signal_id.clone(), value })
        } else if kind == SignalKind::Domain.as_str() {
            value.as_str().map(|domain| SignalEvent::Domain {
                signal_id: signal_id.clone(),
                domain: domain.to_string(),
            })
        } else {
            None
        };

        known.unwrap_or_else(|| {
            log::warn!("Unrecognized signal record for {}: kind={:?} value={}", signal_id, kind, value);
            SignalEvent::Unrecognized { signal_id, kind }
        })
    }
}

impl From<&SignalEvent> for SignalRecord {
    fn from(event: &SignalEvent) -> Self {
        let (kind, value) = match event {
            SignalEvent::Boolean { value, .. } => (SignalKind::Boolean.as_str().to_string(), Value::from(*value)),
            SignalEvent::Float { value, .. } => (SignalKind::Float.as_str().to_string(), Value::from(*value)),
            SignalEvent::Domain { domain, .. } => (SignalKind::Domain.as_str().to_string(), Value::from(domain.as_str())),
            SignalEvent::Unrecognized { kind, .. } => (kind.clone(), Value::Null),
        };
        SignalRecord {
            signal_id: event.signal_id().clone(),
            kind,
            value,
        }
    }
}

/// Decode one JSON record into an event
pub fn decode_record(json: &str) -> Result<SignalEvent> {
    let record: SignalRecord = serde_json::from_str(json)?;
    Ok(record.into_event())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_kinds() {
        assert_eq!(
            decode_record(r#"{"signal_id": "DO 0", "kind": "signal_boolean_value", "value": true}"#).unwrap(),
            SignalEvent::boolean("DO 0", true)
        );
        assert_eq!(
            decode_record(r#"{"signal_id": "AI 0", "kind": "signal_float_value", "value": 12.5}"#).unwrap(),
            SignalEvent::float("AI 0", 12.5)
        );
        assert_eq!(
            decode_record(r#"{"signal_id": "AI 1", "kind": "signal_analog_domain", "value": "CURRENT"}"#).unwrap(),
            SignalEvent::domain("AI 1", "CURRENT")
        );
    }

    #[test]
    fn test_integer_json_is_a_float_value() {
        assert_eq!(
            decode_record(r#"{"signal_id": "AI 0", "kind": "signal_float_value", "value": 4}"#).unwrap(),
            SignalEvent::float("AI 0", 4.0)
        );
    }

    #[test]
    fn test_signal_identifier_alias() {
        let event = decode_record(
            r#"{"signalIdentifier": "DI 1", "kind": "signal_boolean_value", "value": false}"#,
        )
        .unwrap();
        assert_eq!(event, SignalEvent::boolean("DI 1", false));
    }

    #[test]
    fn test_unknown_kind_and_wrong_shape_are_unrecognized() {
        let event = decode_record(r#"{"signal_id": "AI 0", "kind": "signal_int_value", "value": 3}"#).unwrap();
        assert_eq!(
            event,
            SignalEvent::Unrecognized { signal_id: "AI 0".into(), kind: "signal_int_value".into() }
        );

        let event = decode_record(r#"{"signal_id": "DO 0", "kind": "signal_boolean_value", "value": "on"}"#).unwrap();
        assert!(matches!(event, SignalEvent::Unrecognized { .. }));

        let event = decode_record(r#"{"signal_id": "DO 0", "kind": "signal_boolean_value"}"#).unwrap();
        assert!(matches!(event, SignalEvent::Unrecognized { .. }));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(decode_record("{not json").is_err());
        assert!(decode_record(r#"{"kind": "signal_float_value"}"#).is_err());
    }

    #[test]
    fn test_record_from_event() {
        let record = SignalRecord::from(&SignalEvent::domain("AI 0", "VOLTAGE"));
        assert_eq!(record.kind, "signal_analog_domain");
        assert_eq!(record.into_event(), SignalEvent::domain("AI 0", "VOLTAGE"));
    }
}
