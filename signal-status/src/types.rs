//! Core types for the signal status engine
//!
//! This module defines the identifiers, events, values and statuses that flow
//! through the aggregation pipeline. Events are what the source delivers;
//! statuses are what the store keeps (one per identifier, no history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Timestamp type used throughout the engine
pub type Timestamp = DateTime<Utc>;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur while tracking signals
///
/// Admission rejections are deliberately absent: they are a normal filtering
/// outcome, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Failed to subscribe to signal source: {0}")]
    Subscribe(String),

    #[error("Signal stream fault: {0}")]
    Stream(String),

    #[error("Output command rejected: {0}")]
    Command(String),

    #[error("Not a digital output: {0}")]
    NotDigitalOutput(SignalId),

    #[error("Invalid signal record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Name of a physical I/O channel, e.g. `"DO 0"` or `"AI 1"`
///
/// The prefix encodes the channel class (see [`SignalClass`]). Ordering is plain
/// lexicographic string ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(String);

impl SignalId {
    /// Create a new identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Logical class derived from the identifier prefix
    pub fn class(&self) -> SignalClass {
        SignalClass::of(self.as_str())
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignalId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SignalId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Logical channel class, encoded in the identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    /// `DO ` / `DI ` - boolean-only channels
    Digital,
    /// `AI ` - float magnitude plus optional domain label
    AnalogInput,
    /// Any other prefix
    Unclassified,
}

/// Prefix of digital output identifiers
pub const DIGITAL_OUTPUT_PREFIX: &str = "DO ";
/// Prefix of digital input identifiers
pub const DIGITAL_INPUT_PREFIX: &str = "DI ";
/// Prefix of analog input identifiers
pub const ANALOG_INPUT_PREFIX: &str = "AI ";

impl SignalClass {
    /// Classify an identifier by its prefix
    pub fn of(signal_id: &str) -> Self {
        if signal_id.starts_with(DIGITAL_OUTPUT_PREFIX) || signal_id.starts_with(DIGITAL_INPUT_PREFIX) {
            SignalClass::Digital
        } else if signal_id.starts_with(ANALOG_INPUT_PREFIX) {
            SignalClass::AnalogInput
        } else {
            SignalClass::Unclassified
        }
    }
}

/// Payload kind of an event (and of the status it produced)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "signal_boolean_value")]
    Boolean,
    #[serde(rename = "signal_float_value")]
    Float,
    #[serde(rename = "signal_analog_domain")]
    Domain,
    #[serde(rename = "unknown")]
    Unknown,
}

impl SignalKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Boolean => "signal_boolean_value",
            SignalKind::Float => "signal_float_value",
            SignalKind::Domain => "signal_analog_domain",
            SignalKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value extracted from an event
///
/// Serialized as the bare scalar. `Unknown` is written as the string
/// `"Unknown"` so it cannot be confused with a non-finite float (`null`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    /// Digital level
    Boolean(bool),
    /// Analog magnitude
    Float(f64),
    /// Domain label such as `"CURRENT"`
    Domain(String),
    /// Placeholder for events whose kind was not recognized
    Unknown,
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Boolean(v) => write!(f, "{}", if *v { "true" } else { "false" }),
            SignalValue::Float(v) => write!(f, "{:.3}", v),
            SignalValue::Domain(v) => f.write_str(v),
            SignalValue::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for SignalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            SignalValue::Boolean(v) => serializer.serialize_bool(*v),
            SignalValue::Float(v) => serializer.serialize_f64(*v),
            SignalValue::Domain(v) => serializer.serialize_str(v),
            SignalValue::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

impl SignalValue {
    /// Boolean level, if this is a digital value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SignalValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Magnitude, if this is an analog value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Domain label, if this is a domain value
    pub fn as_domain(&self) -> Option<&str> {
        match self {
            SignalValue::Domain(v) => Some(v),
            _ => None,
        }
    }
}

/// A single signal event as delivered by a source
///
/// Adding a variant forces every match over events to be revisited.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalEvent {
    /// `signal_boolean_value`
    Boolean { signal_id: SignalId, value: bool },
    /// `signal_float_value`
    Float { signal_id: SignalId, value: f64 },
    /// `signal_analog_domain`
    Domain { signal_id: SignalId, domain: String },
    /// A record whose kind (or payload shape) was not recognized
    Unrecognized { signal_id: SignalId, kind: String },
}

impl SignalEvent {
    /// Convenience constructor for a boolean event
    pub fn boolean(signal_id: impl Into<SignalId>, value: bool) -> Self {
        SignalEvent::Boolean { signal_id: signal_id.into(), value }
    }

    /// Convenience constructor for a float event
    pub fn float(signal_id: impl Into<SignalId>, value: f64) -> Self {
        SignalEvent::Float { signal_id: signal_id.into(), value }
    }

    /// Convenience constructor for a domain event
    pub fn domain(signal_id: impl Into<SignalId>, domain: impl Into<String>) -> Self {
        SignalEvent::Domain { signal_id: signal_id.into(), domain: domain.into() }
    }

    /// Identifier the event refers to
    pub fn signal_id(&self) -> &SignalId {
        match self {
            SignalEvent::Boolean { signal_id, .. } => signal_id,
            SignalEvent::Float { signal_id, .. } => signal_id,
            SignalEvent::Domain { signal_id, .. } => signal_id,
            SignalEvent::Unrecognized { signal_id, .. } => signal_id,
        }
    }
}

/// Stored projection of one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalStatus {
    /// Channel the status belongs to
    pub signal_id: SignalId,
    /// Kind of the event that currently wins
    pub kind: SignalKind,
    /// Current value
    pub value: SignalValue,
    /// When this status was last accepted
    pub updated_at: Timestamp,
}

/// Lifecycle of the event subscription (not per signal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    /// Never started
    #[default]
    Idle,
    /// A subscription is active
    Tracking,
    /// The last subscription ended (stop, error or completion)
    Stopped,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingState::Idle => write!(f, "Idle"),
            TrackingState::Tracking => write!(f, "Tracking"),
            TrackingState::Stopped => write!(f, "Stopped"),
        }
    }
}
