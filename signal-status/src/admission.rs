//! Admission filter and merge resolution
//!
//! Decides whether a classified event may replace the stored status of its
//! signal. Rules, evaluated in order:
//!
//! 1. Digital channels (`DO `/`DI `) only ever accept boolean events.
//! 2. Analog inputs (`AI `) reject a domain label once a float reading has been
//!    recorded. A domain label arriving first is accepted and later superseded
//!    by a float.
//! 3. Everything else is accepted.

use crate::store::StatusMap;
use crate::types::{SignalClass, SignalId, SignalKind};
use std::fmt;

/// Outcome of admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accept,
    Reject(RejectReason),
}

impl Admission {
    pub fn is_accept(&self) -> bool {
        matches!(self, Admission::Accept)
    }
}

/// Why an event was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Non-boolean event for a digital channel
    NonBooleanDigital,
    /// Domain label for an analog input that already holds a float
    DomainAfterFloat,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NonBooleanDigital => write!(f, "digital channel accepts boolean values only"),
            RejectReason::DomainAfterFloat => write!(f, "float reading takes precedence over domain label"),
        }
    }
}

/// Decide whether an event of `kind` for `signal_id` may update `statuses`
pub fn admit(signal_id: &SignalId, kind: SignalKind, statuses: &StatusMap) -> Admission {
    match signal_id.class() {
        SignalClass::Digital if kind != SignalKind::Boolean => {
            Admission::Reject(RejectReason::NonBooleanDigital)
        }
        SignalClass::AnalogInput => {
            let stored_kind = statuses.get(signal_id).map(|status| status.kind);
            if stored_kind == Some(SignalKind::Float) && kind == SignalKind::Domain {
                Admission::Reject(RejectReason::DomainAfterFloat)
            } else {
                Admission::Accept
            }
        }
        _ => Admission::Accept,
    }
}
