//! Event source and output command boundaries
//!
//! The tracker never produces events itself. It subscribes to a
//! [`SignalSource`] and consumes the returned stream; digital output writes go
//! through an [`OutputCommandPath`].

use crate::config::SourceSelectors;
use crate::types::{Result, SignalEvent, SignalId};
use async_trait::async_trait;
use futures::stream::BoxStream;

pub mod replay;
pub mod simulated;

pub use replay::ReplaySource;
pub use simulated::{SimulatedFeed, SimulatedIo};

/// Stream of events delivered by a source
///
/// An `Err` item is a stream fault, the end of the stream is completion, and
/// dropping the stream unsubscribes.
pub type SignalStream = BoxStream<'static, Result<SignalEvent>>;

/// Something the tracker can subscribe to
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Open an event stream scoped to `selectors`
    async fn subscribe(&self, selectors: &SourceSelectors) -> Result<SignalStream>;
}

/// Write path for digital outputs
#[async_trait]
pub trait OutputCommandPath: Send + Sync {
    /// Drive `signal_id` to `value`; resolves once the write is acknowledged
    async fn set_value(&self, selectors: &SourceSelectors, signal_id: &SignalId, value: bool) -> Result<()>;
}
