//! Signal Status Library
//!
//! Aggregates a live stream of hardware I/O signal events into a consistent,
//! queryable snapshot of the current value of every signal.
//!
//! # Architecture
//!
//! Events flow one way through the pipeline:
//!
//! ```text
//! SignalSource --> Classifier --> admission --> StatusStore --> Snapshot views
//!                  (kind, value)  (accept?)     (copy-on-write)  (all / by_prefix / single)
//! ```
//!
//! - Digital channels (`DO `/`DI `) only ever hold boolean values
//! - Analog inputs (`AI `) keep a float reading over a later domain label
//! - One subscription at a time, owned by [`SignalTracker`]
//!
//! The library does NOT:
//! - Produce events (hardware polling, transport encoding)
//! - Render anything or persist configuration
//!
//! # Example Usage
//!
//! ```no_run
//! use signal_status::{SignalTracker, SourceSelectors, ReplaySource};
//! use std::sync::Arc;
//!
//! # async fn run() -> signal_status::Result<()> {
//! let source = Arc::new(ReplaySource::new("session.jsonl"));
//! let mut tracker = SignalTracker::new(source);
//! tracker.start(SourceSelectors::new("io-board", "tool")).await?;
//!
//! let mut watcher = tracker.watch();
//! watcher.wait_until_stopped().await;
//!
//! for status in tracker.by_prefix("DO ") {
//!     println!("{} = {}", status.signal_id, status.value);
//! }
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod admission;
pub mod classifier;
pub mod config;
pub mod record;
pub mod source;
pub mod store;
pub mod tracker;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use admission::{admit, Admission, RejectReason};
pub use classifier::Classifier;
pub use config::{SourceSelectors, TrackerConfig};
pub use record::{decode_record, SignalRecord};
pub use source::{
    OutputCommandPath, ReplaySource, SignalSource, SignalStream, SimulatedFeed, SimulatedIo,
};
pub use store::{ApplyOutcome, Snapshot, StatusMap, StatusStore};
pub use tracker::{SignalTracker, StatusWatcher};
pub use types::{
    Result, SignalClass, SignalEvent, SignalId, SignalKind, SignalStatus, SignalValue,
    Timestamp, TrackerError, TrackingState,
};
pub use view::{CategoryView, OTHER_CATEGORY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
