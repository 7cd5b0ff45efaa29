//! Tracking lifecycle
//!
//! [`SignalTracker`] owns the single subscription to a [`SignalSource`] and is
//! the only event writer of the status store.
//!
//! ```text
//! Idle --start()--> Tracking --(stream fault | completion | stop())--> Stopped
//!                      ^                                                 |
//!                      +------------------- start() ---------------------+
//! ```
//!
//! The store lives in a `watch` channel: each accepted event is admitted and
//! written under the channel's lock and wakes watchers, while rejected events
//! leave both the map and the version untouched.

use crate::config::SourceSelectors;
use crate::source::{OutputCommandPath, SignalSource, SignalStream};
use crate::store::{Snapshot, StatusStore};
use crate::types::{Result, SignalId, SignalStatus, TrackerError, TrackingState, DIGITAL_OUTPUT_PREFIX};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Tracking state tagged with the subscription it belongs to
#[derive(Debug, Clone, Copy, Default)]
struct TrackerStatus {
    state: TrackingState,
    generation: u64,
}

/// Owned handle of one active subscription
///
/// Dropping the handle cancels the subscription.
struct Subscription {
    generation: u64,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait for the consumer task to exit
    async fn close(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::error!("Signal consumer task {} failed: {}", self.generation, e);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Observes store and tracking state changes without owning the tracker
#[derive(Debug, Clone)]
pub struct StatusWatcher {
    store: watch::Receiver<StatusStore>,
    status: watch::Receiver<TrackerStatus>,
}

impl StatusWatcher {
    /// Latest snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.store.borrow().snapshot()
    }

    /// Latest tracking state
    pub fn state(&self) -> TrackingState {
        self.status.borrow().state
    }

    /// Wait for the next store mutation; false once the tracker is gone
    pub async fn changed(&mut self) -> bool {
        self.store.changed().await.is_ok()
    }

    /// Wait until tracking is no longer active
    pub async fn wait_until_stopped(&mut self) -> TrackingState {
        match self
            .status
            .wait_for(|status| status.state != TrackingState::Tracking)
            .await
        {
            Ok(status) => status.state,
            Err(_) => TrackingState::Stopped,
        }
    }
}

/// Subscribes to a signal source and keeps the current status per signal
pub struct SignalTracker {
    source: Arc<dyn SignalSource>,
    commands: Option<Arc<dyn OutputCommandPath>>,
    store: Arc<watch::Sender<StatusStore>>,
    status: Arc<watch::Sender<TrackerStatus>>,
    subscription: Option<Subscription>,
    selectors: SourceSelectors,
    generation: u64,
}

impl SignalTracker {
    /// Create an idle tracker with an empty store
    pub fn new(source: Arc<dyn SignalSource>) -> Self {
        Self {
            source,
            commands: None,
            store: Arc::new(watch::Sender::new(StatusStore::new())),
            status: Arc::new(watch::Sender::new(TrackerStatus::default())),
            subscription: None,
            selectors: SourceSelectors::default(),
            generation: 0,
        }
    }

    /// Builder method: attach the output command path used by [`Self::set_output`]
    pub fn with_output(mut self, commands: Arc<dyn OutputCommandPath>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Subscribe to the source and start applying its events
    ///
    /// Does nothing while already tracking. A successful subscribe starts the
    /// session from an empty store. A failed subscribe is returned and leaves
    /// the tracker `Stopped` with the store untouched.
    pub async fn start(&mut self, selectors: SourceSelectors) -> Result<()> {
        if self.state() == TrackingState::Tracking {
            log::debug!("Already tracking {}, ignoring start for {}", self.selectors, selectors);
            return Ok(());
        }

        // Whatever is left of an ended subscription
        self.subscription = None;
        self.generation += 1;
        let generation = self.generation;

        let stream = match self.source.subscribe(&selectors).await {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("Failed to start tracking {}: {}", selectors, e);
                self.status.send_replace(TrackerStatus {
                    state: TrackingState::Stopped,
                    generation,
                });
                return Err(e);
            }
        };

        // Values of a previous session must not pass for current ones
        self.store.send_if_modified(|store| {
            if store.snapshot().is_empty() {
                false
            } else {
                store.clear();
                true
            }
        });

        self.status.send_replace(TrackerStatus {
            state: TrackingState::Tracking,
            generation,
        });

        let cancel = CancellationToken::new();
        let task = tokio::spawn(consume(
            stream,
            Arc::clone(&self.store),
            Arc::clone(&self.status),
            cancel.clone(),
            generation,
        ));

        self.subscription = Some(Subscription {
            generation,
            cancel,
            task: Some(task),
        });
        log::info!("Tracking signals from {} (subscription {})", selectors, generation);
        self.selectors = selectors;
        Ok(())
    }

    /// Cancel the active subscription, if any
    ///
    /// Idempotent. Already applied events stay in the store.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            log::info!("Stopped tracking {} (subscription {})", self.selectors, subscription.generation);
        }
        self.status.send_if_modified(|status| {
            if status.state == TrackingState::Stopped {
                false
            } else {
                status.state = TrackingState::Stopped;
                true
            }
        });
    }

    /// Stop and wait until no further event can reach the store
    pub async fn shutdown(&mut self) {
        let subscription = self.subscription.take();
        if let Some(subscription) = &subscription {
            subscription.cancel();
        }
        self.stop();
        if let Some(subscription) = subscription {
            subscription.close().await;
        }
    }

    /// Empty the store regardless of the tracking state
    pub fn clear(&self) {
        self.store.send_modify(StatusStore::clear);
    }

    /// Current tracking state
    pub fn state(&self) -> TrackingState {
        self.status.borrow().state
    }

    /// Current snapshot of the store
    pub fn snapshot(&self) -> Snapshot {
        self.store.borrow().snapshot()
    }

    /// Store version (number of mutations so far)
    pub fn version(&self) -> u64 {
        self.store.borrow().version()
    }

    /// Every status, sorted by identifier
    pub fn all(&self) -> Vec<SignalStatus> {
        self.snapshot().all()
    }

    /// Statuses whose identifier starts with `prefix`
    pub fn by_prefix(&self, prefix: &str) -> Vec<SignalStatus> {
        self.snapshot().by_prefix(prefix)
    }

    /// Status of one identifier
    pub fn single(&self, signal_id: &str) -> Option<SignalStatus> {
        self.snapshot().single(signal_id)
    }

    /// Watcher for store and state changes
    pub fn watch(&self) -> StatusWatcher {
        StatusWatcher {
            store: self.store.subscribe(),
            status: self.status.subscribe(),
        }
    }

    /// Drive a digital output through the output command path
    ///
    /// The store only changes if the source later reports the new level.
    pub async fn set_output(&self, signal_id: &SignalId, value: bool) -> Result<()> {
        if !signal_id.as_str().starts_with(DIGITAL_OUTPUT_PREFIX) {
            return Err(TrackerError::NotDigitalOutput(signal_id.clone()));
        }
        let commands = self
            .commands
            .as_ref()
            .ok_or_else(|| TrackerError::Command("no output command path configured".to_string()))?;

        log::debug!("Setting {} to {} via {}", signal_id, value, self.selectors);
        commands.set_value(&self.selectors, signal_id, value).await
    }
}

impl Drop for SignalTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Consumer task: applies every delivered event until cancelled or the stream ends
async fn consume(
    mut stream: SignalStream,
    store: Arc<watch::Sender<StatusStore>>,
    status: Arc<watch::Sender<TrackerStatus>>,
    cancel: CancellationToken,
    generation: u64,
) {
    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            item = stream.next() => item,
        };

        match item {
            Some(Ok(event)) => {
                if cancel.is_cancelled() {
                    return;
                }
                // Checked again under the store lock so a restart's reset wins
                store.send_if_modified(|store| !cancel.is_cancelled() && store.apply(&event).is_accepted());
            }
            Some(Err(e)) => {
                log::error!("Signal stream fault on subscription {}: {}", generation, e);
                break;
            }
            None => {
                log::warn!("Signal stream completed on subscription {}", generation);
                break;
            }
        }
    }

    // A newer subscription owns the state once it has started
    status.send_if_modified(|status| {
        if status.generation == generation && status.state == TrackingState::Tracking {
            status.state = TrackingState::Stopped;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SimulatedIo;

    #[test]
    fn test_new_tracker_is_idle_and_empty() {
        let tracker = SignalTracker::new(Arc::new(SimulatedIo::new()));
        assert_eq!(tracker.state(), TrackingState::Idle);
        assert!(tracker.all().is_empty());
        assert_eq!(tracker.version(), 0);
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let mut tracker = SignalTracker::new(Arc::new(SimulatedIo::new()));
        tracker.stop();
        assert_eq!(tracker.state(), TrackingState::Stopped);
        tracker.stop();
        assert_eq!(tracker.state(), TrackingState::Stopped);
    }

    #[tokio::test]
    async fn test_set_output_requires_digital_output() {
        let io = Arc::new(SimulatedIo::new());
        let tracker = SignalTracker::new(io.clone()).with_output(io.clone());

        let result = tracker.set_output(&SignalId::from("DI 0"), true).await;
        assert!(matches!(result, Err(TrackerError::NotDigitalOutput(_))));
        assert!(io.writes().is_empty());

        tracker.set_output(&SignalId::from("DO 0"), true).await.unwrap();
        assert_eq!(io.writes(), vec![(SignalId::from("DO 0"), true)]);
    }

    #[tokio::test]
    async fn test_set_output_without_command_path() {
        let tracker = SignalTracker::new(Arc::new(SimulatedIo::new()));
        let result = tracker.set_output(&SignalId::from("DO 0"), true).await;
        assert!(matches!(result, Err(TrackerError::Command(_))));
    }
}
