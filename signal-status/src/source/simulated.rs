//! In-process simulated I/O controller
//!
//! [`SimulatedIo`] is both a [`SignalSource`] and an [`OutputCommandPath`].
//! Events, faults and completion are injected through a [`SimulatedFeed`];
//! output writes are recorded and looped back to the active subscriber as
//! boolean events, the way a controller reports the new output level.

use super::{OutputCommandPath, SignalSource, SignalStream};
use crate::config::SourceSelectors;
use crate::types::{Result, SignalEvent, SignalId, TrackerError};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

type EventSender = mpsc::UnboundedSender<Result<SignalEvent>>;

#[derive(Debug, Default)]
struct Shared {
    subscriber: Option<EventSender>,
    subscriptions: Vec<SourceSelectors>,
    writes: Vec<(SignalId, bool)>,
    reject_writes: bool,
    fail_next_subscribe: bool,
}

/// Simulated controller; clones share the same state
#[derive(Debug, Clone, Default)]
pub struct SimulatedIo {
    shared: Arc<Mutex<Shared>>,
}

/// Handle for injecting events into the active subscription
#[derive(Debug, Clone)]
pub struct SimulatedFeed {
    shared: Arc<Mutex<Shared>>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed handle for this controller
    pub fn feed(&self) -> SimulatedFeed {
        SimulatedFeed {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Selectors of every subscribe call so far
    pub fn subscriptions(&self) -> Vec<SourceSelectors> {
        lock(&self.shared).subscriptions.clone()
    }

    /// Acknowledged output writes, in order
    pub fn writes(&self) -> Vec<(SignalId, bool)> {
        lock(&self.shared).writes.clone()
    }

    /// Make subsequent output writes fail
    pub fn reject_writes(&self, reject: bool) {
        lock(&self.shared).reject_writes = reject;
    }

    /// Make the next subscribe call fail
    pub fn fail_next_subscribe(&self) {
        lock(&self.shared).fail_next_subscribe = true;
    }
}

impl SimulatedFeed {
    /// Deliver an event; returns false if nobody is subscribed
    pub fn push(&self, event: SignalEvent) -> bool {
        deliver(&self.shared, Ok(event))
    }

    /// Deliver a stream fault
    pub fn fail(&self, message: impl Into<String>) -> bool {
        deliver(&self.shared, Err(TrackerError::Stream(message.into())))
    }

    /// End the active stream
    pub fn complete(&self) {
        lock(&self.shared).subscriber = None;
    }

    /// True while a subscriber is attached and still listening
    pub fn is_subscribed(&self) -> bool {
        lock(&self.shared)
            .subscriber
            .as_ref()
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }
}

fn deliver(shared: &Mutex<Shared>, item: Result<SignalEvent>) -> bool {
    match &lock(shared).subscriber {
        Some(tx) => tx.send(item).is_ok(),
        None => false,
    }
}

#[async_trait]
impl SignalSource for SimulatedIo {
    async fn subscribe(&self, selectors: &SourceSelectors) -> Result<SignalStream> {
        let mut shared = lock(&self.shared);
        if shared.fail_next_subscribe {
            shared.fail_next_subscribe = false;
            return Err(TrackerError::Subscribe(format!("{} unavailable", selectors)));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        // Replacing the sender ends any previous stream
        shared.subscriber = Some(tx);
        shared.subscriptions.push(selectors.clone());
        log::debug!("Simulated source subscribed for {}", selectors);

        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

#[async_trait]
impl OutputCommandPath for SimulatedIo {
    async fn set_value(&self, selectors: &SourceSelectors, signal_id: &SignalId, value: bool) -> Result<()> {
        let mut shared = lock(&self.shared);
        if shared.reject_writes {
            return Err(TrackerError::Command(format!("{} rejected write to {}", selectors, signal_id)));
        }

        shared.writes.push((signal_id.clone(), value));
        if let Some(tx) = &shared.subscriber {
            let _ = tx.send(Ok(SignalEvent::boolean(signal_id.clone(), value)));
        }
        Ok(())
    }
}
