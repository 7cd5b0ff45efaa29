//! Built-in simulated controller session
//!
//! Drives a [`SimulatedIo`] through a short, fixed sequence using the
//! conventional channel names, including events the tracker must reject.

use anyhow::Result;
use signal_status::{SignalEvent, SignalId, SignalTracker, SimulatedIo};

/// Events the simulated controller reports on its own
pub fn session_events() -> Vec<SignalEvent> {
    vec![
        SignalEvent::boolean("DI 0", true),
        SignalEvent::boolean("DI 1", false),
        SignalEvent::domain("AI 0", "CURRENT"),
        SignalEvent::float("AI 0", 4.2),
        // Rejected: AI 0 already holds a float
        SignalEvent::domain("AI 0", "VOLTAGE"),
        SignalEvent::domain("AI 1", "VOLTAGE"),
        SignalEvent::float("AI 1", 10.0),
        // Rejected: digital channels are boolean-only
        SignalEvent::float("DO 0", 3.3),
    ]
}

/// Feed the session into an already started tracker, then end the stream
pub async fn run_session(io: &SimulatedIo, tracker: &SignalTracker) -> Result<()> {
    let feed = io.feed();
    for event in session_events() {
        if !feed.push(event) {
            log::warn!("Simulated controller has no subscriber, session aborted");
            return Ok(());
        }
    }

    // Output writes come back as boolean events
    tracker.set_output(&SignalId::from("DO 0"), true).await?;
    tracker.set_output(&SignalId::from("DO 1"), false).await?;

    feed.complete();
    Ok(())
}
