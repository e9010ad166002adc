//! Shared engine state
//!
//! Holds the event broadcaster shared between the playback engine and the
//! volume store, constructed once and passed by reference to all callers.

use soundbed_common::events::AudioEvent;
use tokio::sync::broadcast;

/// Shared state accessible by all engine components
pub struct SharedState {
    /// Event broadcaster for engine observers
    pub event_tx: broadcast::Sender<AudioEvent>,
}

impl SharedState {
    /// Create new shared state with default values
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self { event_tx }
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: AudioEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<AudioEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
