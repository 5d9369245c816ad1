//! Completion event bus.
//!
//! Single-value publish/subscribe channel for tracking arrivals. The bus
//! is passed explicitly to the tracker and to any consumer; it is never
//! ambient global state. Discipline: exactly one writer (the tracking
//! run) and arbitrarily many readers. Each publish delivers the whole
//! value to every subscriber registered at that moment; late subscribers
//! get no replay.
//!
//! UI-facing consumers receive on their own task (typically the binary's
//! main task), which keeps observer callbacks off the tracking worker.

use tokio::sync::broadcast;

use crate::agent::AgentId;
use crate::sclog_debug;

const BUS_CAPACITY: usize = 16;

/// Broadcast channel carrying one arrival event per tracking run.
#[derive(Clone)]
pub struct CompletionBus {
    sender: broadcast::Sender<AgentId>,
}

impl CompletionBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Register a subscriber. Only events published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<AgentId> {
        self.sender.subscribe()
    }

    /// Publish one arrival to all current subscribers.
    ///
    /// Publishing with no subscribers is not an error; the event is
    /// simply dropped, matching no-replay semantics.
    pub fn publish(&self, agent_id: AgentId) {
        sclog_debug!("publishing completion for agent {}", agent_id);
        let _ = self.sender.send(agent_id);
    }
}

impl Default for CompletionBus {
    fn default() -> Self {
        Self::new()
    }
}
