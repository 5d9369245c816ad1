//! Mission chain orchestration.
//!
//! The `MissionChain` builds the four preparation chores as work requests,
//! submits them to the queue as one strict chain, and watches each
//! request's state stream. When a chore finishes it emits a
//! [`ChainEvent::ChoreFinished`] with that chore's fixed notice; when the
//! final (suit-up) chore finishes it additionally emits
//! [`ChainEvent::ChainComplete`], the handoff point for the tracking phase.
//!
//! The orchestrator does no ordering of its own and handles no failures:
//! chain order is the queue's contract, and a failed chore surfaces as
//! `Finished` just like a successful one.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::sclog_debug;
use crate::work::{Chore, Constraints, NetworkType, WorkData, WorkId, WorkQueue, WorkRequest};

/// Events emitted as the chore chain progresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ChainEvent {
    /// A chore reached its terminal state.
    ChoreFinished {
        /// The chore that finished.
        chore: Chore,
        /// The fixed user-facing notice for this chore.
        message: String,
    },
    /// The final chore finished; the tracking phase may start.
    ChainComplete,
}

/// Build the work request for one chore.
///
/// Every chore gets the same network-connected constraint and carries the
/// agent identifier under its own input key. Pure construction, no
/// failure mode.
pub fn build_request(chore: Chore, agent_id: &str) -> WorkRequest {
    let constraints = Constraints::builder()
        .required_network(NetworkType::Connected)
        .build();
    let input = WorkData::builder()
        .put_string(chore.input_key(), agent_id)
        .build();
    WorkRequest::new(chore, constraints, input)
}

/// Orchestrates the four-chore preparation chain.
pub struct MissionChain {
    queue: Arc<WorkQueue>,
    events: mpsc::Sender<ChainEvent>,
}

impl MissionChain {
    /// Create an orchestrator over the given queue and event channel.
    pub fn new(queue: Arc<WorkQueue>, events: mpsc::Sender<ChainEvent>) -> Self {
        Self { queue, events }
    }

    /// Build and enqueue the chain, then observe every chore.
    ///
    /// Returns the work ids in chain order. One observer task is spawned
    /// per request; each waits on the request's state stream until
    /// `Finished` and then emits its event. Because the queue finishes
    /// chores at strictly increasing instants and the event channel
    /// preserves send order, events arrive in chain order.
    pub async fn dispatch(&self, agent_id: &str) -> Result<Vec<WorkId>> {
        let [stretching, grooming, litter_box, suit_up] =
            Chore::ALL.map(|chore| build_request(chore, agent_id));
        let ids = vec![stretching.id(), grooming.id(), litter_box.id(), suit_up.id()];

        sclog_debug!("dispatching mission chain for agent {}", agent_id);

        self.queue
            .begin_with(stretching)
            .then(grooming)
            .then(litter_box)
            .then(suit_up)
            .enqueue()
            .await?;

        for (&chore, &id) in Chore::ALL.iter().zip(ids.iter()) {
            self.observe(chore, id).await?;
        }

        Ok(ids)
    }

    /// Watch one request until it finishes, then emit its notice.
    ///
    /// State streams retain the latest value, so subscribing after the
    /// chain is enqueued cannot miss the terminal transition. The suit-up
    /// observer follows its notice with `ChainComplete`.
    async fn observe(&self, chore: Chore, id: WorkId) -> Result<()> {
        let mut stream = self.queue.state_stream(id).await?;
        let events = self.events.clone();
        tokio::spawn(async move {
            if stream.wait_for(|s| s.is_finished()).await.is_err() {
                return;
            }
            let finished = ChainEvent::ChoreFinished {
                chore,
                message: chore.completion_message().to_string(),
            };
            if events.send(finished).await.is_err() {
                return;
            }
            if chore == Chore::SuitUp {
                let _ = events.send(ChainEvent::ChainComplete).await;
            }
        });
        Ok(())
    }
}
