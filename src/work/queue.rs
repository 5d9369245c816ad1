//! In-process work queue with strict chain semantics.
//!
//! The `WorkQueue` stands in for the host's scheduling service. It accepts
//! an ordered chain of [`WorkRequest`]s via the
//! `begin_with(..).then(..).enqueue()` API and executes them strictly in
//! sequence on one driver task: request *i+1* never starts before request
//! *i* has reached `Finished`. Each request's lifecycle is published on a
//! `watch` channel obtainable through [`WorkQueue::state_stream`].
//!
//! Requests whose constraints require connectivity are gated on the
//! queue's connectivity probe before starting. There is no retry, no
//! cancellation, and no persistence; `Finished` does not distinguish
//! success from failure.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};

use crate::error::{Error, Result};
use crate::work::{NetworkType, WorkId, WorkRequest, WorkState};
use crate::{sclog_debug, sclog_warn};

/// Simulated duration of one chore.
pub const CHORE_DURATION: Duration = Duration::from_secs(3);

/// Sequential work scheduler with per-request state streams.
pub struct WorkQueue {
    /// Connectivity probe consulted before starting gated requests.
    connectivity: watch::Receiver<bool>,
    /// Keeps the default always-connected probe alive.
    _local_connectivity: Option<watch::Sender<bool>>,
    /// State streams for every request accepted onto the queue.
    streams: RwLock<HashMap<WorkId, watch::Receiver<WorkState>>>,
}

impl WorkQueue {
    /// Create a queue whose connectivity probe always reports connected.
    pub fn new() -> Arc<Self> {
        let (tx, rx) = watch::channel(true);
        Arc::new(Self {
            connectivity: rx,
            _local_connectivity: Some(tx),
            streams: RwLock::new(HashMap::new()),
        })
    }

    /// Create a queue gated on an external connectivity probe.
    ///
    /// Requests requiring [`NetworkType::Connected`] wait until the probe
    /// reports `true` before starting.
    pub fn with_connectivity(connectivity: watch::Receiver<bool>) -> Arc<Self> {
        Arc::new(Self {
            connectivity,
            _local_connectivity: None,
            streams: RwLock::new(HashMap::new()),
        })
    }

    /// Start building a chain with its first request.
    pub fn begin_with(&self, request: WorkRequest) -> WorkContinuation<'_> {
        WorkContinuation {
            queue: self,
            requests: vec![request],
        }
    }

    /// Subscribe to the state stream of an accepted request.
    ///
    /// The stream holds the latest state, so a subscriber that arrives
    /// after a transition still observes the current state. Unknown ids
    /// are an error.
    pub async fn state_stream(&self, id: WorkId) -> Result<watch::Receiver<WorkState>> {
        self.streams
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::WorkNotFound(id))
    }
}

/// An ordered chain of requests being assembled for the queue.
pub struct WorkContinuation<'a> {
    queue: &'a WorkQueue,
    requests: Vec<WorkRequest>,
}

impl WorkContinuation<'_> {
    /// Append a request that must not start before the previous one finishes.
    pub fn then(mut self, request: WorkRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Hand the chain to the queue and start the driver task.
    ///
    /// Every request's state stream is registered (at `Queued`) before the
    /// driver starts, so `state_stream` never misses a request that was
    /// part of an enqueued chain.
    pub async fn enqueue(self) -> Result<()> {
        let mut chain = Vec::with_capacity(self.requests.len());
        {
            let mut streams = self.queue.streams.write().await;
            for request in self.requests {
                let (tx, rx) = watch::channel(WorkState::Queued);
                streams.insert(request.id(), rx);
                chain.push((request, tx));
            }
        }

        sclog_debug!("enqueueing chain of {} request(s)", chain.len());
        tokio::spawn(run_chain(self.queue.connectivity.clone(), chain));
        Ok(())
    }
}

/// Drive one chain to completion, strictly in order.
async fn run_chain(
    connectivity: watch::Receiver<bool>,
    chain: Vec<(WorkRequest, watch::Sender<WorkState>)>,
) {
    for (request, state_tx) in chain {
        if request.constraints().network == NetworkType::Connected {
            let mut probe = connectivity.clone();
            if probe.wait_for(|connected| *connected).await.is_err() {
                sclog_warn!(
                    "connectivity probe dropped while {} was queued; abandoning chain",
                    request.chore()
                );
                return;
            }
        }

        state_tx.send_replace(WorkState::Running);
        execute(&request).await;
        state_tx.send_replace(WorkState::Finished);
    }
}

/// Simulate one chore.
///
/// A missing agent-id payload is logged but still ends in `Finished`:
/// the queue exposes no outcome distinction.
async fn execute(request: &WorkRequest) {
    let chore = request.chore();
    match request.input().get_string(chore.input_key()) {
        Some(agent_id) => {
            sclog_debug!(
                "{} started for agent {} (request {})",
                chore,
                agent_id,
                request.id().short()
            );
        }
        None => {
            sclog_warn!(
                "{} has no agent id under key '{}' (request {})",
                chore,
                chore.input_key(),
                request.id().short()
            );
        }
    }
    tokio::time::sleep(CHORE_DURATION).await;
    sclog_debug!("{} finished (request {})", chore, request.id().short());
}
