//! Route tracking phase.
//!
//! Once the mission chain completes, the `RouteTracker` runs the
//! countdown that simulates the agent's approach to its destination. A
//! run holds a foreground reservation for its whole duration, updates the
//! status display once per second from 10 down to 0 inclusive, and then
//! publishes exactly one arrival event on the completion bus.
//!
//! The run is non-cancelable and always counts to zero; the only failure
//! is starting without an agent identifier, which aborts before anything
//! is reserved or published.

pub mod bus;
pub mod foreground;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::agent::AgentId;
use crate::error::{Error, Result};
use crate::sclog;

pub use bus::CompletionBus;
pub use foreground::{ForegroundHost, LogForeground, StatusHandle};

/// First countdown value; the run ticks from here down to 0 inclusive.
pub const COUNTDOWN_START: u8 = 10;

/// Cadence of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Status text shown while the reservation is acquired.
pub const DISPATCH_STATUS: &str = "Agent dispatched";

/// States of one tracking run, in order of occurrence.
///
/// `Done` is terminal; a new `start` call models a fresh run with its own
/// state channel. At most one run per process is the supported usage;
/// concurrent starts are not guarded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TrackingState {
    /// Run created, nothing started yet.
    Idle,
    /// Acquiring the foreground reservation.
    Reserving,
    /// Counting down; `remaining` seconds to destination.
    Counting { remaining: u8 },
    /// Countdown finished, publishing the arrival event.
    Publishing,
    /// Run complete. Terminal.
    Done,
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingState::Idle => write!(f, "idle"),
            TrackingState::Reserving => write!(f, "reserving"),
            TrackingState::Counting { remaining } => write!(f, "counting({})", remaining),
            TrackingState::Publishing => write!(f, "publishing"),
            TrackingState::Done => write!(f, "done"),
        }
    }
}

/// Handle to a spawned tracking run.
pub struct TrackingRun {
    state: watch::Receiver<TrackingState>,
    handle: JoinHandle<()>,
}

impl TrackingRun {
    /// Subscribe to the run's state transitions.
    pub fn state(&self) -> watch::Receiver<TrackingState> {
        self.state.clone()
    }

    /// Wait for the run to finish.
    pub async fn join(self) -> Result<()> {
        self.handle
            .await
            .map_err(|e| Error::TaskJoin(e.to_string()))
    }
}

/// Runs the countdown phase on its own worker task.
pub struct RouteTracker {
    foreground: Arc<dyn ForegroundHost>,
    bus: CompletionBus,
}

impl RouteTracker {
    /// Create a tracker over the given foreground host and completion bus.
    pub fn new(foreground: Arc<dyn ForegroundHost>, bus: CompletionBus) -> Self {
        Self { foreground, bus }
    }

    /// Start a tracking run for the given agent.
    ///
    /// Fails fast with [`Error::MissingAgentId`] on an empty identifier:
    /// nothing is spawned, reserved, or published. Otherwise the run
    /// executes on its own tokio task, never on the caller's.
    pub fn start(&self, agent_id: &str) -> Result<TrackingRun> {
        let agent = AgentId::new(agent_id)?;
        let (state_tx, state_rx) = watch::channel(TrackingState::Idle);
        let foreground = Arc::clone(&self.foreground);
        let bus = self.bus.clone();

        sclog!("tracking started for agent {}", agent);
        let handle = tokio::spawn(run_countdown(agent, foreground, bus, state_tx));

        Ok(TrackingRun {
            state: state_rx,
            handle,
        })
    }
}

/// Execute one full run: reserve, count down, release, publish.
///
/// Ticks fire at monotonic absolute deadlines (`start + n` seconds)
/// rather than after cumulative sleeps, so the cadence does not drift
/// while the observable contract stays 11 ticks, one per second, from 10
/// down to 0.
async fn run_countdown(
    agent: AgentId,
    foreground: Arc<dyn ForegroundHost>,
    bus: CompletionBus,
    state_tx: watch::Sender<TrackingState>,
) {
    state_tx.send_replace(TrackingState::Reserving);
    let mut status = foreground.reserve(DISPATCH_STATUS);

    let started = Instant::now();
    for remaining in (0..=COUNTDOWN_START).rev() {
        let tick = u32::from(COUNTDOWN_START - remaining) + 1;
        tokio::time::sleep_until(started + TICK_INTERVAL * tick).await;
        status.update(&format!("{} seconds to destination", remaining));
        state_tx.send_replace(TrackingState::Counting { remaining });
    }

    state_tx.send_replace(TrackingState::Publishing);
    status.release();
    bus.publish(agent.clone());
    state_tx.send_replace(TrackingState::Done);
    sclog!("tracking complete for agent {}", agent);
}
