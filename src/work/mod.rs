//! Work request model for the mission chore chain.
//!
//! A [`WorkRequest`] is the atomic unit handed to the [`queue::WorkQueue`]:
//! a named chore plus its execution constraints and key/value input
//! payload. Requests are built once at orchestration start, are immutable,
//! and are consumed by the queue when the chain is enqueued.

pub mod queue;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub use queue::{WorkContinuation, WorkQueue};

/// Unique identifier for a work request.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(pub Uuid);

impl WorkId {
    /// Create a new unique work identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for WorkId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four mission preparation chores, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chore {
    /// Chore 1: limber up before the mission.
    Stretching,
    /// Chore 2: groom the fur to field standard.
    FurGrooming,
    /// Chore 3: a last visit to the litter box.
    LitterBoxSitting,
    /// Chore 4: put on the suit. Last chore before tracking begins.
    SuitUp,
}

impl Chore {
    /// All chores in their required chain order.
    pub const ALL: [Chore; 4] = [
        Chore::Stretching,
        Chore::FurGrooming,
        Chore::LitterBoxSitting,
        Chore::SuitUp,
    ];

    /// Payload key under which this chore expects the agent identifier.
    pub fn input_key(&self) -> &'static str {
        match self {
            Chore::Stretching => "stretching_agent_id",
            Chore::FurGrooming => "fur_grooming_agent_id",
            Chore::LitterBoxSitting => "litter_box_agent_id",
            Chore::SuitUp => "suit_up_agent_id",
        }
    }

    /// Notice shown to the user when this chore finishes.
    pub fn completion_message(&self) -> &'static str {
        match self {
            Chore::Stretching => "Agent done stretching",
            Chore::FurGrooming => "Agent done grooming its fur",
            Chore::LitterBoxSitting => "Agent done with the litter box",
            Chore::SuitUp => "Agent done suiting up. Ready to go!",
        }
    }
}

impl std::fmt::Display for Chore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chore::Stretching => write!(f, "stretching"),
            Chore::FurGrooming => write!(f, "fur_grooming"),
            Chore::LitterBoxSitting => write!(f, "litter_box_sitting"),
            Chore::SuitUp => write!(f, "suit_up"),
        }
    }
}

/// String key/value input payload for a work request.
///
/// Built once, read by the executing chore. Reads return exactly what
/// was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkData {
    values: HashMap<String, String>,
}

impl WorkData {
    pub fn builder() -> WorkDataBuilder {
        WorkDataBuilder::default()
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for [`WorkData`].
#[derive(Debug, Default)]
pub struct WorkDataBuilder {
    values: HashMap<String, String>,
}

impl WorkDataBuilder {
    pub fn put_string(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> WorkData {
        WorkData {
            values: self.values,
        }
    }
}

/// Network requirement for a work request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// The request may run regardless of connectivity.
    #[default]
    NotRequired,
    /// The request may only start while the network is available.
    Connected,
}

/// Execution preconditions attached to a work request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    pub network: NetworkType,
}

impl Constraints {
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::default()
    }
}

/// Builder for [`Constraints`].
#[derive(Debug, Default)]
pub struct ConstraintsBuilder {
    network: NetworkType,
}

impl ConstraintsBuilder {
    pub fn required_network(mut self, network: NetworkType) -> Self {
        self.network = network;
        self
    }

    pub fn build(self) -> Constraints {
        Constraints {
            network: self.network,
        }
    }
}

/// States a work request moves through on the queue.
///
/// `Finished` is terminal and carries no outcome: a chore that could not
/// do its work is indistinguishable from one that succeeded. This is a
/// known limitation of the design, kept deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkState {
    /// Accepted by the queue, waiting on chain order and constraints.
    Queued,
    /// Currently executing.
    Running,
    /// Terminal. Success and failure are not distinguished.
    Finished,
}

impl WorkState {
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkState::Finished)
    }
}

impl std::fmt::Display for WorkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkState::Queued => write!(f, "queued"),
            WorkState::Running => write!(f, "running"),
            WorkState::Finished => write!(f, "finished"),
        }
    }
}

/// An immutable descriptor for one chained chore.
#[derive(Debug, Clone)]
pub struct WorkRequest {
    id: WorkId,
    chore: Chore,
    constraints: Constraints,
    input: WorkData,
}

impl WorkRequest {
    /// Build a request for the given chore.
    pub fn new(chore: Chore, constraints: Constraints, input: WorkData) -> Self {
        Self {
            id: WorkId::new(),
            chore,
            constraints,
            input,
        }
    }

    pub fn id(&self) -> WorkId {
        self.id
    }

    pub fn chore(&self) -> Chore {
        self.chore
    }

    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn input(&self) -> &WorkData {
        &self.input
    }
}
