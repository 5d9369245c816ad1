pub mod agent;
pub mod chain;
pub mod config;
pub mod error;
pub mod log;
pub mod tracking;
pub mod work;

pub use agent::AgentId;
pub use chain::{ChainEvent, MissionChain};
pub use error::{Error, Result};
pub use tracking::{CompletionBus, RouteTracker, TrackingState};
pub use work::{Chore, WorkQueue, WorkState};
