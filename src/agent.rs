//! Agent identity.
//!
//! An agent is identified by an opaque string supplied by the caller.
//! The chain and the tracking phase each receive their own identifier;
//! nothing in the system requires them to match.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque identifier for the agent being tracked.
///
/// Always non-empty: construction fails fast on an empty or
/// whitespace-only string rather than letting a blank identity
/// propagate into the tracking phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Create an agent identifier, rejecting empty input.
    pub fn new(id: &str) -> Result<Self> {
        if id.trim().is_empty() {
            return Err(Error::MissingAgentId);
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
