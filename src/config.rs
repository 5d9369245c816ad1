use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{sclog_debug, Error, Result};

/// The identifier the mission chain dispatches with when none is configured.
pub const DEFAULT_AGENT_ID: &str = "CatAgent1";

/// The identifier the tracking phase starts with when none is configured.
///
/// Deliberately a different literal than [`DEFAULT_AGENT_ID`]: the chain
/// and the tracking phase have always used independent identities, and
/// that behavior is preserved rather than unified.
pub const DEFAULT_TRACKING_ID: &str = "007";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub debug: bool,
    pub agent_id: Option<String>,
    pub tracking_agent_id: Option<String>,
}

impl Config {
    pub fn scatrack_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".scatrack"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::scatrack_dir()?.join("scatrack.toml"))
    }

    /// Identifier used for the chore chain's input payloads.
    pub fn effective_agent_id(&self) -> &str {
        self.agent_id.as_deref().unwrap_or(DEFAULT_AGENT_ID)
    }

    /// Identifier used when launching the tracking phase.
    pub fn effective_tracking_id(&self) -> &str {
        self.tracking_agent_id
            .as_deref()
            .unwrap_or(DEFAULT_TRACKING_ID)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        sclog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            sclog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        sclog_debug!(
            "Config loaded: debug={}, agent_id={:?}, tracking_agent_id={:?}",
            config.debug,
            config.agent_id,
            config.tracking_agent_id
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::scatrack_dir()?;
        if !dir.exists() {
            sclog_debug!("Creating scatrack directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        sclog_debug!("Config saved to {}", path.display());
        Ok(())
    }
}
