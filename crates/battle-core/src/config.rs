//! Per-session configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::CLOSE_DELAY_MS;
use crate::error::BattleError;
use crate::types::VoteTally;

/// Configuration for starting a voting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between commit and the close signal.
    pub close_delay_ms: u64,
    /// Tally to start from. `None` uses the 45/55 default.
    pub starting_tally: Option<VoteTally>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: CLOSE_DELAY_MS,
            starting_tally: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BattleError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject a starting tally that could overflow on the session's vote.
    pub fn validate(&self) -> Result<(), BattleError> {
        self.starting_tally().ensure_headroom()
    }

    pub fn load_from_file(path: &Path) -> Result<Self, BattleError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn starting_tally(&self) -> VoteTally {
        self.starting_tally.unwrap_or_default()
    }
}
