//! Configuration files for CLI commands

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    analysis::DEFAULT_ROLLING_LENGTH,
    pipeline::TrainingConfig,
    q_learning::AgentConfig,
};

/// Contents of a `--config` JSON file for `ttt train`.
///
/// Every section is optional. A missing `agent` section falls back to
/// [`AgentConfig::for_episodes`] for the configured episode count.
///
/// ```json
/// {
///   "agent": {
///     "learning_rate": 0.1,
///     "initial_epsilon": 1.0,
///     "epsilon_decay": 0.0003,
///     "final_epsilon": 0.1,
///     "discount_factor": 0.95,
///     "seed": 7
///   },
///   "training": { "episodes": 5000, "max_episode_steps": 50, "tracked_player": "X" },
///   "rolling_length": 500
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainFileConfig {
    #[serde(default)]
    pub agent: Option<AgentConfig>,

    #[serde(default)]
    pub training: Option<TrainingConfig>,

    /// Window for learning-curve moving averages
    #[serde(default)]
    pub rolling_length: Option<usize>,
}

impl TrainFileConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Io {
            operation: format!("write config {}", path.display()),
            source,
        })
    }

    pub fn training_or_default(&self) -> TrainingConfig {
        self.training.clone().unwrap_or_default()
    }

    pub fn agent_or_schedule(&self, episodes: usize) -> AgentConfig {
        self.agent
            .clone()
            .unwrap_or_else(|| AgentConfig::for_episodes(episodes))
    }

    pub fn rolling_length_or_default(&self) -> usize {
        self.rolling_length.unwrap_or(DEFAULT_ROLLING_LENGTH)
    }
}
