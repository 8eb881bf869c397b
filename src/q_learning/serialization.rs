//! Serialization support for Q-learning agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    env::Observation,
    error::Error,
    q_learning::{agent::QLearningAgent, config::AgentConfig},
};

/// Bookkeeping stored alongside a saved table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes the table has been trained for, across resumed runs
    pub episodes: usize,
    /// Time of saving, RFC 3339
    pub saved_at: Option<String>,
}

impl TrainingMetadata {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            saved_at: None,
        }
    }

    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.saved_at = Some(at.to_rfc3339());
        self
    }
}

/// Versioned on-disk form of a trained agent.
///
/// Entries are kept as a sorted list of pairs rather than a map so the
/// encoding is deterministic and does not depend on map-key support of the
/// output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub config: AgentConfig,
    pub epsilon: f64,
    pub entries: Vec<(Observation, Vec<f64>)>,
    pub metadata: TrainingMetadata,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: TrainingMetadata) -> Self {
        let mut entries: Vec<_> = agent
            .q_values()
            .iter()
            .map(|(obs, values)| (*obs, values.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        Self {
            version: Self::VERSION,
            config: agent.config().clone(),
            epsilon: agent.epsilon(),
            entries,
            metadata,
        }
    }

    /// Rebuild an agent with the saved table and hyperparameters.
    ///
    /// Exploration starts again from the config's `initial_epsilon`; the
    /// saved `epsilon` is a record of where the last run ended.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedVersion` for a different format version, and the
    /// agent construction errors for a bad config or vector length.
    pub fn to_agent(&self) -> Result<QLearningAgent> {
        self.to_agent_with_config(self.config.clone())
    }

    /// Rebuild an agent with the saved table but fresh hyperparameters, for
    /// resuming training with a new schedule.
    ///
    /// # Errors
    ///
    /// Same as [`SavedQTable::to_agent`].
    pub fn to_agent_with_config(&self, config: AgentConfig) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let table = self.entries.iter().cloned().collect();
        QLearningAgent::with_table(config, table)
    }

    /// Number of observations in the saved table
    pub fn table_size(&self) -> usize {
        self.entries.len()
    }
}
