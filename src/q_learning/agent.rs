//! Tabular Q-learning agent
//!
//! The same agent chooses moves for both marks during self-play. It knows
//! nothing about the board beyond the size of the action space.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    Result,
    env::Observation,
    error::Error,
    q_learning::{config::AgentConfig, q_table::QTable},
    tictactoe::TOTAL_CELLS,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Selects actions epsilon-greedily over the full action space, breaking ties
/// between equally valued actions uniformly at random, and updates toward
/// `reward + γ · max_a Q(s', a)`.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: AgentConfig,
    epsilon: f64,
    training_error: Vec<f64>,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with an empty Q-table over the 9 board cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` fails validation.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_table(config, HashMap::new())
    }

    /// Create an agent whose Q-table starts from `table`, e.g. to resume
    /// training from a saved run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a bad config and
    /// `ActionSpaceMismatch` if a value vector does not have 9 entries.
    pub fn with_table(config: AgentConfig, table: HashMap<Observation, Vec<f64>>) -> Result<Self> {
        config.validate()?;
        let q_table = QTable::from_map(table, TOTAL_CELLS)?;

        Ok(Self {
            q_table,
            epsilon: config.initial_epsilon,
            rng: build_rng(config.seed),
            training_error: Vec::new(),
            config,
        })
    }

    /// Replace the random source, for deterministic tests
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// ε-greedy action selection.
    ///
    /// Exploration samples any cell, occupied or not; the environment
    /// penalises occupied cells instead of the agent filtering them.
    pub fn get_action(&mut self, obs: &Observation) -> usize {
        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            self.rng.random_range(0..self.q_table.action_space_size())
        } else {
            self.greedy_action(obs)
        }
    }

    /// Action with the highest value, ties broken uniformly at random
    pub fn greedy_action(&mut self, obs: &Observation) -> usize {
        let best_actions = self.q_table.greedy_actions(obs);
        best_actions.choose(&mut self.rng).copied().unwrap_or(0)
    }

    /// One-step Q-learning update
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The bootstrap term is dropped when `terminated` is true, so
    /// `next_obs` is ignored on terminal transitions. The TD error is
    /// appended to [`QLearningAgent::training_error`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidPosition` if `action` is outside the action space.
    pub fn update(
        &mut self,
        obs: &Observation,
        action: usize,
        reward: f64,
        terminated: bool,
        next_obs: &Observation,
    ) -> Result<()> {
        if action >= self.q_table.action_space_size() {
            return Err(Error::InvalidPosition { position: action });
        }

        let future_q = if terminated {
            0.0
        } else {
            self.q_table.max_value(next_obs)
        };
        let td_target = reward + self.config.discount_factor * future_q;

        let values = self.q_table.values_mut(obs);
        let td_error = td_target - values[action];
        values[action] += self.config.learning_rate * td_error;

        self.training_error.push(td_error);
        Ok(())
    }

    /// Linear decay with a floor at `final_epsilon`
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon - self.config.epsilon_decay).max(self.config.final_epsilon);
        trace!(epsilon = self.epsilon, "epsilon decayed");
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// TD errors of every update so far, oldest first
    pub fn training_error(&self) -> &[f64] {
        &self.training_error
    }

    /// Stored action values for `obs`, without creating an entry
    pub fn action_values(&self, obs: &Observation) -> Option<&[f64]> {
        self.q_table.get(obs)
    }

    /// The Q-table in its persisted shape
    pub fn q_values(&self) -> &HashMap<Observation, Vec<f64>> {
        self.q_table.as_map()
    }

    pub fn export_table(&self) -> HashMap<Observation, Vec<f64>> {
        self.q_table.as_map().clone()
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.size()
    }
}
