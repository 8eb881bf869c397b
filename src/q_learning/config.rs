//! Hyperparameters for the Q-learning agent

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// Discount factor used when none is given
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.95;

/// Configuration for creating a [`QLearningAgent`](super::QLearningAgent).
///
/// Values are checked by [`AgentConfig::validate`] when the agent is built;
/// out-of-range values are rejected, never clamped.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::q_learning::AgentConfig;
///
/// let config = AgentConfig::new(0.1, 1.0, 0.002, 0.1)
///     .with_discount_factor(0.9)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size α, in (0, 1]
    pub learning_rate: f64,
    /// Exploration rate at construction
    pub initial_epsilon: f64,
    /// Amount subtracted from epsilon per decay call
    pub epsilon_decay: f64,
    /// Floor for epsilon
    pub final_epsilon: f64,
    /// Discount γ, in [0, 1]
    #[serde(default = "default_discount_factor")]
    pub discount_factor: f64,
    /// Random seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_discount_factor() -> f64 {
    DEFAULT_DISCOUNT_FACTOR
}

impl AgentConfig {
    pub fn new(
        learning_rate: f64,
        initial_epsilon: f64,
        epsilon_decay: f64,
        final_epsilon: f64,
    ) -> Self {
        Self {
            learning_rate,
            initial_epsilon,
            epsilon_decay,
            final_epsilon,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            seed: None,
        }
    }

    /// Schedule used for a self-play run of `episodes` episodes: α = 0.1,
    /// epsilon from 1.0 down to 0.1, reaching the floor after two thirds of
    /// the run.
    pub fn for_episodes(episodes: usize) -> Self {
        Self::schedule(1.0, episodes)
    }

    /// Like [`AgentConfig::for_episodes`] but starting from `initial_epsilon`.
    /// The decay is `initial_epsilon / (episodes / 1.5)`.
    pub fn schedule(initial_epsilon: f64, episodes: usize) -> Self {
        let epsilon_decay = if episodes == 0 {
            0.0
        } else {
            initial_epsilon / (episodes as f64 / 1.5)
        };
        Self::new(0.1, initial_epsilon, epsilon_decay, 0.1)
    }

    /// Same hyperparameters with exploration switched off, for greedy play
    pub fn without_exploration(self) -> Self {
        Self {
            initial_epsilon: 0.0,
            epsilon_decay: 0.0,
            final_epsilon: 0.0,
            ..self
        }
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every hyperparameter against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return invalid(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            ));
        }
        for (name, value) in [
            ("initial_epsilon", self.initial_epsilon),
            ("final_epsilon", self.final_epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if self.final_epsilon > self.initial_epsilon {
            return invalid(format!(
                "final_epsilon ({}) must not exceed initial_epsilon ({})",
                self.final_epsilon, self.initial_epsilon
            ));
        }
        if !(self.epsilon_decay.is_finite() && self.epsilon_decay >= 0.0) {
            return invalid(format!(
                "epsilon_decay must be finite and non-negative, got {}",
                self.epsilon_decay
            ));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::for_episodes(500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_discount() {
        let config = AgentConfig::new(0.1, 1.0, 0.01, 0.1);
        assert_eq!(config.discount_factor, 0.95);
    }

    #[test]
    fn test_schedule_for_episodes() {
        let config = AgentConfig::for_episodes(300);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.initial_epsilon, 1.0);
        assert_eq!(config.final_epsilon, 0.1);
        assert!((config.epsilon_decay - 1.0 / 200.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_schedule_scales_decay_with_start() {
        let config = AgentConfig::schedule(0.5, 300);
        assert_eq!(config.initial_epsilon, 0.5);
        assert!((config.epsilon_decay - 0.0025).abs() < 1e-12);
        assert_eq!(AgentConfig::schedule(1.0, 300), AgentConfig::for_episodes(300));
    }

    #[test]
    fn test_without_exploration_keeps_other_settings() {
        let config = AgentConfig::for_episodes(300).with_seed(5).without_exploration();
        assert_eq!(config.initial_epsilon, 0.0);
        assert_eq!(config.epsilon_decay, 0.0);
        assert_eq!(config.final_epsilon, 0.0);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.seed, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_learning_rate() {
        for lr in [0.0, -0.5, f64::NAN, 1.5] {
            let config = AgentConfig::new(lr, 1.0, 0.01, 0.1);
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "learning rate {lr} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_out_of_range_epsilon() {
        assert!(AgentConfig::new(0.1, 1.2, 0.01, 0.1).validate().is_err());
        assert!(AgentConfig::new(0.1, 1.0, 0.01, -0.1).validate().is_err());
        assert!(AgentConfig::new(0.1, 0.2, 0.01, 0.5).validate().is_err());
        assert!(AgentConfig::new(0.1, 1.0, -0.01, 0.1).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_discount() {
        let config = AgentConfig::new(0.1, 1.0, 0.01, 0.1).with_discount_factor(1.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_discount_defaults_when_deserialized() {
        let json = r#"{"learning_rate":0.2,"initial_epsilon":0.5,"epsilon_decay":0.01,"final_epsilon":0.05}"#;
        let config: AgentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.discount_factor, DEFAULT_DISCOUNT_FACTOR);
        assert_eq!(config.seed, None);
    }
}
