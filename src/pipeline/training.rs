//! Self-play training loop

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    env::{DRAW_REWARD, TicTacToeEnv, WIN_REWARD},
    ports::{EpisodeSummary, Observer},
    q_learning::QLearningAgent,
    tictactoe::Player,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of self-play episodes
    pub episodes: usize,

    /// Steps after which an unfinished episode is truncated.
    /// Illegal moves count as steps.
    pub max_episode_steps: usize,

    /// Mark whose wins and losses are tallied
    pub tracked_player: Player,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            max_episode_steps: 50,
            tracked_player: Player::X,
        }
    }
}

impl TrainingConfig {
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `max_episode_steps` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_episode_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_episode_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes played
    pub episodes: usize,

    /// Episodes the tracked mark won
    pub wins: usize,

    /// Episodes where the tracked mark received a -1 reward
    pub losses: usize,

    /// Episodes ending in a draw
    pub draws: usize,

    /// Episodes cut off by the step limit
    pub truncated: usize,

    /// Exploration rate at the end of the run
    pub final_epsilon: f64,

    /// Observations stored in the Q-table at the end of the run
    pub table_size: usize,

    /// Sum of rewards per episode
    pub episode_returns: Vec<f64>,

    /// Steps per episode
    pub episode_lengths: Vec<usize>,
}

impl TrainingResult {
    fn rate(&self, count: usize) -> f64 {
        if self.episodes > 0 {
            count as f64 / self.episodes as f64
        } else {
            0.0
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Runs one agent against itself in a [`TicTacToeEnv`].
///
/// Each episode resets the environment, lets the agent choose every move for
/// both marks, feeds each transition back through
/// [`QLearningAgent::update`], and decays epsilon once at the end.
pub struct SelfPlayTrainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl SelfPlayTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the configured number of episodes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero step limit and propagates
    /// observer errors; the environment and agent never fail for actions
    /// drawn from the agent's own action space.
    pub fn train(
        &mut self,
        env: &mut TicTacToeEnv,
        agent: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        let total = self.config.episodes;
        info!(
            episodes = total,
            epsilon = agent.epsilon(),
            "starting self-play training"
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let mut result = TrainingResult {
            episodes: total,
            wins: 0,
            losses: 0,
            draws: 0,
            truncated: 0,
            final_epsilon: agent.epsilon(),
            table_size: agent.q_table_size(),
            episode_returns: Vec::with_capacity(total),
            episode_lengths: Vec::with_capacity(total),
        };

        // Tallies follow the acting mark, which flips after every step,
        // legal or not, and keeps flipping across episode boundaries.
        let mut acting = Player::X;

        for episode in 0..total {
            let (mut obs, _) = env.reset();
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let mut total_reward = 0.0;
            let mut length = 0;

            let truncated = loop {
                let mover = env.current_player();
                let action = agent.get_action(&obs);
                let mut step = env.step(action)?;
                length += 1;
                if !step.terminated && length >= self.config.max_episode_steps {
                    step.truncated = true;
                }

                if acting == self.config.tracked_player && step.reward == WIN_REWARD {
                    result.wins += 1;
                } else if acting == self.config.tracked_player && step.reward == -WIN_REWARD {
                    result.losses += 1;
                } else if step.reward == DRAW_REWARD {
                    result.draws += 1;
                }
                acting = acting.opponent();

                agent.update(
                    &obs,
                    action,
                    step.reward,
                    step.terminated,
                    &step.observation,
                )?;
                total_reward += step.reward;

                for observer in &mut self.observers {
                    observer.on_step(episode, length - 1, mover, action, &step)?;
                }

                obs = step.observation;
                if step.terminated || step.truncated {
                    break step.truncated;
                }
            };

            agent.decay_epsilon();
            if truncated {
                result.truncated += 1;
                debug!(episode, length, "episode truncated");
            }

            result.episode_returns.push(total_reward);
            result.episode_lengths.push(length);

            let summary = EpisodeSummary {
                episode,
                total_reward,
                length,
                outcome: env.outcome(),
                truncated,
                epsilon: agent.epsilon(),
            };
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        result.final_epsilon = agent.epsilon();
        result.table_size = agent.q_table_size();
        info!(
            wins = result.wins,
            losses = result.losses,
            draws = result.draws,
            truncated = result.truncated,
            table_size = result.table_size,
            "training finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::AgentConfig;

    fn run(episodes: usize, seed: u64) -> (TrainingResult, QLearningAgent) {
        let mut env = TicTacToeEnv::new();
        let mut agent =
            QLearningAgent::new(AgentConfig::for_episodes(episodes).with_seed(seed)).unwrap();
        let mut trainer = SelfPlayTrainer::new(TrainingConfig {
            episodes,
            ..TrainingConfig::default()
        });
        let result = trainer.train(&mut env, &mut agent).unwrap();
        (result, agent)
    }

    #[test]
    fn test_records_one_entry_per_episode() {
        let (result, agent) = run(30, 1);
        assert_eq!(result.episode_returns.len(), 30);
        assert_eq!(result.episode_lengths.len(), 30);
        assert!(result.episode_lengths.iter().all(|&l| (1..=50).contains(&l)));
        assert_eq!(result.final_epsilon, agent.epsilon());
        assert_eq!(
            agent.training_error().len(),
            result.episode_lengths.iter().sum::<usize>()
        );
    }

    #[test]
    fn test_epsilon_decays_once_per_episode() {
        let episodes = 30;
        let (_, agent) = run(episodes, 2);
        let config = AgentConfig::for_episodes(episodes);
        let expected = (config.initial_epsilon - config.epsilon_decay * episodes as f64)
            .max(config.final_epsilon);
        assert!((agent.epsilon() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_result() {
        let (a, _) = run(20, 9);
        let (b, _) = run(20, 9);
        assert_eq!(a, b);
    }

    #[test]
    fn test_outcomes_never_exceed_episodes() {
        let (result, _) = run(40, 4);
        assert!(result.wins + result.draws + result.losses <= 40);
        assert_eq!(result.losses, 0);
    }

    #[test]
    fn test_step_limit_truncates() {
        let mut env = TicTacToeEnv::new();
        let mut agent = QLearningAgent::new(AgentConfig::new(0.1, 1.0, 0.0, 1.0).with_seed(5))
            .unwrap();
        let mut trainer = SelfPlayTrainer::new(TrainingConfig {
            episodes: 10,
            max_episode_steps: 2,
            tracked_player: Player::X,
        });

        let result = trainer.train(&mut env, &mut agent).unwrap();
        // no game can finish in two placements
        assert_eq!(result.truncated, 10);
        assert!(result.episode_lengths.iter().all(|&l| l == 2));
    }

    #[test]
    fn test_zero_step_limit_rejected() {
        let config = TrainingConfig {
            max_episode_steps: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));

        let mut env = TicTacToeEnv::new();
        let mut agent = QLearningAgent::new(AgentConfig::for_episodes(5).with_seed(1)).unwrap();
        let result = SelfPlayTrainer::new(config).train(&mut env, &mut agent);
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
        assert!(agent.training_error().is_empty());
        assert!(TrainingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rates() {
        let result = TrainingResult {
            episodes: 4,
            wins: 2,
            losses: 0,
            draws: 1,
            truncated: 0,
            final_epsilon: 0.1,
            table_size: 0,
            episode_returns: vec![],
            episode_lengths: vec![],
        };
        assert_eq!(result.win_rate(), 0.5);
        assert_eq!(result.draw_rate(), 0.25);
        assert_eq!(result.loss_rate(), 0.0);
    }
}
