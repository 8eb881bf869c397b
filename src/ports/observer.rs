//! Observer port - abstraction for training observation and data collection
//!
//! Observers let the training loop report progress without coupling it to
//! progress bars, logs, or metric files.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    env::Step,
    tictactoe::{Outcome, Player},
};

/// What happened in one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Index of the episode (0-based)
    pub episode: usize,
    /// Sum of all rewards received during the episode
    pub total_reward: f64,
    /// Steps taken, illegal moves included
    pub length: usize,
    /// Board outcome when the episode stopped
    pub outcome: Outcome,
    /// True if the step limit ended the episode
    pub truncated: bool,
    /// Exploration rate after the end-of-episode decay
    pub epsilon: f64,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - for each step, after the agent update
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```
/// use tictactoe_rl::ports::{EpisodeSummary, Observer};
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> tictactoe_rl::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after `reset`, before the first step of an episode.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called for each step of an episode.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step_num` - Step number within the episode (0-based)
    /// * `mover` - Mark that chose `action`
    /// * `action` - Cell index submitted to the environment
    /// * `step` - What the environment returned
    fn on_step(
        &mut self,
        _episode: usize,
        _step_num: usize,
        _mover: Player,
        _action: usize,
        _step: &Step,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode terminates or is truncated.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
