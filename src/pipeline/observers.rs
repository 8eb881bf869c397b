//! Observer implementations for the training loop

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    env::{ILLEGAL_MOVE_PENALTY, Step},
    ports::{EpisodeSummary, Observer},
    tictactoe::{Outcome, Player},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
        }
    }

    fn message(&self) -> String {
        format!("X:{} O:{} D:{}", self.x_wins, self.o_wins, self.draws)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Outcome::Win(Player::X) => self.x_wins += 1,
            Outcome::Win(Player::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and episode shape
#[derive(Debug, Default)]
pub struct MetricsObserver {
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    truncated: usize,
    illegal_moves: usize,
    lengths: Vec<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn episodes(&self) -> usize {
        self.lengths.len()
    }

    fn rate(&self, count: usize) -> f64 {
        if self.episodes() == 0 {
            0.0
        } else {
            count as f64 / self.episodes() as f64
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.lengths.is_empty() {
            0.0
        } else {
            self.lengths.iter().sum::<usize>() as f64 / self.lengths.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes(),
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            truncated: self.truncated,
            illegal_moves: self.illegal_moves,
            x_win_rate: self.rate(self.x_wins),
            o_win_rate: self.rate(self.o_wins),
            draw_rate: self.rate(self.draws),
            avg_episode_length: self.avg_episode_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub truncated: usize,
    pub illegal_moves: usize,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub draw_rate: f64,
    pub avg_episode_length: f64,
}

impl Observer for MetricsObserver {
    fn on_step(
        &mut self,
        _episode: usize,
        _step_num: usize,
        _mover: Player,
        _action: usize,
        step: &Step,
    ) -> Result<()> {
        if step.reward == ILLEGAL_MOVE_PENALTY {
            self.illegal_moves += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Outcome::Win(Player::X) => self.x_wins += 1,
            Outcome::Win(Player::O) => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => {}
        }
        if summary.truncated {
            self.truncated += 1;
        }
        self.lengths.push(summary.length);
        Ok(())
    }
}

/// Logs a one-line digest every `interval` episodes
pub struct TracingObserver {
    interval: usize,
    window_reward: f64,
    window_length: usize,
    window_episodes: usize,
}

impl TracingObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            window_reward: 0.0,
            window_length: 0,
            window_episodes: 0,
        }
    }
}

impl Observer for TracingObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.window_reward += summary.total_reward;
        self.window_length += summary.length;
        self.window_episodes += 1;

        if (summary.episode + 1).is_multiple_of(self.interval) {
            let n = self.window_episodes as f64;
            info!(
                episode = summary.episode + 1,
                epsilon = summary.epsilon,
                mean_return = self.window_reward / n,
                mean_length = self.window_length as f64 / n,
                "training progress"
            );
            self.window_reward = 0.0;
            self.window_length = 0;
            self.window_episodes = 0;
        }
        Ok(())
    }
}
