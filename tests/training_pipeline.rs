//! Tests for the self-play training pipeline and its observers

mod common;

use std::sync::{Arc, Mutex};

use common::seeded_agent;
use tictactoe_rl::{
    Player, TicTacToeEnv,
    analysis::LearningCurves,
    env::ILLEGAL_MOVE_PENALTY,
    pipeline::{
        EpisodeSummary, MetricsObserver, Observer, SelfPlayTrainer, TracingObserver,
        TrainingConfig,
    },
    tictactoe::Outcome,
};

/// Records every summary into shared storage so the test can read it back
struct Recorder {
    summaries: Arc<Mutex<Vec<EpisodeSummary>>>,
    steps: Arc<Mutex<usize>>,
    started: Arc<Mutex<Option<usize>>>,
}

impl Observer for Recorder {
    fn on_training_start(&mut self, total_episodes: usize) -> tictactoe_rl::Result<()> {
        *self.started.lock().unwrap() = Some(total_episodes);
        Ok(())
    }

    fn on_step(
        &mut self,
        _episode: usize,
        _step_num: usize,
        _mover: Player,
        _action: usize,
        _step: &tictactoe_rl::Step,
    ) -> tictactoe_rl::Result<()> {
        *self.steps.lock().unwrap() += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> tictactoe_rl::Result<()> {
        self.summaries.lock().unwrap().push(*summary);
        Ok(())
    }
}

fn config(episodes: usize) -> TrainingConfig {
    TrainingConfig {
        episodes,
        ..TrainingConfig::default()
    }
}

#[test]
fn test_observer_sees_every_episode_and_step() {
    let summaries = Arc::new(Mutex::new(Vec::new()));
    let steps = Arc::new(Mutex::new(0));
    let started = Arc::new(Mutex::new(None));
    let recorder = Recorder {
        summaries: summaries.clone(),
        steps: steps.clone(),
        started: started.clone(),
    };

    let mut env = TicTacToeEnv::new();
    let mut agent = seeded_agent(40, 21);
    let mut trainer = SelfPlayTrainer::new(config(40)).with_observer(Box::new(recorder));
    let result = trainer.train(&mut env, &mut agent).unwrap();

    let summaries = summaries.lock().unwrap();
    assert_eq!(*started.lock().unwrap(), Some(40));
    assert_eq!(summaries.len(), 40);
    assert_eq!(*steps.lock().unwrap(), result.episode_lengths.iter().sum::<usize>());

    for (i, s) in summaries.iter().enumerate() {
        assert_eq!(s.episode, i);
        assert_eq!(s.length, result.episode_lengths[i]);
        assert_eq!(s.total_reward, result.episode_returns[i]);
        assert_eq!(s.truncated, s.outcome == Outcome::Ongoing);
    }
}

#[test]
fn test_returns_include_illegal_penalties() {
    let mut env = TicTacToeEnv::new();
    let mut agent = seeded_agent(60, 33);
    let mut trainer = SelfPlayTrainer::new(config(60));
    let result = trainer.train(&mut env, &mut agent).unwrap();

    // early episodes explore heavily, so some return must be negative
    assert!(result.episode_returns.iter().any(|&r| r <= ILLEGAL_MOVE_PENALTY + 1.0));
    assert!(result.episode_returns.iter().all(|&r| r <= 1.0));
}

#[test]
fn test_step_limit_truncates_unfinished_episodes() {
    let summaries = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder {
        summaries: summaries.clone(),
        steps: Arc::new(Mutex::new(0)),
        started: Arc::new(Mutex::new(None)),
    };

    let mut env = TicTacToeEnv::new();
    let mut agent = seeded_agent(80, 12);
    let mut trainer = SelfPlayTrainer::new(TrainingConfig {
        episodes: 80,
        max_episode_steps: 9,
        tracked_player: Player::X,
    })
    .with_observer(Box::new(recorder))
    .with_observer(Box::new(MetricsObserver::new()))
    .with_observer(Box::new(TracingObserver::new(20)));

    let result = trainer.train(&mut env, &mut agent).unwrap();
    let summaries = summaries.lock().unwrap();

    assert!(result.episode_lengths.iter().all(|&l| l <= 9));
    assert_eq!(
        result.truncated,
        summaries.iter().filter(|s| s.truncated).count()
    );
    assert!(result.truncated > 0);
    for s in summaries.iter().filter(|s| s.truncated) {
        assert_eq!(s.length, 9);
        assert_eq!(s.outcome, Outcome::Ongoing);
    }
}

#[test]
fn test_long_run_finishes_most_episodes() {
    let episodes = 3000;
    let mut env = TicTacToeEnv::new();
    let mut agent = seeded_agent(episodes, 2024);
    let mut trainer = SelfPlayTrainer::new(config(episodes));
    let result = trainer.train(&mut env, &mut agent).unwrap();

    assert_eq!(result.final_epsilon, agent.config().final_epsilon);
    assert!(result.table_size > 500);

    // the penalty teaches the agent to stop hitting occupied cells
    let late = &result.episode_returns[episodes - 500..];
    let late_mean = late.iter().sum::<f64>() / late.len() as f64;
    let early = &result.episode_returns[..500];
    let early_mean = early.iter().sum::<f64>() / early.len() as f64;
    assert!(late_mean > early_mean, "late {late_mean} vs early {early_mean}");

    let curves = LearningCurves::from_run(&result, agent.training_error(), 500);
    assert_eq!(curves.rewards.len(), episodes - 500 + 1);
    assert_eq!(curves.training_error.len(), agent.training_error().len());
}
