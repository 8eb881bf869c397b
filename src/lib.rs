//! Tabular Q-learning for tic-tac-toe by self-play
//!
//! This crate provides:
//! - A tic-tac-toe board state machine with win and draw detection
//! - A step/reset environment with fixed rewards and an illegal-move penalty
//! - An ε-greedy Q-learning agent with linear epsilon decay
//! - A self-play training pipeline with pluggable observers
//! - Value-table persistence and learning-curve export

pub mod adapters;
pub mod analysis;
pub mod cli;
pub mod env;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;

pub use env::{Observation, Step, StepInfo, TicTacToeEnv, Winner};
pub use error::{Error, Result};
pub use q_learning::{AgentConfig, QLearningAgent};
pub use tictactoe::{BoardState, Cell, Outcome, Player};
