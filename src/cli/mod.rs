//! CLI infrastructure for the tic-tac-toe Q-learning toolkit
//!
//! This module provides the command-line interface for training an agent by
//! self-play, playing against a saved table, and inspecting learned values.

pub mod commands;
pub mod config;
pub mod output;
