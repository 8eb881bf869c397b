//! Common test utilities for the tictactoe_rl test suite.
//!
//! Helpers for building seeded agents, replaying move sequences, and walking
//! every reachable board.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use tictactoe_rl::{
    AgentConfig, BoardState, Observation, QLearningAgent, Step, TicTacToeEnv,
    tictactoe::Outcome,
};

/// Alternating placements X0 O1 X2 O4 X3 O5 X7 O6 X8, ending in a draw
/// with no line completed along the way.
pub const DRAW_SEQUENCE: [usize; 9] = [0, 1, 2, 4, 3, 5, 7, 6, 8];

/// Alternating placements in which X completes the top row on move five
pub const X_TOP_ROW_WIN: [usize; 5] = [0, 3, 1, 4, 2];

/// Agent with the scripted epsilon schedule for `episodes` and a fixed seed
pub fn seeded_agent(episodes: usize, seed: u64) -> QLearningAgent {
    QLearningAgent::new(AgentConfig::for_episodes(episodes).with_seed(seed))
        .expect("valid config")
}

/// Agent that never explores, seeded with `table`
pub fn greedy_agent(table: HashMap<Observation, Vec<f64>>, seed: u64) -> QLearningAgent {
    QLearningAgent::with_table(AgentConfig::new(0.1, 0.0, 0.0, 0.0).with_seed(seed), table)
        .expect("valid config and table")
}

/// Reset `env` and submit `actions` in order, returning every step
pub fn play(env: &mut TicTacToeEnv, actions: &[usize]) -> Vec<Step> {
    env.reset();
    actions
        .iter()
        .map(|&a| env.step(a).expect("action in range"))
        .collect()
}

/// Every board reachable from the empty board by legal alternating play,
/// stopping at terminal boards.
pub fn reachable_boards() -> Vec<BoardState> {
    let mut seen = HashSet::new();
    let mut stack = vec![BoardState::new()];
    let mut boards = Vec::new();

    while let Some(board) = stack.pop() {
        if !seen.insert(board) {
            continue;
        }
        boards.push(board);
        if board.outcome() != Outcome::Ongoing {
            continue;
        }
        for cell in board.valid_moves() {
            let mut next = board;
            next.apply(board.to_move, cell).expect("cell is free");
            next.pass_turn();
            stack.push(next);
        }
    }
    boards
}
