//! Tic-Tac-Toe board logic

pub mod board;
pub mod lines;
pub mod outcome;

pub use board::{BoardState, Cell, Player, TOTAL_CELLS};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use outcome::Outcome;
