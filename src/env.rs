//! Self-play environment
//!
//! Wraps the board in an episode-oriented `reset`/`step` interface. A single
//! policy drives both marks, so every reward is expressed from the point of
//! view of the mark that just acted.

pub mod environment;
pub mod observation;

pub use environment::{
    DRAW_REWARD, ILLEGAL_MOVE_PENALTY, Step, StepInfo, TicTacToeEnv, WIN_REWARD, Winner,
};
pub use observation::Observation;
