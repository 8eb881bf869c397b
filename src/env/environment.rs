//! Episode state machine over the board

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::observation::Observation;
use crate::{
    Result,
    error::Error,
    tictactoe::{BoardState, Outcome, Player, TOTAL_CELLS},
};

/// Reward for an occupied cell or a move after the episode ended
pub const ILLEGAL_MOVE_PENALTY: f64 = -10.0;

/// Reward for the mark that completes a line
pub const WIN_REWARD: f64 = 1.0;

/// Reward for the mark that fills the last cell without a line
pub const DRAW_REWARD: f64 = 0.5;

/// Terminal result reported in [`StepInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(Player),
    Draw,
}

/// Auxiliary record returned alongside every observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Mark entitled to the next placement. After a terminal placement this
    /// stays on the mark that ended the game.
    pub current_player: Player,
    /// Present once the board is terminal
    pub winner: Option<Winner>,
    /// Cells of the completed line, for line wins only
    pub winning_line: Option<[usize; 3]>,
}

/// Result of [`TicTacToeEnv::step`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub terminated: bool,
    /// Always false here; step limits belong to the training loop
    pub truncated: bool,
    pub info: StepInfo,
}

/// Tic-tac-toe environment for single-policy self-play.
///
/// Rewards are always from the perspective of the mark that just moved: a
/// completed line pays [`WIN_REWARD`], a full board pays [`DRAW_REWARD`], and
/// an occupied cell pays [`ILLEGAL_MOVE_PENALTY`] without touching the board.
#[derive(Debug, Clone)]
pub struct TicTacToeEnv {
    board: BoardState,
    done: bool,
}

impl TicTacToeEnv {
    pub fn new() -> Self {
        Self {
            board: BoardState::new(),
            done: false,
        }
    }

    /// Number of discrete actions, one per cell
    pub fn action_space_size(&self) -> usize {
        TOTAL_CELLS
    }

    /// Start a new episode with an empty board and X to move
    pub fn reset(&mut self) -> (Observation, StepInfo) {
        self.board.reset();
        self.done = false;
        debug!("environment reset");
        (self.observation(), self.info())
    }

    /// Place the current mover's mark at `action`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPosition` when `action` is not a cell index. Occupied
    /// cells and moves after the end of an episode are not errors; they
    /// return the penalty with the state left as it was.
    pub fn step(&mut self, action: usize) -> Result<Step> {
        if action >= TOTAL_CELLS {
            return Err(Error::InvalidPosition { position: action });
        }

        if self.done || !self.board.is_empty(action) {
            debug!(action, done = self.done, "illegal move penalised");
            return Ok(Step {
                observation: self.observation(),
                reward: ILLEGAL_MOVE_PENALTY,
                terminated: self.done,
                truncated: false,
                info: self.info(),
            });
        }

        let mover = self.board.to_move;
        self.board.apply(mover, action)?;

        let reward = match self.board.outcome() {
            Outcome::Win(winner) => {
                debug_assert_eq!(winner, mover);
                self.done = true;
                debug!(%mover, action, "line completed");
                WIN_REWARD
            }
            Outcome::Draw => {
                self.done = true;
                debug!(%mover, action, "board full, draw");
                DRAW_REWARD
            }
            Outcome::Ongoing => {
                self.board.pass_turn();
                0.0
            }
        };

        Ok(Step {
            observation: self.observation(),
            reward,
            terminated: self.done,
            truncated: false,
            info: self.info(),
        })
    }

    /// Current observation; a pure function of the board
    pub fn observation(&self) -> Observation {
        Observation::from_board(&self.board)
    }

    /// Info record for the current state
    pub fn info(&self) -> StepInfo {
        let (winner, winning_line) = match self.board.outcome() {
            Outcome::Win(player) => (Some(Winner::Player(player)), self.board.winning_line()),
            Outcome::Draw => (Some(Winner::Draw), None),
            Outcome::Ongoing => (None, None),
        };

        StepInfo {
            current_player: self.board.to_move,
            winner,
            winning_line,
        }
    }

    /// Read-only view of the board, for rendering
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    pub fn current_player(&self) -> Player {
        self.board.to_move
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Text rendering of the board, one row per line
    pub fn render(&self) -> String {
        self.board.to_string()
    }
}

impl Default for TicTacToeEnv {
    fn default() -> Self {
        Self::new()
    }
}
