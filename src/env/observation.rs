//! Numeric board encoding handed to the agent

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{BoardState, Cell, TOTAL_CELLS};

/// Row-major cell codes: 0 = empty, 1 = X, 2 = O.
///
/// Doubles as the exact lookup key of the Q-table; boards that differ only by
/// a symmetry get distinct keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "[u8; TOTAL_CELLS]")]
pub struct Observation([u8; TOTAL_CELLS]);

impl Observation {
    /// Build an observation from raw codes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCellCode` if a code is outside `0..=2`.
    pub fn new(codes: [u8; TOTAL_CELLS]) -> Result<Self, crate::Error> {
        if let Some((position, &code)) = codes.iter().enumerate().find(|(_, c)| **c > 2) {
            return Err(crate::Error::InvalidCellCode { code, position });
        }
        Ok(Self(codes))
    }

    pub fn from_board(board: &BoardState) -> Self {
        Self(board.cells.map(Cell::code))
    }

    /// Observation of the empty board
    pub fn empty() -> Self {
        Self([0; TOTAL_CELLS])
    }

    pub fn codes(&self) -> &[u8; TOTAL_CELLS] {
        &self.0
    }

    /// Decode back into cells
    pub fn cells(&self) -> [Cell; TOTAL_CELLS] {
        self.0.map(|code| Cell::from_code(code).unwrap_or(Cell::Empty))
    }
}

impl TryFrom<[u8; TOTAL_CELLS]> for Observation {
    type Error = crate::Error;

    fn try_from(codes: [u8; TOTAL_CELLS]) -> Result<Self, Self::Error> {
        Self::new(codes)
    }
}

impl From<&BoardState> for Observation {
    fn from(board: &BoardState) -> Self {
        Self::from_board(board)
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for code in self.0 {
            write!(f, "{code}")?;
        }
        Ok(())
    }
}
