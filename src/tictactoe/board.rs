//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{lines::LineAnalyzer, outcome::Outcome};

/// Number of cells on the board, and the size of the action space
pub const TOTAL_CELLS: usize = 9;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '-' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' => Some(Cell::O),
            _ => None,
        }
    }

    /// Numeric code used in observations: 0 = empty, 1 = X, 2 = O
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Cell> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::X),
            2 => Some(Cell::O),
            _ => None,
        }
    }

    pub(crate) fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player in the game. X always opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Player number as exposed in environment info (1 for X, 2 for O)
    pub fn number(self) -> u8 {
        self.to_cell().code()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Board cells plus the mark entitled to move next.
///
/// Placement and turn passing are separate operations: `apply` writes a mark
/// and leaves `to_move` alone, the caller advances the turn with `pass_turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; TOTAL_CELLS],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; TOTAL_CELLS],
            to_move: Player::X,
        }
    }

    /// Clear every cell and hand the move back to X
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Create a board from a string of 9 cell characters.
    ///
    /// Whitespace is ignored. The player to move is X when both marks have
    /// the same count and O otherwise.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 characters remain or any character is
    /// not a valid cell representation.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() < TOTAL_CELLS {
            return Err(crate::Error::InvalidBoardLength {
                expected: TOTAL_CELLS,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; TOTAL_CELLS];
        for (i, &c) in chars.iter().take(TOTAL_CELLS).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();
        let to_move = if x_count > o_count {
            Player::O
        } else {
            Player::X
        };

        Ok(BoardState { cells, to_move })
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Indices of all empty cells, ascending
    pub fn valid_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `mover`'s mark at `pos`.
    ///
    /// The board is untouched on error. `to_move` is not advanced.
    ///
    /// # Errors
    ///
    /// `InvalidPosition` when `pos >= 9`, `InvalidMove` when the cell is taken.
    pub fn apply(&mut self, mover: Player, pos: usize) -> Result<(), crate::Error> {
        if pos >= TOTAL_CELLS {
            return Err(crate::Error::InvalidPosition { position: pos });
        }
        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        self.cells[pos] = mover.to_cell();
        Ok(())
    }

    /// Hand the move to the other mark
    pub fn pass_turn(&mut self) {
        self.to_move = self.to_move.opponent();
    }

    /// Classify the board. Completed lines are checked before fullness.
    pub fn outcome(&self) -> Outcome {
        if let Some((winner, _)) = LineAnalyzer::completed_line(&self.cells) {
            Outcome::Win(winner)
        } else if self.cells.contains(&Cell::Empty) {
            Outcome::Ongoing
        } else {
            Outcome::Draw
        }
    }

    /// Cells of the first completed line, if any
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        LineAnalyzer::completed_line(&self.cells).map(|(_, line)| line)
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Count the number of occupied cells on the board.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Compact single-line encoding, e.g. `X.O......`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
