//! Connect 4 game implementation for the tabula engine
//!
//! Connect 4 is a two-player connection game where players drop colored discs
//! into a 7-column, 6-row vertically suspended grid. The objective is to be
//! the first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```
//!
//! Actions are column indices, so the action space has no rotational
//! symmetry and examples are not augmented.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_connect4::Connect4;
//!
//! let mut game = Connect4::new();
//! game.apply_move(3).unwrap();
//! assert_eq!(game.column_height(3), 1);
//! ```

use std::fmt;

use engine_core::game_utils::has_line_through;
use engine_core::{
    canonical_observation, render_grid, BoardSymmetry, Game, GameError, GameMetadata, GameResult,
    Player,
};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Connect4 position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect4 {
    /// Board representation: 0=empty, 1=Red (player 1), 2=Yellow (player 2)
    /// Stored in row-major order with row 0 at the bottom
    board: [u8; BOARD_SIZE],
    /// Player to move, Red goes first
    to_move: Player,
    /// Cached result once the game is over
    result: Option<GameResult>,
    /// Height of each column (0-6 means number of pieces in column)
    column_heights: [u8; COLS],
    /// Moves played so far
    moves: u32,
}

impl Connect4 {
    /// Create an empty board with Red to move
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            to_move: Player::One,
            result: None,
            column_heights: [0; COLS],
            moves: 0,
        }
    }

    /// Convert column and row to board index
    #[inline]
    pub fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Number of discs in a column
    pub fn column_height(&self, col: usize) -> usize {
        self.column_heights[col] as usize
    }

    /// Cell value at `(col, row)`, row 0 is the bottom
    pub fn cell(&self, col: usize, row: usize) -> u8 {
        self.board[Self::pos(col, row)]
    }
}

impl Default for Connect4 {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Connect4 {
    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("connect4", "Connect 4")
            .with_board(COLS, ROWS)
            .with_actions(COLS)
            .with_symmetry(BoardSymmetry::None)
            .with_symbols(['R', 'Y'])
            .with_description("Drop pieces to connect 4 in a row!")
    }

    fn action_space_size(&self) -> usize {
        COLS
    }

    fn legal_moves(&self) -> Vec<bool> {
        if self.result.is_some() {
            return vec![false; COLS];
        }
        self.column_heights
            .iter()
            .map(|&height| (height as usize) < ROWS)
            .collect()
    }

    fn apply_move(&mut self, action: usize) -> Result<(), GameError> {
        if action >= COLS {
            return Err(GameError::ActionOutOfRange { action, size: COLS });
        }
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        let row = self.column_heights[action] as usize;
        if row >= ROWS {
            return Err(GameError::IllegalMove { action });
        }

        self.board[Self::pos(action, row)] = self.to_move.cell();
        self.column_heights[action] += 1;
        self.moves += 1;

        if has_line_through(&self.board, COLS, ROWS, row, action, 4) {
            self.result = Some(GameResult::Win(self.to_move));
        } else if self.moves as usize == BOARD_SIZE {
            self.result = Some(GameResult::Draw);
        }

        self.to_move = self.to_move.opponent();
        Ok(())
    }

    fn check_terminal(&self) -> Option<GameResult> {
        self.result
    }

    fn current_player(&self) -> Player {
        self.to_move
    }

    fn observation(&self) -> Vec<f32> {
        canonical_observation(&self.board, self.to_move)
    }

    fn ply(&self) -> u32 {
        self.moves
    }
}

impl fmt::Display for Connect4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_grid(f, &self.board, COLS, ROWS, ['R', 'Y'], false)
    }
}

#[cfg(test)]
mod tests;
