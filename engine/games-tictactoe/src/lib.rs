//! TicTacToe game implementation for the tabula engine
//!
//! The smallest of the bundled games and the default training environment.
//! Actions are board cells `0..9` in row-major order, so the action space
//! shares the board's dihedral symmetry.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Game, Player};
//! use games_tictactoe::TicTacToe;
//!
//! let mut game = TicTacToe::new();
//! game.apply_move(4).unwrap();
//! assert_eq!(game.current_player(), Player::Two);
//! assert_eq!(game.legal_actions().len(), 8);
//! ```

use std::fmt;

use engine_core::game_utils::has_line_through;
use engine_core::{
    canonical_observation, render_grid, BoardSymmetry, Game, GameError, GameMetadata, GameResult,
    Player,
};

/// Board side length
pub const SIZE: usize = 3;
/// Number of cells, and of actions
pub const CELLS: usize = SIZE * SIZE;

/// TicTacToe position
///
/// Holds the board, the player to move and the cached result so that
/// `check_terminal` is free during tree search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicTacToe {
    /// Board representation: 0=empty, 1=X, 2=O
    board: [u8; CELLS],
    /// Player to move, X goes first
    to_move: Player,
    /// Cached result once the game is over
    result: Option<GameResult>,
    /// Moves played so far
    moves: u32,
}

impl TicTacToe {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self {
            board: [0; CELLS],
            to_move: Player::One,
            result: None,
            moves: 0,
        }
    }

    /// Build a position from a raw board, inferring the player to move from
    /// the stone counts. Returns `None` if the counts are impossible.
    pub fn from_board(board: [u8; CELLS]) -> Option<Self> {
        let x = board.iter().filter(|&&c| c == 1).count();
        let o = board.iter().filter(|&&c| c == 2).count();
        if board.iter().any(|&c| c > 2) || !(x == o || x == o + 1) {
            return None;
        }

        let to_move = if x == o { Player::One } else { Player::Two };
        let mut game = Self {
            board,
            to_move,
            result: None,
            moves: (x + o) as u32,
        };
        game.result = game.detect_result();
        Some(game)
    }

    /// Raw board cells (0=empty, 1=X, 2=O)
    pub fn board(&self) -> &[u8; CELLS] {
        &self.board
    }

    fn detect_result(&self) -> Option<GameResult> {
        for pos in 0..CELLS {
            if has_line_through(&self.board, SIZE, SIZE, pos / SIZE, pos % SIZE, 3) {
                let winner = Player::from_cell(self.board[pos])?;
                return Some(GameResult::Win(winner));
            }
        }
        if self.board.iter().all(|&cell| cell != 0) {
            return Some(GameResult::Draw);
        }
        None
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("tictactoe", "Tic-Tac-Toe")
            .with_board(SIZE, SIZE)
            .with_actions(CELLS)
            .with_symmetry(BoardSymmetry::Dihedral)
            .with_symbols(['X', 'O'])
            .with_description("Get three in a row to win!")
    }

    fn action_space_size(&self) -> usize {
        CELLS
    }

    fn legal_moves(&self) -> Vec<bool> {
        if self.result.is_some() {
            return vec![false; CELLS];
        }
        self.board.iter().map(|&cell| cell == 0).collect()
    }

    fn apply_move(&mut self, action: usize) -> Result<(), GameError> {
        if action >= CELLS {
            return Err(GameError::ActionOutOfRange {
                action,
                size: CELLS,
            });
        }
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        if self.board[action] != 0 {
            return Err(GameError::IllegalMove { action });
        }

        self.board[action] = self.to_move.cell();
        self.moves += 1;

        if has_line_through(&self.board, SIZE, SIZE, action / SIZE, action % SIZE, 3) {
            self.result = Some(GameResult::Win(self.to_move));
        } else if self.moves as usize == CELLS {
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

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_grid(f, &self.board, SIZE, SIZE, ['X', 'O'], true)
    }
}

#[cfg(test)]
mod tests;
