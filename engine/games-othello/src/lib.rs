//! 6x6 Othello for the tabula engine
//!
//! Players place discs so that one or more straight lines of opponent discs
//! are flanked by the new disc and an existing own disc; every flanked line
//! is flipped. Actions are board cells in row-major order.
//!
//! The game ends as soon as either player has no legal placement, and the
//! player with more discs wins. Ending on the first blocked player keeps the
//! turn order strictly alternating, which the value backup relies on.
//!
//! ```text
//!     0 1 2 3 4 5
//! 0   . . . . . .
//! 1   . . . . . .
//! 2   . . O X . .
//! 3   . . X O . .
//! 4   . . . . . .
//! 5   . . . . . .
//! ```

use std::fmt;

use engine_core::game_utils::{step, DIRECTIONS};
use engine_core::{
    canonical_observation, render_grid, BoardSymmetry, Game, GameError, GameMetadata, GameResult,
    Player,
};

/// Board side length
pub const SIDE: usize = 6;
/// Number of cells, and of actions
pub const CELLS: usize = SIDE * SIDE;

/// Othello position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Othello {
    /// Board representation: 0=empty, 1=X (player 1), 2=O (player 2)
    board: [u8; CELLS],
    to_move: Player,
    result: Option<GameResult>,
    moves: u32,
}

impl Othello {
    /// Standard opening: two discs each on the centre diagonals, X to move
    pub fn new() -> Self {
        let mut board = [0u8; CELLS];
        let mid = SIDE / 2;
        board[(mid - 1) * SIDE + (mid - 1)] = Player::Two.cell();
        board[mid * SIDE + mid] = Player::Two.cell();
        board[(mid - 1) * SIDE + mid] = Player::One.cell();
        board[mid * SIDE + (mid - 1)] = Player::One.cell();

        Self {
            board,
            to_move: Player::One,
            result: None,
            moves: 0,
        }
    }

    /// Raw board cells (0=empty, 1=X, 2=O)
    pub fn board(&self) -> &[u8; CELLS] {
        &self.board
    }

    /// Number of discs owned by `player`
    pub fn disc_count(&self, player: Player) -> usize {
        let cell = player.cell();
        self.board.iter().filter(|&&c| c == cell).count()
    }

    /// Cells that would be flipped if `player` placed at `pos`. Empty when
    /// the placement is not legal.
    fn flips(&self, pos: usize, player: Player) -> Vec<usize> {
        if self.board[pos] != 0 {
            return Vec::new();
        }

        let mine = player.cell();
        let theirs = player.opponent().cell();
        let (row, col) = (pos / SIDE, pos % SIDE);
        let mut flipped = Vec::new();

        for dir in DIRECTIONS {
            let mut line = Vec::new();
            let mut cursor = step(row, col, dir, SIDE, SIDE);
            while let Some((r, c)) = cursor {
                let idx = r * SIDE + c;
                if self.board[idx] == theirs {
                    line.push(idx);
                    cursor = step(r, c, dir, SIDE, SIDE);
                } else {
                    if self.board[idx] == mine && !line.is_empty() {
                        flipped.extend_from_slice(&line);
                    }
                    break;
                }
            }
        }
        flipped
    }

    fn has_move(&self, player: Player) -> bool {
        (0..CELLS).any(|pos| !self.flips(pos, player).is_empty())
    }

    fn detect_result(&self) -> Option<GameResult> {
        if self.has_move(self.to_move) && self.has_move(self.to_move.opponent()) {
            return None;
        }
        let one = self.disc_count(Player::One);
        let two = self.disc_count(Player::Two);
        Some(match one.cmp(&two) {
            std::cmp::Ordering::Greater => GameResult::Win(Player::One),
            std::cmp::Ordering::Less => GameResult::Win(Player::Two),
            std::cmp::Ordering::Equal => GameResult::Draw,
        })
    }
}

impl Default for Othello {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Othello {
    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("othello", "Othello 6x6")
            .with_board(SIDE, SIDE)
            .with_actions(CELLS)
            .with_symmetry(BoardSymmetry::Dihedral)
            .with_symbols(['X', 'O'])
            .with_description("Flank and flip; most discs wins")
    }

    fn action_space_size(&self) -> usize {
        CELLS
    }

    fn legal_moves(&self) -> Vec<bool> {
        if self.result.is_some() {
            return vec![false; CELLS];
        }
        (0..CELLS)
            .map(|pos| !self.flips(pos, self.to_move).is_empty())
            .collect()
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
        let flipped = self.flips(action, self.to_move);
        if flipped.is_empty() {
            return Err(GameError::IllegalMove { action });
        }

        let mine = self.to_move.cell();
        self.board[action] = mine;
        for idx in flipped {
            self.board[idx] = mine;
        }
        self.moves += 1;
        self.to_move = self.to_move.opponent();
        self.result = self.detect_result();
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

impl fmt::Display for Othello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_grid(f, &self.board, SIDE, SIDE, ['X', 'O'], true)
    }
}
