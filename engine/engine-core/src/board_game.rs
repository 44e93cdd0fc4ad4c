//! Shared helpers for grid-based two-player board games.
//!
//! TicTacToe, Connect4 and Othello all store their board as a row-major slice
//! of cell values (0 = empty, 1 = player one, 2 = player two). The helpers here
//! turn that representation into evaluator input and terminal output so each
//! game does not duplicate the encoding.

use std::fmt;

use crate::typed::Player;

/// Encode a row-major board from the perspective of `to_move`.
///
/// Cells owned by the player to move become `1.0`, opponent cells `-1.0`,
/// empty cells `0.0`. The result has one entry per cell.
///
/// # Example
/// ```
/// use engine_core::{canonical_observation, Player};
///
/// let board = [1, 0, 2];
/// assert_eq!(canonical_observation(&board, Player::One), vec![1.0, 0.0, -1.0]);
/// assert_eq!(canonical_observation(&board, Player::Two), vec![-1.0, 0.0, 1.0]);
/// ```
pub fn canonical_observation(board: &[u8], to_move: Player) -> Vec<f32> {
    let mine = to_move.cell();
    let theirs = to_move.opponent().cell();
    board
        .iter()
        .map(|&cell| {
            if cell == mine {
                1.0
            } else if cell == theirs {
                -1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Write a row-major board as a text grid.
///
/// Rows are printed top to bottom, `top_row_first` controls whether row 0 is
/// the top (TicTacToe, Othello) or the bottom (Connect4). Empty cells show as
/// `.` and a column index footer is appended so a human can pick moves.
pub fn render_grid(
    f: &mut fmt::Formatter<'_>,
    board: &[u8],
    width: usize,
    height: usize,
    symbols: [char; 2],
    top_row_first: bool,
) -> fmt::Result {
    for display_row in 0..height {
        let row = if top_row_first {
            display_row
        } else {
            height - 1 - display_row
        };
        for col in 0..width {
            let symbol = match board[row * width + col] {
                1 => symbols[0],
                2 => symbols[1],
                _ => '.',
            };
            if col > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
        }
        writeln!(f)?;
    }
    for col in 0..width {
        if col > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", col % 10)?;
    }
    Ok(())
}
