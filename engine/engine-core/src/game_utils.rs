//! Shared utilities for grid game implementations
//!
//! Line detection used by the n-in-a-row games and the direction table used
//! by flanking games, so each game crate only encodes its own rules.

/// The eight compass directions as `(row_delta, col_delta)` pairs.
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Step from `(row, col)` by `(dr, dc)`, returning `None` when the result
/// falls outside a `width` x `height` board.
#[inline]
pub fn step(
    row: usize,
    col: usize,
    (dr, dc): (isize, isize),
    width: usize,
    height: usize,
) -> Option<(usize, usize)> {
    let r = row as isize + dr;
    let c = col as isize + dc;
    if r < 0 || c < 0 || r >= height as isize || c >= width as isize {
        None
    } else {
        Some((r as usize, c as usize))
    }
}

/// Whether the stone at `(row, col)` is part of a run of at least `length`
/// equal, non-empty cells horizontally, vertically or diagonally.
///
/// Only lines through the given cell are checked, which is all that can
/// change after a single placement.
///
/// # Example
/// ```
/// use engine_core::game_utils::has_line_through;
///
/// // X X X
/// // . O .
/// // . . O
/// let board = [1, 1, 1, 0, 2, 0, 0, 0, 2];
/// assert!(has_line_through(&board, 3, 3, 0, 1, 3));
/// assert!(!has_line_through(&board, 3, 3, 1, 1, 3));
/// ```
pub fn has_line_through(
    board: &[u8],
    width: usize,
    height: usize,
    row: usize,
    col: usize,
    length: usize,
) -> bool {
    let owner = board[row * width + col];
    if owner == 0 {
        return false;
    }

    // Each axis is checked once by walking both ways from the cell
    const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    AXES.iter().any(|&(dr, dc)| {
        let forward = run_length(board, width, height, row, col, (dr, dc), owner);
        let backward = run_length(board, width, height, row, col, (-dr, -dc), owner);
        1 + forward + backward >= length
    })
}

fn run_length(
    board: &[u8],
    width: usize,
    height: usize,
    row: usize,
    col: usize,
    dir: (isize, isize),
    owner: u8,
) -> usize {
    let mut count = 0;
    let (mut r, mut c) = (row, col);
    while let Some((nr, nc)) = step(r, c, dir, width, height) {
        if board[nr * width + nc] != owner {
            break;
        }
        count += 1;
        r = nr;
        c = nc;
    }
    count
}
