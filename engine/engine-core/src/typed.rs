//! Typed Game trait consumed by tree search and self-play
//!
//! A `Game` value is a complete, clonable position. Actions are plain indices
//! into a fixed action space whose size never changes during a game, so that
//! prior vectors, visit distributions and policy targets all line up.

use std::fmt;

use crate::metadata::GameMetadata;

/// One of the two players of a zero-sum board game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Board cell value used by the grid games (1 or 2, 0 is empty).
    #[inline]
    pub fn cell(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Inverse of [`Player::cell`].
    pub fn from_cell(cell: u8) -> Option<Self> {
        match cell {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "player 1"),
            Player::Two => write!(f, "player 2"),
        }
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win(Player),
    Draw,
}

impl GameResult {
    /// Outcome from the stated player's perspective: `+1` win, `-1` loss, `0` draw.
    ///
    /// # Example
    /// ```
    /// use engine_core::{GameResult, Player};
    ///
    /// let result = GameResult::Win(Player::One);
    /// assert_eq!(result.value_for(Player::One), 1.0);
    /// assert_eq!(result.value_for(Player::Two), -1.0);
    /// assert_eq!(GameResult::Draw.value_for(Player::Two), 0.0);
    /// ```
    #[inline]
    pub fn value_for(self, player: Player) -> f32 {
        match self {
            GameResult::Win(winner) if winner == player => 1.0,
            GameResult::Win(_) => -1.0,
            GameResult::Draw => 0.0,
        }
    }

    /// Winning player, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(player) => Some(player),
            GameResult::Draw => None,
        }
    }
}

/// Errors raised by game implementations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move: action {action} is not in the legal move set")]
    IllegalMove { action: usize },

    #[error("Action {action} is outside the action space of size {size}")]
    ActionOutOfRange { action: usize, size: usize },

    #[error("Game is already over")]
    GameOver,
}

/// Position contract for two-player, perfect-information board games.
///
/// Implementations must be cheap to clone: tree search clones the root
/// position once per simulation and replays the selected actions on the copy.
///
/// # Action indices
///
/// `legal_moves()` always returns exactly `action_space_size()` flags. The
/// action descriptor is the index of its flag, so `legal_moves()[a]` tells
/// whether `apply_move(a)` is allowed.
///
/// # Perspective
///
/// `observation()` and evaluator values are expressed from the point of view
/// of [`Game::current_player`], the player about to move.
pub trait Game: Clone + Send + Sync + fmt::Debug + fmt::Display + 'static {
    /// Static information about the game (board shape, action count, symmetry).
    fn metadata(&self) -> GameMetadata;

    /// Size of the fixed action index space.
    fn action_space_size(&self) -> usize {
        self.metadata().num_actions
    }

    /// One legality flag per action index. All false once the game is over.
    fn legal_moves(&self) -> Vec<bool>;

    /// Indices of the currently legal actions, in ascending order.
    fn legal_actions(&self) -> Vec<usize> {
        self.legal_moves()
            .iter()
            .enumerate()
            .filter_map(|(action, &legal)| legal.then_some(action))
            .collect()
    }

    /// Play `action` for the current player and pass the turn.
    ///
    /// Returns [`GameError::IllegalMove`] (never silently ignoring the move)
    /// when the action is not in the legal set.
    fn apply_move(&mut self, action: usize) -> Result<(), GameError>;

    /// `None` while the game is running, the final result once it is over.
    fn check_terminal(&self) -> Option<GameResult>;

    /// The player about to move.
    fn current_player(&self) -> Player;

    /// Canonical board for the evaluator: one value per board cell, `+1` for
    /// the player to move, `-1` for the opponent, `0` for empty.
    fn observation(&self) -> Vec<f32>;

    /// Number of moves played so far.
    fn ply(&self) -> u32;
}
