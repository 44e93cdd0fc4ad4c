//! Game selection for the tabula engine
//!
//! Search and training are generic over [`Game`], so a game chosen at runtime
//! by its `env_id` is turned back into a concrete type through
//! [`GameKind::dispatch`] and a [`GameVisitor`].
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use engine_games::{GameKind, GameVisitor};
//!
//! struct ActionCount;
//!
//! impl GameVisitor for ActionCount {
//!     type Output = usize;
//!     fn visit<G: Game + Default>(self, initial: G) -> usize {
//!         initial.action_space_size()
//!     }
//! }
//!
//! let kind: GameKind = "connect4".parse().unwrap();
//! assert_eq!(kind.dispatch(ActionCount), 7);
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::{Game, GameMetadata};
use games_connect4::Connect4;
use games_othello::Othello;
use games_tictactoe::TicTacToe;

/// Error returned for an unrecognised environment id
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown game '{0}'. Available: tictactoe, connect4, othello")]
pub struct UnknownGame(pub String);

/// The bundled games
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    TicTacToe,
    Connect4,
    Othello,
}

/// Callback run with the concrete initial position of a [`GameKind`].
pub trait GameVisitor {
    type Output;

    fn visit<G: Game + Default>(self, initial: G) -> Self::Output;
}

impl GameKind {
    /// Every bundled game
    pub const ALL: [GameKind; 3] = [GameKind::TicTacToe, GameKind::Connect4, GameKind::Othello];

    /// Environment identifier used in config and checkpoint names
    pub fn env_id(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Connect4 => "connect4",
            GameKind::Othello => "othello",
        }
    }

    /// Metadata of the game's initial position
    pub fn metadata(self) -> GameMetadata {
        match self {
            GameKind::TicTacToe => TicTacToe::new().metadata(),
            GameKind::Connect4 => Connect4::new().metadata(),
            GameKind::Othello => Othello::new().metadata(),
        }
    }

    /// Run `visitor` with the initial position of this game
    pub fn dispatch<V: GameVisitor>(self, visitor: V) -> V::Output {
        match self {
            GameKind::TicTacToe => visitor.visit(TicTacToe::new()),
            GameKind::Connect4 => visitor.visit(Connect4::new()),
            GameKind::Othello => visitor.visit(Othello::new()),
        }
    }
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tictactoe" | "tic_tac_toe" | "tic-tac-toe" => Ok(GameKind::TicTacToe),
            "connect4" | "connect_four" => Ok(GameKind::Connect4),
            "othello" => Ok(GameKind::Othello),
            _ => Err(UnknownGame(s.to_string())),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_id())
    }
}

/// List the environment ids of all bundled games
pub fn list_games() -> Vec<&'static str> {
    GameKind::ALL.iter().map(|kind| kind.env_id()).collect()
}
