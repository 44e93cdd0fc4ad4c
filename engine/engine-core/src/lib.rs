//! Core traits and types for the tabula game engine
//!
//! This crate provides the fundamental abstractions shared by every game and
//! by the search/training crates:
//! - `Game`: the position contract consumed by tree search and self-play
//! - `Player` / `GameResult`: two-player, zero-sum outcomes
//! - `GameMetadata`: board shape, action-space size and symmetry class
//! - `board_game` / `game_utils`: helpers reused by the grid games

pub mod board_game;
pub mod game_utils;
pub mod metadata;
pub mod typed;

// Re-export main types for convenience
pub use board_game::{canonical_observation, render_grid};
pub use metadata::{BoardSymmetry, GameMetadata};
pub use typed::{Game, GameError, GameResult, Player};
