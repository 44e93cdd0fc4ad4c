//! Game metadata for search, augmentation and configuration
//!
//! This module provides static information about a game that the search and
//! training crates use to configure themselves without knowing the concrete
//! game type: board shape, action-space size and the symmetry class used by
//! data augmentation.

use serde::{Deserialize, Serialize};

/// Spatial symmetry class of a game's board and action encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardSymmetry {
    /// No usable symmetry: examples are kept as recorded.
    None,
    /// Square board whose action space is one action per cell; all 8
    /// rotations and reflections of the square map games to games.
    Dihedral,
}

/// Metadata about a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Environment identifier (e.g., "tictactoe", "connect4")
    pub env_id: String,

    /// Human-readable display name (e.g., "Tic-Tac-Toe", "Connect 4")
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Number of possible actions
    pub num_actions: usize,

    /// Symmetry class for data augmentation
    pub symmetry: BoardSymmetry,

    /// Single-character symbols for each player (e.g., ['X', 'O'])
    pub player_symbols: [char; 2],

    /// Brief description of the rules
    pub description: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            symmetry: BoardSymmetry::None,
            player_symbols: ['X', 'O'],
            description: String::new(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for action count
    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Builder method for the symmetry class
    pub fn with_symmetry(mut self, symmetry: BoardSymmetry) -> Self {
        self.symmetry = symmetry;
        self
    }

    /// Builder method for player symbols
    pub fn with_symbols(mut self, symbols: [char; 2]) -> Self {
        self.player_symbols = symbols;
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Whether dihedral augmentation can be applied: the board must be
    /// square and every cell must be its own action.
    pub fn supports_dihedral(&self) -> bool {
        self.symmetry == BoardSymmetry::Dihedral
            && self.board_width == self.board_height
            && self.num_actions == self.board_size()
    }
}
