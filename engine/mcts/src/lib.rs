//! Monte Carlo Tree Search (MCTS) implementation for AlphaZero-style game playing.
//!
//! This crate provides a game-agnostic PUCT search that works with any
//! game implementing the `engine-core` Game trait.
//!
//! # Overview
//!
//! MCTS builds a search tree by running simulations. Each simulation:
//!
//! 1. **Selection**: Walks down the tree with the PUCT score
//!    `Q + P * c_puct * sqrt(N_parent) / (1 + N_child)`, replaying the chosen
//!    actions on a clone of the root position
//! 2. **Evaluation**: Queries the evaluator at the leaf, or reads the exact
//!    outcome if the leaf position is finished
//! 3. **Expansion**: Masks illegal actions out of the prior, renormalises it
//!    and adds one child per legal action
//! 4. **Backpropagation**: Updates visit counts and values from leaf to root,
//!    flipping the sign at every level
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Game;
//! use games_tictactoe::TicTacToe;
//! use mcts::{MctsConfig, MctsSearch, MctsTree, UniformEvaluator};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let evaluator = UniformEvaluator::new();
//! let config = MctsConfig::for_testing();
//! let mut search = MctsSearch::new(&evaluator, &config);
//!
//! let mut game = TicTacToe::new();
//! let mut tree = MctsTree::new();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = search.search(&game, &mut tree, 1.0, &mut rng).unwrap();
//! game.apply_move(result.action).unwrap();
//! // Keep the chosen subtree for the next search
//! tree.advance(result.action);
//! ```
//!
//! # Evaluators
//!
//! - [`UniformEvaluator`]: uniform prior, zero value (for testing)
//! - [`LinearEvaluator`]: trainable linear policy/value heads with JSON
//!   checkpoints

pub mod config;
pub mod evaluator;
pub mod linear;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, MoveSelection};
pub use evaluator::{
    EvalResult, Evaluator, EvaluatorError, TrainStats, TrainableEvaluator, TrainingExample,
    UniformEvaluator,
};
pub use linear::{LinearConfig, LinearEvaluator};
pub use node::{MctsNode, NodeId};
pub use search::{MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MctsTree, TreeError, TreeStats};
