//! Self-play training for the tabula engine.
//!
//! - [`self_play`]: plays games of an evaluator against itself
//! - [`augment`]: expands examples with board symmetries
//! - [`arena`]: matches two evaluators and tallies the results
//! - [`training`]: the iteration loop with checkpointing and promotion
//! - [`play`]: human versus AI on the terminal
//! - [`config`]: command-line options and their lowering into settings

pub mod arena;
pub mod augment;
pub mod config;
pub mod play;
pub mod self_play;
pub mod training;

pub use arena::{Arena, ArenaStats};
pub use augment::DataAugmenter;
pub use config::Config;
pub use play::play_human;
pub use self_play::{GameRecord, PolicyTarget, SelfPlayRunner, SelfPlaySettings};
pub use training::{decide_promotion, IterationSummary, TrainSettings, Trainer};
