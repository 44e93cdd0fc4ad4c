//! Configuration struct definitions.
//!
//! Every section deserializes with `#[serde(default)]`, so a `config.toml`
//! only needs the keys it changes. Missing keys take the embedded defaults.

use crate::defaults;
use serde::Deserialize;

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub self_play: SelfPlayConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Settings shared by every command
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    /// Game to play, see `engine_games::GameKind`
    pub env_id: String,
    /// Directory holding `current_model` and `best_model` checkpoints
    pub model_dir: String,
    pub log_level: String,
    /// Start from the saved best model instead of fresh weights
    pub load_model: bool,
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            env_id: defaults::env_id().into(),
            model_dir: defaults::model_dir().into(),
            log_level: defaults::log_level().into(),
            load_model: defaults::load_model(),
            seed: defaults::seed(),
        }
    }
}

/// Tree search configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MctsConfig {
    pub num_simulations: u32,
    pub c_puct: f64,
    pub dirichlet_alpha: f64,
    /// Weight of the Dirichlet sample in the root prior
    pub epsilon: f64,
    /// `argmax` or `sample`
    pub move_selection: String,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            c_puct: defaults::c_puct(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            epsilon: defaults::epsilon(),
            move_selection: defaults::move_selection().into(),
        }
    }
}

/// Self-play game generation
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Games per training iteration
    pub num_games: u32,
    pub temperature_init: f64,
    pub temperature_final: f64,
    /// Ply at which `temperature_init` switches to `temperature_final`
    pub temperature_threshold: u32,
    /// `visits` or `priors`
    pub policy_target: String,
    /// Worker threads for parallel games, 0 = one per core
    pub num_workers: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_games: defaults::num_games(),
            temperature_init: defaults::temperature_init(),
            temperature_final: defaults::temperature_final(),
            temperature_threshold: defaults::temperature_threshold(),
            policy_target: defaults::policy_target().into(),
            num_workers: defaults::num_workers(),
        }
    }
}

/// Evaluator training
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    pub iterations: u32,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub l2: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            epochs: defaults::epochs(),
            batch_size: defaults::batch_size(),
            learning_rate: defaults::learning_rate(),
            momentum: defaults::momentum(),
            l2: defaults::l2(),
        }
    }
}

/// Arena evaluation and promotion
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    pub games: u32,
    /// Promote when wins / (wins + losses) is strictly above this
    pub win_rate: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: defaults::eval_games(),
            win_rate: defaults::eval_win_rate(),
        }
    }
}
