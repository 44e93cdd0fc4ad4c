//! Command-line configuration for the trainer.
//!
//! Every flag defaults to the central configuration (config.defaults.toml,
//! then config.toml, then `TABULA_*` environment variables), so the command
//! line only needs to name what differs. The parsed [`Config`] is validated
//! once and lowered into the immutable settings each component takes.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use engine_config::{load_config, CentralConfig};
use engine_games::GameKind;
use mcts::{LinearConfig, MctsConfig, MoveSelection};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

use crate::self_play::{PolicyTarget, SelfPlaySettings};
use crate::training::TrainSettings;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_env_id() -> String {
    CENTRAL_CONFIG.common.env_id.clone()
}
fn default_model_dir() -> String {
    CENTRAL_CONFIG.common.model_dir.clone()
}
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}
fn default_load_model() -> bool {
    CENTRAL_CONFIG.common.load_model
}
fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}
fn default_num_mcts_sims() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}
fn default_c_puct() -> f32 {
    CENTRAL_CONFIG.mcts.c_puct as f32
}
fn default_dirichlet_alpha() -> f32 {
    CENTRAL_CONFIG.mcts.dirichlet_alpha as f32
}
fn default_epsilon() -> f32 {
    CENTRAL_CONFIG.mcts.epsilon as f32
}
fn default_move_selection() -> String {
    CENTRAL_CONFIG.mcts.move_selection.clone()
}
fn default_num_games() -> u32 {
    CENTRAL_CONFIG.self_play.num_games
}
fn default_temperature_init() -> f32 {
    CENTRAL_CONFIG.self_play.temperature_init as f32
}
fn default_temperature_final() -> f32 {
    CENTRAL_CONFIG.self_play.temperature_final as f32
}
fn default_temperature_threshold() -> u32 {
    CENTRAL_CONFIG.self_play.temperature_threshold
}
fn default_policy_target() -> String {
    CENTRAL_CONFIG.self_play.policy_target.clone()
}
fn default_num_workers() -> usize {
    CENTRAL_CONFIG.self_play.num_workers
}
fn default_num_iterations() -> u32 {
    CENTRAL_CONFIG.training.iterations
}
fn default_epochs() -> usize {
    CENTRAL_CONFIG.training.epochs
}
fn default_batch_size() -> usize {
    CENTRAL_CONFIG.training.batch_size
}
fn default_learning_rate() -> f32 {
    CENTRAL_CONFIG.training.learning_rate as f32
}
fn default_momentum() -> f32 {
    CENTRAL_CONFIG.training.momentum as f32
}
fn default_l2() -> f32 {
    CENTRAL_CONFIG.training.l2 as f32
}
fn default_num_eval_games() -> u32 {
    CENTRAL_CONFIG.evaluation.games
}
fn default_eval_win_rate() -> f64 {
    CENTRAL_CONFIG.evaluation.win_rate
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Config {
    /// Game to play (tictactoe, connect4, othello)
    #[arg(long, default_value_t = default_env_id())]
    pub env_id: String,

    /// Training iterations
    #[arg(long, default_value_t = default_num_iterations())]
    pub num_iterations: u32,

    /// Self-play games per iteration
    #[arg(long, default_value_t = default_num_games())]
    pub num_games: u32,

    /// MCTS simulations per move
    #[arg(long, default_value_t = default_num_mcts_sims())]
    pub num_mcts_sims: u32,

    /// PUCT exploration constant
    #[arg(long, default_value_t = default_c_puct())]
    pub c_puct: f32,

    /// Search temperature for the opening plies
    #[arg(long, default_value_t = default_temperature_init())]
    pub temperature_init: f32,

    /// Search temperature after the threshold, and in arena and human games
    #[arg(long, default_value_t = default_temperature_final())]
    pub temperature_final: f32,

    /// Ply at which the temperature switches from init to final
    #[arg(long, default_value_t = default_temperature_threshold())]
    pub temperature_threshold: u32,

    /// Dirichlet noise concentration at the root (0 disables noise)
    #[arg(long, default_value_t = default_dirichlet_alpha())]
    pub dirichlet_alpha: f32,

    /// Weight of the Dirichlet noise in the root prior
    #[arg(long, default_value_t = default_epsilon())]
    pub epsilon: f32,

    /// Passes over the training buffer per iteration
    #[arg(long, default_value_t = default_epochs())]
    pub epochs: usize,

    /// Training minibatch size
    #[arg(long, default_value_t = default_batch_size())]
    pub batch_size: usize,

    /// SGD step size
    #[arg(long, default_value_t = default_learning_rate())]
    pub learning_rate: f32,

    /// SGD momentum
    #[arg(long, default_value_t = default_momentum())]
    pub momentum: f32,

    /// L2 weight penalty
    #[arg(long, default_value_t = default_l2())]
    pub l2: f32,

    /// Arena games per iteration
    #[arg(long, default_value_t = default_num_eval_games())]
    pub num_eval_games: u32,

    /// Win rate the trained evaluator must exceed to be promoted
    #[arg(long, default_value_t = default_eval_win_rate())]
    pub eval_win_rate: f64,

    /// Directory for current_model and best_model checkpoints
    #[arg(long, default_value_t = default_model_dir())]
    pub model_dir: String,

    /// Start from the saved best model (true/false)
    #[arg(long, default_value_t = default_load_model(), action = clap::ArgAction::Set)]
    pub load_model: bool,

    /// Base seed for every random generator
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Worker threads for parallel games (0 = one per core)
    #[arg(long, default_value_t = default_num_workers())]
    pub num_workers: usize,

    /// Policy target recorded in training examples (visits, priors)
    #[arg(long, default_value_t = default_policy_target())]
    pub policy_target: String,

    /// Final move selection (argmax, sample)
    #[arg(long, default_value_t = default_move_selection())]
    pub move_selection: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_central(&CentralConfig::default())
    }
}

impl Config {
    /// Build a config straight from a central configuration.
    pub fn from_central(central: &CentralConfig) -> Self {
        Self {
            env_id: central.common.env_id.clone(),
            num_iterations: central.training.iterations,
            num_games: central.self_play.num_games,
            num_mcts_sims: central.mcts.num_simulations,
            c_puct: central.mcts.c_puct as f32,
            temperature_init: central.self_play.temperature_init as f32,
            temperature_final: central.self_play.temperature_final as f32,
            temperature_threshold: central.self_play.temperature_threshold,
            dirichlet_alpha: central.mcts.dirichlet_alpha as f32,
            epsilon: central.mcts.epsilon as f32,
            epochs: central.training.epochs,
            batch_size: central.training.batch_size,
            learning_rate: central.training.learning_rate as f32,
            momentum: central.training.momentum as f32,
            l2: central.training.l2 as f32,
            num_eval_games: central.evaluation.games,
            eval_win_rate: central.evaluation.win_rate,
            model_dir: central.common.model_dir.clone(),
            load_model: central.common.load_model,
            seed: central.common.seed,
            num_workers: central.self_play.num_workers,
            policy_target: central.self_play.policy_target.clone(),
            move_selection: central.mcts.move_selection.clone(),
            log_level: central.common.log_level.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.game_kind()?;
        self.move_selection()?;
        self.policy_target()?;

        if self.num_mcts_sims == 0 {
            return Err(anyhow!("num_mcts_sims must be greater than 0"));
        }
        if !(self.c_puct.is_finite() && self.c_puct >= 0.0) {
            return Err(anyhow!("c_puct must be a non-negative number"));
        }
        if !(self.temperature_init > 0.0 && self.temperature_final > 0.0) {
            return Err(anyhow!(
                "temperature_init and temperature_final must be greater than 0"
            ));
        }
        if !(self.dirichlet_alpha >= 0.0) {
            return Err(anyhow!("dirichlet_alpha must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(anyhow!("epsilon must be between 0 and 1"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be greater than 0"));
        }
        if !(self.learning_rate > 0.0) {
            return Err(anyhow!("learning_rate must be greater than 0"));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(anyhow!("momentum must be in [0, 1)"));
        }
        if !(self.l2 >= 0.0) {
            return Err(anyhow!("l2 must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.eval_win_rate) {
            return Err(anyhow!("eval_win_rate must be between 0 and 1"));
        }
        if self.model_dir.is_empty() {
            return Err(anyhow!("model_dir cannot be empty"));
        }
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn game_kind(&self) -> Result<GameKind> {
        Ok(self.env_id.parse::<GameKind>()?)
    }

    pub fn move_selection(&self) -> Result<MoveSelection> {
        self.move_selection.parse().map_err(|e: String| anyhow!(e))
    }

    pub fn policy_target(&self) -> Result<PolicyTarget> {
        self.policy_target.parse().map_err(|e: String| anyhow!(e))
    }

    pub fn model_dir(&self) -> PathBuf {
        PathBuf::from(&self.model_dir)
    }

    pub fn mcts_config(&self) -> Result<MctsConfig> {
        Ok(MctsConfig::default()
            .with_simulations(self.num_mcts_sims)
            .with_c_puct(self.c_puct)
            .with_noise(self.dirichlet_alpha, self.epsilon)
            .with_move_selection(self.move_selection()?))
    }

    pub fn self_play_settings(&self) -> Result<SelfPlaySettings> {
        Ok(SelfPlaySettings {
            num_games: self.num_games,
            temperature_init: self.temperature_init,
            temperature_final: self.temperature_final,
            temperature_threshold: self.temperature_threshold,
            policy_target: self.policy_target()?,
            num_workers: self.num_workers,
            seed: self.seed,
        })
    }

    pub fn train_settings(&self) -> TrainSettings {
        TrainSettings {
            iterations: self.num_iterations,
            eval_games: self.num_eval_games,
            eval_win_rate: self.eval_win_rate,
            load_model: self.load_model,
            seed: self.seed,
        }
    }

    pub fn linear_config(&self) -> LinearConfig {
        LinearConfig {
            epochs: self.epochs,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            l2: self.l2,
        }
    }
}
