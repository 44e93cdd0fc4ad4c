//! Default configuration values loaded from config.defaults.toml.
//!
//! The TOML file is the single source of truth for defaults. It is parsed
//! once, on first access.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    self_play: SelfPlayDefaults,
    training: TrainingDefaults,
    evaluation: EvaluationDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    env_id: String,
    model_dir: String,
    log_level: String,
    load_model: bool,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    c_puct: f64,
    dirichlet_alpha: f64,
    epsilon: f64,
    move_selection: String,
}

#[derive(Debug, Deserialize)]
struct SelfPlayDefaults {
    num_games: u32,
    temperature_init: f64,
    temperature_final: f64,
    temperature_threshold: u32,
    policy_target: String,
    num_workers: usize,
}

#[derive(Debug, Deserialize)]
struct TrainingDefaults {
    iterations: u32,
    epochs: usize,
    batch_size: usize,
    learning_rate: f64,
    momentum: f64,
    l2: f64,
}

#[derive(Debug, Deserialize)]
struct EvaluationDefaults {
    games: u32,
    win_rate: f64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn env_id() -> &'static str {
    &DEFAULTS.common.env_id
}
pub fn model_dir() -> &'static str {
    &DEFAULTS.common.model_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn load_model() -> bool {
    DEFAULTS.common.load_model
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn epsilon() -> f64 {
    DEFAULTS.mcts.epsilon
}
pub fn move_selection() -> &'static str {
    &DEFAULTS.mcts.move_selection
}

// Self-play
pub fn num_games() -> u32 {
    DEFAULTS.self_play.num_games
}
pub fn temperature_init() -> f64 {
    DEFAULTS.self_play.temperature_init
}
pub fn temperature_final() -> f64 {
    DEFAULTS.self_play.temperature_final
}
pub fn temperature_threshold() -> u32 {
    DEFAULTS.self_play.temperature_threshold
}
pub fn policy_target() -> &'static str {
    &DEFAULTS.self_play.policy_target
}
pub fn num_workers() -> usize {
    DEFAULTS.self_play.num_workers
}

// Training
pub fn iterations() -> u32 {
    DEFAULTS.training.iterations
}
pub fn epochs() -> usize {
    DEFAULTS.training.epochs
}
pub fn batch_size() -> usize {
    DEFAULTS.training.batch_size
}
pub fn learning_rate() -> f64 {
    DEFAULTS.training.learning_rate
}
pub fn momentum() -> f64 {
    DEFAULTS.training.momentum
}
pub fn l2() -> f64 {
    DEFAULTS.training.l2
}

// Evaluation
pub fn eval_games() -> u32 {
    DEFAULTS.evaluation.games
}
pub fn eval_win_rate() -> f64 {
    DEFAULTS.evaluation.win_rate
}
