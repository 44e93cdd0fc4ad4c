//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the TABULA_CONFIG environment variable
/// 2. Each entry of [`CONFIG_SEARCH_PATHS`]
///
/// Falls back to the embedded defaults when no file is found. Environment
/// variable overrides are applied last in every case.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("TABULA_CONFIG") {
        let path = Path::new(&path);
        if path.exists() {
            info!("Loading config from TABULA_CONFIG: {}", path.display());
            return load_from_path(path);
        }
        warn!(
            "TABULA_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// A file that cannot be read or parsed is reported and replaced by the
/// built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Replace `target` with the parsed value of `key`, if set.
///
/// A value that does not parse is reported and ignored.
fn override_from_env<T: FromStr>(target: &mut T, key: &str) {
    let Ok(raw) = std::env::var(key) else {
        return;
    };
    match raw.parse() {
        Ok(value) => *target = value,
        Err(_) => warn!("Ignoring {}={:?}: not a valid value", key, raw),
    }
}

/// Apply `TABULA_<SECTION>_<KEY>` environment variable overrides.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    let common = &mut config.common;
    override_from_env(&mut common.env_id, "TABULA_COMMON_ENV_ID");
    override_from_env(&mut common.model_dir, "TABULA_COMMON_MODEL_DIR");
    override_from_env(&mut common.log_level, "TABULA_COMMON_LOG_LEVEL");
    override_from_env(&mut common.load_model, "TABULA_COMMON_LOAD_MODEL");
    override_from_env(&mut common.seed, "TABULA_COMMON_SEED");

    let mcts = &mut config.mcts;
    override_from_env(&mut mcts.num_simulations, "TABULA_MCTS_NUM_SIMULATIONS");
    override_from_env(&mut mcts.c_puct, "TABULA_MCTS_C_PUCT");
    override_from_env(&mut mcts.dirichlet_alpha, "TABULA_MCTS_DIRICHLET_ALPHA");
    override_from_env(&mut mcts.epsilon, "TABULA_MCTS_EPSILON");
    override_from_env(&mut mcts.move_selection, "TABULA_MCTS_MOVE_SELECTION");

    let self_play = &mut config.self_play;
    override_from_env(&mut self_play.num_games, "TABULA_SELF_PLAY_NUM_GAMES");
    override_from_env(
        &mut self_play.temperature_init,
        "TABULA_SELF_PLAY_TEMPERATURE_INIT",
    );
    override_from_env(
        &mut self_play.temperature_final,
        "TABULA_SELF_PLAY_TEMPERATURE_FINAL",
    );
    override_from_env(
        &mut self_play.temperature_threshold,
        "TABULA_SELF_PLAY_TEMPERATURE_THRESHOLD",
    );
    override_from_env(&mut self_play.policy_target, "TABULA_SELF_PLAY_POLICY_TARGET");
    override_from_env(&mut self_play.num_workers, "TABULA_SELF_PLAY_NUM_WORKERS");

    let training = &mut config.training;
    override_from_env(&mut training.iterations, "TABULA_TRAINING_ITERATIONS");
    override_from_env(&mut training.epochs, "TABULA_TRAINING_EPOCHS");
    override_from_env(&mut training.batch_size, "TABULA_TRAINING_BATCH_SIZE");
    override_from_env(&mut training.learning_rate, "TABULA_TRAINING_LEARNING_RATE");
    override_from_env(&mut training.momentum, "TABULA_TRAINING_MOMENTUM");
    override_from_env(&mut training.l2, "TABULA_TRAINING_L2");

    let evaluation = &mut config.evaluation;
    override_from_env(&mut evaluation.games, "TABULA_EVALUATION_GAMES");
    override_from_env(&mut evaluation.win_rate, "TABULA_EVALUATION_WIN_RATE");

    config
}
