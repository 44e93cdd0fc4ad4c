//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.env_id, "tictactoe");
    assert_eq!(config.common.model_dir, "./data/models");
    assert_eq!(config.common.log_level, "info");
    assert!(config.common.load_model);
    assert_eq!(config.common.seed, 42);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.mcts.num_simulations, 50);
    assert!((config.mcts.c_puct - 1.0).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_alpha - 0.6).abs() < f64::EPSILON);
    assert!((config.mcts.epsilon - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.mcts.move_selection, "argmax");
}

#[test]
fn test_self_play_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.self_play.num_games, 30);
    assert!((config.self_play.temperature_init - 1.0).abs() < f64::EPSILON);
    assert!((config.self_play.temperature_final - 0.01).abs() < f64::EPSILON);
    assert_eq!(config.self_play.temperature_threshold, 3);
    assert_eq!(config.self_play.policy_target, "visits");
    assert_eq!(config.self_play.num_workers, 0);
}

#[test]
fn test_training_and_evaluation_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.training.iterations, 10);
    assert_eq!(config.training.epochs, 10);
    assert_eq!(config.training.batch_size, 128);
    assert!((config.training.learning_rate - 0.01).abs() < f64::EPSILON);
    assert!((config.training.momentum - 0.9).abs() < f64::EPSILON);
    assert!((config.training.l2 - 0.0001).abs() < f64::EPSILON);
    assert_eq!(config.evaluation.games, 10);
    assert!((config.evaluation.win_rate - 0.55).abs() < f64::EPSILON);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let toml_str = r#"
[common]
env_id = "connect4"

[mcts]
num_simulations = 200
"#;
    let config: CentralConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.common.env_id, "connect4");
    assert_eq!(config.common.model_dir, "./data/models");
    assert_eq!(config.mcts.num_simulations, 200);
    assert!((config.mcts.c_puct - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.self_play, SelfPlayConfig::default());
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[self_play]\ntemperature_threshold = 8\npolicy_target = \"priors\""
    )
    .unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.self_play.temperature_threshold, 8);
    assert_eq!(config.self_play.policy_target, "priors");
    assert_eq!(config.self_play.num_games, 30);
}

#[test]
fn test_load_from_malformed_path_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[self_play\nnum_workers = ").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.self_play.num_workers, 0);
}

#[test]
fn test_load_from_missing_path_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from_path(&dir.path().join("missing.toml"));
    assert_eq!(config.self_play.temperature_threshold, 3);
}

#[test]
fn test_tabula_env_overrides() {
    // Keys here are not asserted by any other test, so parallel tests are unaffected.
    std::env::set_var("TABULA_EVALUATION_GAMES", "7");
    std::env::set_var("TABULA_TRAINING_L2", "0.5");
    std::env::set_var("TABULA_TRAINING_MOMENTUM", "not-a-number");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.evaluation.games, 7);
    assert!((config.training.l2 - 0.5).abs() < f64::EPSILON);
    assert!((config.training.momentum - 0.9).abs() < f64::EPSILON);

    std::env::remove_var("TABULA_EVALUATION_GAMES");
    std::env::remove_var("TABULA_TRAINING_L2");
    std::env::remove_var("TABULA_TRAINING_MOMENTUM");
}
