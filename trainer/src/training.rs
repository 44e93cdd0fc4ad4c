//! The self-play training loop.
//!
//! Every iteration generates games with the current evaluator, trains on
//! their augmented examples and then pits the trained evaluator against the
//! best one so far. The trained weights are kept only if they win often
//! enough; otherwise the best weights are reloaded.

use anyhow::{Context, Result};
use engine_core::Game;
use mcts::{EvaluatorError, MctsConfig, TrainStats, TrainableEvaluator};
use tracing::{info, warn};

use crate::arena::{Arena, ArenaStats};
use crate::augment::DataAugmenter;
use crate::self_play::{game_rng, SelfPlayRunner, SelfPlaySettings};

/// Checkpoint of the evaluator just before training
pub const CURRENT_MODEL: &str = "current_model";
/// Checkpoint of the best evaluator so far
pub const BEST_MODEL: &str = "best_model";

/// Generator stream for the training shuffle, disjoint from game streams
const TRAIN_STREAM: u64 = u64::MAX;
/// Arena generators use `ARENA_STREAM_BASE + iteration`
const ARENA_STREAM_BASE: u64 = 1 << 32;

/// Settings for the outer training loop.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSettings {
    pub iterations: u32,
    /// Arena games per iteration
    pub eval_games: u32,
    /// Promotion threshold on [`ArenaStats::win_rate`]
    pub eval_win_rate: f64,
    /// Start from the saved best checkpoint
    pub load_model: bool,
    pub seed: u64,
}

impl Default for TrainSettings {
    fn default() -> Self {
        Self {
            iterations: 10,
            eval_games: 10,
            eval_win_rate: 0.55,
            load_model: true,
            seed: 42,
        }
    }
}

/// Whether an arena result is good enough to replace the best evaluator.
pub fn decide_promotion(stats: &ArenaStats, threshold: f64) -> bool {
    stats.win_rate() > threshold
}

/// What happened in one iteration.
#[derive(Debug, Clone)]
pub struct IterationSummary {
    pub iteration: u32,
    pub games: usize,
    /// Examples in the training buffer after augmentation
    pub examples: usize,
    pub train: TrainStats,
    pub arena: ArenaStats,
    pub promoted: bool,
}

/// Drives self-play, training and evaluation for one evaluator.
pub struct Trainer<'a, E: TrainableEvaluator> {
    evaluator: E,
    mcts: &'a MctsConfig,
    self_play: &'a SelfPlaySettings,
    settings: &'a TrainSettings,
    augmenter: DataAugmenter,
}

impl<'a, E: TrainableEvaluator> Trainer<'a, E> {
    pub fn new(
        evaluator: E,
        mcts: &'a MctsConfig,
        self_play: &'a SelfPlaySettings,
        settings: &'a TrainSettings,
        augmenter: DataAugmenter,
    ) -> Self {
        Self {
            evaluator,
            mcts,
            self_play,
            settings,
            augmenter,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Load the best checkpoint if asked to, then make sure one exists.
    ///
    /// A missing checkpoint is not an error: training starts from the fresh
    /// evaluator, which becomes the first best model.
    pub fn prepare(&mut self) -> Result<()> {
        if self.settings.load_model {
            match self.evaluator.load(BEST_MODEL) {
                Ok(()) => info!("Loaded {}", BEST_MODEL),
                Err(EvaluatorError::CheckpointNotFound(path)) => {
                    warn!(
                        path = %path.display(),
                        "No best model checkpoint, starting from a fresh evaluator"
                    );
                }
                Err(e) => return Err(e).context("failed to load best model"),
            }
        } else if self.evaluator.has_checkpoint(BEST_MODEL) {
            warn!("Model loading disabled, replacing the existing {}", BEST_MODEL);
        }
        self.evaluator
            .save(BEST_MODEL)
            .context("failed to save initial best model")
    }

    /// Run every iteration from `initial`.
    pub fn run<G: Game>(&mut self, initial: &G) -> Result<Vec<IterationSummary>> {
        self.prepare()?;
        (1..=self.settings.iterations)
            .map(|iteration| self.run_iteration(initial, iteration))
            .collect()
    }

    /// One round of self-play, training, arena and promotion.
    ///
    /// On entry the evaluator holds the best weights.
    pub fn run_iteration<G: Game>(
        &mut self,
        initial: &G,
        iteration: u32,
    ) -> Result<IterationSummary> {
        let records = SelfPlayRunner::new(&self.evaluator, self.mcts, self.self_play)
            .play_games(initial, iteration)?;

        let buffer: Vec<_> = records
            .iter()
            .flat_map(|record| self.augmenter.augment_all(&record.examples))
            .collect();
        let first_player_wins = records.iter().filter(|r| r.outcome() > 0.0).count();
        let draws = records.iter().filter(|r| r.outcome() == 0.0).count();
        info!(
            iteration,
            games = records.len(),
            examples = buffer.len(),
            first_player_wins,
            draws,
            "Self-play complete"
        );

        let previous_best = self.evaluator.clone();
        self.evaluator
            .save(CURRENT_MODEL)
            .context("failed to checkpoint current model")?;

        let mut rng = game_rng(self.settings.seed, TRAIN_STREAM, iteration as u64);
        let train = self
            .evaluator
            .train(&buffer, &mut rng)
            .context("training failed")?;
        info!(
            iteration,
            policy_loss = train.policy_loss,
            value_loss = train.value_loss,
            batches = train.batches,
            "Training complete"
        );

        let arena = Arena::new(
            &self.evaluator,
            &previous_best,
            self.mcts,
            self.self_play.temperature_final,
        )
        .with_workers(self.self_play.num_workers)
        .with_seed(self.settings.seed)
        .play_match(
            initial,
            self.settings.eval_games,
            ARENA_STREAM_BASE + iteration as u64,
        )?;

        let promoted = decide_promotion(&arena, self.settings.eval_win_rate);
        if promoted {
            self.evaluator
                .save(BEST_MODEL)
                .context("failed to save best model")?;
        } else {
            self.evaluator
                .load(BEST_MODEL)
                .context("failed to reload best model")?;
        }
        info!(
            iteration,
            wins = arena.wins,
            losses = arena.losses,
            draws = arena.draws,
            win_rate = format!("{:.3}", arena.win_rate()),
            promoted,
            "Arena complete"
        );

        Ok(IterationSummary {
            iteration,
            games: records.len(),
            examples: buffer.len(),
            train,
            arena,
            promoted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::TicTacToe;
    use mcts::{Evaluator, LinearConfig, LinearEvaluator, TrainingExample, UniformEvaluator};

    fn quick_settings() -> (MctsConfig, SelfPlaySettings, TrainSettings) {
        let mcts = MctsConfig::default().with_simulations(10);
        let self_play = SelfPlaySettings {
            num_games: 2,
            num_workers: 2,
            ..SelfPlaySettings::default()
        };
        let settings = TrainSettings {
            iterations: 2,
            eval_games: 4,
            ..TrainSettings::default()
        };
        (mcts, self_play, settings)
    }

    fn linear(dir: &std::path::Path) -> LinearEvaluator {
        let config = LinearConfig {
            epochs: 2,
            batch_size: 16,
            ..LinearConfig::default()
        };
        LinearEvaluator::new(9, 9, config, dir)
    }

    #[test]
    fn test_promotion_threshold() {
        let promote = ArenaStats {
            wins: 6,
            losses: 4,
            draws: 0,
        };
        assert!(decide_promotion(&promote, 0.55));

        let reject = ArenaStats {
            wins: 4,
            losses: 6,
            draws: 0,
        };
        assert!(!decide_promotion(&reject, 0.55));

        // Strictly greater than the threshold
        let equal = ArenaStats {
            wins: 11,
            losses: 9,
            draws: 3,
        };
        assert!(!decide_promotion(&equal, 0.55));

        // Only draws never promote
        let draws = ArenaStats {
            wins: 0,
            losses: 0,
            draws: 10,
        };
        assert!(!decide_promotion(&draws, 0.0));
    }

    #[test]
    fn test_prepare_without_checkpoint_creates_best_model() {
        let dir = tempfile::tempdir().unwrap();
        let (mcts, self_play, settings) = quick_settings();
        let mut trainer = Trainer::new(
            linear(dir.path()),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&TicTacToe::new().metadata()),
        );

        trainer.prepare().unwrap();
        assert!(dir.path().join("best_model.json").exists());
    }

    #[test]
    fn test_prepare_without_loading_replaces_best_model() {
        let dir = tempfile::tempdir().unwrap();
        let (mcts, self_play, mut settings) = quick_settings();
        settings.load_model = false;
        let game = TicTacToe::new();

        let mut trained = linear(dir.path());
        let example = TrainingExample {
            observation: game.observation(),
            policy: {
                let mut p = vec![0.0; 9];
                p[0] = 1.0;
                p
            },
            value: 1.0,
        };
        trained.train(&[example], &mut game_rng(0, 0, 0)).unwrap();
        trained.save(BEST_MODEL).unwrap();

        let fresh = linear(dir.path());
        assert!(fresh.has_checkpoint(BEST_MODEL));
        let mut trainer = Trainer::new(
            fresh,
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&game.metadata()),
        );
        trainer.prepare().unwrap();

        // The fresh weights now sit on disk in place of the trained ones
        let mut reloaded = linear(dir.path());
        reloaded.load(BEST_MODEL).unwrap();
        let obs = game.observation();
        let policy = reloaded.evaluate(&obs, 9).unwrap().policy;
        for p in &policy {
            assert!((p - 1.0 / 9.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_prepare_loads_saved_best_model() {
        let dir = tempfile::tempdir().unwrap();
        let (mcts, self_play, settings) = quick_settings();
        let game = TicTacToe::new();

        // Save a trained evaluator as best
        let mut trained = linear(dir.path());
        let example = TrainingExample {
            observation: game.observation(),
            policy: {
                let mut p = vec![0.0; 9];
                p[4] = 1.0;
                p
            },
            value: 1.0,
        };
        trained.train(&[example], &mut game_rng(0, 0, 0)).unwrap();
        trained.save(BEST_MODEL).unwrap();

        let mut trainer = Trainer::new(
            linear(dir.path()),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&game.metadata()),
        );
        trainer.prepare().unwrap();

        let obs = game.observation();
        let expected = trained.evaluate(&obs, 9).unwrap();
        let loaded = trainer.evaluator().evaluate(&obs, 9).unwrap();
        assert_eq!(expected.policy, loaded.policy);
    }

    #[test]
    fn test_run_writes_checkpoints_and_reports_every_iteration() {
        let dir = tempfile::tempdir().unwrap();
        let (mcts, self_play, settings) = quick_settings();
        let game = TicTacToe::new();
        let mut trainer = Trainer::new(
            linear(dir.path()),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&game.metadata()),
        );

        let summaries = trainer.run(&game).unwrap();
        assert_eq!(summaries.len(), 2);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.iteration, i as u32 + 1);
            assert_eq!(summary.games, 2);
            assert_eq!(summary.arena.games(), 4);
            assert_eq!(
                summary.promoted,
                decide_promotion(&summary.arena, settings.eval_win_rate)
            );
            // Tic-tac-toe examples are expanded eightfold
            assert_eq!(summary.examples % 8, 0);
            assert!(summary.examples > 0);
        }
        assert!(dir.path().join("current_model.json").exists());
        assert!(dir.path().join("best_model.json").exists());
    }

    #[test]
    fn test_rejected_iteration_restores_best_weights() {
        let dir = tempfile::tempdir().unwrap();
        let (mcts, self_play, _) = quick_settings();
        // An unreachable threshold rejects every trained evaluator
        let settings = TrainSettings {
            iterations: 1,
            eval_games: 2,
            eval_win_rate: 1.0,
            ..TrainSettings::default()
        };
        let game = TicTacToe::new();
        let mut trainer = Trainer::new(
            linear(dir.path()),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&game.metadata()),
        );

        trainer.prepare().unwrap();
        let before = trainer.evaluator().evaluate(&game.observation(), 9).unwrap();
        let summary = trainer.run_iteration(&game, 1).unwrap();
        assert!(!summary.promoted);

        let after = trainer.evaluator().evaluate(&game.observation(), 9).unwrap();
        assert_eq!(before.policy, after.policy);
        assert_eq!(before.value, after.value);
    }

    #[test]
    fn test_uniform_evaluator_runs_without_disk() {
        let (mcts, self_play, settings) = quick_settings();
        let game = TicTacToe::new();
        let mut trainer = Trainer::new(
            UniformEvaluator::new(),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&game.metadata()),
        );
        let summaries = trainer.run(&game).unwrap();
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.train.batches == 0));
    }
}
