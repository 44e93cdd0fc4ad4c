//! Self-play game generation.
//!
//! A [`SelfPlayRunner`] plays complete games of the current evaluator against
//! itself, searching before every move and carrying the chosen subtree over
//! to the next position. Each move becomes a [`TrainingExample`] whose value
//! is filled in once the game's outcome is known.

use std::io::IsTerminal;
use std::str::FromStr;

use anyhow::{Context, Result};
use engine_core::{Game, GameResult, Player};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{Evaluator, MctsConfig, MctsSearch, MctsTree, SearchError, TrainingExample};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::debug;

/// What a training example's policy target is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyTarget {
    /// Normalised root visit counts after the search
    #[default]
    VisitCounts,
    /// The masked prior the root was expanded with
    RootPriors,
}

impl FromStr for PolicyTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visits" | "visit_counts" => Ok(PolicyTarget::VisitCounts),
            "priors" | "root_priors" => Ok(PolicyTarget::RootPriors),
            other => Err(format!(
                "unknown policy target '{}', expected 'visits' or 'priors'",
                other
            )),
        }
    }
}

/// Settings for generating self-play games.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfPlaySettings {
    /// Games per call to [`SelfPlayRunner::play_games`]
    pub num_games: u32,
    /// Temperature for plies before `temperature_threshold`
    pub temperature_init: f32,
    /// Temperature from `temperature_threshold` on
    pub temperature_final: f32,
    pub temperature_threshold: u32,
    pub policy_target: PolicyTarget,
    /// Worker threads, 0 lets rayon pick
    pub num_workers: usize,
    pub seed: u64,
}

impl Default for SelfPlaySettings {
    fn default() -> Self {
        Self {
            num_games: 30,
            temperature_init: 1.0,
            temperature_final: 0.01,
            temperature_threshold: 3,
            policy_target: PolicyTarget::VisitCounts,
            num_workers: 0,
            seed: 42,
        }
    }
}

impl SelfPlaySettings {
    /// Search temperature for the move at `ply` (0-based).
    pub fn temperature_for(&self, ply: u32) -> f32 {
        if ply < self.temperature_threshold {
            self.temperature_init
        } else {
            self.temperature_final
        }
    }
}

/// A finished self-play game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// One example per move, in play order, values filled in
    pub examples: Vec<TrainingExample>,
    pub result: GameResult,
    pub plies: u32,
}

impl GameRecord {
    /// Outcome for the first player: +1, -1 or 0.
    pub fn outcome(&self) -> f32 {
        self.result.value_for(Player::One)
    }
}

/// Deterministic generator for one game.
///
/// Every `(seed, stream, index)` triple maps to its own ChaCha seed, so games
/// are reproducible whichever worker thread runs them.
pub fn game_rng(seed: u64, stream: u64, index: u64) -> ChaCha20Rng {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&stream.to_le_bytes());
    bytes[16..24].copy_from_slice(&index.to_le_bytes());
    ChaCha20Rng::from_seed(bytes)
}

/// Thread pool for independent games. `num_workers == 0` uses rayon's default.
pub(crate) fn thread_pool(num_workers: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .context("failed to build worker pool")
}

/// Progress bar over `len` games, hidden when stderr is not a terminal.
pub(crate) fn games_progress(len: u64, label: &'static str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})",
    )
    .map(|s| s.progress_chars("#>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_prefix(label);
    pb
}

/// Plays self-play games with one evaluator.
pub struct SelfPlayRunner<'a, E: Evaluator> {
    evaluator: &'a E,
    mcts: &'a MctsConfig,
    settings: &'a SelfPlaySettings,
}

impl<'a, E: Evaluator> SelfPlayRunner<'a, E> {
    pub fn new(evaluator: &'a E, mcts: &'a MctsConfig, settings: &'a SelfPlaySettings) -> Self {
        Self {
            evaluator,
            mcts,
            settings,
        }
    }

    /// Play one game from `initial` to the end.
    pub fn play_game<G: Game>(
        &self,
        initial: &G,
        rng: &mut ChaCha20Rng,
    ) -> Result<GameRecord, SearchError> {
        let mut search = MctsSearch::new(self.evaluator, self.mcts);
        let mut game = initial.clone();
        let mut tree = MctsTree::new();
        let mut pending: Vec<(TrainingExample, Player)> = Vec::new();
        let mut plies = 0u32;

        let result = loop {
            if let Some(result) = game.check_terminal() {
                break result;
            }

            let temperature = self.settings.temperature_for(plies);
            let observation = game.observation();
            let player = game.current_player();

            let searched = search.search(&game, &mut tree, temperature, rng)?;
            let policy = match self.settings.policy_target {
                PolicyTarget::VisitCounts => searched.policy,
                PolicyTarget::RootPriors => searched.root_priors,
            };
            pending.push((
                TrainingExample {
                    observation,
                    policy,
                    value: 0.0,
                },
                player,
            ));

            game.apply_move(searched.action)?;
            tree.advance(searched.action);
            plies += 1;
        };

        // Each example is scored for the player who was to move at that ply
        let examples = pending
            .into_iter()
            .map(|(mut example, player)| {
                example.value = result.value_for(player);
                example
            })
            .collect();

        let stats = search.stats();
        debug!(
            plies,
            outcome = result.value_for(Player::One),
            simulations = stats.simulations,
            terminal_hits = stats.terminal_hits,
            "Self-play game finished"
        );

        Ok(GameRecord {
            examples,
            result,
            plies,
        })
    }

    /// Play `num_games` independent games in parallel.
    ///
    /// Game `i` of `iteration` always uses the same generator, and records
    /// come back in game order.
    pub fn play_games<G: Game>(&self, initial: &G, iteration: u32) -> Result<Vec<GameRecord>> {
        let total = self.settings.num_games;
        let pool = thread_pool(self.settings.num_workers)?;
        let pb = games_progress(total as u64, "self-play");

        let records = pool.install(|| {
            (0..total)
                .into_par_iter()
                .map(|index| {
                    let mut rng = game_rng(self.settings.seed, iteration as u64, index as u64);
                    let record = self.play_game(initial, &mut rng);
                    pb.inc(1);
                    record
                })
                .collect::<Result<Vec<_>, _>>()
        });
        pb.finish_and_clear();

        records.with_context(|| format!("self-play failed in iteration {}", iteration))
    }
}
