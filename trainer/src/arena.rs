//! Head-to-head matches between two evaluators.
//!
//! Each side searches with its own evaluator and its own tree. After every
//! real move both trees advance, so a side keeps whatever it had already
//! explored below the new position. Results are tallied for the "current"
//! evaluator, which alternates between moving first and second.

use anyhow::{Context, Result};
use engine_core::{Game, Player};
use mcts::{Evaluator, MctsConfig, MctsSearch, MctsTree, SearchError};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::self_play::{game_rng, games_progress, thread_pool};

/// Win/loss/draw tally from the current evaluator's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl ArenaStats {
    /// Record one game outcome: positive is a win, negative a loss.
    pub fn record(&mut self, outcome: f32) {
        if outcome > 0.0 {
            self.wins += 1;
        } else if outcome < 0.0 {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }

    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// `wins / (wins + losses)`. Draws do not count and no decisive game
    /// gives 0.
    pub fn win_rate(&self) -> f64 {
        let decisive = self.wins + self.losses;
        if decisive == 0 {
            return 0.0;
        }
        self.wins as f64 / decisive as f64
    }
}

/// Plays `current` against `best`.
pub struct Arena<'a, C: Evaluator, B: Evaluator> {
    current: &'a C,
    best: &'a B,
    mcts: &'a MctsConfig,
    temperature: f32,
    num_workers: usize,
    seed: u64,
}

impl<'a, C: Evaluator, B: Evaluator> Arena<'a, C, B> {
    pub fn new(current: &'a C, best: &'a B, mcts: &'a MctsConfig, temperature: f32) -> Self {
        Self {
            current,
            best,
            mcts,
            temperature,
            num_workers: 0,
            seed: 0,
        }
    }

    /// Builder pattern: worker threads for parallel games.
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Builder pattern: base seed for the per-game generators.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Play one game, returning the outcome for `current`: +1, -1 or 0.
    pub fn play_game<G: Game>(
        &self,
        initial: &G,
        current_first: bool,
        rng: &mut ChaCha20Rng,
    ) -> Result<f32, SearchError> {
        let current_player = if current_first {
            Player::One
        } else {
            Player::Two
        };
        let mut current_search = MctsSearch::new(self.current, self.mcts);
        let mut best_search = MctsSearch::new(self.best, self.mcts);
        let mut current_tree = MctsTree::new();
        let mut best_tree = MctsTree::new();
        let mut game = initial.clone();

        let result = loop {
            if let Some(result) = game.check_terminal() {
                break result;
            }

            let searched = if game.current_player() == current_player {
                current_search.search(&game, &mut current_tree, self.temperature, rng)?
            } else {
                best_search.search(&game, &mut best_tree, self.temperature, rng)?
            };

            game.apply_move(searched.action)?;
            current_tree.advance(searched.action);
            best_tree.advance(searched.action);
        };

        let outcome = result.value_for(current_player);
        debug!(current_first, outcome, plies = game.ply(), "Arena game finished");
        Ok(outcome)
    }

    /// Play `num_games` games in parallel, alternating who moves first.
    ///
    /// `stream` separates the generators of different matches sharing a seed.
    pub fn play_match<G: Game>(
        &self,
        initial: &G,
        num_games: u32,
        stream: u64,
    ) -> Result<ArenaStats> {
        let pool = thread_pool(self.num_workers)?;
        let pb = games_progress(num_games as u64, "arena");

        let outcomes = pool.install(|| {
            (0..num_games)
                .into_par_iter()
                .map(|index| {
                    let mut rng = game_rng(self.seed, stream, index as u64);
                    let outcome = self.play_game(initial, index % 2 == 0, &mut rng);
                    pb.inc(1);
                    outcome
                })
                .collect::<Result<Vec<f32>, _>>()
        });
        pb.finish_and_clear();

        let mut stats = ArenaStats::default();
        for outcome in outcomes.context("arena game failed")? {
            stats.record(outcome);
        }
        Ok(stats)
    }
}
