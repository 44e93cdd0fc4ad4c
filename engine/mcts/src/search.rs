//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse tree using PUCT to find a leaf
//! 2. Evaluation: Get prior and value from the evaluator (or the exact
//!    outcome at a terminal leaf)
//! 3. Expansion: Add children to the leaf using the masked prior
//! 4. Backpropagation: Update statistics along the path, alternating sign
//!
//! The tree is owned by the caller so it can be carried across real moves
//! with [`MctsTree::advance`].

use engine_core::{Game, GameError};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{error, trace};

use crate::config::{MctsConfig, MoveSelection};
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::{MctsTree, TreeError};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Cannot search from a finished game")]
    TerminalRoot,

    #[error("No legal moves available in a running game")]
    NoLegalMoves,

    #[error("Masked prior sums to zero over {legal} legal actions")]
    DegeneratePriors { legal: usize },

    #[error("Evaluator returned {got} priors for an action space of {expected}")]
    PolicySizeMismatch { expected: usize, got: usize },
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Root child chosen to play
    pub child: NodeId,

    /// Action leading to `child`
    pub action: usize,

    /// Normalised root visit counts over the action space
    pub policy: Vec<f32>,

    /// Masked, normalised prior recorded when the root was expanded
    pub root_priors: Vec<f32>,

    /// Root value estimate for the player to move
    pub value: f32,

    /// Number of simulations performed by this call
    pub simulations: u32,
}

/// Search statistics accumulated across calls, for logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub searches: u64,
    pub simulations: u64,
    pub evaluations: u64,
    pub terminal_hits: u64,
}

/// PUCT search over a caller-owned tree.
///
/// Borrowing the evaluator and config keeps one immutable configuration
/// shared by every search in a run.
pub struct MctsSearch<'a, E: Evaluator> {
    evaluator: &'a E,
    config: &'a MctsConfig,
    stats: SearchStats,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    /// Create a new search bound to an evaluator and configuration.
    pub fn new(evaluator: &'a E, config: &'a MctsConfig) -> Self {
        Self {
            evaluator,
            config,
            stats: SearchStats::default(),
        }
    }

    /// Accumulated statistics.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Run `num_simulations` simulations from `root_state` into `tree` and
    /// pick the child to play.
    ///
    /// `tree` must describe `root_state`: either a fresh tree or the result
    /// of advancing the previous search's tree by the move actually played.
    pub fn search<G: Game>(
        &mut self,
        root_state: &G,
        tree: &mut MctsTree,
        temperature: f32,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult, SearchError> {
        if root_state.check_terminal().is_some() {
            return Err(SearchError::TerminalRoot);
        }
        let num_actions = root_state.action_space_size();

        for _ in 0..self.config.num_simulations {
            self.simulate(root_state, tree, num_actions, rng)?;
        }
        self.stats.searches += 1;

        let child = match self.config.move_selection {
            MoveSelection::ArgMax => tree.best_child(temperature),
            MoveSelection::Sample => sample_child(tree, temperature, rng),
        }
        .ok_or(SearchError::NoLegalMoves)?;
        let action = tree.get(child).action.ok_or(SearchError::NoLegalMoves)?;

        let root = tree.get(tree.root());
        Ok(SearchResult {
            child,
            action,
            policy: tree.root_policy(num_actions),
            root_priors: root.child_priors.clone(),
            // Root Q is stored from the previous mover's point of view
            value: -root.mean_value,
            simulations: self.config.num_simulations,
        })
    }

    /// Run a single simulation (select -> evaluate -> expand -> backpropagate).
    fn simulate<G: Game>(
        &mut self,
        root_state: &G,
        tree: &mut MctsTree,
        num_actions: usize,
        rng: &mut ChaCha20Rng,
    ) -> Result<(), SearchError> {
        self.stats.simulations += 1;

        // Selection: replay the chosen actions on a private clone
        let mut state = root_state.clone();
        let mut leaf = tree.root();
        let mut depth = 0u32;
        while let Some(child) = tree.select_child(leaf, self.config.c_puct) {
            let action = tree.get(child).action.ok_or(SearchError::NoLegalMoves)?;
            state.apply_move(action)?;
            leaf = child;
            depth += 1;
        }

        // Terminal leaves are scored exactly and never expanded
        if let Some(result) = state.check_terminal() {
            let value = result.value_for(state.current_player());
            tree.backpropagate(leaf, -value);
            self.stats.terminal_hits += 1;
            trace!(depth, value, "Terminal leaf");
            return Ok(());
        }

        let eval = self.evaluator.evaluate(&state.observation(), num_actions)?;
        self.stats.evaluations += 1;
        if eval.policy.len() != num_actions {
            return Err(SearchError::PolicySizeMismatch {
                expected: num_actions,
                got: eval.policy.len(),
            });
        }

        let mut priors = eval.policy;
        if leaf == tree.root() && !tree.get(leaf).is_expanded() && self.config.noise_enabled() {
            let noise = dirichlet_noise(num_actions, self.config.dirichlet_alpha, rng);
            let eps = self.config.epsilon;
            for (p, n) in priors.iter_mut().zip(noise) {
                *p = (1.0 - eps) * *p + eps * n;
            }
        }

        let legal = state.legal_moves();
        mask_and_normalize(&mut priors, &legal)?;
        tree.expand(leaf, priors, &legal)?;

        // The evaluator scores the position for the player to move there,
        // the leaf's statistics belong to the player who moved into it
        tree.backpropagate(leaf, -eval.value);

        trace!(
            leaf = leaf.0,
            depth,
            value = eval.value,
            "MCTS simulation complete"
        );

        Ok(())
    }
}

/// Zero illegal actions and renormalise the rest to sum to 1.
///
/// A zero denominator means the evaluator gave no mass to any legal move of a
/// running game, which is reported rather than patched up.
pub fn mask_and_normalize(priors: &mut [f32], legal: &[bool]) -> Result<(), SearchError> {
    let num_legal = legal.iter().filter(|&&l| l).count();
    if num_legal == 0 {
        return Err(SearchError::NoLegalMoves);
    }

    for (p, &is_legal) in priors.iter_mut().zip(legal) {
        if !is_legal {
            *p = 0.0;
        }
    }

    let sum: f32 = priors.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        error!(legal = num_legal, sum, "Degenerate prior after masking");
        return Err(SearchError::DegeneratePriors { legal: num_legal });
    }
    for p in priors.iter_mut() {
        *p /= sum;
    }
    Ok(())
}

/// Sample a root child from the tempered visit distribution.
fn sample_child(tree: &MctsTree, temperature: f32, rng: &mut ChaCha20Rng) -> Option<NodeId> {
    let dist = tree.tempered_distribution(temperature);
    if dist.is_empty() {
        return tree.best_child(temperature);
    }

    let probs: Vec<f32> = dist.iter().map(|&(_, p)| p).collect();
    sample_action(&probs, rng).map(|i| dist[i].0)
}

/// Sample an action index from a probability distribution.
pub fn sample_action(policy: &[f32], rng: &mut ChaCha20Rng) -> Option<usize> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in policy.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Some(i);
        }
    }

    // Rounding can leave the cumulative sum just under r
    policy.iter().rposition(|&p| p > 0.0)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
pub fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Vec<f32> {
    use rand_distr::{Distribution, Gamma};

    let Ok(gamma) = Gamma::new(alpha as f64, 1.0) else {
        return vec![1.0 / n.max(1) as f32; n];
    };
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        samples.fill(1.0 / n as f32);
    }

    samples
}
