//! Evaluator traits for position evaluation.
//!
//! The evaluator provides a prior (action probabilities) and a value estimate
//! for game positions. In AlphaZero this is a neural network. The search only
//! needs [`Evaluator`]; the training loop also needs [`TrainableEvaluator`]
//! to fit, persist and restore parameters.

use std::path::PathBuf;

use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during evaluation, training or persistence.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Expected an observation of {expected} values, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Checkpoint not found: {}", .0.display())]
    CheckpointNotFound(PathBuf),

    #[error("Checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of evaluating a game position.
#[derive(Debug, Clone)]
pub struct EvalResult {
    /// Raw prior over the whole action space, index i is action i.
    /// Illegal actions may carry mass; the search masks them.
    pub policy: Vec<f32>,

    /// Value estimate for the player to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

/// One recorded search decision, the unit of training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// Canonical observation of the position before the move
    pub observation: Vec<f32>,

    /// Policy target over the action space, sums to 1
    pub policy: Vec<f32>,

    /// Final outcome for the player to move at this position: +1, -1 or 0
    pub value: f32,
}

/// Summary of one call to [`TrainableEvaluator::train`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrainStats {
    /// Mean policy cross-entropy over the last epoch
    pub policy_loss: f32,
    /// Mean squared value error over the last epoch
    pub value_loss: f32,
    /// Minibatch updates applied across all epochs
    pub batches: usize,
}

/// Trait for position evaluators.
///
/// Implementations must be shareable across self-play worker threads; the
/// search only ever borrows them immutably.
pub trait Evaluator: Send + Sync {
    /// Evaluate a single canonical observation.
    ///
    /// # Arguments
    /// * `obs` - Board from the perspective of the player to move
    /// * `num_actions` - Size of the action space
    ///
    /// # Returns
    /// Prior over all `num_actions` actions and a value estimate
    fn evaluate(&self, obs: &[f32], num_actions: usize) -> Result<EvalResult, EvaluatorError>;
}

/// An evaluator whose parameters can be fitted and checkpointed by name.
pub trait TrainableEvaluator: Evaluator + Clone {
    /// Fit the parameters to `examples`. Epoch and batch settings belong to
    /// the implementation.
    fn train(
        &mut self,
        examples: &[TrainingExample],
        rng: &mut ChaCha20Rng,
    ) -> Result<TrainStats, EvaluatorError>;

    /// Persist the parameters under `name`.
    fn save(&self, name: &str) -> Result<(), EvaluatorError>;

    /// Restore parameters previously saved under `name`.
    ///
    /// Returns [`EvaluatorError::CheckpointNotFound`] when nothing was saved
    /// under that name, leaving the current parameters untouched.
    fn load(&mut self, name: &str) -> Result<(), EvaluatorError>;

    /// Whether a checkpoint is already stored under `name`.
    fn has_checkpoint(&self, _name: &str) -> bool {
        false
    }
}

/// Uniform evaluator that assigns equal probability to every action.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _obs: &[f32], num_actions: usize) -> Result<EvalResult, EvaluatorError> {
        if num_actions == 0 {
            return Ok(EvalResult {
                policy: Vec::new(),
                value: 0.0,
            });
        }
        Ok(EvalResult {
            policy: vec![1.0 / num_actions as f32; num_actions],
            value: 0.0,
        })
    }
}

impl TrainableEvaluator for UniformEvaluator {
    fn train(
        &mut self,
        _examples: &[TrainingExample],
        _rng: &mut ChaCha20Rng,
    ) -> Result<TrainStats, EvaluatorError> {
        Ok(TrainStats::default())
    }

    fn save(&self, _name: &str) -> Result<(), EvaluatorError> {
        Ok(())
    }

    fn load(&mut self, _name: &str) -> Result<(), EvaluatorError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_evaluator() {
        let eval = UniformEvaluator::new();
        let result = eval.evaluate(&[0.0; 9], 9).unwrap();

        let expected_prob = 1.0 / 9.0;
        for p in &result.policy {
            assert!((p - expected_prob).abs() < 1e-6);
        }

        // Value should be neutral
        assert!(result.value.abs() < 1e-6);
    }

    #[test]
    fn test_uniform_evaluator_empty_action_space() {
        let eval = UniformEvaluator::new();
        let result = eval.evaluate(&[], 0).unwrap();
        assert!(result.policy.is_empty());
    }

    #[test]
    fn test_uniform_training_is_noop() {
        let mut eval = UniformEvaluator::new();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let example = TrainingExample {
            observation: vec![0.0; 9],
            policy: vec![1.0 / 9.0; 9],
            value: 1.0,
        };
        let stats = eval.train(&[example], &mut rng).unwrap();
        assert_eq!(stats.batches, 0);
        assert!(eval.save("best_model").is_ok());
        assert!(eval.load("best_model").is_ok());
    }
}
