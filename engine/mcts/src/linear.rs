//! Trainable linear evaluator.
//!
//! A softmax-linear policy head and a tanh-linear value head over the
//! canonical observation. Small enough to train on the CPU inside the
//! self-play loop, and a concrete stand-in for the network behind
//! [`TrainableEvaluator`]. Checkpoints are JSON files named
//! `<model_dir>/<name>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluator::{
    EvalResult, Evaluator, EvaluatorError, TrainStats, TrainableEvaluator, TrainingExample,
};

/// Optimiser settings for [`LinearEvaluator::train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Passes over the training buffer per call
    pub epochs: usize,
    /// Minibatch size
    pub batch_size: usize,
    /// SGD step size
    pub learning_rate: f32,
    /// Momentum coefficient
    pub momentum: f32,
    /// L2 penalty on weights (biases excluded)
    pub l2: f32,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 128,
            learning_rate: 0.01,
            momentum: 0.9,
            l2: 1e-4,
        }
    }
}

/// Parameters of both heads. Also used for gradients and momentum buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LinearWeights {
    input_size: usize,
    num_actions: usize,
    /// Row-major `num_actions x input_size`
    policy_w: Vec<f32>,
    policy_b: Vec<f32>,
    value_w: Vec<f32>,
    value_b: f32,
}

impl LinearWeights {
    fn zeros(input_size: usize, num_actions: usize) -> Self {
        Self {
            input_size,
            num_actions,
            policy_w: vec![0.0; input_size * num_actions],
            policy_b: vec![0.0; num_actions],
            value_w: vec![0.0; input_size],
            value_b: 0.0,
        }
    }

    fn policy(&self, obs: &[f32]) -> Vec<f32> {
        let logits: Vec<f32> = (0..self.num_actions)
            .map(|a| {
                let row = &self.policy_w[a * self.input_size..(a + 1) * self.input_size];
                row.iter().zip(obs).map(|(w, x)| w * x).sum::<f32>() + self.policy_b[a]
            })
            .collect();
        softmax(&logits)
    }

    /// Length of the first parameter vector that disagrees with the header,
    /// as `(expected, got)`.
    fn shape_error(&self) -> Option<(usize, usize)> {
        [
            (self.input_size * self.num_actions, self.policy_w.len()),
            (self.num_actions, self.policy_b.len()),
            (self.input_size, self.value_w.len()),
        ]
        .into_iter()
        .find(|(expected, got)| expected != got)
    }

    fn value(&self, obs: &[f32]) -> f32 {
        let z: f32 = self.value_w.iter().zip(obs).map(|(w, x)| w * x).sum::<f32>() + self.value_b;
        z.tanh()
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Linear policy/value evaluator with JSON checkpoints.
#[derive(Debug, Clone)]
pub struct LinearEvaluator {
    weights: LinearWeights,
    velocity: LinearWeights,
    config: LinearConfig,
    model_dir: PathBuf,
}

impl LinearEvaluator {
    /// Fresh evaluator: uniform prior and zero value everywhere.
    pub fn new(
        input_size: usize,
        num_actions: usize,
        config: LinearConfig,
        model_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            weights: LinearWeights::zeros(input_size, num_actions),
            velocity: LinearWeights::zeros(input_size, num_actions),
            config,
            model_dir: model_dir.into(),
        }
    }

    /// Directory holding the checkpoints
    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Path of the checkpoint saved under `name`
    pub fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.model_dir.join(format!("{}.json", name))
    }

    fn check_obs(&self, obs: &[f32]) -> Result<(), EvaluatorError> {
        if obs.len() != self.weights.input_size {
            return Err(EvaluatorError::ShapeMismatch {
                expected: self.weights.input_size,
                got: obs.len(),
            });
        }
        Ok(())
    }

    /// Accumulate the gradient of one example into `grad`, returning its
    /// policy cross-entropy and squared value error.
    fn accumulate(&self, example: &TrainingExample, grad: &mut LinearWeights) -> (f32, f32) {
        let w = &self.weights;
        let obs = &example.observation;
        let n = w.input_size;

        let probs = w.policy(obs);
        let mut policy_loss = 0.0;
        for a in 0..w.num_actions {
            let target = example.policy[a];
            if target > 0.0 {
                policy_loss -= target * (probs[a] + 1e-8).ln();
            }
            let g = probs[a] - target;
            grad.policy_b[a] += g;
            for (gw, x) in grad.policy_w[a * n..(a + 1) * n].iter_mut().zip(obs) {
                *gw += g * x;
            }
        }

        let value = w.value(obs);
        let err = value - example.value;
        let g = 2.0 * err * (1.0 - value * value);
        grad.value_b += g;
        for (gw, x) in grad.value_w.iter_mut().zip(obs) {
            *gw += g * x;
        }

        (policy_loss, err * err)
    }

    fn apply_step(&mut self, grad: &LinearWeights, batch_len: usize) {
        let LinearConfig {
            learning_rate,
            momentum,
            l2,
            ..
        } = self.config;
        let scale = 1.0 / batch_len as f32;

        let step = |w: &mut [f32], v: &mut [f32], g: &[f32], decay: f32| {
            for ((w, v), g) in w.iter_mut().zip(v.iter_mut()).zip(g) {
                *v = momentum * *v + g * scale + decay * *w;
                *w -= learning_rate * *v;
            }
        };

        step(&mut self.weights.policy_w, &mut self.velocity.policy_w, &grad.policy_w, l2);
        step(&mut self.weights.policy_b, &mut self.velocity.policy_b, &grad.policy_b, 0.0);
        step(&mut self.weights.value_w, &mut self.velocity.value_w, &grad.value_w, l2);

        self.velocity.value_b = momentum * self.velocity.value_b + grad.value_b * scale;
        self.weights.value_b -= learning_rate * self.velocity.value_b;
    }
}

impl Evaluator for LinearEvaluator {
    fn evaluate(&self, obs: &[f32], num_actions: usize) -> Result<EvalResult, EvaluatorError> {
        self.check_obs(obs)?;
        if num_actions != self.weights.num_actions {
            return Err(EvaluatorError::ShapeMismatch {
                expected: self.weights.num_actions,
                got: num_actions,
            });
        }
        Ok(EvalResult {
            policy: self.weights.policy(obs),
            value: self.weights.value(obs),
        })
    }
}

impl TrainableEvaluator for LinearEvaluator {
    fn train(
        &mut self,
        examples: &[TrainingExample],
        rng: &mut ChaCha20Rng,
    ) -> Result<TrainStats, EvaluatorError> {
        for example in examples {
            self.check_obs(&example.observation)?;
            if example.policy.len() != self.weights.num_actions {
                return Err(EvaluatorError::ShapeMismatch {
                    expected: self.weights.num_actions,
                    got: example.policy.len(),
                });
            }
        }
        if examples.is_empty() || self.config.epochs == 0 {
            return Ok(TrainStats::default());
        }

        let batch_size = self.config.batch_size.max(1);
        let mut order: Vec<usize> = (0..examples.len()).collect();
        let mut stats = TrainStats::default();

        for epoch in 0..self.config.epochs {
            order.shuffle(rng);
            let mut policy_total = 0.0;
            let mut value_total = 0.0;

            for batch in order.chunks(batch_size) {
                let mut grad =
                    LinearWeights::zeros(self.weights.input_size, self.weights.num_actions);
                for &idx in batch {
                    let (p, v) = self.accumulate(&examples[idx], &mut grad);
                    policy_total += p;
                    value_total += v;
                }
                self.apply_step(&grad, batch.len());
                stats.batches += 1;
            }

            stats.policy_loss = policy_total / examples.len() as f32;
            stats.value_loss = value_total / examples.len() as f32;
            debug!(
                epoch,
                policy_loss = stats.policy_loss,
                value_loss = stats.value_loss,
                "Training epoch complete"
            );
        }

        Ok(stats)
    }

    fn save(&self, name: &str) -> Result<(), EvaluatorError> {
        fs::create_dir_all(&self.model_dir)?;
        let path = self.checkpoint_path(name);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&self.weights)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "Saved checkpoint");
        Ok(())
    }

    fn load(&mut self, name: &str) -> Result<(), EvaluatorError> {
        let path = self.checkpoint_path(name);
        if !path.exists() {
            return Err(EvaluatorError::CheckpointNotFound(path));
        }
        let weights: LinearWeights = serde_json::from_slice(&fs::read(&path)?)?;
        if weights.input_size != self.weights.input_size
            || weights.num_actions != self.weights.num_actions
        {
            return Err(EvaluatorError::ShapeMismatch {
                expected: self.weights.input_size * self.weights.num_actions,
                got: weights.input_size * weights.num_actions,
            });
        }
        if let Some((expected, got)) = weights.shape_error() {
            return Err(EvaluatorError::ShapeMismatch { expected, got });
        }

        self.weights = weights;
        self.velocity =
            LinearWeights::zeros(self.weights.input_size, self.weights.num_actions);
        debug!(path = %path.display(), "Loaded checkpoint");
        Ok(())
    }

    fn has_checkpoint(&self, name: &str) -> bool {
        self.checkpoint_path(name).exists()
    }
}
