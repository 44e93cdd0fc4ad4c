//! Dihedral data augmentation.
//!
//! On a square board whose actions are its cells, each of the 8 symmetries
//! of the square maps a position and its policy target to another equally
//! valid pair with the same value. Other games pass examples through as is.

use engine_core::GameMetadata;
use mcts::TrainingExample;

/// Number of symmetries of the square, identity included
pub const DIHEDRAL_TRANSFORMS: usize = 8;

/// Expands training examples with board symmetries.
#[derive(Debug, Clone)]
pub struct DataAugmenter {
    /// For each transform, `perm[dst] = src` over board cells
    permutations: Vec<Vec<usize>>,
}

impl DataAugmenter {
    pub fn new(metadata: &GameMetadata) -> Self {
        let permutations = if metadata.supports_dihedral() {
            let n = metadata.board_width;
            (0..DIHEDRAL_TRANSFORMS)
                .map(|t| dihedral_permutation(n, t))
                .collect()
        } else {
            Vec::new()
        };
        Self { permutations }
    }

    /// Whether examples are expanded at all
    pub fn is_symmetric(&self) -> bool {
        !self.permutations.is_empty()
    }

    /// All symmetric images of `example`, the identity first.
    ///
    /// Returns the example alone when the game has no dihedral symmetry or
    /// the vectors do not match the board.
    pub fn augment(&self, example: &TrainingExample) -> Vec<TrainingExample> {
        let cells = self.permutations.first().map_or(0, Vec::len);
        if !self.is_symmetric()
            || example.observation.len() != cells
            || example.policy.len() != cells
        {
            return vec![example.clone()];
        }

        self.permutations
            .iter()
            .map(|perm| TrainingExample {
                observation: perm.iter().map(|&src| example.observation[src]).collect(),
                policy: perm.iter().map(|&src| example.policy[src]).collect(),
                value: example.value,
            })
            .collect()
    }

    /// Augment every example of a buffer.
    pub fn augment_all(&self, examples: &[TrainingExample]) -> Vec<TrainingExample> {
        examples.iter().flat_map(|ex| self.augment(ex)).collect()
    }
}

/// Cell permutation for transform `t` of an `n x n` board.
///
/// `t % 4` quarter turns clockwise, followed by a left-right mirror when
/// `t >= 4`. Entry `dst` holds the source cell that lands on `dst`.
fn dihedral_permutation(n: usize, t: usize) -> Vec<usize> {
    let mut perm = vec![0; n * n];
    for row in 0..n {
        for col in 0..n {
            let (mut r, mut c) = (row, col);
            for _ in 0..t % 4 {
                (r, c) = (c, n - 1 - r);
            }
            if t >= 4 {
                c = n - 1 - c;
            }
            perm[r * n + c] = row * n + col;
        }
    }
    perm
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Game;
    use games_connect4::Connect4;
    use games_othello::Othello;
    use games_tictactoe::TicTacToe;

    fn distinct_example() -> TrainingExample {
        let observation: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let total: f32 = (1..=9).sum::<i32>() as f32;
        let policy: Vec<f32> = (1..=9).map(|i| i as f32 / total).collect();
        TrainingExample {
            observation,
            policy,
            value: -1.0,
        }
    }

    #[test]
    fn test_permutations_are_bijections() {
        for t in 0..DIHEDRAL_TRANSFORMS {
            let mut perm = dihedral_permutation(3, t);
            perm.sort_unstable();
            assert_eq!(perm, (0..9).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_quarter_turn_moves_corner() {
        // Top-left goes to top-right under one clockwise turn
        let perm = dihedral_permutation(3, 1);
        assert_eq!(perm[2], 0);
        // Mirror alone swaps the left and right columns
        let perm = dihedral_permutation(3, 4);
        assert_eq!(perm[0], 2);
        assert_eq!(perm[4], 4);
    }

    #[test]
    fn test_eight_distinct_consistent_images() {
        let augmenter = DataAugmenter::new(&TicTacToe::new().metadata());
        let example = distinct_example();
        let images = augmenter.augment(&example);

        assert_eq!(images.len(), 8);
        assert_eq!(images[0], example);
        for (i, a) in images.iter().enumerate() {
            for b in &images[i + 1..] {
                assert_ne!(a.observation, b.observation);
            }
        }

        for image in &images {
            assert_eq!(image.value, example.value);
            // Observation values are their own source indices, so they spell
            // out the permutation; the policy must follow the same one.
            let perm: Vec<usize> = image.observation.iter().map(|&v| v as usize).collect();
            let mut sorted = perm.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..9).collect::<Vec<_>>());
            for (dst, &src) in perm.iter().enumerate() {
                assert_eq!(image.policy[dst], example.policy[src]);
            }
            assert!((image.policy.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_images_are_real_positions() {
        let mut game = TicTacToe::new();
        game.apply_move(0).unwrap();
        game.apply_move(4).unwrap();
        let mut policy = vec![0.0; 9];
        policy[1] = 1.0;
        let example = TrainingExample {
            observation: game.observation(),
            policy,
            value: 0.0,
        };

        let augmenter = DataAugmenter::new(&game.metadata());
        for image in augmenter.augment(&example) {
            // The X stone moves between corners, O stays in the centre
            let corners = [0, 2, 6, 8];
            let stones: Vec<usize> = (0..9).filter(|&i| image.observation[i] != 0.0).collect();
            assert_eq!(stones.len(), 2);
            assert!(stones.contains(&4));
            assert!(stones.iter().any(|s| corners.contains(s)));
            // The target stays on an edge cell
            let target = image.policy.iter().position(|&p| p == 1.0).unwrap();
            assert!([1, 3, 5, 7].contains(&target));
        }
    }

    #[test]
    fn test_othello_is_augmented() {
        let game = Othello::new();
        let augmenter = DataAugmenter::new(&game.metadata());
        let example = TrainingExample {
            observation: game.observation(),
            policy: vec![1.0 / 36.0; 36],
            value: 1.0,
        };
        assert_eq!(augmenter.augment(&example).len(), 8);
    }

    #[test]
    fn test_asymmetric_game_passes_through() {
        let game = Connect4::new();
        let augmenter = DataAugmenter::new(&game.metadata());
        assert!(!augmenter.is_symmetric());

        let example = TrainingExample {
            observation: game.observation(),
            policy: vec![1.0 / 7.0; 7],
            value: 0.0,
        };
        assert_eq!(augmenter.augment(&example), vec![example.clone()]);
        assert_eq!(augmenter.augment_all(&[example.clone(), example]).len(), 2);
    }
}
