//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// How the move to play is picked from the root's children after search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveSelection {
    /// Child maximising `visit_count^(1/T)`. The transform is monotonic, so
    /// this is the most visited child for every positive temperature.
    #[default]
    ArgMax,
    /// Sample a child from the normalised `visit_count^(1/T)` distribution.
    Sample,
}

impl std::str::FromStr for MoveSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argmax" | "arg_max" | "greedy" => Ok(MoveSelection::ArgMax),
            "sample" => Ok(MoveSelection::Sample),
            other => Err(format!(
                "unknown move selection '{}', expected 'argmax' or 'sample'",
                other
            )),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of simulations to run per search.
    pub num_simulations: u32,

    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Dirichlet noise concentration for root exploration.
    /// Set to 0.0 to disable noise.
    pub dirichlet_alpha: f32,

    /// Fraction of the root prior that comes from Dirichlet noise.
    /// 0.25 means 75% prior + 25% noise.
    pub epsilon: f32,

    /// Final move selection rule.
    pub move_selection: MoveSelection,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: 50,
            c_puct: 1.0,
            dirichlet_alpha: 0.6,
            epsilon: 0.25,
            move_selection: MoveSelection::ArgMax,
        }
    }
}

impl MctsConfig {
    /// Create a fast, noise-free config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            c_puct: 1.0,
            dirichlet_alpha: 0.0,
            epsilon: 0.0,
            move_selection: MoveSelection::ArgMax,
        }
    }

    /// Whether root priors receive Dirichlet noise.
    #[inline]
    pub fn noise_enabled(&self) -> bool {
        self.dirichlet_alpha > 0.0 && self.epsilon > 0.0
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set Dirichlet alpha and mixing fraction.
    pub fn with_noise(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.epsilon = epsilon;
        self
    }

    /// Builder pattern: set the final move selection rule.
    pub fn with_move_selection(mut self, selection: MoveSelection) -> Self {
        self.move_selection = selection;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_simulations, 50);
        assert!((config.c_puct - 1.0).abs() < 1e-6);
        assert_eq!(config.move_selection, MoveSelection::ArgMax);
        assert!(config.noise_enabled());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(100)
            .with_noise(0.0, 0.25)
            .with_move_selection(MoveSelection::Sample);

        assert_eq!(config.num_simulations, 100);
        assert!(!config.noise_enabled());
        assert_eq!(config.move_selection, MoveSelection::Sample);
    }

    #[test]
    fn test_parse_move_selection() {
        assert_eq!("argmax".parse::<MoveSelection>(), Ok(MoveSelection::ArgMax));
        assert_eq!("Sample".parse::<MoveSelection>(), Ok(MoveSelection::Sample));
        assert!("softmax".parse::<MoveSelection>().is_err());
    }
}
