//! Central configuration for tabula.
//!
//! Values are resolved in three layers:
//!
//! 1. `config.defaults.toml` at the workspace root, embedded at compile time
//! 2. An optional `config.toml` (see [`CONFIG_SEARCH_PATHS`] and `TABULA_CONFIG`)
//! 3. `TABULA_<SECTION>_<KEY>` environment variables
//!
//! ```rust
//! use engine_config::{load_config, CentralConfig};
//!
//! let config: CentralConfig = load_config();
//! assert!(config.mcts.num_simulations > 0);
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
