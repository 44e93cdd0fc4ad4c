//! tabula - AlphaZero-style self-play training
//!
//! `tabula train` runs the self-play, training and arena loop for the
//! configured game, checkpointing `current_model` and `best_model` under the
//! model directory. `tabula play` pits a human on the terminal against the
//! best model.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine_core::Game;
use engine_games::GameVisitor;
use mcts::{EvaluatorError, LinearEvaluator, TrainableEvaluator};
use tracing::{info, warn};

use trainer::self_play::game_rng;
use trainer::training::BEST_MODEL;
use trainer::{play_human, Config, DataAugmenter, Trainer};

#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(about = "AlphaZero-style self-play training for board games")]
#[command(
    long_about = "Trains a game evaluator from scratch through tree search and self-play.

Options default to config.toml with TABULA_<SECTION>_<KEY> environment
variable overrides. Command-line flags take highest priority."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the self-play training loop
    Train {
        #[command(flatten)]
        config: Config,
    },
    /// Play against the best model
    Play {
        #[command(flatten)]
        config: Config,

        /// Move first instead of the AI
        #[arg(long)]
        human_first: bool,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("failed to initialise tracing")
}

/// Fresh evaluator sized for `initial`'s observation and action space.
fn new_evaluator<G: Game>(config: &Config, initial: &G) -> LinearEvaluator {
    LinearEvaluator::new(
        initial.observation().len(),
        initial.action_space_size(),
        config.linear_config(),
        config.model_dir(),
    )
}

struct TrainCommand<'a> {
    config: &'a Config,
}

impl GameVisitor for TrainCommand<'_> {
    type Output = Result<()>;

    fn visit<G: Game + Default>(self, initial: G) -> Result<()> {
        let mcts = self.config.mcts_config()?;
        let self_play = self.config.self_play_settings()?;
        let settings = self.config.train_settings();

        let mut trainer = Trainer::new(
            new_evaluator(self.config, &initial),
            &mcts,
            &self_play,
            &settings,
            DataAugmenter::new(&initial.metadata()),
        );
        let summaries = trainer.run(&initial)?;

        let promotions = summaries.iter().filter(|s| s.promoted).count();
        info!(
            iterations = summaries.len(),
            promotions,
            model_dir = %self.config.model_dir,
            "Training finished"
        );
        Ok(())
    }
}

struct PlayCommand<'a> {
    config: &'a Config,
    human_first: bool,
}

impl GameVisitor for PlayCommand<'_> {
    type Output = Result<()>;

    fn visit<G: Game + Default>(self, initial: G) -> Result<()> {
        let mcts = self.config.mcts_config()?;
        let mut evaluator = new_evaluator(self.config, &initial);
        match evaluator.load(BEST_MODEL) {
            Ok(()) => info!("Loaded {}", BEST_MODEL),
            Err(EvaluatorError::CheckpointNotFound(path)) => warn!(
                path = %path.display(),
                "No best model checkpoint, playing against a fresh evaluator"
            ),
            Err(e) => return Err(e).context("failed to load best model"),
        }

        let mut input = std::io::stdin().lock();
        let mut output = std::io::stdout();
        let mut rng = game_rng(self.config.seed, 0, 0);
        play_human(
            &initial,
            &evaluator,
            &mcts,
            self.config.temperature_final,
            self.human_first,
            &mut input,
            &mut output,
            &mut rng,
        )?;
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.command {
        Command::Train { config } | Command::Play { config, .. } => config,
    };

    config.validate()?;
    init_tracing(&config.log_level)?;

    let kind = config.game_kind()?;
    let meta = kind.metadata();
    info!(
        env_id = kind.env_id(),
        actions = meta.num_actions,
        board = format!("{}x{}", meta.board_width, meta.board_height),
        "Game selected"
    );

    match &cli.command {
        Command::Train { config } => kind.dispatch(TrainCommand { config }),
        Command::Play {
            config,
            human_first,
        } => kind.dispatch(PlayCommand {
            config,
            human_first: *human_first,
        }),
    }
}
