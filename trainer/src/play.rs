//! Human versus AI play on the terminal.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use engine_core::{Game, GameResult, Player};
use mcts::{Evaluator, MctsConfig, MctsSearch, MctsTree};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// Read one legal action index, re-prompting on bad input.
///
/// Fails only when the input ends.
fn read_action<G: Game, R: BufRead, W: Write>(
    game: &G,
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    let legal = game.legal_moves();
    loop {
        write!(output, "Your move (0-{}): ", legal.len().saturating_sub(1))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before the game finished");
        }
        match line.trim().parse::<usize>() {
            Ok(action) if legal.get(action).copied().unwrap_or(false) => return Ok(action),
            Ok(action) => writeln!(output, "{} is not a legal move", action)?,
            Err(_) => writeln!(output, "Enter an action index")?,
        }
    }
}

/// Play one game between a human on `input`/`output` and a searching AI.
///
/// The AI reuses its tree across moves, advancing it past the human's moves
/// as well as its own.
#[allow(clippy::too_many_arguments)]
pub fn play_human<G, E, R, W>(
    initial: &G,
    evaluator: &E,
    mcts: &MctsConfig,
    temperature: f32,
    human_first: bool,
    input: &mut R,
    output: &mut W,
    rng: &mut ChaCha20Rng,
) -> Result<GameResult>
where
    G: Game,
    E: Evaluator,
    R: BufRead,
    W: Write,
{
    let human = if human_first { Player::One } else { Player::Two };
    let mut search = MctsSearch::new(evaluator, mcts);
    let mut tree = MctsTree::new();
    let mut game = initial.clone();

    writeln!(output, "{}", game)?;
    let result = loop {
        if let Some(result) = game.check_terminal() {
            break result;
        }

        let action = if game.current_player() == human {
            read_action(&game, input, output)?
        } else {
            let searched = search
                .search(&game, &mut tree, temperature, rng)
                .context("AI search failed")?;
            debug!(action = searched.action, value = searched.value, "AI move");
            writeln!(output, "AI plays {}", searched.action)?;
            searched.action
        };

        game.apply_move(action)?;
        tree.advance(action);
        writeln!(output, "{}", game)?;
    };

    let message = match result.winner() {
        None => "Draw",
        Some(winner) if winner == human => "You win",
        Some(_) => "AI wins",
    };
    writeln!(output, "{}", message)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::self_play::game_rng;
    use games_tictactoe::TicTacToe;
    use mcts::UniformEvaluator;
    use std::io::Cursor;

    #[test]
    fn test_bad_input_is_reprompted() {
        let game = TicTacToe::from_board([1, 2, 1, 1, 2, 2, 2, 1, 0]).unwrap();
        let mut input = Cursor::new("abc\n4\n8\n");
        let mut output = Vec::new();

        let action = read_action(&game, &mut input, &mut output).unwrap();
        assert_eq!(action, 8);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Enter an action index"));
        assert!(text.contains("4 is not a legal move"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let game = TicTacToe::new();
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(read_action(&game, &mut input, &mut output).is_err());
    }

    #[test]
    fn test_human_completes_a_line() {
        // X X . / O O . / . . . with the human as X
        let game = TicTacToe::from_board([1, 1, 0, 2, 2, 0, 0, 0, 0]).unwrap();
        let evaluator = UniformEvaluator::new();
        let mcts = MctsConfig::for_testing().with_simulations(20);
        let mut input = Cursor::new("2\n");
        let mut output = Vec::new();

        let result = play_human(
            &game,
            &evaluator,
            &mcts,
            0.01,
            true,
            &mut input,
            &mut output,
            &mut game_rng(0, 0, 0),
        )
        .unwrap();
        assert_eq!(result, GameResult::Win(Player::One));
        assert!(String::from_utf8(output).unwrap().contains("You win"));
    }

    #[test]
    fn test_ai_takes_the_win() {
        // Human is O and passes up the block; the AI (X) then wins
        let game = TicTacToe::from_board([1, 1, 0, 2, 0, 0, 0, 0, 0]).unwrap();
        let evaluator = UniformEvaluator::new();
        let mcts = MctsConfig::for_testing().with_simulations(100);
        let mut input = Cursor::new("8\n");
        let mut output = Vec::new();

        let result = play_human(
            &game,
            &evaluator,
            &mcts,
            0.01,
            false,
            &mut input,
            &mut output,
            &mut game_rng(0, 0, 0),
        )
        .unwrap();
        assert_eq!(result, GameResult::Win(Player::One));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("AI plays 2"));
        assert!(text.contains("AI wins"));
    }
}
