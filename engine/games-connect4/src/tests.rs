use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn play(moves: &[usize]) -> Connect4 {
    let mut game = Connect4::new();
    for &col in moves {
        game.apply_move(col).unwrap();
    }
    game
}

#[test]
fn test_initial_state() {
    let game = Connect4::new();
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.check_terminal(), None);
    assert_eq!(game.legal_actions(), (0..7).collect::<Vec<_>>());
    assert_eq!(game.observation().len(), BOARD_SIZE);
}

#[test]
fn test_gravity() {
    let game = play(&[3, 3, 3]);
    assert_eq!(game.cell(3, 0), 1);
    assert_eq!(game.cell(3, 1), 2);
    assert_eq!(game.cell(3, 2), 1);
    assert_eq!(game.column_height(3), 3);
}

#[test]
fn test_full_column_is_illegal() {
    let mut game = play(&[0, 0, 0, 0, 0, 0]);
    assert!(!game.legal_moves()[0]);
    assert!(!game.legal_actions().contains(&0));

    let before = game.clone();
    assert_eq!(game.apply_move(0), Err(GameError::IllegalMove { action: 0 }));
    assert_eq!(game, before);
}

#[test]
fn test_out_of_range_column() {
    let mut game = Connect4::new();
    assert_eq!(
        game.apply_move(7),
        Err(GameError::ActionOutOfRange { action: 7, size: 7 })
    );
}

#[test]
fn test_horizontal_win() {
    // Red: 0,1,2,3 on the bottom row; Yellow stacks on top
    let game = play(&[0, 0, 1, 1, 2, 2, 3]);
    assert_eq!(game.check_terminal(), Some(GameResult::Win(Player::One)));
    assert!(game.legal_actions().is_empty());
}

#[test]
fn test_vertical_win() {
    let game = play(&[0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(game.check_terminal(), Some(GameResult::Win(Player::One)));
}

#[test]
fn test_diagonal_win() {
    // Red builds a rising diagonal from (0,0) to (3,3)
    let game = play(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
    assert_eq!(game.check_terminal(), Some(GameResult::Win(Player::One)));
}

#[test]
fn test_yellow_can_win() {
    let game = play(&[0, 1, 0, 1, 0, 1, 6, 1]);
    assert_eq!(game.check_terminal(), Some(GameResult::Win(Player::Two)));
}

#[test]
fn test_observation_perspective() {
    let game = play(&[3]);
    // Yellow to move: Red's disc is the opponent's
    assert_eq!(game.observation()[Connect4::pos(3, 0)], -1.0);
}

#[test]
fn test_metadata_is_not_dihedral() {
    let meta = Connect4::new().metadata();
    assert_eq!(meta.num_actions, 7);
    assert_eq!(meta.board_size(), 42);
    assert!(!meta.supports_dihedral());
}

#[test]
fn test_display_bottom_row_last() {
    let game = play(&[0]);
    let text = game.to_string();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), ROWS + 1);
    assert_eq!(lines[ROWS - 1], "R . . . . . .");
}

#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut game = Connect4::new();

        while game.check_terminal().is_none() {
            let legal = game.legal_actions();
            assert!(!legal.is_empty(), "Non-terminal game must have legal moves (seed={})", seed);

            let action = legal[rng.gen_range(0..legal.len())];
            let prev_player = game.current_player();
            game.apply_move(action).unwrap();

            if let Some(GameResult::Win(winner)) = game.check_terminal() {
                assert_eq!(winner, prev_player, "Only the mover can win (seed={})", seed);
            }
        }

        assert!(game.ply() as usize <= BOARD_SIZE);
        let total: usize = (0..COLS).map(|c| game.column_height(c)).sum();
        assert_eq!(total, game.ply() as usize, "Heights must match move count (seed={})", seed);
    }
}
