use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn play(moves: &[usize]) -> TicTacToe {
    let mut game = TicTacToe::new();
    for &action in moves {
        game.apply_move(action).unwrap();
    }
    game
}

#[test]
fn test_initial_state() {
    let game = TicTacToe::new();
    assert_eq!(game.board(), &[0; 9]);
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.check_terminal(), None);
    assert_eq!(game.ply(), 0);
}

#[test]
fn test_legal_moves() {
    let game = TicTacToe::new();
    assert_eq!(game.legal_actions(), (0..9).collect::<Vec<_>>());
    assert_eq!(game.legal_moves().len(), game.action_space_size());

    // After one move
    let game = play(&[4]); // Center
    let legal = game.legal_actions();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
}

#[test]
fn test_apply_move() {
    let game = play(&[4]); // X places in center

    assert_eq!(game.board()[4], 1);
    assert_eq!(game.current_player(), Player::Two); // Now O's turn
    assert!(game.check_terminal().is_none());
}

#[test]
fn test_invalid_move() {
    let mut game = play(&[4]);
    let before = game;

    // Try to place in same position
    assert_eq!(game.apply_move(4), Err(GameError::IllegalMove { action: 4 }));
    assert_eq!(game, before); // Should be unchanged

    assert_eq!(
        game.apply_move(9),
        Err(GameError::ActionOutOfRange { action: 9, size: 9 })
    );
}

#[test]
fn test_winning_game() {
    // X wins with top row
    let game = play(&[0, 3, 1, 4, 2]);

    assert_eq!(game.check_terminal(), Some(GameResult::Win(Player::One)));
    assert!(game.legal_actions().is_empty());
    assert!(game.legal_moves().iter().all(|&legal| !legal));
}

#[test]
fn test_move_after_game_over() {
    let mut game = play(&[0, 3, 1, 4, 2]);
    assert_eq!(game.apply_move(8), Err(GameError::GameOver));
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let game = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(game.check_terminal(), Some(GameResult::Draw));
}

#[test]
fn test_all_winning_lines() {
    const LINES: [[usize; 3]; 8] = [
        [0, 1, 2],
        [3, 4, 5],
        [6, 7, 8],
        [0, 3, 6],
        [1, 4, 7],
        [2, 5, 8],
        [0, 4, 8],
        [2, 4, 6],
    ];

    for line in LINES {
        let mut board = [0u8; 9];
        for pos in line {
            board[pos] = 1;
        }
        // Two O stones elsewhere can never form a line
        let mut placed = 0;
        for cell in board.iter_mut() {
            if *cell == 0 && placed < 2 {
                *cell = 2;
                placed += 1;
            }
        }

        let game = TicTacToe::from_board(board).unwrap();
        assert_eq!(
            game.check_terminal().and_then(|r| r.winner()),
            Some(Player::One),
            "line {:?} should win for X",
            line
        );
    }
}

#[test]
fn test_from_board_rejects_impossible_counts() {
    assert!(TicTacToe::from_board([2, 2, 0, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(TicTacToe::from_board([1, 1, 0, 0, 0, 0, 0, 0, 0]).is_none());
    assert!(TicTacToe::from_board([3, 0, 0, 0, 0, 0, 0, 0, 0]).is_none());

    let game = TicTacToe::from_board([1, 0, 0, 0, 2, 0, 0, 0, 1]).unwrap();
    assert_eq!(game.current_player(), Player::Two);
    assert_eq!(game.ply(), 3);
}

#[test]
fn test_observation_is_canonical() {
    let game = play(&[0, 4]);
    // X to move: own stone +1, O stone -1
    let obs = game.observation();
    assert_eq!(obs.len(), 9);
    assert_eq!(obs[0], 1.0);
    assert_eq!(obs[4], -1.0);

    let game = play(&[0, 4, 8]);
    // O to move: perspective flips
    let obs = game.observation();
    assert_eq!(obs[0], -1.0);
    assert_eq!(obs[4], 1.0);
    assert_eq!(obs[8], -1.0);
}

#[test]
fn test_metadata() {
    let meta = TicTacToe::new().metadata();
    assert_eq!(meta.env_id, "tictactoe");
    assert_eq!(meta.num_actions, 9);
    assert!(meta.supports_dihedral());
}

#[test]
fn test_display() {
    let game = play(&[0, 4]);
    let text = game.to_string();
    assert!(text.starts_with("X . .\n. O .\n. . .\n"));
}

#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut game = TicTacToe::new();

        let mut move_count = 0;
        while game.check_terminal().is_none() {
            let legal = game.legal_actions();
            assert!(
                !legal.is_empty(),
                "Non-terminal game must have legal moves (seed={}, moves={})",
                seed,
                move_count
            );

            let action = legal[rng.gen_range(0..legal.len())];
            let prev_player = game.current_player();
            game.apply_move(action).unwrap();
            move_count += 1;

            assert_ne!(
                game.current_player(),
                prev_player,
                "Player should switch after move (seed={})",
                seed
            );

            if let Some(GameResult::Win(winner)) = game.check_terminal() {
                assert_eq!(winner, prev_player, "Only the mover can win (seed={})", seed);
            }
        }

        assert!(move_count <= 9, "Game should finish within 9 moves (seed={})", seed);
        assert!(game.legal_actions().is_empty());
    }
}
