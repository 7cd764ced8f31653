use std::collections::HashSet;
use std::time::Duration;

use threaded_snake::game::{
    Direction, GameConfig, GameEngine, GameState, Grid, Phase, Position, SharedGame, Snake,
    TickOutcome, spawn_update_engine,
};
use threaded_snake::input::{InputController, InputResponse, KeyAction};

fn seeded(config: GameConfig) -> GameConfig {
    GameConfig {
        seed: Some(1234),
        ..config
    }
}

fn game_at(segments: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> SharedGame {
    let state = GameState::new(
        Grid::new(600, 400, 20),
        Snake::from_segments(segments.iter().copied(), direction),
        food.into(),
    );
    SharedGame::with_state(GameEngine::new(seeded(GameConfig::classic())), state)
}

#[test]
fn eating_moves_head_onto_food_and_respawns_it() {
    let game = game_at(&[(300, 200)], Direction::Right, (320, 200));

    assert_eq!(game.apply_tick().unwrap(), TickOutcome::Ate);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.head(), Some(Position::new(320, 200)));
    assert_eq!(snapshot.snake.len(), 2);
    assert_eq!(snapshot.score, 1);
    assert_ne!(snapshot.food, Position::new(320, 200));
    assert!(!snapshot.snake.contains(&snapshot.food));
}

#[test]
fn leaving_left_edge_ends_game() {
    let game = game_at(&[(0, 200)], Direction::Left, (300, 300));

    game.apply_tick().unwrap();

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase, Phase::GameOver);
    assert_eq!(snapshot.snake, vec![Position::new(0, 200)]);
}

#[test]
fn plain_move_drops_tail() {
    let game = game_at(
        &[(100, 100), (120, 100), (140, 100)],
        Direction::Left,
        (500, 300),
    );

    assert_eq!(game.apply_tick().unwrap(), TickOutcome::Moved);

    let snapshot = game.snapshot();
    assert_eq!(
        snapshot.snake,
        vec![
            Position::new(80, 100),
            Position::new(100, 100),
            Position::new(120, 100)
        ]
    );
    assert_eq!(snapshot.phase, Phase::Playing);
}

#[test]
fn reversal_never_changes_next_direction() {
    let config = seeded(GameConfig::arcade());
    let controller = InputController::new(&config);
    let game = SharedGame::new(config);

    for direction in Direction::ALL {
        game.update(|state| {
            state.snake.direction = direction;
            state.next_direction = direction;
        });

        let response = controller.apply(&game, KeyAction::Move(direction.opposite()));

        assert_eq!(response, InputResponse::Ignored);
        assert_eq!(game.update(|state| state.next_direction), direction);
    }
}

#[tokio::test(start_paused = true)]
async fn input_is_committed_on_the_following_tick() {
    let config = seeded(GameConfig::arcade());
    let controller = InputController::new(&config);
    let game = SharedGame::new(config.clone());
    let start = game.snapshot().head().unwrap();

    let engine = spawn_update_engine(game.clone(), Duration::from_millis(100));

    // Ticks at 0 and 100 move right; the turn lands on the tick at 200
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        controller.apply(&game, KeyAction::Move(Direction::Down)),
        InputResponse::Applied
    );
    assert_eq!(game.snapshot().direction, Direction::Right);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let snapshot = game.snapshot();
    assert_eq!(snapshot.direction, Direction::Down);
    assert_eq!(snapshot.head(), Some(Position::new(start.x + 40, start.y + 20)));

    controller.apply(&game, KeyAction::Quit);
    let result = tokio::time::timeout(Duration::from_secs(1), engine).await;
    assert!(matches!(result, Ok(Ok(Ok(())))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_input_and_ticks_keep_invariants() {
    let config = seeded(GameConfig {
        tick_rate: 500,
        ..GameConfig::arcade()
    });
    let controller = InputController::new(&config);
    let game = SharedGame::new(config.clone());
    let engine = spawn_update_engine(game.clone(), config.tick_period());

    let turns = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    for step in 0..300 {
        controller.apply(&game, KeyAction::Move(turns[step % turns.len()]));
        if game.snapshot().phase == Phase::GameOver {
            controller.apply(&game, KeyAction::Restart);
        }

        let snapshot = game.snapshot();
        if snapshot.phase != Phase::GameOver {
            let unique: HashSet<_> = snapshot.snake.iter().collect();
            assert_eq!(unique.len(), snapshot.snake.len());
            assert!(!snapshot.snake.contains(&snapshot.food));
        }

        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    game.stop();
    let result = tokio::time::timeout(Duration::from_secs(1), engine).await;
    assert!(matches!(result, Ok(Ok(Ok(())))));
}
