use gym_snake::config::GridSize;
use gym_snake::env::{EnvConfig, Environment, SnakeEnv};
use gym_snake::game::{DeathReason, Game};
use gym_snake::input::{Action, Direction};
use gym_snake::observation::Encoding;
use gym_snake::snake::{Position, Snake};

const TEN: GridSize = GridSize {
    width: 10,
    height: 10,
};

fn body(game: &Game) -> Vec<Position> {
    game.snake().points().iter().copied().collect()
}

fn start_snake() -> Snake {
    Snake::new(Position::new(4, 4), Direction::Up)
}

fn game_with_food(food: Position) -> Game {
    Game::with_layout(TEN, start_snake(), food, 42).expect("layout fits")
}

#[test]
fn first_tick_moves_the_snake_up() {
    let fresh = Game::new_with_seed(TEN, 42).expect("board is valid");
    assert_eq!(body(&fresh), body(&game_with_food(Position::new(8, 8))));

    let mut game = game_with_food(Position::new(8, 8));

    assert_eq!(
        body(&game),
        vec![
            Position::new(4, 4),
            Position::new(4, 5),
            Position::new(4, 6)
        ]
    );
    assert_eq!(game.snake().heading(), Direction::Up);

    game.update().expect("game is running");

    assert_eq!(
        body(&game),
        vec![
            Position::new(4, 3),
            Position::new(4, 4),
            Position::new(4, 5)
        ]
    );
}

#[test]
fn stepping_onto_the_left_wall_ends_the_episode() {
    let mut game = game_with_food(Position::new(8, 8));

    game.input(Direction::Left);
    for _ in 0..3 {
        game.update().expect("game is running");
        assert!(!game.has_ended());
    }
    assert_eq!(game.snake().head(), Position::new(1, 4));

    game.update().expect("game is running");

    assert!(game.has_ended());
    assert!(!game.has_won());
    assert_eq!(game.snake().head().x, 0);
    assert_eq!(game.death_reason(), Some(DeathReason::WallCollision));
    assert!(game.observation(Encoding::SingleLayer).is_blank());
    assert!(game.observation(Encoding::TwoLayer).is_blank());
}

#[test]
fn eating_food_respawns_it_and_grows_on_the_following_tick() {
    let mut game = game_with_food(Position::new(4, 3));

    game.update().expect("game is running");

    assert!(game.ate_this_tick());
    assert_eq!(game.foods_eaten(), 1);
    assert_ne!(game.food(), Position::new(4, 3));
    assert!(!game.snake().occupies(game.food()));
    assert!(game.bounds().is_interior(game.food()));
    assert_eq!(game.snake().len(), 3);

    game.update().expect("game is running");

    assert_eq!(game.snake().len(), 4);
    assert_eq!(
        body(&game),
        vec![
            Position::new(4, 2),
            Position::new(4, 3),
            Position::new(4, 4),
            Position::new(4, 5)
        ]
    );
}

#[test]
fn environment_episode_runs_to_termination() {
    let mut env = SnakeEnv::new(EnvConfig {
        grid: TEN,
        encoding: Encoding::TwoLayer,
        seed: Some(42),
    })
    .expect("env should build");
    let first = env.reset().expect("reset should succeed");
    assert_eq!(first.shape(), (2, 10, 10));

    // Heading up from (4, 4) reaches the top wall within four ticks.
    let mut total_reward = 0.0;
    let mut terminated = false;
    for _ in 0..4 {
        let result = env.step(Action::Up).expect("episode running");
        assert!(result.reward == 0.0 || result.reward == 1.0);
        total_reward += result.reward;
        if result.terminated {
            assert!(result.observation.is_blank());
            terminated = true;
            break;
        }
    }

    assert!(terminated);
    assert_eq!(total_reward, env.game().foods_eaten() as f32);
}

#[test]
fn length_tracks_food_eaten_and_body_stays_distinct() {
    for seed in 0..20 {
        let mut game = Game::new_with_seed(TEN, seed).expect("board is valid");
        let headings = [
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Up,
        ];

        let mut previous_len = game.snake().len();
        let mut tick = 0;
        while !game.has_ended() && tick < 200 {
            if tick % 3 == 0 {
                game.input(headings[(tick / 3) % headings.len()]);
            }
            game.update().expect("game is running");
            tick += 1;

            let len = game.snake().len();
            assert!(len >= previous_len);
            previous_len = len;

            let pending_growth = usize::from(game.ate_this_tick());
            assert_eq!(len + pending_growth, 3 + game.foods_eaten() as usize);

            if !game.has_ended() {
                let points = body(&game);
                for (i, a) in points.iter().enumerate() {
                    assert!(!points[i + 1..].contains(a), "duplicate cell {a:?}");
                }
                assert!(!game.snake().occupies(game.food()));
                assert!(game.bounds().is_interior(game.food()));
            }
        }
    }
}

#[test]
fn has_ended_is_monotonic() {
    let snake = Snake::new(Position::new(1, 5), Direction::Left);
    let mut game = Game::with_layout(TEN, snake, Position::new(8, 8), 1).expect("layout fits");

    game.update().expect("game is running");
    assert!(game.has_ended());

    for _ in 0..3 {
        assert!(game.update().is_err());
        assert!(game.has_ended());
    }
}
