use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use gym_snake::config::{
    DEFAULT_ENV_GRID, DEFAULT_PLAY_GRID, DEFAULT_TICK_INTERVAL_MS, GridSize, RunConfig,
};
use gym_snake::env::{EnvConfig, Environment, SnakeEnv};
use gym_snake::error::GameError;
use gym_snake::game::Game;
use gym_snake::input::{Action, Direction, GameInput, InputHandler};
use gym_snake::observation::Encoding;
use gym_snake::renderer::{self, Screen, TileCanvas};
use gym_snake::terminal_runtime::TerminalSession;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gym-snake", version, about)]
struct Cli {
    /// JSON file with default settings; flags override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board width including the wall ring.
    #[arg(long, global = true)]
    width: Option<u16>,

    /// Board height including the wall ring.
    #[arg(long, global = true)]
    height: Option<u16>,

    /// Seed for food placement and the random agent.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play in the terminal with the arrow keys.
    Play {
        /// Milliseconds per tick.
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Run a uniformly random agent through the environment.
    Simulate {
        #[arg(long, default_value_t = 10)]
        episodes: u32,

        /// Steps after which an episode is cut off.
        #[arg(long, default_value_t = 1_000)]
        max_steps: u64,

        #[arg(long, value_enum)]
        encoding: Option<Encoding>,

        /// Draw every step in the terminal, pausing this many milliseconds.
        #[arg(long)]
        watch_ms: Option<u64>,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.command {
        // Raw mode owns the terminal; stay quiet unless RUST_LOG asks otherwise.
        Command::Play { .. } | Command::Simulate { watch_ms: Some(_), .. } => "off",
        Command::Simulate { .. } => "info",
    };
    init_tracing(default_filter);

    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path).map_err(io::Error::other)?,
        None => RunConfig::default(),
    };
    config.width = cli.width.or(config.width);
    config.height = cli.height.or(config.height);
    config.seed = cli.seed.or(config.seed);

    match cli.command {
        Command::Play { tick_ms } => {
            let grid = config.grid(DEFAULT_PLAY_GRID).map_err(io::Error::other)?;
            let tick_ms = tick_ms
                .or(config.tick_ms)
                .unwrap_or(DEFAULT_TICK_INTERVAL_MS);
            play(grid, config.seed, Duration::from_millis(tick_ms))
        }
        Command::Simulate {
            episodes,
            max_steps,
            encoding,
            watch_ms,
        } => {
            let env_config = EnvConfig {
                grid: config.grid(DEFAULT_ENV_GRID).map_err(io::Error::other)?,
                encoding: encoding.or(config.encoding).unwrap_or_default(),
                seed: config.seed,
            };
            simulate(
                env_config,
                episodes,
                max_steps,
                watch_ms.map(Duration::from_millis),
            )
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn play(grid: GridSize, seed: Option<u64>, tick_interval: Duration) -> io::Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();

    let mut episode = 0;
    let mut game = new_game(grid, seed, episode)?;
    let mut canvas = TileCanvas::new(&game);
    let mut screen = Screen::Start;
    let mut pending_direction: Option<Direction> = None;
    let mut last_tick = Instant::now();

    loop {
        session.draw(|frame| renderer::render(frame, &game, &canvas, screen))?;

        let timeout = screen.poll_timeout(tick_interval, last_tick.elapsed());
        match input.poll_input(timeout)? {
            Some(GameInput::Quit) => break,
            Some(GameInput::Confirm) if screen == Screen::Start => {
                screen = Screen::Playing;
                last_tick = Instant::now();
            }
            Some(GameInput::Confirm) if screen == Screen::GameOver => {
                episode += 1;
                game = new_game(grid, seed, episode)?;
                canvas = TileCanvas::new(&game);
                pending_direction = None;
                screen = Screen::Start;
            }
            Some(GameInput::Direction(direction)) if screen == Screen::Playing => {
                // At most one heading change reaches the game per tick.
                pending_direction = Some(direction);
            }
            _ => {}
        }

        if screen == Screen::Playing && last_tick.elapsed() >= tick_interval {
            if let Some(direction) = pending_direction.take() {
                game.input(direction);
            }
            game.update()?;
            canvas.sync(&game);
            last_tick = Instant::now();

            if game.has_ended() {
                tracing::info!(
                    episode,
                    eaten = game.foods_eaten(),
                    ticks = game.tick_count(),
                    won = game.has_won(),
                    reason = ?game.death_reason(),
                    "game over"
                );
                screen = Screen::GameOver;
            }
        }
    }

    Ok(())
}

fn new_game(grid: GridSize, seed: Option<u64>, episode: u64) -> Result<Game, GameError> {
    match seed {
        Some(seed) => Game::new_with_seed(grid, seed.wrapping_add(episode)),
        None => Game::new(grid),
    }
}

fn simulate(
    config: EnvConfig,
    episodes: u32,
    max_steps: u64,
    watch: Option<Duration>,
) -> io::Result<()> {
    let mut env = SnakeEnv::new(config)?;
    let mut viewer = match watch {
        Some(delay) => Some(Viewer::open(env.game(), delay)?),
        None => None,
    };
    let mut policy = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ 0x5eed),
        None => StdRng::from_entropy(),
    };

    let observation_space = env.observation_space();
    tracing::info!(
        width = config.grid.width,
        height = config.grid.height,
        encoding = ?config.encoding,
        shape = ?observation_space.shape,
        "starting random agent"
    );

    let mut total_return = 0.0_f32;
    let mut finished = 0_u32;
    'episodes: for episode in 0..episodes {
        env.reset()?;
        if let Some(viewer) = viewer.as_mut() {
            if !viewer.restart(env.game())? {
                break;
            }
        }

        let mut episode_return = 0.0_f32;
        let mut steps = 0;
        let mut death_reason = None;
        let mut won = false;
        while steps < max_steps {
            let action = Action::ALL[policy.gen_range(0..Action::COUNT)];
            let result = env.step(action)?;
            episode_return += result.reward;
            steps += 1;

            if let Some(viewer) = viewer.as_mut() {
                if !viewer.show_step(env.game())? {
                    break 'episodes;
                }
            }

            if result.terminated {
                death_reason = result.info.death_reason;
                won = result.info.won;
                break;
            }
        }

        total_return += episode_return;
        finished += 1;
        tracing::info!(
            episode,
            steps,
            episode_return,
            length = env.game().snake().len(),
            won,
            reason = ?death_reason,
            "episode finished"
        );
    }

    if finished > 0 {
        tracing::info!(
            episodes = finished,
            mean_return = total_return / finished as f32,
            "simulation done"
        );
    }

    Ok(())
}

/// Draws simulated episodes in the terminal, one frame per step.
struct Viewer {
    session: TerminalSession,
    input: InputHandler,
    canvas: TileCanvas,
    delay: Duration,
}

impl Viewer {
    fn open(game: &Game, delay: Duration) -> io::Result<Self> {
        Ok(Self {
            session: TerminalSession::enter()?,
            input: InputHandler::new(),
            canvas: TileCanvas::new(game),
            delay,
        })
    }

    /// Shows the first frame of a new episode; false once the user quits.
    fn restart(&mut self, game: &Game) -> io::Result<bool> {
        self.canvas = TileCanvas::new(game);
        self.show(game)
    }

    /// Shows the tiles changed by the last step; false once the user quits.
    fn show_step(&mut self, game: &Game) -> io::Result<bool> {
        self.canvas.sync(game);
        self.show(game)
    }

    fn show(&mut self, game: &Game) -> io::Result<bool> {
        let canvas = &self.canvas;
        self.session
            .draw(|frame| renderer::render(frame, game, canvas, Screen::Playing))?;

        let quit = matches!(self.input.poll_input(self.delay)?, Some(GameInput::Quit));
        Ok(!quit)
    }
}
