//! Step/reset environment interface for reinforcement-learning agents.
//!
//! [`SnakeEnv`] wraps one [`Game`] per episode. Each step applies an action,
//! advances one tick, and reports the observation, a reward of `1.0` when
//! food was eaten during that tick, and whether the episode terminated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DEFAULT_ENV_GRID, GridSize};
use crate::error::GameError;
use crate::game::{DeathReason, Game};
use crate::input::Action;
use crate::observation::{Encoding, Observation};

/// Core trait for RL environments.
pub trait Environment {
    /// Observation type
    type Observation;

    /// Action type
    type Action;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Observation, GameError>;

    /// Applies one action and advances the episode by one tick.
    fn step(&mut self, action: Self::Action) -> Result<StepResult<Self::Observation>, GameError>;

    fn observation_space(&self) -> SpaceInfo;

    fn action_space(&self) -> SpaceInfo;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult<O> {
    pub observation: O,
    /// `1.0` if food was eaten during this step, else `0.0`.
    pub reward: f32,
    pub terminated: bool,
    pub info: StepInfo,
}

/// Episode bookkeeping reported with every step.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct StepInfo {
    pub tick: u64,
    pub foods_eaten: u32,
    pub snake_len: usize,
    pub death_reason: Option<DeathReason>,
    /// The snake filled every interior cell.
    pub won: bool,
}

/// Shape and value range of a space.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SpaceInfo {
    pub shape: Vec<usize>,
    pub dtype: SpaceType,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),
    /// Integer box with inclusive bounds
    Box { low: u8, high: u8 },
}

/// Settings of a [`SnakeEnv`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EnvConfig {
    pub grid: GridSize,
    pub encoding: Encoding,
    /// Seeds the sequence of episodes; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            grid: DEFAULT_ENV_GRID,
            encoding: Encoding::default(),
            seed: None,
        }
    }
}

/// Single-snake environment with four discrete actions.
#[derive(Debug)]
pub struct SnakeEnv {
    config: EnvConfig,
    game: Game,
    seeds: StdRng,
    episode: u64,
}

impl SnakeEnv {
    /// Creates the environment and its first episode.
    pub fn new(config: EnvConfig) -> Result<Self, GameError> {
        let mut seeds = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let game = Game::new_with_seed(config.grid, seeds.r#gen())?;

        Ok(Self {
            config,
            game,
            seeds,
            episode: 0,
        })
    }

    /// Current episode's game, read-only.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Number of completed resets.
    #[must_use]
    pub fn episode(&self) -> u64 {
        self.episode
    }

    #[must_use]
    pub fn config(&self) -> EnvConfig {
        self.config
    }

    /// Observation of the current state without stepping.
    #[must_use]
    pub fn observation(&self) -> Observation {
        self.game.observation(self.config.encoding)
    }

    /// Steps with a raw action id, rejecting ids outside `0..4`.
    pub fn step_id(&mut self, action_id: usize) -> Result<StepResult<Observation>, GameError> {
        let action = Action::try_from(action_id)?;
        self.step(action)
    }
}

impl Environment for SnakeEnv {
    type Observation = Observation;
    type Action = Action;

    fn reset(&mut self) -> Result<Observation, GameError> {
        self.game = Game::new_with_seed(self.config.grid, self.seeds.r#gen())?;
        self.episode += 1;
        tracing::trace!(episode = self.episode, "reset");
        Ok(self.observation())
    }

    fn step(&mut self, action: Action) -> Result<StepResult<Observation>, GameError> {
        self.game.input(action.direction());
        self.game.update()?;

        let terminated = self.game.has_ended();
        if terminated {
            tracing::debug!(
                episode = self.episode,
                ticks = self.game.tick_count(),
                eaten = self.game.foods_eaten(),
                won = self.game.has_won(),
                "episode terminated"
            );
        }

        Ok(StepResult {
            observation: self.observation(),
            reward: if self.game.ate_this_tick() { 1.0 } else { 0.0 },
            terminated,
            info: StepInfo {
                tick: self.game.tick_count(),
                foods_eaten: self.game.foods_eaten(),
                snake_len: self.game.snake().len(),
                death_reason: self.game.death_reason(),
                won: self.game.has_won(),
            },
        })
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![
                self.config.encoding.layers(),
                usize::from(self.config.grid.width),
                usize::from(self.config.grid.height),
            ],
            dtype: SpaceType::Box {
                low: 0,
                high: self.config.encoding.max_code(),
            },
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![1],
            dtype: SpaceType::Discrete(Action::COUNT),
        }
    }
}
