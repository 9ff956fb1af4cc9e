use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GridSize;
use crate::error::GameError;
use crate::food::spawn_position;
use crate::input::Direction;
use crate::observation::{Encoding, Observation};
use crate::snake::{Position, Snake};
use crate::tile::{Tile, TileKind};

/// Why the snake died.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// One episode of Snake on a bordered rectangular board.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) snake: Snake,
    pub(crate) food: Position,
    pub(crate) tick_count: u64,
    pub(crate) foods_eaten: u32,
    pub(crate) death_reason: Option<DeathReason>,
    won: bool,
    bounds: GridSize,
    spawned_food: Option<Position>,
    rng: StdRng,
}

impl Game {
    /// Creates a game seeded from OS entropy.
    pub fn new(bounds: GridSize) -> Result<Self, GameError> {
        Self::with_rng(bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic game for tests and reproducible episodes.
    pub fn new_with_seed(bounds: GridSize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(bounds, StdRng::seed_from_u64(seed))
    }

    /// Creates a game from an explicit snake and food cell.
    ///
    /// The snake must lie strictly inside the border without overlapping
    /// itself, and the food must be a free interior cell.
    pub fn with_layout(
        bounds: GridSize,
        snake: Snake,
        food: Position,
        seed: u64,
    ) -> Result<Self, GameError> {
        let bounds = GridSize::validated(bounds.width, bounds.height)?;

        let mut seen = HashSet::with_capacity(snake.len());
        let snake_fits = snake
            .segments()
            .all(|segment| bounds.is_interior(*segment) && seen.insert(*segment));
        if !snake_fits || !bounds.is_interior(food) || snake.occupies(food) {
            return Err(GameError::InvalidLayout);
        }

        Ok(Self::from_parts(
            bounds,
            snake,
            food,
            StdRng::seed_from_u64(seed),
        ))
    }

    fn with_rng(bounds: GridSize, mut rng: StdRng) -> Result<Self, GameError> {
        let bounds = GridSize::validated(bounds.width, bounds.height)?;
        let snake = Snake::new(bounds.start_position(), Direction::Up);
        let food = spawn_position(&mut rng, bounds, &snake)?;

        Ok(Self::from_parts(bounds, snake, food, rng))
    }

    fn from_parts(bounds: GridSize, snake: Snake, food: Position, rng: StdRng) -> Self {
        tracing::debug!(
            width = bounds.width,
            height = bounds.height,
            ?food,
            "new game"
        );

        Self {
            snake,
            food,
            tick_count: 0,
            foods_eaten: 0,
            death_reason: None,
            won: false,
            bounds,
            spawned_food: Some(food),
            rng,
        }
    }

    /// Requests a heading change for the next tick; reversals are ignored.
    pub fn input(&mut self, direction: Direction) {
        if !self.snake.change_direction(direction) {
            tracing::trace!(?direction, "ignoring reversal");
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Order: move, eat (and respawn food in the same tick), then check
    /// wall and self collisions against the new head. Eating the last free
    /// interior cell ends the game as won instead of respawning food.
    pub fn update(&mut self) -> Result<(), GameError> {
        if self.has_ended() {
            return Err(GameError::AlreadyEnded);
        }

        self.spawned_food = None;
        self.tick_count += 1;
        self.snake.step();

        self.check_for_eating()?;
        self.check_collisions();
        Ok(())
    }

    /// True once the snake has died or filled the board. Never becomes false again.
    #[must_use]
    pub fn has_ended(&self) -> bool {
        self.won || !self.snake.is_alive()
    }

    /// True when the snake ate with no free interior cell left for food.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Position {
        self.food
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    /// True when food was eaten during the last tick.
    #[must_use]
    pub fn ate_this_tick(&self) -> bool {
        self.snake.has_eaten()
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Encodes the board for a learning agent.
    #[must_use]
    pub fn observation(&self, encoding: Encoding) -> Observation {
        Observation::encode(self, encoding)
    }

    /// Every wall, snake and food tile of the current board.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles = wall_tiles(self.bounds);
        tiles.push(Tile::new(self.food, TileKind::Food));

        let head = self.snake.head();
        tiles.extend(
            self.snake
                .segments()
                .skip(1)
                .map(|segment| Tile::new(*segment, TileKind::Body)),
        );
        tiles.push(Tile::new(head, TileKind::Head));
        tiles
    }

    /// Tiles that changed during the last tick, to be drawn in order.
    #[must_use]
    pub fn changed_tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(4);

        if let Some(movement) = self.snake.last_move() {
            if let Some(vacated) = movement.vacated {
                tiles.push(Tile::new(vacated, TileKind::Empty));
            }
            tiles.push(Tile::new(movement.previous_head, TileKind::Body));
        }
        if let Some(food) = self.spawned_food {
            tiles.push(Tile::new(food, TileKind::Food));
        }
        if let Some(movement) = self.snake.last_move() {
            tiles.push(Tile::new(movement.head, TileKind::Head));
        }

        tiles
    }

    fn check_for_eating(&mut self) -> Result<(), GameError> {
        if self.snake.head() != self.food {
            return Ok(());
        }

        self.snake.grow();
        self.foods_eaten += 1;

        // A living snake lies inside the border, so its length is the number
        // of occupied interior cells.
        if self.snake.len() >= self.bounds.interior_cells() {
            self.won = true;
            tracing::debug!(
                eaten = self.foods_eaten,
                tick = self.tick_count,
                "board filled"
            );
            return Ok(());
        }

        self.food = spawn_position(&mut self.rng, self.bounds, &self.snake)?;
        self.spawned_food = Some(self.food);
        tracing::debug!(
            eaten = self.foods_eaten,
            food = ?self.food,
            "food eaten, respawned"
        );
        Ok(())
    }

    fn check_collisions(&mut self) {
        let reason = if self.bounds.is_border(self.snake.head()) {
            Some(DeathReason::WallCollision)
        } else if self.snake.head_overlaps_body() {
            Some(DeathReason::SelfCollision)
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::debug!(
                ?reason,
                tick = self.tick_count,
                len = self.snake.len(),
                "snake died"
            );
            self.death_reason = Some(reason);
            self.snake.die();
        }
    }
}

fn wall_tiles(bounds: GridSize) -> Vec<Tile> {
    let width = i32::from(bounds.width);
    let height = i32::from(bounds.height);

    let mut tiles = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let position = Position { x, y };
            if bounds.is_border(position) {
                tiles.push(Tile::new(position, TileKind::Wall));
            }
        }
    }
    tiles
}
