use serde::Deserialize;

use crate::config::GridSize;
use crate::game::Game;
use crate::snake::Position;

/// Cell codes of [`Encoding::SingleLayer`].
pub mod single {
    pub const EMPTY: u8 = 0;
    pub const WALL: u8 = 1;
    pub const BODY: u8 = 2;
    pub const HEAD: u8 = 3;
    pub const FOOD: u8 = 4;
}

/// Cell codes of [`Encoding::TwoLayer`].
pub mod layered {
    pub const WALL: u8 = 1;
    pub const BODY: u8 = 10;
    pub const HEAD: u8 = 50;
    pub const FOOD: u8 = 1;

    pub const SNAKE_LAYER: usize = 0;
    pub const FOOD_LAYER: usize = 1;
}

/// How the board is projected into numbers.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// One grid with a distinct code per cell kind.
    #[default]
    SingleLayer,
    /// Snake channel (walls, body, head) plus a binary food channel.
    TwoLayer,
}

impl Encoding {
    #[must_use]
    pub fn layers(self) -> usize {
        match self {
            Self::SingleLayer => 1,
            Self::TwoLayer => 2,
        }
    }

    /// Largest code any cell can take.
    #[must_use]
    pub fn max_code(self) -> u8 {
        match self {
            Self::SingleLayer => single::FOOD,
            Self::TwoLayer => layered::HEAD,
        }
    }
}

/// Board state as a `(layers, width, height)` grid of cell codes.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Observation {
    layers: usize,
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Observation {
    /// All-zero grid of the right shape.
    #[must_use]
    pub fn empty(bounds: GridSize, encoding: Encoding) -> Self {
        let width = usize::from(bounds.width);
        let height = usize::from(bounds.height);
        let layers = encoding.layers();

        Self {
            layers,
            width,
            height,
            cells: vec![0; layers * width * height],
        }
    }

    /// Encodes `game`; a finished game yields the all-zero grid.
    #[must_use]
    pub fn encode(game: &Game, encoding: Encoding) -> Self {
        let bounds = game.bounds();
        let mut observation = Self::empty(bounds, encoding);
        if game.has_ended() {
            return observation;
        }

        let (wall, body, head) = match encoding {
            Encoding::SingleLayer => (single::WALL, single::BODY, single::HEAD),
            Encoding::TwoLayer => (layered::WALL, layered::BODY, layered::HEAD),
        };
        let snake_layer = 0;

        for y in 0..i32::from(bounds.height) {
            for x in 0..i32::from(bounds.width) {
                let position = Position { x, y };
                if bounds.is_border(position) {
                    observation.set(snake_layer, position, wall);
                }
            }
        }

        match encoding {
            Encoding::SingleLayer => observation.set(snake_layer, game.food(), single::FOOD),
            Encoding::TwoLayer => observation.set(layered::FOOD_LAYER, game.food(), layered::FOOD),
        }

        let snake = game.snake();
        for segment in snake.segments().skip(1) {
            observation.set(snake_layer, *segment, body);
        }
        observation.set(snake_layer, snake.head(), head);

        observation
    }

    /// `(layers, width, height)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.layers, self.width, self.height)
    }

    /// Returns the code at `(layer, x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, layer: usize, x: usize, y: usize) -> Option<u8> {
        if layer >= self.layers || x >= self.width || y >= self.height {
            return None;
        }

        Some(self.cells[self.index(layer, x, y)])
    }

    /// Flat cells, layer-major, then x, then y.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Cells converted to `f32`, ready to feed a network.
    #[must_use]
    pub fn to_f32(&self) -> Vec<f32> {
        self.cells.iter().map(|&cell| f32::from(cell)).collect()
    }

    /// True when every cell is zero.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&cell| cell == 0)
    }

    fn index(&self, layer: usize, x: usize, y: usize) -> usize {
        (layer * self.width + x) * self.height + y
    }

    // Positions off the grid (a dead head past the wall) are skipped.
    fn set(&mut self, layer: usize, position: Position, code: u8) {
        let (Ok(x), Ok(y)) = (usize::try_from(position.x), usize::try_from(position.y)) else {
            return;
        };
        if x >= self.width || y >= self.height {
            return;
        }

        let index = self.index(layer, x, y);
        self.cells[index] = code;
    }
}
