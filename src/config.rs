use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::observation::Encoding;
use crate::snake::Position;

/// Smallest allowed board side: a one-cell border around a three-cell body.
pub const MIN_BOARD_SIDE: u16 = 5;

/// Preferred head position of a freshly spawned snake.
pub const START_X: i32 = 4;
pub const START_Y: i32 = 4;

/// Number of segments a new snake starts with.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Board used by the learning environment when nothing else is configured.
pub const DEFAULT_ENV_GRID: GridSize = GridSize {
    width: 10,
    height: 10,
};

/// Board used by the interactive game when nothing else is configured.
pub const DEFAULT_PLAY_GRID: GridSize = GridSize {
    width: 30,
    height: 30,
};

/// Tick interval of the interactive game in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Logical grid dimensions, border ring included.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the grid after checking it can hold a border plus the initial body.
    pub fn validated(width: u16, height: u16) -> Result<Self, ConfigError> {
        if width < MIN_BOARD_SIDE || height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall { width, height });
        }

        Ok(Self { width, height })
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns the number of cells inside the border ring.
    #[must_use]
    pub fn interior_cells(self) -> usize {
        usize::from(self.width.saturating_sub(2)) * usize::from(self.height.saturating_sub(2))
    }

    /// Returns true for cells on the outermost ring.
    #[must_use]
    pub fn is_border(self, position: Position) -> bool {
        position.x == 0
            || position.y == 0
            || position.x == i32::from(self.width) - 1
            || position.y == i32::from(self.height) - 1
    }

    /// Returns true for cells strictly inside the border ring.
    #[must_use]
    pub fn is_interior(self, position: Position) -> bool {
        position.x > 0
            && position.y > 0
            && position.x < i32::from(self.width) - 1
            && position.y < i32::from(self.height) - 1
    }

    /// Head position of a new snake.
    ///
    /// `(START_X, START_Y)` when the board is large enough, otherwise pulled
    /// inward so the straight body below the head stays off the border.
    #[must_use]
    pub fn start_position(self) -> Position {
        let tail_reach = INITIAL_SNAKE_LENGTH as i32 - 1;
        Position {
            x: START_X.min(i32::from(self.width) - 2),
            y: START_Y.min(i32::from(self.height) - 2 - tail_reach),
        }
    }
}

/// Optional settings read from a JSON file; CLI flags take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub seed: Option<u64>,
    pub encoding: Option<Encoding>,
    pub tick_ms: Option<u64>,
}

impl RunConfig {
    /// Loads a config file from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Resolves the board size, falling back to `default` per axis.
    pub fn grid(&self, default: GridSize) -> Result<GridSize, ConfigError> {
        GridSize::validated(
            self.width.unwrap_or(default.width),
            self.height.unwrap_or(default.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ENV_GRID, GridSize, RunConfig};
    use crate::error::ConfigError;
    use crate::observation::Encoding;
    use crate::snake::Position;

    #[test]
    fn boards_below_five_cells_are_rejected() {
        assert!(matches!(
            GridSize::validated(4, 10),
            Err(ConfigError::BoardTooSmall {
                width: 4,
                height: 10
            })
        ));
        assert!(GridSize::validated(10, 4).is_err());
        assert!(GridSize::validated(5, 5).is_ok());
    }

    #[test]
    fn start_position_is_fixed_on_regular_boards() {
        let grid = GridSize::validated(10, 10).expect("10x10 is valid");
        assert_eq!(grid.start_position(), Position { x: 4, y: 4 });
    }

    #[test]
    fn start_position_keeps_body_inside_small_boards() {
        let grid = GridSize::validated(5, 5).expect("5x5 is valid");
        let head = grid.start_position();

        assert_eq!(head, Position { x: 3, y: 1 });
        for offset in 0..3 {
            assert!(grid.is_interior(Position {
                x: head.x,
                y: head.y + offset
            }));
        }
    }

    #[test]
    fn border_and_interior_are_disjoint() {
        let grid = GridSize {
            width: 6,
            height: 7,
        };

        let mut border = 0;
        let mut interior = 0;
        for y in 0..7 {
            for x in 0..6 {
                let position = Position { x, y };
                assert_ne!(grid.is_border(position), grid.is_interior(position));
                if grid.is_border(position) {
                    border += 1;
                } else {
                    interior += 1;
                }
            }
        }

        assert_eq!(interior, grid.interior_cells());
        assert_eq!(border + interior, grid.total_cells());
    }

    #[test]
    fn run_config_fields_are_optional() {
        let config = RunConfig::from_json(r#"{ "width": 12, "encoding": "two-layer" }"#)
            .expect("config should parse");

        assert_eq!(config.encoding, Some(Encoding::TwoLayer));
        let grid = config.grid(DEFAULT_ENV_GRID).expect("grid should be valid");
        assert_eq!(
            grid,
            GridSize {
                width: 12,
                height: 10
            }
        );
    }

    #[test]
    fn run_config_rejects_unknown_fields() {
        assert!(RunConfig::from_json(r#"{ "colour": "red" }"#).is_err());
    }
}
