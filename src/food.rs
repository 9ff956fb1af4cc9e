use rand::Rng;

use crate::config::GridSize;
use crate::error::GameError;
use crate::snake::{Position, Snake};

/// Picks a uniformly random interior cell that the snake does not occupy.
///
/// Candidates are drawn from `x in 1..width-1`, `y in 1..height-1` and
/// redrawn while they land on the snake. Fails with [`GameError::BoardFull`]
/// instead of sampling forever when no interior cell is free.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Result<Position, GameError> {
    let occupied_interior = snake
        .segments()
        .filter(|segment| bounds.is_interior(**segment))
        .count();
    if occupied_interior >= bounds.interior_cells() {
        return Err(GameError::BoardFull);
    }

    let max_x = i32::from(bounds.width) - 1;
    let max_y = i32::from(bounds.height) - 1;
    loop {
        let candidate = Position {
            x: rng.gen_range(1..max_x),
            y: rng.gen_range(1..max_y),
        };

        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }
}
