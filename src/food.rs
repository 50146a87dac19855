use rand::Rng;
use thiserror::Error;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Raised when every cell of the board is occupied by the snake.
///
/// The engine translates this into the board-cleared win state; it never
/// crosses the public engine boundary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("no free cell left on the {width}x{height} board")]
pub struct BoardFullError {
    pub width: u16,
    pub height: u16,
}

/// Picks a uniformly random cell not occupied by the snake.
///
/// Selection is over the explicit list of free cells, so this terminates for
/// any occupancy instead of rejection-sampling until a free cell turns up.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
) -> Result<Position, BoardFullError> {
    let mut candidates = Vec::with_capacity(bounds.total_cells().saturating_sub(snake.len()));

    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let position = Position { x, y };
            if !snake.occupies(position) {
                candidates.push(position);
            }
        }
    }

    if candidates.is_empty() {
        return Err(BoardFullError {
            width: bounds.width,
            height: bounds.height,
        });
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates[index])
}
