use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{EdgePolicy, GameConfig, GridSize};
use crate::food::spawn_position;
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// Current high-level gameplay state. Terminal once `GameOver`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    GameOver,
}

/// Why a finished game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndCause {
    /// The head left the board under `EdgePolicy::Lethal`.
    WallCollision,
    /// The head ran into another body segment.
    SelfCollision,
    /// The snake filled the board; there was nowhere left to place food.
    BoardCleared,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickResult {
    Running,
    Ended(EndCause),
}

/// Read-only view of everything a renderer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Position,
    pub direction: Direction,
    pub status: GameStatus,
    pub end_cause: Option<EndCause>,
}

/// Complete mutable game state for one session.
///
/// The engine is single-threaded and tick-driven: the driver interleaves any
/// number of `set_direction` calls with `tick` calls on one thread. Nothing
/// here blocks or suspends.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub status: GameStatus,
    end_cause: Option<EndCause>,
    bounds: GridSize,
    edge_policy: EdgePolicy,
    tick_count: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates a fresh game from resolved configuration.
    ///
    /// `seed` fixes food placement for reproducible runs; `None` seeds from
    /// OS entropy.
    #[must_use]
    pub fn new(config: &GameConfig, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new_with_seed(config.grid, config.edge_policy, seed),
            None => Self::with_rng(config.grid, config.edge_policy, StdRng::from_entropy()),
        }
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, edge_policy: EdgePolicy, seed: u64) -> Self {
        Self::with_rng(bounds, edge_policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, edge_policy: EdgePolicy, mut rng: StdRng) -> Self {
        let start = Position {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        };
        let snake = Snake::new(start, Direction::Right);

        // A board with a single cell is already cleared by the starting snake.
        let (food, status, end_cause) = match spawn_position(&mut rng, bounds, &snake) {
            Ok(position) => (position, GameStatus::Running, None),
            Err(_) => (start, GameStatus::GameOver, Some(EndCause::BoardCleared)),
        };

        Self {
            snake,
            food,
            status,
            end_cause,
            bounds,
            edge_policy,
            tick_count: 0,
            rng,
        }
    }

    /// Advances the simulation by exactly one cell of movement.
    ///
    /// Once the game has ended this mutates nothing and keeps returning the
    /// terminal result, so a driver may leave its timer running unguarded.
    pub fn tick(&mut self) -> TickResult {
        if let Some(cause) = self.end_cause {
            return TickResult::Ended(cause);
        }

        self.tick_count += 1;

        let direction = self.snake.latch_direction();
        let mut next_head = self.snake.head().stepped(direction);

        match self.edge_policy {
            EdgePolicy::Wrap => next_head = next_head.wrapped(self.bounds),
            EdgePolicy::Lethal => {
                if !next_head.is_within_bounds(self.bounds) {
                    // Body stays as it was; the rejected move is not applied.
                    return self.finish(EndCause::WallCollision);
                }
            }
        }

        if next_head == self.food {
            self.snake.advance_to(next_head, true);
            match spawn_position(&mut self.rng, self.bounds, &self.snake) {
                Ok(position) => self.food = position,
                Err(_) => return self.finish(EndCause::BoardCleared),
            }
        } else {
            self.snake.advance_to(next_head, false);
        }

        if self.snake.head_overlaps_body() {
            // The head stays part of the body so the fatal frame can render.
            return self.finish(EndCause::SelfCollision);
        }

        TickResult::Running
    }

    /// Requests a direction change for the next tick.
    ///
    /// Reversals into the neck are ignored; between two ticks the last
    /// accepted call wins. Ignored entirely once the game has ended.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            self.snake.set_direction(direction);
        }
    }

    /// Returns a read-only snapshot for rendering. Never mutates.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: self.food,
            direction: self.snake.direction(),
            status: self.status,
            end_cause: self.end_cause,
        }
    }

    /// Returns the grid bounds this game runs on.
    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Returns the number of ticks processed so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn finish(&mut self, cause: EndCause) -> TickResult {
        self.status = GameStatus::GameOver;
        self.end_cause = Some(cause);
        TickResult::Ended(cause)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{EdgePolicy, GridSize};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{EndCause, GameState, GameStatus, TickResult};

    fn bounds(width: u16, height: u16) -> GridSize {
        GridSize { width, height }
    }

    #[test]
    fn snake_grows_by_one_after_eating_food() {
        let mut state = GameState::new_with_seed(bounds(10, 10), EdgePolicy::Lethal, 1);
        state.snake = Snake::new(Position { x: 1, y: 1 }, Direction::Right);
        state.food = Position { x: 2, y: 1 };

        assert_eq!(state.tick(), TickResult::Running);
        assert_eq!(state.snake.len(), 2);

        // Park the food far away so the next tick is a plain slide.
        state.food = Position { x: 9, y: 9 };
        assert_eq!(state.tick(), TickResult::Running);
        assert_eq!(state.snake.len(), 2);
    }

    #[test]
    fn eating_relocates_food_off_the_body() {
        let mut state = GameState::new_with_seed(bounds(6, 6), EdgePolicy::Lethal, 9);
        state.snake = Snake::new(Position { x: 1, y: 1 }, Direction::Right);
        state.food = Position { x: 2, y: 1 };

        state.tick();

        assert_ne!(state.food, Position { x: 2, y: 1 });
        assert!(!state.snake.occupies(state.food));
    }

    #[test]
    fn wall_collision_ends_game_and_preserves_body() {
        let mut state = GameState::new_with_seed(bounds(4, 4), EdgePolicy::Lethal, 2);
        state.snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right);
        state.food = Position { x: 0, y: 0 };

        assert_eq!(state.tick(), TickResult::Ended(EndCause::WallCollision));
        assert_eq!(state.status, GameStatus::GameOver);
        // The rejected move must not have been applied.
        assert_eq!(state.snake.head(), Position { x: 3, y: 1 });
        assert_eq!(state.snake.len(), 1);
    }

    #[test]
    fn wrap_policy_carries_head_to_opposite_edge() {
        let mut state = GameState::new_with_seed(bounds(4, 4), EdgePolicy::Wrap, 3);
        state.snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right);
        state.food = Position { x: 0, y: 0 };

        assert_eq!(state.tick(), TickResult::Running);
        assert_eq!(state.snake.head(), Position { x: 0, y: 1 });
    }

    #[test]
    fn wrap_policy_keeps_head_in_bounds_over_many_ticks() {
        let grid = bounds(5, 3);
        let mut state = GameState::new_with_seed(grid, EdgePolicy::Wrap, 4);
        state.snake = Snake::new(Position { x: 0, y: 0 }, Direction::Left);
        state.food = Position { x: 2, y: 2 };

        for _ in 0..40 {
            state.tick();
            assert!(state.snake.head().is_within_bounds(grid));
        }
    }

    #[test]
    fn self_collision_ends_game_deterministically() {
        let mut state = GameState::new_with_seed(bounds(6, 6), EdgePolicy::Lethal, 5);
        state.snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Left,
        );
        state.food = Position { x: 5, y: 5 };

        assert_eq!(state.tick(), TickResult::Ended(EndCause::SelfCollision));
        // The fatal head remains in the body for rendering.
        assert!(state.snake.head_overlaps_body());
    }

    #[test]
    fn moving_into_just_vacated_tail_cell_is_not_a_collision() {
        // Moving into the neck segment is fatal...
        let mut state = GameState::new_with_seed(bounds(4, 4), EdgePolicy::Lethal, 6);
        state.snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
            ],
            Direction::Right,
        );
        state.food = Position { x: 3, y: 3 };

        assert_eq!(state.tick(), TickResult::Ended(EndCause::SelfCollision));

        // ...but entering the cell the tail leaves this same tick is fine.
        let mut looping = GameState::new_with_seed(bounds(4, 4), EdgePolicy::Lethal, 6);
        looping.snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
            ],
            Direction::Down,
        );
        looping.food = Position { x: 3, y: 3 };

        assert_eq!(looping.tick(), TickResult::Running);
        assert_eq!(looping.snake.head(), Position { x: 1, y: 2 });
    }

    #[test]
    fn reversal_input_is_ignored() {
        let mut state = GameState::new_with_seed(bounds(8, 8), EdgePolicy::Lethal, 7);
        state.snake = Snake::new(Position { x: 4, y: 4 }, Direction::Right);
        state.food = Position { x: 0, y: 0 };

        state.set_direction(Direction::Left);
        state.tick();

        assert_eq!(state.snake.head(), Position { x: 5, y: 4 });
    }

    #[test]
    fn eating_the_last_free_cell_wins_the_game() {
        // 2×2 board, three segments, food on the only free cell.
        let mut state = GameState::new_with_seed(bounds(2, 2), EdgePolicy::Lethal, 8);
        state.snake = Snake::from_segments(
            vec![
                Position { x: 0, y: 1 },
                Position { x: 1, y: 1 },
                Position { x: 1, y: 0 },
            ],
            Direction::Up,
        );
        state.food = Position { x: 0, y: 0 };

        assert_eq!(state.tick(), TickResult::Ended(EndCause::BoardCleared));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn ticks_after_game_over_mutate_nothing() {
        let mut state = GameState::new_with_seed(bounds(4, 4), EdgePolicy::Lethal, 10);
        state.snake = Snake::new(Position { x: 3, y: 1 }, Direction::Right);
        state.food = Position { x: 0, y: 0 };

        assert_eq!(state.tick(), TickResult::Ended(EndCause::WallCollision));
        let ticks_at_end = state.tick_count();

        assert_eq!(state.tick(), TickResult::Ended(EndCause::WallCollision));
        assert_eq!(state.tick_count(), ticks_at_end);
        assert_eq!(state.snake.head(), Position { x: 3, y: 1 });
    }

    #[test]
    fn snapshot_reflects_current_state_without_mutation() {
        let mut state = GameState::new_with_seed(bounds(8, 8), EdgePolicy::Wrap, 12);
        state.tick();

        let snapshot = state.snapshot();
        assert_eq!(snapshot.status, GameStatus::Running);
        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.food, state.food);
        assert_eq!(snapshot.snake.len(), state.snake.len());
        assert_eq!(snapshot.end_cause, None);
    }

    #[test]
    fn single_cell_board_starts_already_cleared() {
        let state = GameState::new_with_seed(bounds(1, 1), EdgePolicy::Wrap, 13);

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.snapshot().end_cause, Some(EndCause::BoardCleared));
    }

    #[test]
    fn body_cells_stay_distinct_while_running() {
        let mut state = GameState::new_with_seed(bounds(6, 6), EdgePolicy::Wrap, 14);

        for _ in 0..100 {
            if state.tick() != TickResult::Running {
                break;
            }

            let cells: Vec<_> = state.snake.segments().copied().collect();
            let mut deduped = cells.clone();
            deduped.sort_by_key(|cell| (cell.x, cell.y));
            deduped.dedup();

            assert!(!cells.is_empty());
            assert_eq!(cells.len(), deduped.len());
        }
    }
}
