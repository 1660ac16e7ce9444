use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::snake::{DeathReason, Direction, MoveResult, Snake};
use crate::{log, Cell, GRID_SIZE};

pub const FOOD_REWARD: u32 = 10;
pub const SPEEDUP_FACTOR: f64 = 0.98;
pub const MIN_TICK_INTERVAL_MS: f64 = 50.0;
pub const INITIAL_TICK_INTERVAL_MS: f64 = 150.0;

const START_CELL: Cell = (10, 10);
const GRID_CELLS: usize = GRID_SIZE as usize * GRID_SIZE as usize;

/// Receives score and game-over notifications. Calls are fire-and-forget.
pub trait GameEvents {
    fn on_score_changed(&mut self, score: u32);
    fn on_game_over(&mut self, reason: DeathReason);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunState {
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub score: u32,
    pub tick_interval_ms: f64,
}

/// Read-only view handed to the renderer each frame.
pub struct Snapshot<'a> {
    pub snake: &'a VecDeque<Cell>,
    pub head_char: char,
    pub food: Cell,
    pub run_state: RunState,
}

pub struct Engine {
    snake: Snake,
    food: Cell,
    state: RunState,
    death_reason: Option<DeathReason>,
    rng: StdRng,
}

impl Engine {
    pub fn new(initial_tick_interval_ms: f64, seed: u64) -> Self {
        let mut engine = Engine {
            snake: Snake::new(START_CELL),
            food: START_CELL,
            state: RunState {
                running: false,
                paused: false,
                game_over: false,
                score: 0,
                tick_interval_ms: initial_tick_interval_ms.max(MIN_TICK_INTERVAL_MS),
            },
            death_reason: None,
            rng: StdRng::seed_from_u64(seed),
        };

        if let Some(food) = engine.place_food() {
            engine.food = food;
        }

        log!(
            "New session (seed {}), snake at {:?}, food at {:?}, interval {}ms",
            seed,
            START_CELL,
            engine.food,
            engine.state.tick_interval_ms
        );
        engine
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// True while ticks can change the board.
    pub fn is_advancing(&self) -> bool {
        self.state.running && !self.state.paused && !self.state.game_over
    }

    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    pub fn heading(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: self.snake.body(),
            head_char: self.snake.head_char(),
            food: self.food,
            run_state: self.state,
        }
    }

    /// Stores `direction` as the heading for the next tick.
    ///
    /// Returns false without touching state when the game is over, when
    /// `direction` is `Stationary`, or when it reverses the current heading.
    /// The first accepted direction starts the session.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.state.game_over || direction == Direction::Stationary {
            return false;
        }

        if !self.snake.set_direction(direction) {
            return false;
        }

        if !self.state.running {
            self.state.running = true;
            log!("Session started heading {:?}", direction);
        }
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if !self.state.game_over {
            self.state.paused = !self.state.paused;
        }
        self.state.paused
    }

    /// Advances the simulation by one cell.
    pub fn tick(&mut self, events: &mut dyn GameEvents) {
        if !self.is_advancing() {
            return;
        }

        match self.snake.move_step(self.food) {
            MoveResult::Idle => {}
            MoveResult::Crashed(reason) => {
                self.state.game_over = true;
                self.death_reason = Some(reason);
                log!(
                    "Game over: {} at {:?}, score {}, length {}",
                    reason,
                    self.snake.head(),
                    self.state.score,
                    self.snake.len()
                );
                events.on_game_over(reason);
            }
            MoveResult::Moved { new_head, old_tail: None } => {
                self.state.score += FOOD_REWARD;
                events.on_score_changed(self.state.score);

                // A full board leaves nowhere to go; the old cell stays under the head.
                if let Some(food) = self.place_food() {
                    self.food = food;
                }

                self.state.tick_interval_ms =
                    (self.state.tick_interval_ms * SPEEDUP_FACTOR).max(MIN_TICK_INTERVAL_MS);

                log!(
                    "Ate food at {:?}. Score: {}, interval {:.2}ms, next food at {:?}",
                    new_head,
                    self.state.score,
                    self.state.tick_interval_ms,
                    self.food
                );
            }
            MoveResult::Moved { .. } => {}
        }
    }

    /// Uniform pick among free cells by rejection sampling.
    fn place_food(&mut self) -> Option<Cell> {
        if self.snake.len() >= GRID_CELLS {
            return None;
        }

        loop {
            let cell = (self.rng.gen_range(0..GRID_SIZE), self.rng.gen_range(0..GRID_SIZE));
            if !self.snake.occupies(cell) {
                return Some(cell);
            }
        }
    }

    #[cfg(test)]
    fn with_layout(
        cells: &[Cell],
        direction: Direction,
        food: Cell,
        score: u32,
        tick_interval_ms: f64,
    ) -> Self {
        let mut engine = Engine::new(tick_interval_ms, 7);
        engine.snake = Snake::from_cells(cells, direction);
        engine.food = food;
        engine.state.score = score;
        engine.state.tick_interval_ms = tick_interval_ms;
        engine.state.running = direction != Direction::Stationary;
        engine
    }

    #[cfg(test)]
    pub(crate) fn set_food(&mut self, cell: Cell) {
        self.food = cell;
    }
}
