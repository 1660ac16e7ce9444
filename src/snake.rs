use std::collections::VecDeque;
use std::fmt;

use crate::{Cell, GRID_SIZE};
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stationary,
}

impl Direction {
    pub fn delta(&self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
            Stationary => (0, 0),
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right)
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

impl DeathReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathReason::WallCollision => "wall collision",
            DeathReason::SelfCollision => "self collision",
        }
    }

    /// Line shown to the player in the HUD.
    pub fn flavor_line(&self) -> &'static str {
        match self {
            DeathReason::WallCollision => "Hit the wall!",
            DeathReason::SelfCollision => "Ouroboros accident!",
        }
    }
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Cell, old_tail: Option<Cell> },
    Crashed(DeathReason),
    Idle,
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
}

impl Snake {
    pub fn new(pos: Cell) -> Self {
        Snake { body: VecDeque::from(vec![pos]), direction: Stationary }
    }

    /// Head first, tail last.
    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn head(&self) -> Cell {
        // The body is never empty: it starts with one cell and `move_step`
        // always pushes before it pops.
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn next_head(&self) -> Option<Cell> {
        if self.direction == Stationary {
            return None;
        }

        let (dx, dy) = self.direction.delta();
        let head = self.head();
        Some((head.0 + dx, head.1 + dy))
    }

    /// Advances one cell. The tail is kept when the new head lands on `food`.
    ///
    /// The self-collision check runs against the whole pre-move body, tail
    /// included, so following your own tail into its current cell is fatal.
    pub fn move_step(&mut self, food: Cell) -> MoveResult {
        let new_head = match self.next_head() {
            Some(cell) => cell,
            None => return Idle,
        };

        if !in_bounds(new_head) {
            return Crashed(DeathReason::WallCollision);
        }

        if self.occupies(new_head) {
            return Crashed(DeathReason::SelfCollision);
        }

        self.body.push_front(new_head);

        if new_head == food {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Moved { new_head, old_tail }
        }
    }

    /// Returns false and leaves the heading alone on a reversal.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(&self.direction) {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
            Stationary => '@',
        }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Cell], direction: Direction) -> Self {
        Snake { body: cells.iter().copied().collect(), direction }
    }
}

pub fn in_bounds(cell: Cell) -> bool {
    (0..GRID_SIZE).contains(&cell.0) && (0..GRID_SIZE).contains(&cell.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAR_FOOD: Cell = (0, 19);

    #[test]
    fn test_stationary_snake_does_not_move() {
        let mut snake = Snake::new((10, 10));
        assert_eq!(snake.move_step(FAR_FOOD), Idle);
        assert_eq!(snake.head(), (10, 10));
    }

    #[test]
    fn test_move_drops_tail() {
        let mut snake = Snake::from_cells(&[(5, 5), (4, 5), (3, 5)], Right);
        let res = snake.move_step(FAR_FOOD);
        assert_eq!(res, Moved { new_head: (6, 5), old_tail: Some((3, 5)) });
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(6, 5), (5, 5), (4, 5)]);
    }

    #[test]
    fn test_move_onto_food_keeps_tail() {
        let mut snake = Snake::from_cells(&[(5, 5), (4, 5)], Right);
        let res = snake.move_step((6, 5));
        assert_eq!(res, Moved { new_head: (6, 5), old_tail: None });
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        for (start, dir) in [((0, 5), Left), ((19, 5), Right), ((5, 0), Up), ((5, 19), Down)] {
            let mut snake = Snake::from_cells(&[start], dir);
            assert_eq!(snake.move_step(FAR_FOOD), Crashed(DeathReason::WallCollision));
            assert_eq!(snake.head(), start);
        }
    }

    #[test]
    fn test_moving_into_current_tail_is_fatal() {
        // Square loop: head at (5,5) moving up into (5,4), which is the tail.
        let mut snake = Snake::from_cells(&[(5, 5), (6, 5), (6, 4), (5, 4)], Up);
        assert_eq!(snake.move_step(FAR_FOOD), Crashed(DeathReason::SelfCollision));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut snake = Snake::from_cells(&[(5, 5)], Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);
        assert!(snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Up);
        assert!(!snake.set_direction(Down));
    }

    #[test]
    fn test_any_direction_accepted_when_stationary() {
        for dir in [Up, Down, Left, Right] {
            let mut snake = Snake::new((10, 10));
            assert!(snake.set_direction(dir));
            assert_eq!(snake.get_direction(), dir);
        }
    }

    #[test]
    fn test_delta_has_one_nonzero_component() {
        for dir in [Up, Down, Left, Right] {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
        }
        assert_eq!(Stationary.delta(), (0, 0));
    }
}
