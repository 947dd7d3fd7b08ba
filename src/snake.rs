use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use Direction::*;
use MoveResult::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Up => 0,
            Down => 1,
            Left => 2,
            Right => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Up,
            1 => Down,
            2 => Left,
            _ => Right,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn neighbour(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Position { x: self.x + dx, y: self.y + dy }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction slot shared between the input thread (writer) and the tick
/// loop (reader). Last write before a tick wins.
#[derive(Debug, Clone)]
pub struct DirectionCell(Arc<AtomicU8>);

impl DirectionCell {
    pub fn new(direction: Direction) -> Self {
        DirectionCell(Arc::new(AtomicU8::new(direction.to_u8())))
    }

    pub fn get(&self) -> Direction {
        Direction::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn change_direction(&self, direction: Direction) {
        self.0.store(direction.to_u8(), Ordering::Release);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// The head moved to `new_head` and `vacated` is the cell the tail left.
    Moved { new_head: Position, vacated: Position },
    /// `at` is already part of the body, nothing moved.
    Crashed { at: Position },
}

pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    direction: DirectionCell,
}

impl Snake {
    pub fn new(head: Position, direction: Direction) -> Self {
        Snake::from_body(&[head], direction)
    }

    /// Builds a snake from its segments, head first.
    pub fn from_body(segments: &[Position], direction: Direction) -> Self {
        let mut snake = Snake {
            body: VecDeque::with_capacity(segments.len()),
            occupied: HashSet::with_capacity(segments.len()),
            direction: DirectionCell::new(direction),
        };

        for &pos in segments {
            if snake.occupied.insert(pos) {
                snake.body.push_back(pos);
            }
        }

        snake
    }

    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    #[cfg(test)]
    pub fn contains(&self, pos: &Position) -> bool {
        self.occupied.contains(pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction.get()
    }

    /// Handle for writers living outside the tick loop.
    pub fn direction_cell(&self) -> DirectionCell {
        self.direction.clone()
    }

    /// Moves one cell in the current direction. The tail still counts as
    /// occupied while the candidate is checked, so chasing it is a crash.
    pub fn advance(&mut self) -> MoveResult {
        let old_head = match self.head() {
            Some(head) => head,
            None => return Crashed { at: Position::new(0, 0) },
        };
        let new_head = old_head.neighbour(self.direction.get());

        if self.occupied.contains(&new_head) {
            return Crashed { at: new_head };
        }

        self.body.push_front(new_head);
        self.occupied.insert(new_head);

        // Never empty here, the new head was just pushed
        let vacated = self.body.pop_back().unwrap_or(new_head);
        self.occupied.remove(&vacated);

        Moved { new_head, vacated }
    }

    /// Re-attaches the cell freed by this tick's `advance`.
    pub fn grow_up(&mut self, vacated: Position) {
        if self.occupied.insert(vacated) {
            self.body.push_back(vacated);
        }
    }

    pub fn head_char(&self) -> char {
        match self.direction() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(snake: &Snake) -> Vec<Position> {
        snake.segments().copied().collect()
    }

    #[test]
    fn test_advance_moves_head_and_drops_tail() {
        let mut snake = Snake::from_body(
            &[Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)],
            Up,
        );

        let res = snake.advance();

        assert_eq!(res, Moved { new_head: Position::new(5, 4), vacated: Position::new(5, 7) });
        assert_eq!(snake.len(), 3);
        assert_eq!(cells(&snake), vec![Position::new(5, 4), Position::new(5, 5), Position::new(5, 6)]);
        assert!(!snake.contains(&Position::new(5, 7)));
        assert_eq!(snake.occupied().len(), 3);
    }

    #[test]
    fn test_change_direction_applies_on_next_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Up);
        snake.direction_cell().change_direction(Right);

        assert_eq!(snake.advance(), Moved { new_head: Position::new(6, 5), vacated: Position::new(5, 5) });
        assert_eq!(snake.head(), Some(Position::new(6, 5)));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_reversal_into_body_crashes() {
        let mut snake = Snake::from_body(
            &[Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)],
            Down,
        );

        assert_eq!(snake.advance(), Crashed { at: Position::new(5, 6) });
        assert_eq!(cells(&snake), vec![Position::new(5, 5), Position::new(5, 6), Position::new(5, 7)]);
    }

    #[test]
    fn test_moving_into_current_tail_crashes() {
        // A 2x2 loop: the head's only free-looking move is the tail cell
        let mut snake = Snake::from_body(
            &[Position::new(1, 1), Position::new(2, 1), Position::new(2, 2), Position::new(1, 2)],
            Down,
        );

        assert_eq!(snake.advance(), Crashed { at: Position::new(1, 2) });
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_single_cell_can_reverse() {
        let mut snake = Snake::new(Position::new(3, 3), Up);
        snake.advance();
        snake.direction_cell().change_direction(Down);

        assert_eq!(snake.advance(), Moved { new_head: Position::new(3, 3), vacated: Position::new(3, 2) });
    }

    #[test]
    fn test_grow_up_reattaches_vacated_cell() {
        let mut snake = Snake::from_body(&[Position::new(2, 2), Position::new(1, 2)], Right);

        let vacated = match snake.advance() {
            Moved { vacated, .. } => vacated,
            Crashed { at } => panic!("unexpected crash at {}", at),
        };
        snake.grow_up(vacated);

        assert_eq!(snake.len(), 3);
        assert_eq!(snake.tail(), Some(Position::new(1, 2)));
        assert_eq!(cells(&snake), vec![Position::new(3, 2), Position::new(2, 2), Position::new(1, 2)]);
    }

    #[test]
    fn test_direction_cell_is_shared() {
        let snake = Snake::new(Position::new(0, 0), Up);
        let cell = snake.direction_cell();

        cell.change_direction(Left);

        assert_eq!(snake.direction(), Left);
        assert_eq!(snake.head_char(), '<');
    }

    #[test]
    fn test_direction_round_trips_through_cell() {
        let cell = DirectionCell::new(Up);
        for dir in [Up, Down, Left, Right] {
            cell.change_direction(dir);
            assert_eq!(cell.get(), dir);
        }
    }
}
