use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::snake::Position;

pub const BEAN_CHAR: char = '*';

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bean {
    location: Position,
}

impl Bean {
    pub fn at(location: Position) -> Self {
        Bean { location }
    }

    /// Picks a free cell uniformly at random. `None` when the board is full.
    pub fn place<R: Rng + ?Sized>(
        length: i32,
        height: i32,
        excluded: &HashSet<Position>,
        rng: &mut R,
    ) -> Option<Self> {
        let choices: Vec<Position> = (0..height)
            .flat_map(|y| (0..length).map(move |x| Position::new(x, y)))
            .filter(|pos| !excluded.contains(pos))
            .collect();

        choices.choose(rng).copied().map(Bean::at)
    }

    pub fn location(&self) -> Position {
        self.location
    }

    pub fn is_eaten_by(&self, head: Position) -> bool {
        self.location == head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_place_avoids_excluded_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let excluded: HashSet<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .filter(|pos| *pos != Position::new(2, 3))
            .collect();

        for _ in 0..20 {
            let bean = Bean::place(4, 4, &excluded, &mut rng).unwrap();
            assert_eq!(bean.location(), Position::new(2, 3));
        }
    }

    #[test]
    fn test_place_stays_on_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let excluded = HashSet::from([Position::new(0, 0), Position::new(1, 0)]);

        for _ in 0..100 {
            let loc = Bean::place(3, 2, &excluded, &mut rng).unwrap().location();
            assert!((0..3).contains(&loc.x) && (0..2).contains(&loc.y));
            assert!(!excluded.contains(&loc));
        }
    }

    #[test]
    fn test_place_on_full_board_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let excluded = HashSet::from([
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ]);

        assert_eq!(Bean::place(2, 2, &excluded, &mut rng), None);
    }

    #[test]
    fn test_is_eaten_by() {
        let bean = Bean::at(Position::new(4, 1));
        assert!(bean.is_eaten_by(Position::new(4, 1)));
        assert!(!bean.is_eaten_by(Position::new(1, 4)));
    }
}
