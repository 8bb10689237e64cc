// Discrete arena coordinates, movement directions and bounds checks.

/// A cell on the arena grid. `y` grows downwards, toward the defensive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Movement direction for ships. Formations only ever advance downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Down,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Down,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Vertical travel of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    // Toward the formation.
    Up,
    // Toward the defensive line.
    Down,
}

impl Heading {
    pub fn dy(self) -> i32 {
        match self {
            Heading::Up => -1,
            Heading::Down => 1,
        }
    }
}

/// Arena dimensions. Valid cells span `0..=width` by `0..=height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..=self.width).contains(&pos.x) && (0..=self.height).contains(&pos.y)
    }

    /// Leftmost anchor column a ship may occupy.
    pub fn min_anchor_x(&self) -> i32 {
        1
    }

    /// Rightmost anchor column a ship may occupy.
    pub fn max_anchor_x(&self) -> i32 {
        self.width - 2
    }

    /// Row a formation anchor must never reach.
    pub fn defensive_row(&self) -> i32 {
        self.height - 1
    }

    /// Returns the one-cell move in `direction`, or `None` when it would cross a boundary.
    /// Side boundaries clamp; nothing wraps.
    pub fn step(&self, pos: Position, direction: Direction) -> Option<Position> {
        match direction {
            Direction::Left if pos.x > self.min_anchor_x() => Some(pos.offset(-1, 0)),
            Direction::Right if pos.x < self.max_anchor_x() => Some(pos.offset(1, 0)),
            Direction::Down if pos.y < self.height => Some(pos.offset(0, 1)),
            _ => None,
        }
    }

    /// True when `pos` sits on the side boundary a ship travelling in `direction` runs into.
    pub fn boundary_reached(&self, pos: Position, direction: Direction) -> bool {
        match direction {
            Direction::Left => pos.x <= self.min_anchor_x(),
            Direction::Right => pos.x >= self.max_anchor_x(),
            Direction::Down => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARENA: Bounds = Bounds::new(80, 24);

    #[test]
    fn when_moving_inside_the_arena_then_x_changes_by_one() {
        let pos = Position::new(40, 10);
        assert_eq!(ARENA.step(pos, Direction::Left), Some(Position::new(39, 10)));
        assert_eq!(ARENA.step(pos, Direction::Right), Some(Position::new(41, 10)));
        assert_eq!(ARENA.step(pos, Direction::Down), Some(Position::new(40, 11)));
    }

    #[test]
    fn when_moving_past_a_side_boundary_then_move_is_rejected() {
        assert_eq!(ARENA.step(Position::new(1, 5), Direction::Left), None);
        assert_eq!(ARENA.step(Position::new(78, 5), Direction::Right), None);
        assert_eq!(ARENA.step(Position::new(40, 24), Direction::Down), None);
    }

    #[test]
    fn boundary_contact_only_counts_in_the_direction_of_travel() {
        assert!(ARENA.boundary_reached(Position::new(1, 5), Direction::Left));
        assert!(!ARENA.boundary_reached(Position::new(1, 5), Direction::Right));
        assert!(ARENA.boundary_reached(Position::new(78, 5), Direction::Right));
        assert!(!ARENA.boundary_reached(Position::new(78, 5), Direction::Down));
    }

    #[test]
    fn contains_is_inclusive_of_both_edges() {
        assert!(ARENA.contains(Position::new(0, 0)));
        assert!(ARENA.contains(Position::new(80, 24)));
        assert!(!ARENA.contains(Position::new(40, -1)));
        assert!(!ARENA.contains(Position::new(40, 25)));
        assert!(!ARENA.contains(Position::new(81, 3)));
    }
}
