// Direction protocol for the descending zig-zag sweep of a formation.

use super::geometry::Direction;

/// Single shared direction of a formation plus the horizontal sense it last travelled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    current: Direction,
    last_horizontal: Direction,
}

impl Sweep {
    pub fn new(initial: Direction) -> Self {
        let last_horizontal = if initial.is_horizontal() {
            initial
        } else {
            Direction::Right
        };
        Self {
            current: initial,
            last_horizontal,
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    /// A member touched the `side` boundary. Only a report matching the current
    /// direction turns the sweep downwards; stale or duplicate reports are ignored.
    /// Returns whether the direction changed.
    pub fn boundary_reached(&mut self, side: Direction) -> bool {
        if side.is_horizontal() && self.current == side {
            self.current = Direction::Down;
            return true;
        }
        false
    }

    /// Called once the current direction has been broadcast. A row advance is
    /// followed by the opposite horizontal sense.
    pub fn advance(&mut self) {
        if self.current == Direction::Down {
            self.current = self.last_horizontal.opposite();
        }
        self.last_horizontal = self.current;
    }
}

impl Default for Sweep {
    fn default() -> Self {
        Self::new(Direction::Left)
    }
}
