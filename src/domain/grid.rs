// Spatial index of which entity holds each arena cell.

use super::entities::EntityId;
use super::geometry::{Bounds, Position};

/// Anything that can hold a grid cell.
pub trait Occupant {
    fn id(&self) -> EntityId;
}

/// Result of claiming a cell.
#[derive(Debug)]
pub enum Claim<T> {
    // The cell was empty or already held by the claimant.
    Claimed,
    // Another entity held the cell; it is returned so the caller can terminate it.
    Displaced(T),
    // The position lies outside the arena and was ignored.
    OutOfBounds,
}

/// A `(width + 1) x (height + 1)` table holding at most one occupant per cell.
///
/// Not synchronised on its own; callers share it behind a lock.
#[derive(Debug)]
pub struct OccupancyGrid<T> {
    bounds: Bounds,
    cells: Vec<Option<T>>,
}

impl<T: Occupant> OccupancyGrid<T> {
    pub fn new(bounds: Bounds) -> Self {
        let columns = (bounds.width.max(0) + 1) as usize;
        let rows = (bounds.height.max(0) + 1) as usize;
        let mut cells = Vec::with_capacity(columns * rows);
        cells.resize_with(columns * rows, || None);
        Self { bounds, cells }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let columns = (self.bounds.width + 1) as usize;
        Some(pos.y as usize * columns + pos.x as usize)
    }

    /// Occupant of `pos`, or `None` for empty and out-of-bounds cells.
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Puts `occupant` into `pos`, handing back whoever held it before.
    pub fn claim(&mut self, pos: Position, occupant: T) -> Claim<T> {
        let Some(i) = self.index(pos) else {
            return Claim::OutOfBounds;
        };
        let id = occupant.id();
        match self.cells[i].replace(occupant) {
            Some(previous) if previous.id() != id => Claim::Displaced(previous),
            _ => Claim::Claimed,
        }
    }

    /// Empties `pos` if `id` still holds it. Returns whether the cell was released.
    pub fn release(&mut self, pos: Position, id: EntityId) -> bool {
        let Some(i) = self.index(pos) else {
            return false;
        };
        match &self.cells[i] {
            Some(current) if current.id() == id => {
                self.cells[i] = None;
                true
            }
            _ => false,
        }
    }

    /// Cells currently held by `id`, in row-major order.
    pub fn cells_of(&self, id: EntityId) -> Vec<Position> {
        let columns = self.bounds.width + 1;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.as_ref().is_some_and(|o| o.id() == id))
            .map(|(i, _)| Position::new(i as i32 % columns, i as i32 / columns))
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
