use super::footprint::Style;
use super::geometry::Position;

// Port for the rendering collaborator. Calls are fire-and-forget and must not block:
// actors invoke them while holding the grid lock.
pub trait Renderer: Send + Sync {
    fn draw_cell(&self, pos: Position, glyph: char, style: Style);
    fn clear_cell(&self, pos: Position);
}
