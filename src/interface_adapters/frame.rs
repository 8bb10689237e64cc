// In-memory terminal frame backing the rendering port.

use crate::domain::{Bounds, Color, Position, Renderer, Style};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    style: Style,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        style: Style::BLANK,
    };
}

/// Character grid covering every arena cell. Draw calls only touch memory,
/// so actors can render while holding the grid lock.
#[derive(Debug)]
pub struct FrameBuffer {
    bounds: Bounds,
    cells: Mutex<Vec<Cell>>,
    dirty: AtomicBool,
}

impl FrameBuffer {
    pub fn new(bounds: Bounds) -> Self {
        let len = ((bounds.width.max(0) + 1) * (bounds.height.max(0) + 1)) as usize;
        Self {
            bounds,
            cells: Mutex::new(vec![Cell::BLANK; len]),
            // The first flush paints the empty frame.
            dirty: AtomicBool::new(true),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Glyph currently shown at `pos`, if it lies in the frame.
    pub fn glyph_at(&self, pos: Position) -> Option<char> {
        let index = self.index(pos)?;
        Some(self.lock()[index].glyph)
    }

    pub fn style_at(&self, pos: Position) -> Option<Style> {
        let index = self.index(pos)?;
        Some(self.lock()[index].style)
    }

    /// Clears the dirty flag, returning whether anything changed since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Plain text rows, one per line, trailing blanks trimmed.
    pub fn render_text(&self) -> String {
        let cells = self.lock();
        let mut out = String::new();
        for row in cells.chunks(self.row_len()) {
            let line: String = row.iter().map(|c| c.glyph).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    /// Full-screen ANSI frame: cursor home, then every row with its colours.
    pub fn render_ansi(&self) -> String {
        let cells = self.lock();
        let mut out = String::from("\x1b[H");
        for row in cells.chunks(self.row_len()) {
            let mut current = Style::BLANK;
            for cell in row {
                if cell.style != current {
                    push_style(&mut out, cell.style);
                    current = cell.style;
                }
                out.push(cell.glyph);
            }
            out.push_str("\x1b[0m\r\n");
        }
        out
    }

    fn row_len(&self) -> usize {
        (self.bounds.width.max(0) + 1) as usize
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.bounds.contains(pos) {
            return None;
        }
        Some(pos.y as usize * self.row_len() + pos.x as usize)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Cell>> {
        // A panicking writer cannot leave a cell half-written.
        self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set(&self, pos: Position, cell: Cell) {
        let Some(index) = self.index(pos) else {
            return;
        };
        let mut cells = self.lock();
        if cells[index] != cell {
            cells[index] = cell;
            self.dirty.store(true, Ordering::Release);
        }
    }
}

impl Renderer for FrameBuffer {
    fn draw_cell(&self, pos: Position, glyph: char, style: Style) {
        self.set(pos, Cell { glyph, style });
    }

    fn clear_cell(&self, pos: Position) {
        self.set(pos, Cell::BLANK);
    }
}

fn push_style(out: &mut String, style: Style) {
    out.push_str("\x1b[0m");
    if let Some(code) = ansi_code(style.fg) {
        let _ = write!(out, "\x1b[{}m", 30 + code);
    }
    if let Some(code) = ansi_code(style.bg) {
        let _ = write!(out, "\x1b[{}m", 40 + code);
    }
}

fn ansi_code(color: Color) -> Option<u8> {
    match color {
        Color::Default => None,
        Color::Red => Some(1),
        Color::Green => Some(2),
        Color::Yellow => Some(3),
        Color::Cyan => Some(6),
        Color::White => Some(7),
    }
}
