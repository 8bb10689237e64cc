// Ship shapes and the colours they are drawn with.

use super::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Default,
    White,
    Yellow,
    Red,
    Cyan,
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    pub const BLANK: Style = Style::new(Color::Default, Color::Default);
    pub const PLAYER: Style = Style::new(Color::White, Color::Default);
    pub const FORMATION: Style = Style::new(Color::Yellow, Color::Default);
    pub const BARRIER: Style = Style::new(Color::Default, Color::Green);
    pub const PLAYER_SHOT: Style = Style::new(Color::Cyan, Color::Default);
    pub const FORMATION_SHOT: Style = Style::new(Color::Red, Color::Default);

    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootprintCell {
    pub dx: i32,
    pub dy: i32,
    pub glyph: char,
}

/// Cells a ship covers, relative to its anchor.
///
/// The shape sits directly above the anchor: with `rows` rows, row `r` lands on
/// `anchor.y - rows + r` and each row is centred on `anchor.x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    cells: Vec<FootprintCell>,
}

impl Footprint {
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                let half = (row.chars().count() / 2) as i32;
                row.chars().enumerate().map(move |(c, glyph)| FootprintCell {
                    dx: c as i32 - half,
                    dy: r as i32 - height,
                    glyph,
                })
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[FootprintCell] {
        &self.cells
    }

    /// Absolute cells and glyphs for a ship anchored at `anchor`.
    pub fn cells_at(&self, anchor: Position) -> impl Iterator<Item = (Position, char)> + '_ {
        self.cells
            .iter()
            .map(move |cell| (anchor.offset(cell.dx, cell.dy), cell.glyph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_silhouette_sits_above_its_anchor() {
        let footprint = Footprint::from_rows(&["|", "<=>"]);
        let cells: Vec<_> = footprint.cells_at(Position::new(40, 24)).collect();

        assert_eq!(
            cells,
            vec![
                (Position::new(40, 22), '|'),
                (Position::new(39, 23), '<'),
                (Position::new(40, 23), '='),
                (Position::new(41, 23), '>'),
            ]
        );
    }

    #[test]
    fn single_cell_shape_occupies_the_row_above() {
        let footprint = Footprint::from_rows(&[" "]);
        let cells: Vec<_> = footprint.cells_at(Position::new(5, 5)).collect();
        assert_eq!(cells, vec![(Position::new(5, 4), ' ')]);
    }
}
