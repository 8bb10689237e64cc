// One-time placement of the player, barrier segments and formation members.

use super::entities::Faction;
use super::footprint::{Footprint, Style};
use super::geometry::{Bounds, Position};

const PLAYER_SHAPE: &[&str] = &["|", "<=>"];
const FORMATION_SHAPE: &[&str] = &["(=)", "\\ /"];
const BARRIER_SHAPE: &[&str] = &[" "];

// Barrier profile: raised centre, lower shoulders.
const BARRIER_PROFILE: [i32; 5] = [0, 1, 1, 1, 0];
const BARRIER_SPACING: usize = 7;
const BARRIER_THICKNESS: i32 = 2;

const FORMATION_ROWS: i32 = 3;
const FORMATION_COLUMNS: i32 = 10;
const FORMATION_COLUMN_SPACING: i32 = 5;
const FORMATION_ROW_SPACING: i32 = 3;
const FORMATION_TOP: i32 = 2;

/// Everything needed to spawn one ship actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipBlueprint {
    pub faction: Faction,
    pub anchor: Position,
    pub footprint: Footprint,
    pub style: Style,
}

impl ShipBlueprint {
    pub fn player(anchor: Position) -> Self {
        Self {
            faction: Faction::Player,
            anchor,
            footprint: Footprint::from_rows(PLAYER_SHAPE),
            style: Style::PLAYER,
        }
    }

    pub fn formation_member(anchor: Position) -> Self {
        Self {
            faction: Faction::Formation,
            anchor,
            footprint: Footprint::from_rows(FORMATION_SHAPE),
            style: Style::FORMATION,
        }
    }

    pub fn barrier(anchor: Position) -> Self {
        Self {
            faction: Faction::Barrier,
            anchor,
            footprint: Footprint::from_rows(BARRIER_SHAPE),
            style: Style::BARRIER,
        }
    }

    /// True when every footprint cell lies inside `bounds`.
    pub fn fits(&self, bounds: Bounds) -> bool {
        self.footprint
            .cells_at(self.anchor)
            .all(|(pos, _)| bounds.contains(pos))
    }
}

/// Setup-time placement consumed by the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub player: ShipBlueprint,
    pub barriers: Vec<ShipBlueprint>,
    pub formation: Vec<ShipBlueprint>,
}

impl Layout {
    /// Player centred on the bottom row, barrier blocks above it and a 3x10
    /// formation near the top. Pieces that would not fit the arena are dropped.
    pub fn classic(bounds: Bounds) -> Self {
        let player = ShipBlueprint::player(Position::new(bounds.width / 2, bounds.height));

        let mut barriers = Vec::new();
        let last_block = bounds.width - 4;
        for left in (3..last_block.max(3)).step_by(BARRIER_SPACING) {
            for (column, raise) in BARRIER_PROFILE.iter().enumerate() {
                for layer in 0..BARRIER_THICKNESS {
                    let anchor = Position::new(
                        left + column as i32,
                        bounds.height - 4 - raise + layer,
                    );
                    barriers.push(ShipBlueprint::barrier(anchor));
                }
            }
        }
        barriers.retain(|b| b.fits(bounds));

        let middle = bounds.width / 2;
        let mut formation = Vec::new();
        for row in 0..FORMATION_ROWS {
            for column in 0..FORMATION_COLUMNS {
                let x = middle - (column - FORMATION_COLUMNS / 2) * FORMATION_COLUMN_SPACING
                    - FORMATION_COLUMN_SPACING;
                let y = FORMATION_TOP + FORMATION_ROW_SPACING * row;
                formation.push(ShipBlueprint::formation_member(Position::new(x, y)));
            }
        }
        formation.retain(|m| {
            m.fits(bounds)
                && (bounds.min_anchor_x()..=bounds.max_anchor_x()).contains(&m.anchor.x)
        });

        Self {
            player,
            barriers,
            formation,
        }
    }

    /// Iterates every blueprint, player first.
    pub fn blueprints(&self) -> impl Iterator<Item = &ShipBlueprint> {
        std::iter::once(&self.player)
            .chain(self.barriers.iter())
            .chain(self.formation.iter())
    }
}
