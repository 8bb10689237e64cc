// Projectile actor: advances one row per tick and resolves hits through the grid.

use super::arena::{self, Arena};
use crate::domain::{EntityId, Faction, Heading, LossReason, Outcome, Position, Style};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Identity of the ship that fired a projectile. Hits on the origin are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectileOrigin {
    pub id: EntityId,
    pub faction: Faction,
}

/// Spawns a projectile actor at `start`.
pub fn spawn_projectile(
    arena: Arc<Arena>,
    origin: ProjectileOrigin,
    start: Position,
    heading: Heading,
) -> JoinHandle<()> {
    arena.projectile_launched();
    let style = match origin.faction {
        Faction::Player => Style::PLAYER_SHOT,
        _ => Style::FORMATION_SHOT,
    };
    let projectile = Projectile {
        glyph: arena.tuning().projectile.glyph,
        arena,
        origin,
        position: start,
        heading,
        style,
    };
    tokio::spawn(projectile.run())
}

enum Flight {
    Continue,
    Done,
}

struct Projectile {
    arena: Arc<Arena>,
    origin: ProjectileOrigin,
    position: Position,
    heading: Heading,
    style: Style,
    glyph: char,
}

impl Drop for Projectile {
    fn drop(&mut self) {
        self.arena.projectile_retired();
    }
}

impl Projectile {
    async fn run(mut self) {
        let mut state_rx = self.arena.subscribe();
        let period = self.arena.settings().projectile_tick_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if !self.arena.bounds().contains(self.position) {
            return;
        }
        self.arena
            .renderer()
            .draw_cell(self.position, self.glyph, self.style);

        loop {
            tokio::select! {
                biased;
                _ = arena::stopped(&mut state_rx) => return,
                _ = ticker.tick() => {
                    if let Flight::Done = self.advance().await {
                        return;
                    }
                }
            }
        }
    }

    async fn advance(&mut self) -> Flight {
        self.arena.renderer().clear_cell(self.position);
        self.position.y += self.heading.dy();

        // Leaving the arena vertically ends the flight before any hit test.
        if !self.arena.bounds().contains(self.position) {
            trace!(origin_id = %self.origin.id, y = self.position.y, "projectile left the arena");
            return Flight::Done;
        }

        self.arena
            .renderer()
            .draw_cell(self.position, self.glyph, self.style);
        self.resolve_collision().await
    }

    async fn resolve_collision(&self) -> Flight {
        let grid = self.arena.grid().await;
        let Some(target) = grid.get(self.position) else {
            return Flight::Continue;
        };
        if target.id == self.origin.id {
            return Flight::Continue;
        }

        if target.faction == Faction::Player {
            // The run is over; the player is not torn down through the destroy path.
            info!(
                origin_id = %self.origin.id,
                x = self.position.x,
                y = self.position.y,
                "player hit"
            );
            self.arena.end(Outcome::Loss(LossReason::PlayerHit));
            return Flight::Done;
        }

        target.terminate();
        debug!(
            origin_id = %self.origin.id,
            target_id = %target.id,
            target_faction = %target.faction,
            x = self.position.x,
            y = self.position.y,
            "projectile hit"
        );
        drop(grid);
        self.arena.renderer().clear_cell(self.position);
        Flight::Done
    }
}
