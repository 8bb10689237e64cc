// Ship actor shared by the player unit, barrier segments and formation members.
// The three differ only in who sends them commands and whether they fire.

use super::arena::{self, Arena, EntityHandle, Grid};
use super::projectile::{ProjectileOrigin, spawn_projectile};
use super::types::{FormationEvent, ShipCommand};
use crate::domain::{
    Claim, Direction, EntityId, Faction, Footprint, Heading, LossReason, Outcome, Position,
    ShipBlueprint, Style,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Non-owning link to a ship: enough to command it or stop it.
#[derive(Debug, Clone)]
pub struct ShipLink {
    pub entity: EntityHandle,
    command_tx: mpsc::Sender<ShipCommand>,
}

impl ShipLink {
    /// Queues a command without waiting. Commands to a full or closed mailbox are dropped.
    pub fn send(&self, command: ShipCommand) -> bool {
        match self.command_tx.try_send(command) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(command)) => {
                warn!(entity_id = %self.entity.id, ?command, "ship mailbox full; command dropped");
                false
            }
            // The ship already exited.
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

/// Owning handle to a running ship actor.
#[derive(Debug)]
pub struct ShipHandle {
    link: ShipLink,
    position_rx: watch::Receiver<Position>,
    task: JoinHandle<()>,
}

impl ShipHandle {
    pub fn id(&self) -> EntityId {
        self.link.entity.id
    }

    pub fn faction(&self) -> Faction {
        self.link.entity.faction
    }

    pub fn entity(&self) -> &EntityHandle {
        &self.link.entity
    }

    /// Latest anchor position published by the actor.
    pub fn position(&self) -> Position {
        *self.position_rx.borrow()
    }

    pub fn link(&self) -> ShipLink {
        self.link.clone()
    }

    pub fn move_request(&self, direction: Direction) -> bool {
        self.link.send(ShipCommand::Move(direction))
    }

    pub fn fire_request(&self) -> bool {
        self.link.send(ShipCommand::Fire)
    }

    pub fn terminate(&self) -> bool {
        self.link.entity.terminate()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(entity_id = %self.link.entity.id, error = %e, "ship task failed");
        }
    }
}

/// Spawns a ship actor. Formation members get the coordinator's event sender.
pub fn spawn_ship(
    arena: Arc<Arena>,
    blueprint: ShipBlueprint,
    formation_tx: Option<mpsc::Sender<FormationEvent>>,
) -> ShipHandle {
    spawn_ship_in_slot(arena, blueprint, formation_tx, 0)
}

/// Like [`spawn_ship`], with `slot` picking the member's random stream. The formation
/// passes each member's setup index so a seeded run replays the same shots.
pub(crate) fn spawn_ship_in_slot(
    arena: Arc<Arena>,
    blueprint: ShipBlueprint,
    formation_tx: Option<mpsc::Sender<FormationEvent>>,
    slot: u64,
) -> ShipHandle {
    let entity = EntityHandle::new(blueprint.faction);
    let (command_tx, command_rx) = mpsc::channel(arena.settings().command_channel_capacity);
    let (position_tx, position_rx) = watch::channel(blueprint.anchor);
    let rng = (blueprint.faction == Faction::Formation).then(|| arena.rng_for(slot));

    let ship = Ship {
        arena,
        entity: entity.clone(),
        footprint: blueprint.footprint,
        style: blueprint.style,
        position: blueprint.anchor,
        position_tx,
        formation_tx,
        rng,
    };
    let task = tokio::spawn(ship.run(command_rx));

    ShipHandle {
        link: ShipLink { entity, command_tx },
        position_rx,
        task,
    }
}

struct Ship {
    arena: Arc<Arena>,
    entity: EntityHandle,
    footprint: Footprint,
    style: Style,
    position: Position,
    position_tx: watch::Sender<Position>,
    // Present only for formation members.
    formation_tx: Option<mpsc::Sender<FormationEvent>>,
    rng: Option<ChaCha8Rng>,
}

impl Ship {
    async fn run(mut self, mut command_rx: mpsc::Receiver<ShipCommand>) {
        let mut state_rx = self.arena.subscribe();
        let stop = self.entity.stop_signal();
        let period = self.arena.settings().redraw_interval;
        let mut redraw = tokio::time::interval_at(Instant::now() + period, period);
        redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.repaint().await;
        debug!(
            entity_id = %self.entity.id,
            faction = %self.entity.faction,
            x = self.position.x,
            y = self.position.y,
            "ship spawned"
        );

        loop {
            tokio::select! {
                biased;
                _ = arena::stopped(&mut state_rx) => {
                    // Global end: leave the grid as it is.
                    debug!(entity_id = %self.entity.id, "ship exiting on simulation end");
                    return;
                }
                _ = stop.wait() => {
                    self.shutdown().await;
                    return;
                }
                Some(command) = command_rx.recv() => self.handle_command(command).await,
                _ = redraw.tick() => self.repaint().await,
            }
        }
    }

    async fn handle_command(&mut self, command: ShipCommand) {
        match command {
            ShipCommand::Move(direction) => {
                self.try_move(direction).await;
            }
            ShipCommand::Fire => self.fire(),
            ShipCommand::Step(direction) => self.formation_step(direction).await,
        }
    }

    async fn try_move(&mut self, direction: Direction) -> bool {
        if self.entity.faction == Faction::Barrier {
            return false;
        }
        let Some(next) = self.arena.bounds().step(self.position, direction) else {
            return false;
        };
        self.relocate(next).await
    }

    async fn relocate(&mut self, next: Position) -> bool {
        let arena = self.arena.clone();
        let mut grid = arena.grid().await;
        // Someone may have displaced us while we waited for the lock.
        if self.entity.is_terminated() {
            return false;
        }
        self.erase(&mut grid);
        self.position = next;
        self.paint(&mut grid);
        drop(grid);

        self.position_tx.send_replace(next);
        true
    }

    async fn repaint(&self) {
        let mut grid = self.arena.grid().await;
        if self.entity.is_terminated() {
            return;
        }
        self.paint(&mut grid);
    }

    // Claims and draws every footprint cell, terminating any other entity found there.
    fn paint(&self, grid: &mut Grid) {
        let renderer = self.arena.renderer();
        for (pos, glyph) in self.footprint.cells_at(self.position) {
            match grid.claim(pos, self.entity.clone()) {
                Claim::Claimed => {}
                Claim::Displaced(other) => {
                    if other.terminate() {
                        debug!(
                            entity_id = %self.entity.id,
                            displaced_id = %other.id,
                            displaced_faction = %other.faction,
                            x = pos.x,
                            y = pos.y,
                            "ship displaced another entity"
                        );
                    }
                }
                Claim::OutOfBounds => continue,
            }
            renderer.draw_cell(pos, glyph, self.style);
        }
    }

    // Releases and clears the cells this ship still owns.
    fn erase(&self, grid: &mut Grid) {
        let renderer = self.arena.renderer();
        for (pos, _) in self.footprint.cells_at(self.position) {
            if grid.release(pos, self.entity.id) {
                renderer.clear_cell(pos);
            }
        }
    }

    async fn formation_step(&mut self, direction: Direction) {
        let Some(formation_tx) = self.formation_tx.clone() else {
            return;
        };
        self.try_move(direction).await;

        let bounds = self.arena.bounds();
        match direction {
            Direction::Left | Direction::Right => {
                // Reported even when the move itself was rejected.
                if bounds.boundary_reached(self.position, direction) {
                    self.report(&formation_tx, FormationEvent::BoundaryReached(direction))
                        .await;
                }
            }
            Direction::Down => {
                if self.position.y >= bounds.defensive_row() {
                    info!(
                        entity_id = %self.entity.id,
                        y = self.position.y,
                        "formation reached the defensive line"
                    );
                    let reported = self
                        .report(
                            &formation_tx,
                            FormationEvent::DefensiveLineReached(self.entity.id),
                        )
                        .await;
                    if !reported {
                        self.arena.end(Outcome::Loss(LossReason::FormationLanded));
                    }
                    return;
                }
            }
        }

        self.maybe_fire().await;
    }

    async fn report(&self, formation_tx: &mpsc::Sender<FormationEvent>, event: FormationEvent) -> bool {
        // The coordinator never waits on its members, so awaiting capacity cannot cycle.
        match formation_tx.send(event).await {
            Ok(()) => true,
            Err(_) => {
                debug!(entity_id = %self.entity.id, ?event, "formation coordinator gone");
                false
            }
        }
    }

    async fn maybe_fire(&mut self) {
        let tuning = self.arena.tuning().formation;
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        // Sanitized to 0..=1 when the arena was built.
        if !rng.gen_bool(tuning.fire_probability) {
            return;
        }
        if self.position.y + tuning.min_clearance_below >= self.arena.bounds().height {
            return;
        }

        // Never fire into or through another member of the formation.
        let blocked = {
            let grid = self.arena.grid().await;
            tuning.fire_lookahead.iter().any(|dy| {
                grid.get(self.position.offset(0, *dy))
                    .is_some_and(|o| o.faction == Faction::Formation)
            })
        };
        if !blocked {
            self.fire();
        }
    }

    fn fire(&self) {
        let tuning = self.arena.tuning().projectile;
        let (heading, offset) = match self.entity.faction {
            Faction::Player => (Heading::Up, tuning.player_muzzle_offset),
            Faction::Formation => (Heading::Down, tuning.formation_muzzle_offset),
            Faction::Barrier => return,
        };
        let origin = ProjectileOrigin {
            id: self.entity.id,
            faction: self.entity.faction,
        };
        let start = self.position.offset(0, offset);
        debug!(entity_id = %self.entity.id, x = start.x, y = start.y, ?heading, "ship fired");
        spawn_projectile(self.arena.clone(), origin, start, heading);
    }

    async fn shutdown(&mut self) {
        {
            let arena = self.arena.clone();
            let mut grid = arena.grid().await;
            self.erase(&mut grid);
        }

        if let Some(formation_tx) = self.formation_tx.take() {
            self.report(&formation_tx, FormationEvent::MemberLost(self.entity.id))
                .await;
        }

        debug!(
            entity_id = %self.entity.id,
            faction = %self.entity.faction,
            x = self.position.x,
            y = self.position.y,
            "ship destroyed"
        );
        if self.entity.faction == Faction::Player {
            self.arena.end(Outcome::Loss(LossReason::PlayerDestroyed));
        }
    }
}
