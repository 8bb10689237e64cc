// Formation coordinator: owns the member set, broadcasts the shared direction each tick
// and turns boundary reports into the descending zig-zag sweep.

use super::arena::{self, Arena};
use super::ship::{ShipHandle, ShipLink, spawn_ship_in_slot};
use super::types::{FormationEvent, ShipCommand};
use crate::domain::{EntityId, LossReason, Outcome, ShipBlueprint, Sweep};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// Owning handle to a formation: its member actors and the coordinator task.
#[derive(Debug)]
pub struct FormationHandle {
    events_tx: mpsc::Sender<FormationEvent>,
    members: Vec<ShipHandle>,
    task: JoinHandle<()>,
}

impl FormationHandle {
    pub fn members(&self) -> &[ShipHandle] {
        &self.members
    }

    /// Members that have not been terminated yet.
    pub fn remaining(&self) -> usize {
        self.members
            .iter()
            .filter(|m| !m.entity().is_terminated())
            .count()
    }

    /// Asks the coordinator to terminate every member and exit.
    pub fn stop(&self) -> bool {
        self.events_tx.try_send(FormationEvent::Stop).is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        for member in self.members {
            member.join().await;
        }
        if let Err(e) = self.task.await {
            warn!(error = %e, "formation coordinator failed");
        }
    }
}

/// Spawns every member and the coordinator that drives them.
pub fn spawn_formation(arena: Arc<Arena>, blueprints: Vec<ShipBlueprint>) -> FormationHandle {
    let (events_tx, events_rx) = mpsc::channel(arena.settings().event_channel_capacity);

    let members: Vec<ShipHandle> = blueprints
        .into_iter()
        .enumerate()
        .map(|(slot, blueprint)| {
            spawn_ship_in_slot(arena.clone(), blueprint, Some(events_tx.clone()), slot as u64)
        })
        .collect();
    let links = members.iter().map(|m| (m.id(), m.link())).collect();

    let coordinator = FormationCoordinator {
        arena,
        members: links,
        sweep: Sweep::default(),
    };
    let task = tokio::spawn(coordinator.run(events_rx));

    FormationHandle {
        events_tx,
        members,
        task,
    }
}

enum Control {
    Continue,
    Exit,
}

struct FormationCoordinator {
    arena: Arc<Arena>,
    // Live members only; entries leave through MemberLost, never mid-broadcast.
    members: HashMap<EntityId, ShipLink>,
    sweep: Sweep,
}

impl FormationCoordinator {
    async fn run(mut self, mut events_rx: mpsc::Receiver<FormationEvent>) {
        let mut state_rx = self.arena.subscribe();
        let period = self.arena.settings().formation_tick_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(members = self.members.len(), "formation deployed");

        loop {
            if self.members.is_empty() {
                info!("formation eliminated");
                self.arena.end(Outcome::Win);
                return;
            }

            tokio::select! {
                biased;
                _ = arena::stopped(&mut state_rx) => return,
                Some(event) = events_rx.recv() => {
                    if let Control::Exit = self.handle_event(event) {
                        return;
                    }
                }
                _ = ticker.tick() => self.broadcast(),
            }
        }
    }

    fn handle_event(&mut self, event: FormationEvent) -> Control {
        match event {
            FormationEvent::BoundaryReached(side) => {
                if self.sweep.boundary_reached(side) {
                    debug!(?side, "formation touched a side boundary; advancing a row");
                }
                Control::Continue
            }
            FormationEvent::MemberLost(id) => {
                if self.members.remove(&id).is_some() {
                    debug!(entity_id = %id, remaining = self.members.len(), "formation member lost");
                }
                Control::Continue
            }
            FormationEvent::DefensiveLineReached(id) => {
                info!(entity_id = %id, "formation landed on the defensive line");
                self.arena.end(Outcome::Loss(LossReason::FormationLanded));
                self.stop_members();
                Control::Exit
            }
            FormationEvent::Stop => {
                info!(members = self.members.len(), "formation stop requested");
                self.stop_members();
                Control::Exit
            }
        }
    }

    fn broadcast(&mut self) {
        let direction = self.sweep.current();
        for link in self.members.values() {
            link.send(ShipCommand::Step(direction));
        }
        self.sweep.advance();
        trace!(?direction, members = self.members.len(), "formation step");
    }

    fn stop_members(&self) {
        for link in self.members.values() {
            link.entity.terminate();
        }
    }
}
