// Use-case level messages, lifecycle state and settings for the actor simulation.

use crate::domain::{Bounds, Direction, EntityId, Outcome};
use std::time::Duration;

/// Commands delivered to a ship's mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipCommand {
    // Player input: one-cell move.
    Move(Direction),
    // Player input: fire a projectile.
    Fire,
    // Formation broadcast: move in the shared direction, then roll the firing chance.
    Step(Direction),
}

/// Messages from formation members (and the outside world) to their coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationEvent {
    BoundaryReached(Direction),
    MemberLost(EntityId),
    DefensiveLineReached(EntityId),
    Stop,
}

/// High-level simulation lifecycle shared with every actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaState {
    Running,
    Finished(Outcome),
    // Stopped from outside before any outcome.
    Halted,
}

impl ArenaState {
    pub fn is_running(&self) -> bool {
        matches!(self, ArenaState::Running)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            ArenaState::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Runtime settings applied when a simulation is spawned.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    /// Arena dimensions.
    pub bounds: Bounds,
    /// Period of the formation coordinator.
    pub formation_tick_interval: Duration,
    /// Period of every projectile.
    pub projectile_tick_interval: Duration,
    /// Period at which ships repaint themselves.
    pub redraw_interval: Duration,
    /// Capacity of each ship's command mailbox.
    pub command_channel_capacity: usize,
    /// Capacity of the member-to-coordinator event channel.
    pub event_channel_capacity: usize,
    /// Seed for formation firing; `None` draws one at startup.
    pub seed: Option<u64>,
}

impl SimulationSettings {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            formation_tick_interval: Duration::from_millis(500),
            projectile_tick_interval: Duration::from_millis(1000 / 30),
            redraw_interval: Duration::from_millis(1000 / 30),
            command_channel_capacity: 32,
            event_channel_capacity: 256,
            seed: None,
        }
    }
}

/// Summary of a finished (or halted) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    pub state: ArenaState,
    pub elapsed: Duration,
    pub formation_remaining: usize,
    pub barriers_remaining: usize,
    pub projectiles_in_flight: usize,
}
