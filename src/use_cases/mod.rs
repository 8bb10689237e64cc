// Use cases layer: the concurrent actors and the simulation that wires them together.

pub mod arena;
pub mod formation;
pub mod projectile;
pub mod ship;
pub mod signal;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use arena::{Arena, EntityHandle};
pub use formation::{FormationHandle, spawn_formation};
pub use projectile::{ProjectileOrigin, spawn_projectile};
pub use ship::{ShipHandle, ShipLink, spawn_ship};
pub use simulation::Simulation;
pub use types::{ArenaState, FormationEvent, ShipCommand, SimulationReport, SimulationSettings};
