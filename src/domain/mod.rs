// Domain layer: arena geometry, occupancy rules and gameplay tuning.

pub mod entities;
pub mod footprint;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod ports;
pub mod sweep;
pub mod tuning;

pub use entities::{EntityId, Faction, LossReason, Outcome};
pub use footprint::{Color, Footprint, FootprintCell, Style};
pub use geometry::{Bounds, Direction, Heading, Position};
pub use grid::{Claim, OccupancyGrid, Occupant};
pub use layout::{Layout, ShipBlueprint};
pub use ports::Renderer;
pub use sweep::Sweep;
