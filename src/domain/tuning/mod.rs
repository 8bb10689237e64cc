// Gameplay tuning, kept apart from runtime configuration (tick rates, channel sizes).

pub mod formation;
pub mod projectile;

pub use formation::FormationTuning;
pub use projectile::ProjectileTuning;

#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub formation: FormationTuning,
    pub projectile: ProjectileTuning,
}
