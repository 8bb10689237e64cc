/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Row offset from the player anchor where its shots spawn (clear of its own shape).
    pub player_muzzle_offset: i32,

    /// Row offset from a formation member's anchor where its shots spawn.
    pub formation_muzzle_offset: i32,

    /// Glyph drawn for every projectile.
    pub glyph: char,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            player_muzzle_offset: -3,
            formation_muzzle_offset: 0,
            glyph: '|',
        }
    }
}
