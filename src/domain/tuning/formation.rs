/// Gameplay tuning for formation members.
///
/// Keep this separate from runtime configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct FormationTuning {
    /// Chance that a member fires on each formation step, in `0.0..=1.0`.
    pub fire_probability: f64,

    /// Rows below the anchor that must be free of formation members before firing.
    pub fire_lookahead: [i32; 2],

    /// A member only fires while `y + min_clearance_below < height`.
    pub min_clearance_below: i32,
}

impl Default for FormationTuning {
    fn default() -> Self {
        Self {
            fire_probability: 0.05,
            fire_lookahead: [2, 5],
            min_clearance_below: 6,
        }
    }
}
