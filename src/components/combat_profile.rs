/// Source-side combat stats consumed by the damage pipeline: critical
/// chance and any innate outgoing-damage multiplier (distinct from the
/// `Empower` status, which is transient).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatProfile {
    pub strength: f32,
    pub crit_chance: f32,
    pub damage_multiplier: f32,
}

impl CombatProfile {
    pub fn new(strength: f32, crit_chance: f32) -> Self {
        Self {
            strength,
            crit_chance,
            damage_multiplier: 1.0,
        }
    }
}

impl Default for CombatProfile {
    fn default() -> Self {
        Self {
            strength: 0.0,
            crit_chance: 0.0,
            damage_multiplier: 1.0,
        }
    }
}
