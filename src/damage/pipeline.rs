use rand::Rng;

/// Strength coefficient for `stat_mult` (spec §4.7).
pub const STR_COEF: f32 = 0.05;
/// Defense-reduction half-life constant (spec §4.7).
pub const DEF_K: f32 = 100.0;
/// Defense reduction and `Fortify` both cap here so damage is never
/// fully negated (spec §4.7).
pub const REDUCTION_CAP: f32 = 0.75;

/// Attacker-side inputs to the formula. `class_affinity_pct` and
/// `title_bonus_pct` are sourced from the effect's own params rather
/// than a built class/progression system (spec §1 treats
/// class/progression as an external collaborator); callers that have
/// one plug its output in here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceStats {
    pub strength: f32,
    pub crit_chance: f32,
    pub empower_pct: f32,
    pub class_affinity_pct: f32,
    pub title_bonus_pct: f32,
    pub weapon_mult: f32,
}

/// Defender-side inputs. `vulnerable_pct`/`fortify_pct` come from the
/// target's active `StatusEffects`; `defense` from its `Defense`
/// component (0.0 when absent).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseStats {
    pub defense: f32,
    pub vulnerable_pct: f32,
    pub fortify_pct: f32,
}

/// Outcome of one hit, before shield absorption (the executor owns
/// splitting `incoming` between the target's shield pool and HP).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub incoming: f32,
    pub was_critical: bool,
}

/// The deterministic formula from spec §4.7. `weapon_mult` defaults to
/// `1.0` when the caller has no weapon tag multipliers to contribute
/// (`SourceStats::default()` leaves it at `0.0`, which callers must
/// override — a bare `Default` source hits for zero).
pub fn compute_damage(
    base: f32,
    source: &SourceStats,
    defense: &DefenseStats,
    rng: &mut impl Rng,
) -> DamageResult {
    let stat_mult = 1.0 + source.strength * STR_COEF;
    let skill_mult = 1.0 + source.empower_pct;
    let class_mult = 1.0 + (source.class_affinity_pct / 100.0).min(0.20);
    let title_mult = 1.0 + source.title_bonus_pct;
    let weapon_mult = source.weapon_mult.max(0.0);

    let mut raw = base.max(0.0) * stat_mult.max(0.0) * skill_mult.max(0.0) * class_mult.max(0.0) * title_mult.max(0.0) * weapon_mult;

    let was_critical = rng.random::<f32>() < source.crit_chance;
    if was_critical {
        raw *= 2.0;
    }

    let vuln_mult = (1.0 + defense.vulnerable_pct).max(0.0);
    let fortify = defense.fortify_pct.clamp(0.0, REDUCTION_CAP);
    let defense_reduction = (defense.defense / (defense.defense + DEF_K)).clamp(0.0, REDUCTION_CAP);

    let incoming = raw * vuln_mult * (1.0 - defense_reduction) * (1.0 - fortify);

    DamageResult {
        incoming: incoming.max(0.0),
        was_critical,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    use super::*;

    fn no_crit_rng() -> StdRng {
        // first f32 draw from this seed is > 0 so a crit_chance of 0.0 never fires
        StdRng::seed_from_u64(1)
    }

    #[fixture]
    fn plain_weapon_source() -> SourceStats {
        SourceStats { weapon_mult: 1.0, ..Default::default() }
    }

    #[rstest]
    #[case(0.0, 100.0)]
    #[case(100.0, 50.0)]
    #[case(500.0, 25.0)]
    fn defense_reduction_follows_the_def_k_curve(
        plain_weapon_source: SourceStats,
        #[case] defense_value: f32,
        #[case] expected_incoming: f32,
    ) {
        let defense = DefenseStats { defense: defense_value, ..Default::default() };
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &plain_weapon_source, &defense, &mut rng);
        assert!(
            (result.incoming - expected_incoming).abs() < 0.1,
            "defense {defense_value} expected ~{expected_incoming}, got {}",
            result.incoming
        );
    }

    #[test]
    fn defense_reduction_is_capped_at_three_quarters() {
        let source = SourceStats { weapon_mult: 1.0, ..Default::default() };
        let defense = DefenseStats { defense: 100_000.0, ..Default::default() };
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &source, &defense, &mut rng);
        assert!((result.incoming - 25.0).abs() < 0.01);
    }

    #[test]
    fn zero_defense_passes_full_damage() {
        let source = SourceStats { weapon_mult: 1.0, ..Default::default() };
        let defense = DefenseStats::default();
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &source, &defense, &mut rng);
        assert!((result.incoming - 100.0).abs() < 0.01);
    }

    #[test]
    fn strength_and_weapon_multipliers_stack_multiplicatively() {
        let source = SourceStats {
            strength: 20.0,
            weapon_mult: 1.5,
            ..Default::default()
        };
        let defense = DefenseStats::default();
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &source, &defense, &mut rng);
        // stat_mult = 1 + 20*0.05 = 2.0; raw = 100 * 2.0 * 1.5 = 300
        assert!((result.incoming - 300.0).abs() < 0.01);
    }

    #[test]
    fn fortify_and_vulnerable_both_apply() {
        let source = SourceStats { weapon_mult: 1.0, ..Default::default() };
        let defense = DefenseStats {
            vulnerable_pct: 0.5,
            fortify_pct: 0.5,
            ..Default::default()
        };
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &source, &defense, &mut rng);
        // 100 * 1.5 * 1.0 * 0.5 = 75
        assert!((result.incoming - 75.0).abs() < 0.01);
    }

    #[test]
    fn guaranteed_crit_doubles_damage() {
        let source = SourceStats {
            weapon_mult: 1.0,
            crit_chance: 1.0,
            ..Default::default()
        };
        let defense = DefenseStats::default();
        let mut rng = no_crit_rng();
        let result = compute_damage(100.0, &source, &defense, &mut rng);
        assert!(result.was_critical);
        assert!((result.incoming - 200.0).abs() < 0.01);
    }
}
