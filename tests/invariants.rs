//! Property-style checks from spec.md §8's invariant list that aren't
//! already covered by a concrete scenario or a module's own unit tests.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use runeweave_core::effects::parser;
use runeweave_core::entity;
use runeweave_core::executor;
use runeweave_core::geometry::AllPositioned;
use runeweave_core::registry::TagRegistry;
use runeweave_core::test_utils::fixtures;

fn registry() -> Arc<TagRegistry> {
    Arc::new(fixtures::sample_registry())
}

#[test]
fn pierce_never_exceeds_pierce_count_plus_one() {
    let registry = registry();
    let mut world = hecs::World::new();
    let source = world.spawn((
        runeweave_core::components::Position::new(0.0, 0.0),
        runeweave_core::components::Health::new(100.0),
        runeweave_core::components::CombatProfile::default(),
        runeweave_core::components::Faction::Players,
    ));
    let mut last = source;
    for x in [2.0, 4.0, 6.0, 8.0, 10.0] {
        last = world.spawn((
            runeweave_core::components::Position::new(x, 0.0),
            runeweave_core::components::Health::new(100.0),
            runeweave_core::components::CombatProfile::default(),
            runeweave_core::components::Faction::Enemies,
        ));
    }
    let primary = last;

    let params = fixtures::params(&[("base_damage", 10.0), ("pierce_count", 2.0), ("beam_range", 12.0), ("beam_width", 1.0)]);
    let config = parser::parse(&registry, &["physical".to_string(), "pierce".to_string()], &params);

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(10);
    let outcome = executor::execute(&world, &registry, &config, source, primary, &spatial, &mut rng);

    assert!(outcome.affected_targets.len() <= 3);
    let unique: std::collections::HashSet<_> = outcome.affected_targets.iter().collect();
    assert_eq!(unique.len(), outcome.affected_targets.len());
}

#[test]
fn damage_is_never_negative_regardless_of_absurd_defense() {
    let registry = registry();
    let (world, source, target) = fixtures::heavily_armored_target();
    let params = fixtures::params(&[("base_damage", 5.0)]);
    let config = parser::parse(&registry, &["physical".to_string(), "single_target".to_string()], &params);

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(11);
    let outcome = executor::execute(&world, &registry, &config, source, target, &spatial, &mut rng);

    assert!(outcome.total_damage_dealt >= 0.0);
    let health = entity::health(&world, target).unwrap();
    assert!(health.current() >= 0.0);
}

#[test]
fn repeated_execution_with_same_seed_is_deterministic() {
    let registry = registry();
    let params = fixtures::params(&[("base_damage", 40.0), ("chain_count", 3.0), ("chain_range", 6.0)]);

    let run = || {
        let (world, source, primary) = fixtures::chain_lightning_cluster();
        let config = parser::parse(&registry, &["lightning".to_string(), "chain".to_string()], &params);
        let spatial = AllPositioned;
        let mut rng = StdRng::seed_from_u64(99);
        let outcome = executor::execute(&world, &registry, &config, source, primary, &spatial, &mut rng);
        (outcome.total_damage_dealt, outcome.affected_targets.len())
    };

    assert_eq!(run(), run());
}

#[test]
fn parse_exactly_one_geometry_tag_and_non_negative_bases() {
    let registry = registry();
    let config = parser::parse(
        &registry,
        &["fire".to_string(), "cone".to_string(), "burn".to_string()],
        &fixtures::params(&[("base_damage", -10.0)]),
    );
    assert_eq!(config.geometry.as_str(), "cone");
    assert!(config.base_damage >= 0.0);
    assert!(config.base_healing >= 0.0);
}
