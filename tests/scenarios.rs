//! The six concrete scenarios from spec.md §8, run end to end through
//! the parser, geometry resolver, and executor together.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use runeweave_core::components::StatusKind;
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
fn chain_lightning_hits_four_targets_each_losing_forty_hp() {
    let registry = registry();
    let (world, source, primary) = fixtures::chain_lightning_cluster();
    let params = fixtures::params(&[
        ("base_damage", 40.0),
        ("chain_count", 3.0),
        ("chain_range", 6.0),
        ("shock_duration", 6.0),
        ("damage_per_tick", 8.0),
        ("tick_rate", 2.0),
    ]);
    let config = parser::parse(
        &registry,
        &["lightning".to_string(), "chain".to_string(), "shock".to_string()],
        &params,
    );

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(1);
    let outcome = executor::execute(&world, &registry, &config, source, primary, &spatial, &mut rng);

    assert_eq!(outcome.affected_targets.len(), 4);
    for &target in &outcome.affected_targets {
        let health = entity::health(&world, target).unwrap();
        assert!((health.current() - 60.0).abs() < 0.01, "expected 40 damage, hp is {}", health.current());
        let statuses = entity::status_effects(&world, target);
        assert!(statuses.0.iter().any(|s| s.kind == StatusKind::Shock));
    }
}

#[test]
fn cone_burn_only_hits_the_target_in_front() {
    let registry = registry();
    let (world, source, hit, wide, behind) = fixtures::cone_burn_targets();
    let params = fixtures::params(&[
        ("base_damage", 50.0),
        ("cone_angle", 60.0),
        ("cone_range", 8.0),
        ("burn_duration", 10.0),
        ("dps", 8.0),
    ]);
    let config = parser::parse(&registry, &["fire".to_string(), "cone".to_string(), "burn".to_string()], &params);

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(2);
    let outcome = executor::execute(&world, &registry, &config, source, hit, &spatial, &mut rng);

    assert_eq!(outcome.affected_targets, vec![hit]);
    let hit_health = entity::health(&world, hit).unwrap();
    assert!((hit_health.current() - 50.0).abs() < 0.01);
    let wide_health = entity::health(&world, wide).unwrap();
    assert_eq!(wide_health.current(), 100.0);
    let behind_health = entity::health(&world, behind).unwrap();
    assert_eq!(behind_health.current(), 100.0);

    let statuses = entity::status_effects(&world, hit);
    assert!(statuses.0.iter().any(|s| s.kind == StatusKind::Burn));
}

#[test]
fn lifesteal_heals_source_by_a_quarter_of_damage_dealt() {
    let registry = registry();
    let (world, source, target) = fixtures::lifesteal_pair();
    let params = fixtures::params(&[
        ("base_damage", 80.0),
        ("lifesteal_pct", 0.25),
        ("bleed_duration", 10.0),
        ("dps", 6.0),
    ]);
    let config = parser::parse(
        &registry,
        &["physical".to_string(), "single_target".to_string(), "bleed".to_string(), "lifesteal".to_string()],
        &params,
    );

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(3);
    let outcome = executor::execute(&world, &registry, &config, source, target, &spatial, &mut rng);

    assert_eq!(outcome.affected_targets, vec![target]);
    let target_health = entity::health(&world, target).unwrap();
    assert!((target_health.current() - 20.0).abs() < 0.01);
    let source_health = entity::health(&world, source).unwrap();
    assert!((source_health.current() - 70.0).abs() < 0.01);
}

#[test]
fn knockback_on_circle_pushes_both_targets_away_from_their_origin() {
    let registry = registry();
    let (world, source, primary, nearby) = fixtures::knockback_circle_cluster();
    let params = fixtures::params(&[
        ("base_damage", 30.0),
        ("circle_radius", 4.0),
        ("freeze_duration", 3.0),
        ("knockback_distance", 3.0),
    ]);
    let config = parser::parse(
        &registry,
        &["ice".to_string(), "circle".to_string(), "freeze".to_string(), "knockback".to_string()],
        &params,
    );

    let primary_before = entity::position(&world, primary).unwrap();
    let nearby_before = entity::position(&world, nearby).unwrap();

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(4);
    let outcome = executor::execute(&world, &registry, &config, source, primary, &spatial, &mut rng);

    assert_eq!(outcome.affected_targets.len(), 2);
    for &target in &outcome.affected_targets {
        let health = entity::health(&world, target).unwrap();
        assert!((health.current() - 70.0).abs() < 0.01);
        let statuses = entity::status_effects(&world, target);
        assert!(statuses.0.iter().any(|s| s.kind == StatusKind::Freeze));
    }

    let primary_after = entity::position(&world, primary).unwrap();
    let nearby_after = entity::position(&world, nearby).unwrap();
    assert!(primary_after.distance(&primary_before) > 2.9);
    assert!(nearby_after.distance(&nearby_before) > 2.9);
}

#[test]
fn defense_reduction_clamps_at_seventy_five_percent() {
    let registry = registry();
    let (world, source, target) = fixtures::heavily_armored_target();
    let params = fixtures::params(&[("base_damage", 100.0)]);
    let config = parser::parse(&registry, &["physical".to_string(), "single_target".to_string()], &params);

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(5);
    let outcome = executor::execute(&world, &registry, &config, source, target, &spatial, &mut rng);

    assert!((outcome.total_damage_dealt - 25.0).abs() < 0.01);
}

#[test]
fn geometry_conflict_picks_beam_over_chain_by_priority() {
    let registry = registry();
    let config = parser::parse(&registry, &["chain".to_string(), "beam".to_string()], &Default::default());
    assert_eq!(config.geometry.as_str(), "beam");
    assert!(config
        .warnings
        .iter()
        .any(|w| matches!(w, runeweave_core::effects::Warning::GeometryConflict { chosen, .. } if chosen.as_str() == "beam")));
}
