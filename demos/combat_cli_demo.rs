//! Runs one effect invocation end to end and prints the outcome —
//! equivalent to the teacher's `combat_cli_demo`, minus the interactive
//! prompt loop, since this crate has no turn engine of its own to drive
//! from the terminal.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use runeweave_core::components::{Health, Mana, Position};
use runeweave_core::effects::parser;
use runeweave_core::entity::{self, spawn_enemy, spawn_player};
use runeweave_core::executor;
use runeweave_core::geometry::AllPositioned;
use runeweave_core::registry::TagRegistry;
use runeweave_core::test_utils::fixtures;

fn main() {
    tracing_subscriber::fmt::init();

    let registry = Arc::new(TagRegistry::load(fixtures::SAMPLE_REGISTRY_JSON).expect("sample registry loads"));

    let mut world = hecs::World::new();
    let hero = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(50.0));
    let goblin = spawn_enemy(&mut world, Position::new(1.0, 0.0), Health::new(40.0));

    let params = fixtures::params(&[
        ("base_damage", 18.0),
        ("lifesteal_pct", 0.25),
        ("bleed_duration", 6.0),
        ("dps", 4.0),
    ]);
    let config = parser::parse(&registry, &["physical".to_string(), "bleed".to_string(), "lifesteal".to_string()], &params);

    println!("=== Combat CLI Demo ===");
    println!("hero attacks goblin with tags {:?}", config.raw_tags);

    let spatial = AllPositioned;
    let mut rng = StdRng::seed_from_u64(42);
    let outcome = executor::execute(&world, &registry, &config, hero, goblin, &spatial, &mut rng);

    println!("total damage dealt: {:.1}", outcome.total_damage_dealt);
    println!("affected targets: {}", outcome.affected_targets.len());
    for warning in &config.warnings {
        println!("warning: {warning}");
    }
    for event in &outcome.events {
        println!("event: {event:?}");
    }

    let goblin_hp = entity::health(&world, goblin).unwrap();
    println!("goblin hp: {:.1}/{:.1}", goblin_hp.current(), goblin_hp.max());
    let hero_hp = entity::health(&world, hero).unwrap();
    println!("hero hp: {:.1}/{:.1}", hero_hp.current(), hero_hp.max());
}
