use std::collections::HashMap;

use hecs::{Entity, World};

use crate::components::{CombatProfile, Defense, Faction, Health, Mana, Position};
use crate::entity::{spawn_enemy, spawn_player};
use crate::registry::TagRegistry;

/// The canned tag registry exercising every geometry, damage, status,
/// and special tag used by spec.md §8's concrete scenarios. Kept as one
/// JSON literal (not split per-test) so tests double as a sanity check
/// that the whole registry loads and cross-validates together.
pub fn sample_registry() -> TagRegistry {
    TagRegistry::load(SAMPLE_REGISTRY_JSON).expect("fixture registry must be valid")
}

pub const SAMPLE_REGISTRY_JSON: &str = r#"{
    "tag_definitions": {
        "single_target": { "category": "geometry" },
        "chain": { "category": "geometry", "default_params": { "chain_count": 3.0, "chain_range": 5.0, "chain_decay": 1.0 } },
        "cone": { "category": "geometry", "default_params": { "cone_angle": 60.0, "cone_range": 8.0 } },
        "circle": { "category": "geometry", "default_params": { "circle_radius": 4.0 } },
        "beam": { "category": "geometry", "default_params": { "beam_range": 10.0, "beam_width": 2.0 } },
        "pierce": { "category": "geometry", "default_params": { "pierce_count": 2.0, "beam_range": 10.0, "beam_width": 2.0 } },

        "physical": { "category": "damage_type" },
        "fire": { "category": "damage_type" },
        "lightning": { "category": "damage_type" },
        "ice": { "category": "damage_type" },

        "shock": { "category": "status_debuff", "stacking_policy": "stack" },
        "burn": { "category": "status_debuff", "stacking_policy": "refresh" },
        "bleed": { "category": "status_debuff", "stacking_policy": "refresh" },
        "freeze": { "category": "status_debuff", "stacking_policy": "refresh" },

        "lifesteal": { "category": "special" },
        "knockback": { "category": "special" },
        "pull": { "category": "special" },
        "execute": { "category": "special" },
        "critical": { "category": "special" },
        "reflect": { "category": "special" },

        "on_hit": { "category": "trigger" },
        "on_crit": { "category": "trigger" },
        "on_kill": { "category": "trigger" },

        "enemy": { "category": "context" },
        "ally": { "category": "context" },
        "self": { "category": "context" },
        "all": { "category": "context" }
    },
    "conflict_resolution": {
        "geometry_priority": ["beam", "circle", "cone", "chain", "single_target"],
        "mutually_exclusive": {}
    },
    "context_inference": { "damage": "enemy", "healing": "ally", "debuff": "enemy", "buff": "ally" }
}"#;

/// Spec.md §8 scenario 1: a source at the origin and five candidates
/// strung out along the x axis for chain lightning to hop through.
pub fn chain_lightning_cluster() -> (World, Entity, Entity) {
    let mut world = World::new();
    let source = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(100.0));
    let primary = spawn_enemy(&mut world, Position::new(1.0, 0.0), Health::new(100.0));
    for x in [3.0, 5.0, 8.0, 12.0] {
        spawn_enemy(&mut world, Position::new(x, 0.0), Health::new(100.0));
    }
    (world, source, primary)
}

/// Scenario 2: source facing +x with a hit, a wide, and a behind target.
pub fn cone_burn_targets() -> (World, Entity, Entity, Entity, Entity) {
    let mut world = World::new();
    let source = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(100.0));
    let hit = spawn_enemy(&mut world, Position::new(3.0, 0.0), Health::new(100.0));
    let wide = spawn_enemy(&mut world, Position::new(3.0, 3.0), Health::new(100.0));
    let behind = spawn_enemy(&mut world, Position::new(-3.0, 0.0), Health::new(100.0));
    (world, source, hit, wide, behind)
}

/// Scenario 3: wounded source and a full-health target, for lifesteal.
pub fn lifesteal_pair() -> (World, Entity, Entity) {
    let mut world = World::new();
    let source = spawn_player(&mut world, Position::new(0.0, 0.0), Health::with_current(50.0, 100.0), Mana::new(100.0));
    let target = spawn_enemy(&mut world, Position::new(1.0, 0.0), Health::new(100.0));
    (world, source, target)
}

/// Scenario 4: two enemies within a 4-unit circle of the primary target.
pub fn knockback_circle_cluster() -> (World, Entity, Entity, Entity) {
    let mut world = World::new();
    let source = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(100.0));
    let primary = spawn_enemy(&mut world, Position::new(5.0, 0.0), Health::new(100.0));
    let nearby = spawn_enemy(&mut world, Position::new(6.0, 1.0), Health::new(100.0));
    (world, source, primary, nearby)
}

/// Scenario 5: a heavily armored target for the defense-reduction clamp.
pub fn heavily_armored_target() -> (World, Entity, Entity) {
    let mut world = World::new();
    let source = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(100.0));
    let target = spawn_enemy(&mut world, Position::new(1.0, 0.0), Health::new(200.0));
    world.insert_one(target, Defense(1000.0)).unwrap();
    (world, source, target)
}

pub fn params(pairs: &[(&str, f32)]) -> HashMap<String, f32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn with_combat_profile(world: &mut World, entity: Entity, strength: f32, crit_chance: f32) {
    world
        .insert_one(
            entity,
            CombatProfile {
                strength,
                crit_chance,
                damage_multiplier: 1.0,
            },
        )
        .unwrap();
}

pub fn with_faction(world: &mut World, entity: Entity, faction: Faction) {
    world.insert_one(entity, faction).unwrap();
}
