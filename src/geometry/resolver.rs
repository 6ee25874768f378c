use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};

use crate::{
    components::Faction,
    effects::config::EffectConfig,
    entity,
    registry::{Context, TagRegistry},
    utils::id::TagName,
};

use super::spatial::SpatialQuery;

const EPSILON: f32 = 1e-6;

/// The target list plus each target's hop index in the order the
/// geometry actually built it in, before the final distance sort
/// reorders the list (spec §4.5's ordering guarantee sorts the
/// *returned* list, but a chain's per-hop decay is about traversal
/// order, not final position — see `executor::execute`).
#[derive(Debug, Default)]
pub struct ResolvedTargets {
    pub targets: Vec<Entity>,
    pub hop_order: HashMap<Entity, usize>,
}

/// Maps `geometry_tag + params` to the ordered target list (spec §4.5).
/// `spatial` supplies the candidate pool; everything else — pattern
/// shape, context filtering, distance ordering — lives here.
pub fn resolve(
    world: &World,
    registry: &TagRegistry,
    config: &EffectConfig,
    source: Entity,
    primary_target: Entity,
    spatial: &dyn SpatialQuery,
) -> ResolvedTargets {
    let geometry = config.geometry.as_str();
    let candidates = spatial.candidates(world);

    let mut targets = match geometry {
        "single_target" => vec![primary_target],
        "chain" => resolve_chain(world, source, primary_target, &candidates, config),
        "cone" => resolve_cone(world, source, primary_target, &candidates, config),
        "circle" => resolve_circle(world, source, primary_target, &candidates, config),
        "beam" => resolve_beam(world, source, primary_target, &candidates, config, None),
        "pierce" => {
            let pierce_count = config.param_or("pierce_count", 1.0).max(0.0) as usize;
            resolve_beam(world, source, primary_target, &candidates, config, Some(pierce_count))
        }
        _ => vec![primary_target],
    };

    targets = apply_context_filter(world, registry, config, source, &targets);
    // hop order is captured from the pre-sort list: for "chain" this is the
    // nearest-link traversal order `resolve_chain` built; other geometries
    // never consult it since only chain decay is hop-order sensitive.
    let hop_order: HashMap<Entity, usize> = targets.iter().enumerate().map(|(i, &e)| (e, i)).collect();
    sort_by_distance_from_origin(world, source, primary_target, geometry, config, &mut targets);

    ResolvedTargets { targets, hop_order }
}

/// Starts at `primary`, repeatedly hops to the nearest not-yet-hit
/// candidate within `chain_range` of the current link, up to
/// `chain_count` hops (spec §4.5 "chain"). Per-hop damage decay is the
/// executor's concern, not the resolver's.
fn resolve_chain(
    world: &World,
    source: Entity,
    primary: Entity,
    candidates: &[Entity],
    config: &EffectConfig,
) -> Vec<Entity> {
    let chain_count = config.param_or("chain_count", 1.0).max(0.0) as u32;
    let chain_range = config.param_or("chain_range", 5.0);

    let mut result = vec![primary];
    let mut current = primary;
    for _ in 0..chain_count {
        let Ok(current_pos) = entity::position(world, current) else {
            break;
        };
        let next = candidates
            .iter()
            .copied()
            .filter(|e| *e != source && !result.contains(e))
            .filter_map(|e| entity::position(world, e).ok().map(|p| (e, current_pos.distance(&p))))
            .filter(|(_, distance)| *distance <= chain_range)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        match next {
            Some((hit, _)) => {
                result.push(hit);
                current = hit;
            }
            None => break,
        }
    }
    result
}

/// All entities within `cone_range` of `source` whose bearing from the
/// source→primary vector is within `cone_angle / 2` (spec §4.5 "cone").
fn resolve_cone(
    world: &World,
    source: Entity,
    primary: Entity,
    candidates: &[Entity],
    config: &EffectConfig,
) -> Vec<Entity> {
    let cone_range = config.param_or("cone_range", 5.0);
    let cone_angle = config.param_or("cone_angle", 90.0);
    let half_angle = cone_angle.to_radians() / 2.0;

    let (Ok(source_pos), Ok(primary_pos)) = (entity::position(world, source), entity::position(world, primary))
    else {
        return Vec::new();
    };

    let forward = source_pos.direction_to(&primary_pos);
    if forward == Vec3::ZERO {
        // zero-division fallback: source coincides with the primary target (spec §4.5 edge case)
        return vec![primary];
    }

    candidates
        .iter()
        .copied()
        .filter(|&e| {
            let Ok(pos) = entity::position(world, e) else {
                return false;
            };
            source_pos.distance(&pos) <= cone_range && source_pos.bearing(forward, &pos) <= half_angle
        })
        .collect()
}

/// All entities within `circle_radius` of the origin, which centers on
/// `source` when `origin_from_source` is set (non-zero), else on the
/// primary target — the default (spec §4.5 "circle", `origin=target`).
fn resolve_circle(
    world: &World,
    source: Entity,
    primary: Entity,
    candidates: &[Entity],
    config: &EffectConfig,
) -> Vec<Entity> {
    let radius = config.param_or("circle_radius", 5.0);
    let origin_entity = circle_origin(config, source, primary);
    let Ok(origin_pos) = entity::position(world, origin_entity) else {
        return Vec::new();
    };

    candidates
        .iter()
        .copied()
        .filter(|&e| {
            entity::position(world, e)
                .map(|p| origin_pos.distance(&p) <= radius)
                .unwrap_or(false)
        })
        .collect()
}

fn circle_origin(config: &EffectConfig, source: Entity, primary: Entity) -> Entity {
    if config.param_or("origin_from_source", 0.0) > 0.5 {
        source
    } else {
        primary
    }
}

/// All entities within `beam_width / 2` perpendicular distance of the
/// segment `source -> source + direction * beam_range`, where
/// `direction` is the normalized source→primary vector (spec §4.5
/// "beam"). `pierce_count`, when set, truncates to the first N hits
/// along the beam ("pierce").
fn resolve_beam(
    world: &World,
    source: Entity,
    primary: Entity,
    candidates: &[Entity],
    config: &EffectConfig,
    pierce_count: Option<usize>,
) -> Vec<Entity> {
    let beam_range = config.param_or("beam_range", 10.0);
    let beam_width = config.param_or("beam_width", 2.0);

    let (Ok(source_pos), Ok(primary_pos)) = (entity::position(world, source), entity::position(world, primary))
    else {
        return Vec::new();
    };

    let delta = primary_pos.0 - source_pos.0;
    if delta.length_squared() < EPSILON {
        // zero-division fallback: source coincides with the primary target
        return vec![primary];
    }
    let direction = delta.normalize();

    let mut hits: Vec<(Entity, f32)> = candidates
        .iter()
        .copied()
        .filter_map(|e| {
            let pos = entity::position(world, e).ok()?.0;
            let to_point = pos - source_pos.0;
            let along = to_point.dot(direction);
            if along < 0.0 || along > beam_range {
                return None;
            }
            let perpendicular = (to_point - direction * along).length();
            (perpendicular <= beam_width / 2.0).then_some((e, along))
        })
        .collect();

    hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    if let Some(count) = pierce_count {
        hits.truncate(count);
    }
    hits.into_iter().map(|(e, _)| e).collect()
}

/// Per-target context filtering (spec §4.5). A geometry/damage/special
/// tag's `context_overrides` (keyed by the target's `EntityCategory`)
/// takes precedence over the effect's resolved `context` for that one
/// target — e.g. a `holy` tag overriding behavior against `undead`
/// targets regardless of faction.
fn apply_context_filter(
    world: &World,
    registry: &TagRegistry,
    config: &EffectConfig,
    source: Entity,
    targets: &[Entity],
) -> Vec<Entity> {
    use std::str::FromStr;

    let source_faction = entity::faction(world, source);

    targets
        .iter()
        .copied()
        .filter(|&target| {
            let effective = category_override(world, registry, config, target)
                .and_then(|tag| Context::from_str(tag.as_str()).ok())
                .unwrap_or(config.context);
            match effective {
                Context::Enemy => target != source && is_opposing(world, source_faction, target),
                Context::Ally => target != source && is_allied(world, source_faction, target),
                Context::SelfTarget => target == source,
                Context::All => true,
            }
        })
        .collect()
}

fn category_override(
    world: &World,
    registry: &TagRegistry,
    config: &EffectConfig,
    target: Entity,
) -> Option<TagName> {
    let category = entity::category(world, target)?;
    let category_tag = TagName::normalized(&category.to_string());

    config
        .damage_tags
        .iter()
        .chain(config.special_tags.iter())
        .chain(config.status_tags.iter())
        .find_map(|tag| registry.get(tag)?.context_overrides.get(&category_tag).cloned())
}

fn is_opposing(world: &World, source_faction: Option<Faction>, target: Entity) -> bool {
    match (source_faction, entity::faction(world, target)) {
        (Some(source), Some(other)) => source.is_hostile_to(&other),
        // entities missing a faction are kept under `all` and treated as valid `enemy` targets
        _ => true,
    }
}

fn is_allied(world: &World, source_faction: Option<Faction>, target: Entity) -> bool {
    match (source_faction, entity::faction(world, target)) {
        (Some(source), Some(other)) => !source.is_hostile_to(&other),
        _ => false,
    }
}

/// Final ordering guarantee (spec §4.5): ascending distance from the
/// geometry's origin, ties broken by the spatial query's stable order
/// (`Vec::sort_by` is itself stable).
fn sort_by_distance_from_origin(
    world: &World,
    source: Entity,
    primary: Entity,
    geometry: &str,
    config: &EffectConfig,
    targets: &mut [Entity],
) {
    let origin = match geometry {
        "circle" => circle_origin(config, source, primary),
        "single_target" => primary,
        _ => source,
    };
    let Ok(origin_pos) = entity::position(world, origin) else {
        return;
    };
    targets.sort_by(|&a, &b| {
        let distance_a = entity::position(world, a).map(|p| origin_pos.distance(&p)).unwrap_or(f32::MAX);
        let distance_b = entity::position(world, b).map(|p| origin_pos.distance(&p)).unwrap_or(f32::MAX);
        distance_a.partial_cmp(&distance_b).unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::components::{CombatProfile, Health, Position};
    use crate::effects::parser;
    use crate::registry::TagRegistry;

    use super::*;

    fn registry() -> TagRegistry {
        TagRegistry::load(
            r#"{
                "tag_definitions": {
                    "chain": { "category": "geometry", "default_params": { "chain_count": 3.0, "chain_range": 5.0 } },
                    "cone": { "category": "geometry" },
                    "single_target": { "category": "geometry" },
                    "lightning": { "category": "damage_type" },
                    "fire": { "category": "damage_type" }
                }
            }"#,
        )
        .unwrap()
    }

    fn spawn_at(world: &mut hecs::World, x: f32) -> Entity {
        world.spawn((Position::new(x, 0.0), Health::new(100.0), CombatProfile::default()))
    }

    #[test]
    fn chain_hops_nearest_first_and_stops_at_count() {
        let registry = registry();
        let mut world = hecs::World::new();
        let source = spawn_at(&mut world, 0.0);
        let primary = spawn_at(&mut world, 1.0);
        let t3 = spawn_at(&mut world, 3.0);
        let t5 = spawn_at(&mut world, 5.0);
        let t8 = spawn_at(&mut world, 8.0);
        let _t12 = spawn_at(&mut world, 12.0);

        let mut params = HashMap::new();
        params.insert("chain_count".to_string(), 3.0);
        params.insert("chain_range".to_string(), 6.0);
        let config = parser::parse(&registry, &["chain".to_string(), "lightning".to_string()], &params);

        let spatial = super::super::spatial::AllPositioned;
        let resolved = resolve(&world, &registry, &config, source, primary, &spatial);

        assert_eq!(resolved.targets, vec![primary, t3, t5, t8]);
    }

    #[test]
    fn hop_order_survives_the_final_distance_sort() {
        // primary sits far from source; the nearest unhit candidate from
        // there is close to source, so distance-from-source sort reverses
        // the traversal order. hop_order must still reflect the hop, not
        // the post-sort position.
        let registry = registry();
        let mut world = hecs::World::new();
        let source = spawn_at(&mut world, 0.0);
        let primary = spawn_at(&mut world, 10.0);
        let second_hop = spawn_at(&mut world, 2.0);

        let mut params = HashMap::new();
        params.insert("chain_count".to_string(), 1.0);
        params.insert("chain_range".to_string(), 9.0);
        let config = parser::parse(&registry, &["chain".to_string(), "lightning".to_string()], &params);

        let spatial = super::super::spatial::AllPositioned;
        let resolved = resolve(&world, &registry, &config, source, primary, &spatial);

        assert_eq!(resolved.targets, vec![second_hop, primary]);
        assert_eq!(resolved.hop_order[&primary], 0);
        assert_eq!(resolved.hop_order[&second_hop], 1);
    }

    #[test]
    fn cone_excludes_wide_and_behind_targets() {
        let registry = registry();
        let mut world = hecs::World::new();
        let source = world.spawn((Position::new(0.0, 0.0), Health::new(100.0), CombatProfile::default()));
        let primary = world.spawn((Position::new(3.0, 0.0), Health::new(100.0), CombatProfile::default()));
        let wide = world.spawn((Position::new(3.0, 3.0), Health::new(100.0), CombatProfile::default()));
        let behind = world.spawn((Position::new(-3.0, 0.0), Health::new(100.0), CombatProfile::default()));

        let mut params = HashMap::new();
        params.insert("cone_angle".to_string(), 60.0);
        params.insert("cone_range".to_string(), 8.0);
        let config = parser::parse(&registry, &["cone".to_string(), "fire".to_string()], &params);

        let spatial = super::super::spatial::AllPositioned;
        let resolved = resolve(&world, &registry, &config, source, primary, &spatial);

        assert!(resolved.targets.contains(&primary));
        assert!(!resolved.targets.contains(&wide));
        assert!(!resolved.targets.contains(&behind));
    }
}
