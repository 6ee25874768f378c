use std::collections::HashMap;

use hecs::Entity;
use rand::Rng;

use crate::{
    combat::events::CombatEvent,
    components::status::catalog,
    damage::pipeline::{compute_damage, DefenseStats, SourceStats},
    effects::EffectConfig,
    entity,
    geometry::{self, SpatialQuery},
    registry::TagRegistry,
    utils::id::TagName,
};

/// What one `execute` call produced (spec §4.6 step 4: "Return a
/// result: total damage dealt, list of affected targets, warnings").
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    pub total_damage_dealt: f32,
    pub affected_targets: Vec<Entity>,
    pub events: Vec<CombatEvent>,
    pub warnings: Vec<String>,
}

struct TargetDamage {
    target: Entity,
    incoming: f32,
    was_critical: bool,
}

/// The single entry point that turns a resolved `EffectConfig` into
/// world mutations (spec §4.6). Pure with respect to randomness: the
/// caller's `rng` is advanced exactly once per crit roll or auto-apply
/// roll, in target order, so two invocations given the same seeded RNG
/// and the same world state produce identical outcomes.
pub fn execute<R: Rng>(
    world: &hecs::World,
    registry: &TagRegistry,
    config: &EffectConfig,
    source: Entity,
    primary_target: Entity,
    spatial: &dyn SpatialQuery,
    rng: &mut R,
) -> ExecutionOutcome {
    let mut outcome = ExecutionOutcome::default();

    let resolved = geometry::resolve(world, registry, config, source, primary_target, spatial);
    let targets = resolved.targets;
    if targets.is_empty() {
        return outcome;
    }

    let source_stats = build_source_stats(world, config, source);
    let chain_decay = config.param_or("chain_decay", 1.0);
    let is_chain = config.geometry.as_str() == "chain";

    // 1. damage, to every target, before any status is applied (spec §4.6 ordering guarantee).
    // A target is still recorded here (with zero incoming damage) even when
    // `base_damage` is zero or absent, so a status-only/buff/heal effect
    // still reaches the status/special passes below (spec §4.6 step 3c
    // applies statuses per target unconditionally, not only to hits that dealt damage).
    let mut damages = Vec::with_capacity(targets.len());
    for &target in &targets {
        if !entity::is_alive(world, target) {
            outcome.warnings.push(format!("target {target:?} skipped: not alive"));
            continue;
        }
        if is_immune(world, registry, target, &config.damage_tags) {
            outcome.warnings.push(format!("target {target:?} immune to this damage type"));
            continue;
        }

        let hop = resolved.hop_order.get(&target).copied().unwrap_or(0);
        let decay = if is_chain { chain_decay.powi(hop as i32) } else { 1.0 };
        let base = config.base_damage * decay;

        let (incoming, was_critical) = if base > 0.0 {
            let defense_stats = build_defense_stats(world, target);
            let result = compute_damage(base, &source_stats, &defense_stats, rng);

            let absorbed = entity::with_status_effects_mut(world, target, |statuses| {
                statuses.absorb_with_shield(result.incoming)
            })
            .unwrap_or(0.0);
            let hp_damage = result.incoming - absorbed;
            let _ = entity::apply_damage(world, target, hp_damage);

            outcome.total_damage_dealt += result.incoming;
            outcome.events.push(CombatEvent::DamageDealt {
                source,
                target,
                amount: result.incoming,
                damage_types: config.damage_tags.clone(),
                was_critical: result.was_critical,
            });

            apply_reflect(world, source, target, result.incoming, &mut outcome);

            (result.incoming, result.was_critical)
        } else {
            (0.0, false)
        };

        outcome.affected_targets.push(target);
        damages.push(TargetDamage {
            target,
            incoming,
            was_critical,
        });
    }

    // 2. statuses, to every recorded target, after all damage has landed
    for damage in &damages {
        apply_statuses(world, registry, config, source, damage.target, rng, &mut outcome);
    }

    // 3. healing, for context::Ally effects that carry a base_healing
    apply_healing(world, config, source, &damages, &mut outcome);

    // 4. specials (lifesteal, execute; knockback/pull last, per spec §4.6)
    apply_lifesteal(world, config, source, outcome.total_damage_dealt, &mut outcome);
    apply_execute(world, config, &damages, &mut outcome);
    apply_knockback_and_pull(world, config, source, &damages, &mut outcome);

    // defeats are observed after damage + execute have both landed, so a
    // sub-threshold hit followed by `execute` still reports as a kill
    report_defeats(world, source, &damages, &mut outcome);

    // 5. triggers
    evaluate_triggers(world, config, source, &damages, &mut outcome);

    outcome
}

/// Publishes `EntityDefeated` for any target that dropped to 0 HP this
/// invocation (spec §6 event feed; also what `on_kill` triggers key on).
fn report_defeats(world: &hecs::World, source: Entity, damages: &[TargetDamage], outcome: &mut ExecutionOutcome) {
    for damage in damages {
        if !entity::is_alive(world, damage.target) {
            outcome.events.push(CombatEvent::EntityDefeated {
                entity: damage.target,
                killer: Some(source),
            });
        }
    }
}

fn build_source_stats(world: &hecs::World, config: &EffectConfig, source: Entity) -> SourceStats {
    let profile = entity::combat_profile(world, source);
    let enchantments = entity::enchantments(world, source);
    let status = entity::status_effects(world, source);

    let enchant_mult: f32 = enchantments
        .0
        .iter()
        .map(|e| 1.0 + e.param("damage_bonus").unwrap_or(0.0))
        .product();

    // `critical` as a special tag forces a guaranteed crit, a strict
    // superset of the stat-based crit roll (spec §9 open question,
    // resolved in DESIGN.md).
    let crit_chance = if config.has_special("critical") { 1.0 } else { profile.crit_chance };

    SourceStats {
        strength: profile.strength,
        crit_chance,
        empower_pct: status.outgoing_damage_multiplier() - 1.0,
        class_affinity_pct: config.param_or("class_affinity_pct", 0.0),
        title_bonus_pct: config.param_or("title_bonus_pct", 0.0),
        weapon_mult: profile.damage_multiplier * enchant_mult,
    }
}

fn build_defense_stats(world: &hecs::World, target: Entity) -> DefenseStats {
    let status = entity::status_effects(world, target);
    DefenseStats {
        defense: entity::defense(world, target),
        vulnerable_pct: status.vulnerable_multiplier() - 1.0,
        fortify_pct: status.fortify_pct(),
    }
}

/// A target's `EntityCategory` can itself be registered as a tag
/// carrying `immune_damage_types` (the same convention the geometry
/// resolver's per-category context overrides use).
fn is_immune(world: &hecs::World, registry: &TagRegistry, target: Entity, damage_tags: &[TagName]) -> bool {
    let Some(category) = entity::category(world, target) else {
        return false;
    };
    let category_tag = TagName::normalized(&category.to_string());
    registry
        .get(&category_tag)
        .is_some_and(|def| damage_tags.iter().any(|t| def.immune_damage_types.contains(t)))
}

/// Defender-side `reflect`/`thorns` enchantment: bounces a percentage of
/// the damage just taken back at the attacker. Applied directly to HP,
/// bypassing the pipeline, so it can never itself be reflected (spec
/// §4.6, §5).
fn apply_reflect(
    world: &hecs::World,
    source: Entity,
    target: Entity,
    damage_dealt: f32,
    outcome: &mut ExecutionOutcome,
) {
    // a same-invocation self-hit (e.g. a circle centered on the source) must not reflect onto itself
    if target == source {
        return;
    }
    let enchantments = entity::enchantments(world, target);
    let reflect_pct = enchantments
        .find(&TagName::from("reflect"))
        .or_else(|| enchantments.find(&TagName::from("thorns")))
        .and_then(|e| e.param("reflect_pct"))
        .unwrap_or(0.0);

    if reflect_pct <= 0.0 {
        return;
    }
    let reflected = reflect_pct * damage_dealt;
    if entity::apply_damage(world, source, reflected).is_ok() {
        outcome.events.push(CombatEvent::Reflected {
            source: target,
            target: source,
            amount: reflected,
        });
    }
}

fn apply_statuses<R: Rng>(
    world: &hecs::World,
    registry: &TagRegistry,
    config: &EffectConfig,
    source: Entity,
    target: Entity,
    rng: &mut R,
    outcome: &mut ExecutionOutcome,
) {
    for tag in &config.status_tags {
        apply_one_status(world, registry, config, source, target, tag, &mut outcome.events);
    }

    // auto-applied statuses: each damage tag may carry its own chance/status pair
    for tag in &config.damage_tags {
        let Some(definition) = registry.get(tag) else {
            continue;
        };
        let (Some(chance), Some(auto_status)) = (definition.auto_apply_chance, &definition.auto_apply_status) else {
            continue;
        };
        if rng.random::<f32>() < chance {
            apply_one_status(world, registry, config, source, target, auto_status, &mut outcome.events);
        }
    }
}

fn apply_one_status(
    world: &hecs::World,
    registry: &TagRegistry,
    config: &EffectConfig,
    source: Entity,
    target: Entity,
    tag: &TagName,
    events: &mut Vec<CombatEvent>,
) {
    // caller-supplied `{tag}_duration` param wins, then the tag's own
    // registered default, then a last-resort literal (spec §4.6 step 3c:
    // "fallback to tag default").
    let duration = config
        .param(&format!("{}_duration", tag.as_str()))
        .or_else(|| registry.default_params(tag).get("duration").copied())
        .unwrap_or(5.0);
    let params: HashMap<String, f32> = config.params.clone();
    let Some(instance) = catalog::make(tag.as_str(), duration, params, Some(source)) else {
        return;
    };
    let kind = instance.kind;
    let applied_source = instance.source;
    let stacks = entity::with_status_effects_mut(world, target, |statuses| {
        statuses.apply(instance);
        statuses
            .0
            .iter()
            .find(|i| i.kind == kind && i.source == applied_source)
            .map(|i| i.stacks)
            .unwrap_or(1)
    });
    if let Ok(stacks) = stacks {
        events.push(CombatEvent::StatusApplied {
            source: Some(source),
            target,
            status_kind: kind,
            duration,
            stacks,
        });
    }
}

/// Applies `config.base_healing` to every recorded target (spec §3:
/// `base_healing` is a separate non-negative scalar from `base_damage`).
/// Targets are already context-filtered to `ally`/`self` by the geometry
/// resolver whenever the parser inferred or was given a healing context,
/// so no additional filtering happens here.
fn apply_healing(
    world: &hecs::World,
    config: &EffectConfig,
    source: Entity,
    damages: &[TargetDamage],
    outcome: &mut ExecutionOutcome,
) {
    if config.base_healing <= 0.0 {
        return;
    }
    for damage in damages {
        if entity::heal(world, damage.target, config.base_healing).is_ok() {
            outcome.events.push(CombatEvent::Healed {
                source,
                target: damage.target,
                amount: config.base_healing,
            });
        }
    }
}

fn apply_lifesteal(
    world: &hecs::World,
    config: &EffectConfig,
    source: Entity,
    total_damage_dealt: f32,
    outcome: &mut ExecutionOutcome,
) {
    if !config.has_special("lifesteal") {
        return;
    }
    let pct = config.param_or("lifesteal_pct", 0.0);
    let amount = pct * total_damage_dealt;
    if amount <= 0.0 {
        return;
    }
    if entity::heal(world, source, amount).is_ok() {
        outcome.events.push(CombatEvent::Healed {
            source,
            target: source,
            amount,
        });
    }
}

fn apply_execute(
    world: &hecs::World,
    config: &EffectConfig,
    damages: &[TargetDamage],
    outcome: &mut ExecutionOutcome,
) {
    if !config.has_special("execute") {
        return;
    }
    let threshold = config.param_or("execute_threshold", 0.0);
    for damage in damages {
        let Ok(health) = entity::health(world, damage.target) else {
            continue;
        };
        if health.current() > 0.0 && health.current() <= threshold * health.max() {
            let _ = entity::set_hp(world, damage.target, 0.0);
        }
    }
}

fn apply_knockback_and_pull(
    world: &hecs::World,
    config: &EffectConfig,
    source: Entity,
    damages: &[TargetDamage],
    outcome: &mut ExecutionOutcome,
) {
    let knockback_distance = config.param_or("knockback_distance", 0.0);
    let pull_distance = config.param_or("pull_distance", 0.0);
    if knockback_distance <= 0.0 && pull_distance <= 0.0 {
        return;
    }

    let Ok(source_pos) = entity::position(world, source) else {
        return;
    };

    for damage in damages {
        let Ok(target_pos) = entity::position(world, damage.target) else {
            continue;
        };
        if target_pos.distance(&source_pos) < 1e-6 {
            continue;
        }

        if knockback_distance > 0.0 {
            let direction = source_pos.direction_to(&target_pos);
            let new_pos = crate::components::Position(target_pos.0 + direction * knockback_distance);
            if entity::set_position(world, damage.target, new_pos).is_ok() {
                outcome.events.push(CombatEvent::KnockedBack {
                    target: damage.target,
                    distance: knockback_distance,
                });
            }
        }

        if pull_distance > 0.0 {
            let distance_to_source = target_pos.distance(&source_pos);
            let amount = pull_distance.min(distance_to_source);
            let direction = target_pos.direction_to(&source_pos);
            let new_pos = crate::components::Position(target_pos.0 + direction * amount);
            if entity::set_position(world, damage.target, new_pos).is_ok() {
                outcome.events.push(CombatEvent::Pulled {
                    target: damage.target,
                    distance: amount,
                });
            }
        }
    }
}

fn evaluate_triggers(
    world: &hecs::World,
    config: &EffectConfig,
    source: Entity,
    damages: &[TargetDamage],
    outcome: &mut ExecutionOutcome,
) {
    for tag in &config.trigger_tags {
        match tag.as_str() {
            "on_hit" => {
                for damage in damages {
                    outcome.events.push(CombatEvent::TriggerFired {
                        trigger: tag.clone(),
                        source,
                        target: Some(damage.target),
                    });
                }
            }
            "on_crit" => {
                for damage in damages.iter().filter(|d| d.was_critical) {
                    outcome.events.push(CombatEvent::TriggerFired {
                        trigger: tag.clone(),
                        source,
                        target: Some(damage.target),
                    });
                }
            }
            "on_kill" => {
                for damage in damages.iter().filter(|d| !entity::is_alive(world, d.target)) {
                    outcome.events.push(CombatEvent::TriggerFired {
                        trigger: tag.clone(),
                        source,
                        target: Some(damage.target),
                    });
                }
            }
            _ => outcome.events.push(CombatEvent::TriggerFired {
                trigger: tag.clone(),
                source,
                target: None,
            }),
        }
    }
}
