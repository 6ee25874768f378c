use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    effects::parser,
    entity,
    executor::{self, ExecutionOutcome},
    geometry::SpatialQuery,
    registry::TagRegistry,
    utils::id::AbilityId,
};

use super::events::EventBus;
use super::external::{EffectInput, EnemyAbility, SkillEffect};

/// A queued effect invocation, processed FIFO per frame (spec §5).
#[derive(Debug, Clone)]
pub struct Invocation {
    pub source: Entity,
    pub primary_target: Entity,
    pub effect: EffectInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivationRejection {
    InsufficientMana,
    OnCooldown,
}

#[derive(Debug)]
pub enum ActivationResult {
    Success(ExecutionOutcome),
    Rejected(ActivationRejection),
}

/// Owns the live encounter: cooldowns/mana gating, the FIFO invocation
/// queue, the seeded PRNG, and event fan-out (spec §4.8). The registry is
/// handed around as `Arc<TagRegistry>` rather than a global so an
/// encounter can run with different loaded content in tests.
pub struct CombatManager<R: Rng> {
    registry: Arc<TagRegistry>,
    rng: R,
    events: EventBus,
    queue: VecDeque<Invocation>,
    enemy_ability_uses: HashMap<(Entity, AbilityId), u32>,
}

impl<R: Rng> CombatManager<R> {
    pub fn new(registry: Arc<TagRegistry>, rng: R) -> Self {
        Self {
            registry,
            rng,
            events: EventBus::new(),
            queue: VecDeque::new(),
            enemy_ability_uses: HashMap::new(),
        }
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn queue_invocation(&mut self, invocation: Invocation) {
        self.queue.push_back(invocation);
    }

    /// Mana/cooldown-gated skill activation (spec §4.8: "Activation
    /// fails with `InsufficientMana` or `OnCooldown` when unmet;
    /// otherwise cost is deducted, cooldown starts, and the executor
    /// runs").
    pub fn activate_skill(
        &mut self,
        world: &World,
        source: Entity,
        primary_target: Entity,
        ability_id: &AbilityId,
        skill: &SkillEffect,
        spatial: &dyn SpatialQuery,
    ) -> ActivationResult {
        let ready = entity::with_cooldowns(world, source, |cooldowns| cooldowns.is_ready(ability_id))
            .unwrap_or(true);
        if !ready {
            return ActivationResult::Rejected(ActivationRejection::OnCooldown);
        }

        let has_mana = entity::mana(world, source).map(|mana| mana.has(skill.mana_cost)).unwrap_or(true);
        if !has_mana {
            return ActivationResult::Rejected(ActivationRejection::InsufficientMana);
        }

        let _ = entity::spend_mana(world, source, skill.mana_cost);
        let _ = entity::with_cooldowns(world, source, |cooldowns| {
            cooldowns.start(ability_id.clone(), skill.cooldown)
        });

        let config = parser::parse(&self.registry, &skill.effect.tags, &skill.effect.params);
        for warning in &config.warnings {
            debug!(%warning, "effect config warning during skill activation");
        }

        let outcome = executor::execute(world, &self.registry, &config, source, primary_target, spatial, &mut self.rng);
        self.events.publish_all(outcome.events.clone());
        ActivationResult::Success(outcome)
    }

    /// One frame (spec §5): status tick → expired removal → queued
    /// invocations (FIFO) → cooldown decrement, in that order.
    pub fn tick(&mut self, world: &World, dt: f32, spatial: &dyn SpatialQuery) {
        self.tick_statuses(world, dt);
        self.drain_queue(world, spatial);
        self.tick_cooldowns(world, dt);
    }

    fn tick_statuses(&mut self, world: &World, dt: f32) {
        let mut pending_damage = Vec::new();
        let mut pending_healing = Vec::new();
        {
            let mut query = world.query::<&mut crate::components::StatusEffects>();
            for (entity, statuses) in query.iter() {
                let outcome = statuses.tick(dt);
                statuses.retain_alive();
                if outcome.damage > 0.0 {
                    pending_damage.push((entity, outcome.damage));
                }
                if outcome.healing > 0.0 {
                    pending_healing.push((entity, outcome.healing));
                }
            }
        }
        for (entity, amount) in pending_damage {
            let _ = entity::apply_damage(world, entity, amount);
        }
        for (entity, amount) in pending_healing {
            let _ = entity::heal(world, entity, amount);
        }
    }

    fn drain_queue(&mut self, world: &World, spatial: &dyn SpatialQuery) {
        while let Some(invocation) = self.queue.pop_front() {
            let config = parser::parse(&self.registry, &invocation.effect.tags, &invocation.effect.params);
            let outcome = executor::execute(
                world,
                &self.registry,
                &config,
                invocation.source,
                invocation.primary_target,
                spatial,
                &mut self.rng,
            );
            for warning in &outcome.warnings {
                warn!(%warning, "execution warning");
            }
            self.events.publish_all(outcome.events);
        }
    }

    fn tick_cooldowns(&self, world: &World, dt: f32) {
        let mut query = world.query::<&mut crate::components::Cooldowns>();
        for (_, cooldowns) in query.iter() {
            cooldowns.tick(dt);
        }
    }

    /// Enemy AI ability selection (spec §4.8): cooldown-ready, trigger-
    /// eligible abilities, first-match by declared priority; falls back
    /// to the default melee attack when nothing matches.
    pub fn select_enemy_ability(
        &mut self,
        world: &World,
        enemy: Entity,
        primary_target: Entity,
        abilities: &[EnemyAbility],
    ) -> EffectInput {
        let enemy_health = entity::health(world, enemy).ok();
        let enemy_pos = entity::position(world, enemy).ok();
        let target_pos = entity::position(world, primary_target).ok();
        let distance = match (enemy_pos, target_pos) {
            (Some(a), Some(b)) => Some(a.distance(&b)),
            _ => None,
        };

        let mut eligible: Vec<&EnemyAbility> = abilities
            .iter()
            .filter(|ability| {
                entity::with_cooldowns(world, enemy, |cooldowns| cooldowns.is_ready(&ability.ability_id))
                    .unwrap_or(true)
            })
            .filter(|ability| self.satisfies_trigger(ability, enemy_health, distance, enemy))
            .collect();
        eligible.sort_by_key(|ability| ability.priority);

        match eligible.first() {
            Some(ability) => {
                let _ = entity::with_cooldowns(world, enemy, |cooldowns| {
                    cooldowns.start(ability.ability_id.clone(), 0.0)
                });
                *self
                    .enemy_ability_uses
                    .entry((enemy, ability.ability_id.clone()))
                    .or_insert(0) += 1;
                ability.effect.clone()
            }
            None => default_melee_tags(),
        }
    }

    fn satisfies_trigger(
        &self,
        ability: &EnemyAbility,
        enemy_health: Option<crate::components::Health>,
        distance: Option<f32>,
        enemy: Entity,
    ) -> bool {
        if let Some(threshold) = ability.trigger.health_threshold {
            let Some(health) = enemy_health else { return false };
            if health.current() / health.max() > threshold {
                return false;
            }
        }
        if let Some(min) = ability.trigger.distance_min {
            if distance.is_none_or(|d| d < min) {
                return false;
            }
        }
        if let Some(max) = ability.trigger.distance_max {
            if distance.is_none_or(|d| d > max) {
                return false;
            }
        }
        if let Some(max_uses) = ability.trigger.max_uses_per_fight {
            let uses = self
                .enemy_ability_uses
                .get(&(enemy, ability.ability_id.clone()))
                .copied()
                .unwrap_or(0);
            if uses >= max_uses {
                return false;
            }
        }
        true
    }

    /// Clears pending invocations and per-fight ability usage counters
    /// (spec §5: "cancelled by clearing the queue, e.g. on encounter end
    /// or save load").
    pub fn clear_encounter_state(&mut self) {
        self.queue.clear();
        self.enemy_ability_uses.clear();
    }
}

/// An enemy's fallback attack when no ability's trigger conditions match
/// (spec §4.8 step 4: "a `single_target`, `physical` effect").
pub fn default_melee_tags() -> EffectInput {
    EffectInput {
        tags: vec!["single_target".to_string(), "physical".to_string()],
        params: HashMap::new(),
    }
}
