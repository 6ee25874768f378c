use hecs::{Entity, World};

use crate::components::{
    CombatProfile, Cooldowns, Defense, Enchantments, EntityCategory, Faction, Health, Mana,
    Position, StatusEffects,
};

/// Marker components distinguishing the three concrete entity kinds the
/// game spawns (spec §4.4). The executor never matches on these — it
/// only reads whatever components a target happens to carry, through
/// the free functions below. This is the capability-set redesign from
/// spec §9 ("open duck typing" → "explicit entity capability set"),
/// realized as selective `hecs` component presence rather than a trait
/// object or dynamic dict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTag;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTag;
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedTag;

/// One entity-contract capability a caller asked for that the target
/// does not carry (spec §7 `MissingCapability`). Non-fatal everywhere
/// it surfaces: the executor skips the target and records a warning
/// instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCapability {
    pub target: Entity,
    pub capability: &'static str,
}

impl std::fmt::Display for MissingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity {:?} is missing capability `{}`", self.target, self.capability)
    }
}

impl std::error::Error for MissingCapability {}

fn missing(target: Entity, capability: &'static str) -> MissingCapability {
    MissingCapability { target, capability }
}

pub fn position(world: &World, entity: Entity) -> Result<Position, MissingCapability> {
    world
        .get::<&Position>(entity)
        .map(|p| *p)
        .map_err(|_| missing(entity, "position"))
}

pub fn set_position(world: &World, entity: Entity, new_position: Position) -> Result<(), MissingCapability> {
    world
        .get::<&mut Position>(entity)
        .map(|mut p| *p = new_position)
        .map_err(|_| missing(entity, "position"))
}

pub fn health(world: &World, entity: Entity) -> Result<Health, MissingCapability> {
    world
        .get::<&Health>(entity)
        .map(|h| *h)
        .map_err(|_| missing(entity, "health"))
}

pub fn is_alive(world: &World, entity: Entity) -> bool {
    health(world, entity).map(|h| h.is_alive()).unwrap_or(false)
}

pub fn apply_damage(world: &World, entity: Entity, amount: f32) -> Result<(), MissingCapability> {
    world
        .get::<&mut Health>(entity)
        .map(|mut h| h.apply_damage(amount))
        .map_err(|_| missing(entity, "health"))
}

pub fn heal(world: &World, entity: Entity, amount: f32) -> Result<(), MissingCapability> {
    world
        .get::<&mut Health>(entity)
        .map(|mut h| h.heal(amount))
        .map_err(|_| missing(entity, "health"))
}

pub fn set_hp(world: &World, entity: Entity, value: f32) -> Result<(), MissingCapability> {
    world
        .get::<&mut Health>(entity)
        .map(|mut h| h.set_current(value))
        .map_err(|_| missing(entity, "health"))
}

pub fn mana(world: &World, entity: Entity) -> Result<Mana, MissingCapability> {
    world
        .get::<&Mana>(entity)
        .map(|m| *m)
        .map_err(|_| missing(entity, "mana"))
}

pub fn spend_mana(world: &World, entity: Entity, cost: f32) -> Result<(), MissingCapability> {
    world
        .get::<&mut Mana>(entity)
        .map(|mut m| m.spend(cost))
        .map_err(|_| missing(entity, "mana"))
}

/// Optional capability: absent means "no defense component was attached
/// at spawn time", which the damage pipeline treats as `0.0` (spec §4.4).
pub fn defense(world: &World, entity: Entity) -> f32 {
    world.get::<&Defense>(entity).map(|d| d.0).unwrap_or(0.0)
}

pub fn category(world: &World, entity: Entity) -> Option<EntityCategory> {
    world.get::<&EntityCategory>(entity).ok().map(|c| *c)
}

pub fn faction(world: &World, entity: Entity) -> Option<Faction> {
    world.get::<&Faction>(entity).ok().map(|f| *f)
}

pub fn combat_profile(world: &World, entity: Entity) -> CombatProfile {
    world.get::<&CombatProfile>(entity).map(|c| *c).unwrap_or_default()
}

pub fn enchantments(world: &World, entity: Entity) -> Enchantments {
    world
        .get::<&Enchantments>(entity)
        .map(|e| e.clone())
        .unwrap_or_default()
}

pub fn status_effects(world: &World, entity: Entity) -> StatusEffects {
    world
        .get::<&StatusEffects>(entity)
        .map(|s| s.clone())
        .unwrap_or_default()
}

pub fn with_status_effects_mut<R>(
    world: &World,
    entity: Entity,
    f: impl FnOnce(&mut StatusEffects) -> R,
) -> Result<R, MissingCapability> {
    world
        .get::<&mut StatusEffects>(entity)
        .map(|mut s| f(&mut s))
        .map_err(|_| missing(entity, "status_effects"))
}

pub fn with_cooldowns<R>(
    world: &World,
    entity: Entity,
    f: impl FnOnce(&mut Cooldowns) -> R,
) -> Result<R, MissingCapability> {
    world
        .get::<&mut Cooldowns>(entity)
        .map(|mut c| f(&mut c))
        .map_err(|_| missing(entity, "cooldowns"))
}

/// Spawns a `Player` bundle (spec §4.4): always carries mana, a combat
/// profile, cooldown bookkeeping, and an empty status list. `Defense`,
/// `EntityCategory`, and `Enchantments` are optional capabilities — attach
/// them afterward with `World::insert_one` when the content calls for them.
pub fn spawn_player(world: &mut World, position: Position, health: Health, mana: Mana) -> Entity {
    world.spawn((
        position,
        health,
        mana,
        StatusEffects::default(),
        Cooldowns::default(),
        CombatProfile::default(),
        Faction::Players,
        PlayerTag,
    ))
}

/// Spawns an `Enemy` bundle. Unlike `Player`, no `Mana` component — most
/// enemy abilities are data-defined cooldown-only, per the teacher's
/// monster stat blocks.
pub fn spawn_enemy(world: &mut World, position: Position, health: Health) -> Entity {
    world.spawn((
        position,
        health,
        StatusEffects::default(),
        Cooldowns::default(),
        CombatProfile::default(),
        Faction::Enemies,
        EnemyTag,
    ))
}

/// Spawns a `Placed` bundle (turret/trap): position, health, and a
/// status list so it can still be frozen/stunned, but no mana or
/// cooldown map of its own — placed entities fire on world-side timers.
pub fn spawn_placed(world: &mut World, position: Position, health: Health, faction: Faction) -> Entity {
    world.spawn((position, health, StatusEffects::default(), faction, PlacedTag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_component_is_reported_not_panicked() {
        let mut world = World::new();
        let placed = spawn_placed(&mut world, Position::new(0.0, 0.0), Health::new(10.0), Faction::Enemies);
        assert!(mana(&world, placed).is_err());
        assert_eq!(defense(&world, placed), 0.0);
    }

    #[test]
    fn player_spawns_with_mana_and_cooldowns() {
        let mut world = World::new();
        let player = spawn_player(&mut world, Position::new(0.0, 0.0), Health::new(100.0), Mana::new(50.0));
        assert!(mana(&world, player).is_ok());
        assert!(with_cooldowns(&world, player, |_| ()).is_ok());
    }
}
