use std::collections::HashMap;

use hecs::Entity;

use super::{instance::StatusInstance, kind::StatusKind};

/// Resolves a status tag (possibly an alias) to the `StatusKind` it
/// constructs. This is deliberately independent of the `TagRegistry`'s
/// alias table: the registry's aliases are about tag *definitions*
/// (damage/geometry/etc tags in general), while this is the narrower,
/// fixed mapping from "the handful of spellings content authors use for
/// statuses" to the closed status enum, exactly as spec §4.3 describes
/// the factory ("honors aliases... returns `None` for unknown tags").
fn kind_for_tag(tag: &str) -> Option<StatusKind> {
    match tag {
        "burn" | "burning" => Some(StatusKind::Burn),
        "bleed" | "bleeding" => Some(StatusKind::Bleed),
        "poison" | "poison_status" | "poisoned" => Some(StatusKind::Poison),
        "shock" | "shocked" => Some(StatusKind::Shock),
        "freeze" | "frozen" => Some(StatusKind::Freeze),
        "stun" | "stunned" => Some(StatusKind::Stun),
        "root" | "rooted" => Some(StatusKind::Root),
        "slow" | "chill" | "chilled" => Some(StatusKind::Slow),
        "weaken" | "weakened" => Some(StatusKind::Weaken),
        "vulnerable" => Some(StatusKind::Vulnerable),
        "regeneration" | "regen" => Some(StatusKind::Regeneration),
        "shield" => Some(StatusKind::Shield),
        "haste" | "hasted" => Some(StatusKind::Haste),
        "empower" | "empowered" => Some(StatusKind::Empower),
        "fortify" | "fortified" => Some(StatusKind::Fortify),
        _ => None,
    }
}

/// Factory entry point (spec §4.3): builds a fresh `StatusInstance` for
/// an unknown-until-runtime tag, or `None` if the tag does not name a
/// status at all.
pub fn make(
    tag: &str,
    duration: f32,
    params: HashMap<String, f32>,
    source: Option<Entity>,
) -> Option<StatusInstance> {
    let kind = kind_for_tag(tag)?;
    Some(StatusInstance::new(kind, duration, params, source))
}

/// Outcome of ticking one instance by `dt`. The list owner (§4.3's
/// lifecycle section) is responsible for actually mutating `Health`;
/// this stays pure so it can be unit tested without an entity world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub damage: f32,
    pub healing: f32,
}

/// Advances a single status instance by `dt` seconds and reports any
/// damage/healing it produced this step. Expiry is the caller's
/// responsibility (`StatusInstance::is_expired` after this call).
pub fn tick_instance(instance: &mut StatusInstance, dt: f32) -> TickOutcome {
    instance.remaining -= dt;

    match instance.kind {
        StatusKind::Burn | StatusKind::Bleed | StatusKind::Poison => TickOutcome {
            damage: instance.effective_dps() * dt,
            healing: 0.0,
        },
        StatusKind::Shock => {
            let tick_rate = instance.param("tick_rate").max(0.01);
            instance.tick_accumulator += dt;
            let mut damage = 0.0;
            while instance.tick_accumulator >= tick_rate {
                instance.tick_accumulator -= tick_rate;
                damage += instance.param("damage_per_tick") * instance.stacks as f32;
            }
            TickOutcome {
                damage,
                healing: 0.0,
            }
        }
        StatusKind::Regeneration => TickOutcome {
            damage: 0.0,
            healing: instance.param("hps") * dt,
        },
        _ => TickOutcome::default(),
    }
}

/// Applies the stacking policy for `new` against the entity's existing
/// list, honoring spec §4.3's per-kind overrides to the generic
/// none/refresh/stack/independent rules (take-max for Slow, take-max
/// pool for Shield).
pub fn reconcile(existing: &mut Vec<StatusInstance>, new: StatusInstance) {
    use super::kind::StackingPolicy::*;

    let same_kind_same_source = existing
        .iter()
        .position(|i| i.kind == new.kind && i.source == new.source);

    match new.kind.stacking_policy() {
        None => {
            if same_kind_same_source.is_none() {
                existing.push(new);
            }
        }
        Independent => existing.push(new),
        Stack => {
            if let Some(idx) = same_kind_same_source {
                let current = &mut existing[idx];
                current.stacks += 1;
                current.remaining = current.remaining.max(new.remaining);
                for (k, v) in new.params {
                    current.params.insert(k, v);
                }
            } else {
                existing.push(new);
            }
        }
        Refresh => {
            if let Some(idx) = same_kind_same_source {
                let current = &mut existing[idx];
                current.remaining = new.remaining;
                match new.kind {
                    StatusKind::Slow => {
                        let merged_pct = current.param("pct").max(new.param("pct"));
                        current.params = new.params;
                        current.params.insert("pct".to_string(), merged_pct);
                    }
                    StatusKind::Shield => {
                        let merged_pool = current.param("hp_pool").max(new.param("hp_pool"));
                        current.params = new.params;
                        current.params.insert("hp_pool".to_string(), merged_pool);
                    }
                    _ => current.params = new.params,
                }
            } else {
                existing.push(new);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f32)]) -> HashMap<String, f32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn unknown_tag_yields_none() {
        assert!(make("not_a_status", 1.0, HashMap::new(), None).is_none());
    }

    #[test]
    fn alias_resolves_to_canonical_kind() {
        let status = make("chill", 2.0, params(&[("pct", 0.3)]), None).unwrap();
        assert_eq!(status.kind, StatusKind::Slow);
    }

    #[test]
    fn poison_stacks_scale_superlinearly() {
        let mut instance = StatusInstance::new(StatusKind::Poison, 5.0, params(&[("dps", 10.0)]), None);
        instance.stacks = 3;
        let one_stack_dps = 10.0_f32;
        assert!(instance.effective_dps() > one_stack_dps * 3.0);
    }

    #[test]
    fn refresh_resets_duration_without_duplicating() {
        let mut list = vec![StatusInstance::new(
            StatusKind::Burn,
            2.0,
            params(&[("dps", 5.0)]),
            None,
        )];
        reconcile(
            &mut list,
            StatusInstance::new(StatusKind::Burn, 10.0, params(&[("dps", 5.0)]), None),
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].remaining, 10.0);
    }

    #[test]
    fn shield_refresh_takes_max_pool() {
        let mut list = vec![StatusInstance::new(
            StatusKind::Shield,
            5.0,
            params(&[("hp_pool", 20.0)]),
            None,
        )];
        reconcile(
            &mut list,
            StatusInstance::new(StatusKind::Shield, 5.0, params(&[("hp_pool", 10.0)]), None),
        );
        assert_eq!(list[0].param("hp_pool"), 20.0);
    }

    #[test]
    fn shock_ticks_on_accumulated_rate() {
        let mut instance = StatusInstance::new(
            StatusKind::Shock,
            6.0,
            params(&[("damage_per_tick", 8.0), ("tick_rate", 2.0)]),
            None,
        );
        let outcome = tick_instance(&mut instance, 1.5);
        assert_eq!(outcome.damage, 0.0);
        let outcome = tick_instance(&mut instance, 1.0);
        assert_eq!(outcome.damage, 8.0);
    }
}
