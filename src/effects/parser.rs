use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::registry::{Category, Context, TagRegistry};
use crate::utils::id::TagName;

use super::{config::EffectConfig, warning::Warning};

/// Turns `(tags, params)` into a fully-resolved `EffectConfig` (spec
/// §4.2). Pure and total: unknown tags, geometry conflicts, and mutual
/// exclusions are recorded as warnings rather than raised, so the same
/// inputs against the same registry always produce the same output.
pub fn parse(registry: &TagRegistry, tags: &[String], params: &HashMap<String, f32>) -> EffectConfig {
    let mut warnings = Vec::new();

    let mut resolved_tags: Vec<TagName> = Vec::new();
    let mut geometry_candidates: Vec<TagName> = Vec::new();
    let mut damage_tags: Vec<TagName> = Vec::new();
    let mut status_tags: Vec<TagName> = Vec::new();
    let mut context_tags: Vec<TagName> = Vec::new();
    let mut special_tags: Vec<TagName> = Vec::new();
    let mut trigger_tags: Vec<TagName> = Vec::new();
    // damage/status/context/special tags in their original relative order,
    // used for the mutual-exclusion sweep (spec step 7).
    let mut exclusion_candidates: Vec<TagName> = Vec::new();

    // 1. alias resolution, 2. categorization (unknown tags dropped with a warning)
    for raw in tags {
        let normalized = TagName::normalized(raw);
        let canonical = registry.resolve_alias(&normalized);
        let Some(category) = registry.category(&canonical) else {
            warnings.push(Warning::UnknownTag { tag: normalized });
            continue;
        };

        resolved_tags.push(canonical.clone());
        match category {
            Category::Geometry => geometry_candidates.push(canonical),
            Category::DamageType => {
                damage_tags.push(canonical.clone());
                exclusion_candidates.push(canonical);
            }
            Category::StatusDebuff | Category::StatusBuff => {
                status_tags.push(canonical.clone());
                exclusion_candidates.push(canonical);
            }
            Category::Context => {
                context_tags.push(canonical.clone());
                exclusion_candidates.push(canonical);
            }
            Category::Special => {
                special_tags.push(canonical.clone());
                exclusion_candidates.push(canonical);
            }
            Category::Trigger => trigger_tags.push(canonical),
            Category::Equipment => {}
        }
    }

    // 3. geometry selection
    let geometry = if geometry_candidates.is_empty() {
        TagName::from("single_target")
    } else if geometry_candidates.len() == 1 {
        geometry_candidates[0].clone()
    } else {
        let chosen = registry
            .resolve_geometry_conflict(&geometry_candidates)
            .unwrap_or_else(|| geometry_candidates[0].clone());
        let ignored: Vec<TagName> = geometry_candidates
            .iter()
            .filter(|t| **t != chosen)
            .cloned()
            .collect();
        warnings.push(Warning::GeometryConflict {
            chosen: chosen.clone(),
            ignored,
        });
        chosen
    };

    // only the winning geometry tag participates in param merge/synergy below
    let kept_tags: Vec<TagName> = resolved_tags
        .iter()
        .filter(|t| !(registry.is_geometry(t) && **t != geometry))
        .cloned()
        .collect();

    // 4. context resolution
    let context = resolve_context(
        registry,
        &context_tags,
        &damage_tags,
        &status_tags,
        params,
        &mut warnings,
    );

    // 5. parameter merge: defaults overlaid in tag order, user params win last
    let mut merged_params: HashMap<String, f32> = HashMap::new();
    merged_params.extend(registry.default_params(&geometry));
    for tag in &kept_tags {
        merged_params.extend(registry.default_params(tag));
    }
    merged_params.extend(params.iter().map(|(k, v)| (k.clone(), *v)));

    // 6. synergy application
    let present: HashSet<TagName> = kept_tags
        .iter()
        .cloned()
        .chain(std::iter::once(geometry.clone()))
        .collect();
    for tag in kept_tags.iter().chain(std::iter::once(&geometry)) {
        let Some(definition) = registry.get(tag) else {
            continue;
        };
        for (partner, bonuses) in &definition.synergies {
            if !present.contains(partner) {
                continue;
            }
            for (bonus_key, bonus_value) in bonuses {
                let Some(base_param) = bonus_key.strip_suffix("_bonus") else {
                    continue;
                };
                let current = merged_params.get(base_param).copied().unwrap_or(0.0);
                merged_params.insert(base_param.to_string(), current * (1.0 + bonus_value));
                warnings.push(Warning::SynergyApplied {
                    tag: tag.clone(),
                    partner: partner.clone(),
                    param: base_param.to_string(),
                });
            }
        }
    }

    // 7. mutual exclusion check: later tag in the original list wins
    for i in 0..exclusion_candidates.len() {
        for j in (i + 1)..exclusion_candidates.len() {
            let a = &exclusion_candidates[i];
            let b = &exclusion_candidates[j];
            if registry.mutually_exclusive(a, b) {
                warnings.push(Warning::MutuallyExclusive {
                    a: a.clone(),
                    b: b.clone(),
                    winner: b.clone(),
                });
            }
        }
    }

    // 8. extract base_damage / base_healing
    let base_damage = merged_params
        .get("base_damage")
        .or_else(|| merged_params.get("baseDamage"))
        .copied()
        .unwrap_or(0.0)
        .max(0.0);
    let base_healing = merged_params
        .get("base_healing")
        .or_else(|| merged_params.get("baseHealing"))
        .copied()
        .unwrap_or(0.0)
        .max(0.0);

    EffectConfig {
        raw_tags: resolved_tags,
        geometry,
        damage_tags,
        status_tags,
        context_tags,
        special_tags,
        trigger_tags,
        context,
        base_damage,
        base_healing,
        params: merged_params,
        warnings,
    }
}

fn resolve_context(
    registry: &TagRegistry,
    context_tags: &[TagName],
    damage_tags: &[TagName],
    status_tags: &[TagName],
    params: &HashMap<String, f32>,
    warnings: &mut Vec<Warning>,
) -> Context {
    let has_damage = !damage_tags.is_empty();
    let has_debuff = status_tags
        .iter()
        .any(|t| registry.category(t) == Some(Category::StatusDebuff));
    let has_buff = status_tags
        .iter()
        .any(|t| registry.category(t) == Some(Category::StatusBuff));
    let has_healing = params.get("base_healing").copied().unwrap_or(0.0) > 0.0
        || params.get("baseHealing").copied().unwrap_or(0.0) > 0.0;

    let inferred_rule = if has_damage {
        Some("damage")
    } else if has_debuff {
        Some("debuff")
    } else if has_healing {
        Some("healing")
    } else if has_buff {
        Some("buff")
    } else {
        None
    };
    let inferred = inferred_rule
        .and_then(|rule| registry.context_for_rule(rule))
        .unwrap_or(Context::Enemy);

    match context_tags.first() {
        Some(explicit_tag) => {
            let explicit = Context::from_str(explicit_tag.as_str()).unwrap_or(Context::Enemy);
            if explicit == Context::Enemy && (has_healing || has_buff) {
                warnings.push(Warning::UnusualContext {
                    message: format!("healing/buff effect with explicit `{explicit_tag}` context"),
                });
            }
            explicit
        }
        None => inferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> TagRegistry {
        TagRegistry::load(
            r#"{
                "tag_definitions": {
                    "single_target": { "category": "geometry" },
                    "chain": { "category": "geometry", "default_params": { "chain_count": 3.0, "chain_range": 5.0, "chain_decay": 0.8 } },
                    "beam": { "category": "geometry" },
                    "fire": { "category": "damage_type", "synergies": { "oil": { "base_damage_bonus": 0.5 } } },
                    "oil": { "category": "damage_type" },
                    "lightning": { "category": "damage_type" },
                    "physical": { "category": "damage_type" },
                    "burn": { "category": "status_debuff", "stacking_policy": "refresh", "conflicts": ["freeze"] },
                    "freeze": { "category": "status_debuff", "stacking_policy": "refresh" },
                    "empower": { "category": "status_buff" },
                    "enemy": { "category": "context" },
                    "ally": { "category": "context" },
                    "lifesteal": { "category": "special" },
                    "on_hit": { "category": "trigger" }
                },
                "conflict_resolution": {
                    "geometry_priority": ["beam", "chain", "single_target"],
                    "mutually_exclusive": { "burn": ["freeze"] }
                },
                "context_inference": { "damage": "enemy", "healing": "ally", "debuff": "enemy", "buff": "ally" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_to_single_target_and_enemy_context() {
        let registry = sample_registry();
        let config = parse(&registry, &["fire".to_string()], &HashMap::new());
        assert_eq!(config.geometry, TagName::from("single_target"));
        assert_eq!(config.context, Context::Enemy);
    }

    #[test]
    fn unknown_tag_is_dropped_with_warning() {
        let registry = sample_registry();
        let config = parse(&registry, &["not_a_tag".to_string()], &HashMap::new());
        assert!(matches!(config.warnings[0], Warning::UnknownTag { .. }));
        assert!(config.raw_tags.is_empty());
    }

    #[test]
    fn geometry_conflict_picks_priority_and_warns() {
        let registry = sample_registry();
        let config = parse(
            &registry,
            &["chain".to_string(), "beam".to_string()],
            &HashMap::new(),
        );
        assert_eq!(config.geometry, TagName::from("beam"));
        assert!(config.warnings.iter().any(|w| matches!(w, Warning::GeometryConflict { .. })));
    }

    #[test]
    fn synergy_applies_multiplicative_bonus() {
        let registry = sample_registry();
        let mut params = HashMap::new();
        params.insert("base_damage".to_string(), 100.0);
        let config = parse(
            &registry,
            &["fire".to_string(), "oil".to_string()],
            &params,
        );
        assert_eq!(config.base_damage, 150.0);
        assert!(config.warnings.iter().any(|w| matches!(w, Warning::SynergyApplied { .. })));
    }

    #[test]
    fn mutual_exclusion_records_later_tag_as_winner() {
        let registry = sample_registry();
        let config = parse(
            &registry,
            &["burn".to_string(), "freeze".to_string()],
            &HashMap::new(),
        );
        assert!(config.warnings.iter().any(
            |w| matches!(w, Warning::MutuallyExclusive { winner, .. } if winner == &TagName::from("freeze"))
        ));
    }

    #[test]
    fn user_params_override_tag_defaults() {
        let registry = sample_registry();
        let mut params = HashMap::new();
        params.insert("chain_count".to_string(), 7.0);
        let config = parse(&registry, &["chain".to_string()], &params);
        assert_eq!(config.param("chain_count"), Some(7.0));
    }

    #[test]
    fn parse_is_idempotent_up_to_warning_order() {
        let registry = sample_registry();
        let mut params = HashMap::new();
        params.insert("base_damage".to_string(), 40.0);
        let tags = vec!["fire".to_string(), "chain".to_string()];
        let first = parse(&registry, &tags, &params);
        let second_tags: Vec<String> = first.raw_tags.iter().map(|t| t.to_string()).collect();
        let second = parse(&registry, &second_tags, &first.params);
        assert_eq!(first.geometry, second.geometry);
        assert_eq!(first.context, second.context);
        assert_eq!(first.base_damage, second.base_damage);
    }
}
