use std::collections::HashMap;
use std::str::FromStr;

use tracing::debug;

use crate::utils::id::TagName;

use super::{
    error::RegistryError,
    serialize::RegistryDocument,
    tag_definition::{Category, Context, StackingPolicy, TagDefinition},
};

/// The central, immutable-after-load Tag Registry (spec §4.1). Unlike
/// the teacher's `REGISTRIES: LazyLock<RegistrySet>` process-global
/// singleton, this crate hands a `TagRegistry` around explicitly
/// (typically behind an `Arc`): the spec's registry is caller-supplied
/// content, and tests in this crate load several different small
/// registries, which a global `LazyLock` can't express.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    canonical: HashMap<TagName, TagDefinition>,
    aliases: HashMap<TagName, TagName>,
    category_index: HashMap<Category, Vec<TagName>>,
    geometry_priority: Vec<TagName>,
    mutual_exclusions: HashMap<TagName, Vec<TagName>>,
    context_inference: HashMap<String, Context>,
}

impl TagRegistry {
    pub fn load(source: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument = serde_json::from_str(source)?;

        let mut canonical = HashMap::new();
        let mut aliases = HashMap::new();
        let mut category_index: HashMap<Category, Vec<TagName>> = HashMap::new();

        for (name, dto) in &document.tag_definitions {
            let name = TagName::normalized(name);
            let category = dto.category.ok_or_else(|| RegistryError::InvalidRegistry {
                reason: format!("tag `{name}` is missing a category"),
            })?;

            let definition = TagDefinition {
                name: name.clone(),
                category,
                priority: dto.priority,
                required_params: dto.required_params.clone(),
                default_params: dto.default_params.clone(),
                conflicts: dto.conflicts.iter().map(|s| TagName::normalized(s)).collect(),
                aliases: dto.aliases.iter().map(|s| TagName::normalized(s)).collect(),
                alias_of: dto.alias_of.as_deref().map(TagName::normalized),
                stacking_policy: dto.stacking_policy.unwrap_or(StackingPolicy::None),
                immune_damage_types: dto
                    .immune_damage_types
                    .iter()
                    .map(|s| TagName::normalized(s))
                    .collect(),
                synergies: dto
                    .synergies
                    .iter()
                    .map(|(partner, bonuses)| (TagName::normalized(partner), bonuses.clone()))
                    .collect(),
                context_overrides: dto
                    .context_overrides
                    .iter()
                    .map(|(k, v)| (TagName::normalized(k), TagName::normalized(v)))
                    .collect(),
                auto_apply_chance: dto.auto_apply_chance,
                auto_apply_status: dto.auto_apply_status.as_deref().map(TagName::normalized),
                parent: dto.parent.as_deref().map(TagName::normalized),
            };

            category_index.entry(category).or_default().push(name.clone());

            for alias in &definition.aliases {
                if aliases.insert(alias.clone(), name.clone()).is_some() {
                    return Err(RegistryError::InvalidRegistry {
                        reason: format!("alias `{alias}` is declared more than once"),
                    });
                }
            }

            if canonical.insert(name.clone(), definition).is_some() {
                return Err(RegistryError::InvalidRegistry {
                    reason: format!("duplicate canonical tag `{name}`"),
                });
            }
        }

        // aliases never nest: an alias must not itself be declared as an alias of something else
        for alias in aliases.keys() {
            if canonical.contains_key(alias) {
                return Err(RegistryError::InvalidRegistry {
                    reason: format!("`{alias}` is declared both as a canonical tag and an alias"),
                });
            }
        }

        let geometry_priority = document
            .conflict_resolution
            .geometry_priority
            .iter()
            .map(|s| TagName::normalized(s))
            .collect::<Vec<_>>();

        let mut mutual_exclusions: HashMap<TagName, Vec<TagName>> = HashMap::new();
        for (tag, excludes) in &document.conflict_resolution.mutually_exclusive {
            let tag = TagName::normalized(tag);
            let excludes = excludes.iter().map(|s| TagName::normalized(s)).collect::<Vec<_>>();
            mutual_exclusions.entry(tag).or_default().extend(excludes);
        }

        let mut context_inference = HashMap::new();
        for (rule, context) in &document.context_inference {
            let context = Context::from_str(context).map_err(|_| RegistryError::InvalidRegistry {
                reason: format!("unknown context `{context}` for inference rule `{rule}`"),
            })?;
            context_inference.insert(rule.clone(), context);
        }

        // cross-check `categories` (if present) against the definitions actually loaded
        for (category_name, tags) in &document.categories {
            let category = Category::from_str(category_name).map_err(|_| {
                RegistryError::InvalidRegistry {
                    reason: format!("unknown category `{category_name}` in `categories`"),
                }
            })?;
            for tag in tags {
                let tag = TagName::normalized(tag);
                match canonical.get(&tag) {
                    Some(def) if def.category == category => {}
                    Some(def) => {
                        return Err(RegistryError::InvalidRegistry {
                            reason: format!(
                                "`{tag}` listed under category `{category_name}` but defined as `{:?}`",
                                def.category
                            ),
                        });
                    }
                    None => {
                        return Err(RegistryError::InvalidRegistry {
                            reason: format!("`categories` references unknown tag `{tag}`"),
                        });
                    }
                }
            }
        }

        let registry = TagRegistry {
            canonical,
            aliases,
            category_index,
            geometry_priority,
            mutual_exclusions,
            context_inference,
        };

        registry.validate_references()?;

        debug!(
            tag_count = registry.canonical.len(),
            alias_count = registry.aliases.len(),
            "tag registry loaded"
        );

        Ok(registry)
    }

    fn validate_references(&self) -> Result<(), RegistryError> {
        for definition in self.canonical.values() {
            if let Some(alias_of) = &definition.alias_of {
                if !self.canonical.contains_key(alias_of) {
                    return Err(RegistryError::InvalidRegistry {
                        reason: format!(
                            "tag `{}` has alias_of `{alias_of}` which does not exist",
                            definition.name
                        ),
                    });
                }
            }
            for conflict in &definition.conflicts {
                if !self.canonical.contains_key(conflict) {
                    return Err(RegistryError::InvalidRegistry {
                        reason: format!(
                            "tag `{}` conflicts with unknown tag `{conflict}`",
                            definition.name
                        ),
                    });
                }
            }
            for partner in definition.synergies.keys() {
                if !self.canonical.contains_key(partner) {
                    return Err(RegistryError::InvalidRegistry {
                        reason: format!(
                            "tag `{}` has a synergy with unknown tag `{partner}`",
                            definition.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn resolve_alias(&self, name: &TagName) -> TagName {
        self.aliases.get(name).cloned().unwrap_or_else(|| name.clone())
    }

    pub fn get(&self, name: &TagName) -> Option<&TagDefinition> {
        let canonical_name = self.resolve_alias(name);
        self.canonical.get(&canonical_name)
    }

    pub fn category(&self, name: &TagName) -> Option<Category> {
        self.get(name).map(|d| d.category)
    }

    pub fn is_geometry(&self, name: &TagName) -> bool {
        self.category(name) == Some(Category::Geometry)
    }

    pub fn is_damage(&self, name: &TagName) -> bool {
        self.category(name) == Some(Category::DamageType)
    }

    pub fn is_status(&self, name: &TagName) -> bool {
        matches!(
            self.category(name),
            Some(Category::StatusBuff) | Some(Category::StatusDebuff)
        )
    }

    pub fn is_context(&self, name: &TagName) -> bool {
        self.category(name) == Some(Category::Context)
    }

    pub fn tags_in_category(&self, category: Category) -> Vec<TagName> {
        self.category_index.get(&category).cloned().unwrap_or_default()
    }

    /// Picks the highest-priority geometry tag per the registry's
    /// ordered `geometry_priority` list; falls back to input order when
    /// none of the candidates appear in that list (spec §4.1).
    pub fn resolve_geometry_conflict(&self, tags: &[TagName]) -> Option<TagName> {
        let candidates: Vec<TagName> = tags
            .iter()
            .map(|t| self.resolve_alias(t))
            .filter(|t| self.is_geometry(t))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let by_priority = self
            .geometry_priority
            .iter()
            .find(|p| candidates.contains(p))
            .cloned();

        by_priority.or_else(|| candidates.into_iter().next())
    }

    pub fn mutually_exclusive(&self, a: &TagName, b: &TagName) -> bool {
        let a = self.resolve_alias(a);
        let b = self.resolve_alias(b);
        self.mutual_exclusions.get(&a).is_some_and(|excludes| excludes.contains(&b))
            || self.mutual_exclusions.get(&b).is_some_and(|excludes| excludes.contains(&a))
    }

    pub fn default_params(&self, name: &TagName) -> HashMap<String, f32> {
        self.get(name).map(|d| d.default_params.clone()).unwrap_or_default()
    }

    pub fn merge_params(&self, name: &TagName, user_params: &HashMap<String, f32>) -> HashMap<String, f32> {
        let mut merged = self.default_params(name);
        merged.extend(user_params.iter().map(|(k, v)| (k.clone(), *v)));
        merged
    }

    pub fn context_for_rule(&self, rule: &str) -> Option<Context> {
        self.context_inference.get(rule).copied()
    }
}
