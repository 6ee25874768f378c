use std::collections::HashMap;

use serde::Deserialize;

use super::tag_definition::{Category, StackingPolicy};

/// Wire format for one entry under `tag_definitions` (spec §6). Mirrors
/// the teacher's `*Definition` DTO-then-`From` pattern
/// (`registry::serialize::effect::EffectDefinition`): the JSON shape is
/// kept separate from the in-memory `TagDefinition` so optional/missing
/// fields get their defaults here, once, instead of scattered through
/// the rest of the crate.
#[derive(Debug, Clone, Deserialize)]
pub struct TagDefinitionDto {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub required_params: Vec<String>,
    #[serde(default)]
    pub default_params: HashMap<String, f32>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub alias_of: Option<String>,
    #[serde(default)]
    pub stacking_policy: Option<StackingPolicy>,
    #[serde(default)]
    pub immune_damage_types: Vec<String>,
    #[serde(default)]
    pub synergies: HashMap<String, HashMap<String, f32>>,
    #[serde(default)]
    pub context_overrides: HashMap<String, String>,
    #[serde(default)]
    pub auto_apply_chance: Option<f32>,
    #[serde(default)]
    pub auto_apply_status: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConflictResolutionDto {
    #[serde(default)]
    pub geometry_priority: Vec<String>,
    #[serde(default)]
    pub mutually_exclusive: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryDocument {
    pub tag_definitions: HashMap<String, TagDefinitionDto>,
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub conflict_resolution: ConflictResolutionDto,
    #[serde(default)]
    pub context_inference: HashMap<String, String>,
}
