use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::utils::id::TagName;

/// One of the eight disjoint classes a canonical tag belongs to (spec
/// §3). Exhaustive and non-overlapping by construction: a tag definition
/// names exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Geometry,
    DamageType,
    StatusDebuff,
    StatusBuff,
    Context,
    Special,
    Trigger,
    Equipment,
}

/// Re-application policy recorded on the tag definition itself (spec §3).
/// The status catalog (`components::status::kind::StackingPolicy`) has
/// its own per-kind table for the concrete status variants; this is the
/// registry-level declaration a content author writes in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StackingPolicy {
    None,
    Refresh,
    Stack,
    Independent,
}

/// A fully resolved, in-memory tag definition — the registry's unit of
/// truth for one canonical tag name (spec §3).
#[derive(Debug, Clone)]
pub struct TagDefinition {
    pub name: TagName,
    pub category: Category,
    pub priority: i32,
    pub required_params: Vec<String>,
    pub default_params: HashMap<String, f32>,
    pub conflicts: Vec<TagName>,
    pub aliases: Vec<TagName>,
    pub alias_of: Option<TagName>,
    pub stacking_policy: StackingPolicy,
    pub immune_damage_types: Vec<TagName>,
    /// partner tag -> bonus-key -> multiplier (§3: "keys ending in
    /// `_bonus` apply multiplicative +x to the corresponding base
    /// parameter").
    pub synergies: HashMap<TagName, HashMap<String, f32>>,
    pub context_overrides: HashMap<TagName, TagName>,
    pub auto_apply_chance: Option<f32>,
    pub auto_apply_status: Option<TagName>,
    pub parent: Option<TagName>,
}

impl TagDefinition {
    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }
}

/// Which factions an effect targets (spec §3 `EffectConfig.context`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Context {
    Enemy,
    Ally,
    #[serde(rename = "self")]
    #[strum(serialize = "self")]
    SelfTarget,
    All,
}
