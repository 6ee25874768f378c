use std::collections::HashMap;

use crate::{registry::Context, utils::id::TagName};

use super::warning::Warning;

/// The normalized, parsed representation of `(tags, params)` (spec §3).
/// Immutable once built — the executor reads it but never mutates it.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub raw_tags: Vec<TagName>,
    pub geometry: TagName,
    pub damage_tags: Vec<TagName>,
    pub status_tags: Vec<TagName>,
    pub context_tags: Vec<TagName>,
    pub special_tags: Vec<TagName>,
    pub trigger_tags: Vec<TagName>,
    pub context: Context,
    pub base_damage: f32,
    pub base_healing: f32,
    pub params: HashMap<String, f32>,
    pub warnings: Vec<Warning>,
}

impl EffectConfig {
    pub fn has_special(&self, tag: &str) -> bool {
        self.special_tags.iter().any(|t| t.as_str() == tag)
    }

    pub fn has_trigger(&self, tag: &str) -> bool {
        self.trigger_tags.iter().any(|t| t.as_str() == tag)
    }

    pub fn param(&self, key: &str) -> Option<f32> {
        self.params.get(key).copied()
    }

    pub fn param_or(&self, key: &str, default: f32) -> f32 {
        self.param(key).unwrap_or(default)
    }
}
