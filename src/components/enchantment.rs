use std::collections::HashMap;

use crate::utils::id::TagName;

/// A single enchantment entry on an equipped weapon or piece of armor. Its
/// `tag` is looked up in the `TagRegistry` the same way an invocation's
/// input tags are; `params` overrides that tag's default parameters for
/// this specific enchantment instance (e.g. a "+2 sharpness" enchant vs a
/// "+1 sharpness" enchant, both the `sharpness` tag, differing in
/// `damage_bonus`).
#[derive(Debug, Clone, PartialEq)]
pub struct Enchantment {
    pub tag: TagName,
    pub params: HashMap<String, f32>,
}

impl Enchantment {
    pub fn new(tag: impl Into<TagName>, params: HashMap<String, f32>) -> Self {
        Self {
            tag: tag.into(),
            params,
        }
    }

    pub fn param(&self, key: &str) -> Option<f32> {
        self.params.get(key).copied()
    }
}

/// The enchantments attached to an entity's currently equipped weapon and
/// armor. Kept as one flat list rather than split by slot since the
/// damage pipeline and reflect/thorns mechanics only care about "what
/// enchantments are active", not which slot granted them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enchantments(pub Vec<Enchantment>);

impl Enchantments {
    pub fn has(&self, tag: &TagName) -> bool {
        self.0.iter().any(|e| &e.tag == tag)
    }

    pub fn find(&self, tag: &TagName) -> Option<&Enchantment> {
        self.0.iter().find(|e| &e.tag == tag)
    }
}
