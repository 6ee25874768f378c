use crate::utils::id::{AbilityId, ItemId, SkillId};

/// `(tags, params)` pair callbacks hand back — the same raw shape
/// `effects::parser::parse` consumes (spec §6).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectInput {
    pub tags: Vec<String>,
    pub params: std::collections::HashMap<String, f32>,
}

/// How an enemy ability becomes eligible to fire (spec §4.8 step 2).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerConditions {
    pub health_threshold: Option<f32>,
    pub distance_min: Option<f32>,
    pub distance_max: Option<f32>,
    pub max_uses_per_fight: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyAbility {
    pub ability_id: AbilityId,
    pub effect: EffectInput,
    pub trigger: TriggerConditions,
    /// Lower values are preferred when multiple abilities are eligible
    /// (spec §4.8 step 3: "first-match wins" against a declared priority
    /// order).
    pub priority: i32,
}

/// The three collaborator callbacks spec.md §6 describes: "external
/// loaders supply via callbacks". The core never loads item/skill/enemy
/// databases itself — it only calls through these at invocation time.
pub trait WeaponEffectSource {
    fn get_weapon_effect(&self, item_id: &ItemId) -> Option<EffectInput>;
}

pub trait SkillEffectSource {
    fn get_skill_effect(&self, skill_id: &SkillId) -> Option<SkillEffect>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillEffect {
    pub effect: EffectInput,
    pub mana_cost: f32,
    pub cooldown: f32,
}

pub trait EnemyAbilitySource {
    fn get_enemy_abilities(&self, enemy_id: &str) -> Vec<EnemyAbility>;
}
