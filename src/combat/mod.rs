pub mod events;
pub mod external;
pub mod manager;

pub use events::{CombatEvent, EventBus};
pub use external::{
    EffectInput, EnemyAbility, EnemyAbilitySource, SkillEffect, SkillEffectSource, TriggerConditions,
    WeaponEffectSource,
};
pub use manager::{ActivationRejection, ActivationResult, CombatManager, Invocation};
