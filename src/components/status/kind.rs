use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Closed sum type over every status effect variant the catalog supports
/// (spec §4.3 table). Replaces the "open inheritance on `StatusEffect`"
/// pattern flagged in spec §9: there is exactly one kind per row, no
/// trait objects, and `StatusCatalog::tick` can match over this enum
/// without virtual dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    Burn,
    Bleed,
    Poison,
    Shock,
    Freeze,
    Stun,
    Root,
    Slow,
    Weaken,
    Vulnerable,
    Regeneration,
    Shield,
    Haste,
    Empower,
    Fortify,
}

/// Re-application policy for a given status kind (spec §3 `TagDefinition`
/// field `stacking_policy`, applied here per status kind rather than per
/// tag so the catalog is the single source of truth for §4.3's table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingPolicy {
    /// A second application is ignored outright.
    None,
    /// Duration resets to the new application's duration; magnitude is
    /// replaced (or the max of old/new, per-kind as noted in the table).
    Refresh,
    /// Stacks accumulate; magnitude scales with stack count.
    Stack,
    /// Every application creates a fully independent instance.
    Independent,
}

impl StatusKind {
    pub fn stacking_policy(&self) -> StackingPolicy {
        use StatusKind::*;
        match self {
            Burn | Bleed | Freeze | Stun | Root | Slow | Weaken | Vulnerable | Regeneration
            | Shield | Haste | Empower | Fortify => StackingPolicy::Refresh,
            Poison | Shock => StackingPolicy::Stack,
        }
    }

    /// Whether this status blocks the entity from taking actions at all
    /// (spec: Freeze and Stun both apply an "action block").
    pub fn blocks_actions(&self) -> bool {
        matches!(self, StatusKind::Freeze | StatusKind::Stun)
    }

    /// Whether this status reduces movement to zero.
    pub fn blocks_movement(&self) -> bool {
        matches!(self, StatusKind::Freeze | StatusKind::Root)
    }

    pub fn is_dot(&self) -> bool {
        matches!(
            self,
            StatusKind::Burn | StatusKind::Bleed | StatusKind::Poison | StatusKind::Shock
        )
    }

    pub fn is_debuff(&self) -> bool {
        matches!(
            self,
            StatusKind::Burn
                | StatusKind::Bleed
                | StatusKind::Poison
                | StatusKind::Shock
                | StatusKind::Freeze
                | StatusKind::Stun
                | StatusKind::Root
                | StatusKind::Slow
                | StatusKind::Weaken
                | StatusKind::Vulnerable
        )
    }

    pub fn is_buff(&self) -> bool {
        !self.is_debuff()
    }
}
