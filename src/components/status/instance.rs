use hecs::Entity;

use super::kind::StatusKind;

/// A live status effect on some entity. `params` holds the kind-specific
/// numeric parameters from spec §3 (e.g. `dps`, `pct`, `hp_pool`,
/// `tick_rate`) rather than a typed struct per kind, since the same
/// instance type has to be homogeneous in a `Vec<StatusInstance>`; the
/// catalog (§4.3) is the only code that interprets these keys, matching
/// the "typed at the boundary, map internally" redesign in spec §9.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusInstance {
    pub kind: StatusKind,
    pub remaining: f32,
    pub stacks: u32,
    pub source: Option<Entity>,
    pub params: std::collections::HashMap<String, f32>,
    /// Accumulates elapsed time for tick-based DoTs (Shock) until it
    /// reaches `tick_rate`, at which point one tick's damage fires and
    /// the accumulator resets.
    pub tick_accumulator: f32,
}

impl StatusInstance {
    pub fn new(
        kind: StatusKind,
        duration: f32,
        params: std::collections::HashMap<String, f32>,
        source: Option<Entity>,
    ) -> Self {
        Self {
            kind,
            remaining: duration,
            stacks: 1,
            source,
            params,
            tick_accumulator: 0.0,
        }
    }

    pub fn param(&self, key: &str) -> f32 {
        self.params.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// dps-style statuses scale super-linearly with stack count for
    /// Poison specifically (spec: "DoT scaling with stacks^1.2"); every
    /// other stacking kind scales linearly.
    pub fn effective_dps(&self) -> f32 {
        let base = self.param("dps").max(self.param("base_dps"));
        match self.kind {
            StatusKind::Poison => base * (self.stacks as f32).powf(1.2),
            _ => base * self.stacks as f32,
        }
    }
}
