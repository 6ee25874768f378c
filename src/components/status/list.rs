use hecs::Entity;

use super::{
    catalog::{self, TickOutcome},
    instance::StatusInstance,
    kind::StatusKind,
};

/// The active status effects carried by one entity. A thin `Vec` wrapper
/// rather than a bare `Vec<StatusInstance>` component so the aggregate
/// queries the damage pipeline and movement system need (total slow
/// percent, shield pool, etc.) live next to the data they summarize.
#[derive(Debug, Clone, Default)]
pub struct StatusEffects(pub Vec<StatusInstance>);

impl StatusEffects {
    pub fn apply(&mut self, instance: StatusInstance) {
        catalog::reconcile(&mut self.0, instance);
    }

    /// Advances every instance by `dt`, returning the combined
    /// damage/healing produced this step. Per spec §4.3's ordering
    /// guarantee (a), callers must remove expired instances with
    /// `retain_alive` *before* resolving any new damage this frame.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        let mut total = TickOutcome::default();
        for instance in self.0.iter_mut() {
            let outcome = catalog::tick_instance(instance, dt);
            total.damage += outcome.damage;
            total.healing += outcome.healing;
        }
        total
    }

    /// Drops instances whose duration has elapsed or, for `Shield`,
    /// whose pool has been fully absorbed (spec: "Shield is removed
    /// when its pool <= 0 even if duration remains").
    pub fn retain_alive(&mut self) {
        self.0.retain(|i| {
            if i.is_expired() {
                return false;
            }
            if i.kind == StatusKind::Shield && i.param("hp_pool") <= 0.0 {
                return false;
            }
            true
        });
    }

    pub fn remove_by_source(&mut self, source: Option<Entity>) {
        self.0.retain(|i| i.source != source);
    }

    pub fn is_stunned(&self) -> bool {
        self.0.iter().any(|i| i.kind.blocks_actions())
    }

    pub fn movement_multiplier(&self) -> f32 {
        if self.0.iter().any(|i| i.kind.blocks_movement()) {
            return 0.0;
        }
        let slow_pct = self.total_pct(StatusKind::Slow);
        let haste_pct = self.sum_pct(StatusKind::Haste);
        (1.0 - slow_pct).max(0.0) * (1.0 + haste_pct)
    }

    /// `Weaken` on the attacker reduces outgoing damage.
    pub fn outgoing_damage_multiplier(&self) -> f32 {
        let weaken_pct = self.total_pct(StatusKind::Weaken);
        let empower_pct = self.sum_pct(StatusKind::Empower);
        (1.0 - weaken_pct).max(0.0) * (1.0 + empower_pct)
    }

    pub fn vulnerable_multiplier(&self) -> f32 {
        1.0 + self.sum_pct(StatusKind::Vulnerable)
    }

    /// Flat incoming-damage reduction from `Fortify`, capped at 0.75
    /// (spec §4.7 caps this the same way it caps defense reduction).
    pub fn fortify_pct(&self) -> f32 {
        self.sum_pct(StatusKind::Fortify).min(0.75)
    }

    pub fn shield_pool(&self) -> f32 {
        self.0
            .iter()
            .filter(|i| i.kind == StatusKind::Shield)
            .map(|i| i.param("hp_pool"))
            .sum()
    }

    /// Depletes shield pools (largest first) to absorb `amount`,
    /// returning how much was actually absorbed.
    pub fn absorb_with_shield(&mut self, amount: f32) -> f32 {
        let mut remaining = amount;
        let mut absorbed = 0.0;
        let mut shields: Vec<&mut StatusInstance> = self
            .0
            .iter_mut()
            .filter(|i| i.kind == StatusKind::Shield)
            .collect();
        shields.sort_by(|a, b| b.param("hp_pool").partial_cmp(&a.param("hp_pool")).unwrap());
        for shield in shields {
            if remaining <= 0.0 {
                break;
            }
            let pool = shield.param("hp_pool");
            let take = pool.min(remaining);
            shield.params.insert("hp_pool".to_string(), pool - take);
            remaining -= take;
            absorbed += take;
        }
        absorbed
    }

    /// Takes the max percentage across instances of `kind` (used for
    /// Slow/Fortify/Vulnerable-style "take max" semantics on refresh,
    /// here applied across however many independent sources exist).
    fn total_pct(&self, kind: StatusKind) -> f32 {
        self.0
            .iter()
            .filter(|i| i.kind == kind)
            .map(|i| i.param("pct"))
            .fold(0.0_f32, f32::max)
    }

    fn sum_pct(&self, kind: StatusKind) -> f32 {
        self.0.iter().filter(|i| i.kind == kind).map(|i| i.param("pct")).sum()
    }
}
