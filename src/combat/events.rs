use hecs::Entity;

use crate::components::StatusKind;
use crate::utils::id::TagName;

/// Everything externally observable the executor and Combat Manager
/// produce (spec §6): renderers, UI, save systems, and the minigame/ML/
/// LLM collaborators subscribe to these instead of reading `World`
/// internals directly.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Matches spec.md §6's published event shape exactly
    /// (`DamageDealt { source, target, amount, damage_types }`);
    /// `was_critical` is an addition this crate's listeners find useful
    /// for crit-flash UI, not a spec deviation.
    DamageDealt {
        source: Entity,
        target: Entity,
        amount: f32,
        damage_types: Vec<TagName>,
        was_critical: bool,
    },
    Healed {
        source: Entity,
        target: Entity,
        amount: f32,
    },
    /// Matches spec.md §6's `StatusApplied { source, target, status_kind,
    /// duration, stacks }`.
    StatusApplied {
        source: Option<Entity>,
        target: Entity,
        status_kind: StatusKind,
        duration: f32,
        stacks: u32,
    },
    EntityDefeated {
        entity: Entity,
        killer: Option<Entity>,
    },
    Reflected {
        source: Entity,
        target: Entity,
        amount: f32,
    },
    KnockedBack {
        target: Entity,
        distance: f32,
    },
    Pulled {
        target: Entity,
        distance: f32,
    },
    /// A trigger tag (`on_hit`, `on_crit`, `on_kill`, ...) fired during
    /// an invocation. Equipment/skill-specific trigger *handlers* are an
    /// external responsibility (spec §6) — this crate only guarantees
    /// the signal fires at the right point in the pipeline.
    TriggerFired {
        trigger: TagName,
        source: Entity,
        target: Option<Entity>,
    },
}

/// Plain pub-sub fan-out, same shape as the teacher's `engine::event`
/// dispatch but generalized from a single save-system listener to any
/// number of subscribers. Listeners run synchronously on `publish` —
/// there is no queueing or async delivery here, matching the "no
/// suspension points" ordering guarantee (spec §5).
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn FnMut(&CombatEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CombatEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: CombatEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn publish_all(&mut self, events: impl IntoIterator<Item = CombatEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("listeners", &self.listeners.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    #[test]
    fn subscribed_listener_observes_published_events() {
        let mut world = World::new();
        let entity = world.spawn(());
        let mut bus = EventBus::new();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        bus.subscribe(move |event| seen_clone.borrow_mut().push(event.clone()));

        bus.publish(CombatEvent::DamageDealt {
            source: entity,
            target: entity,
            amount: 10.0,
            damage_types: Vec::new(),
            was_critical: false,
        });

        assert_eq!(seen.borrow().len(), 1);
    }
}
