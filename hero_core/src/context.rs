//! Shared state handed to effect hooks and class handlers

use crate::cooldown::CooldownBook;
use crate::events::EventQueue;
use crate::host::{DamageReport, GameHost, NoticeKind};
use crate::levels::AbilityLevels;
use crate::schedule::Scheduler;
use crate::types::{AbilitySlot, ActorId, ClassKind};
use rand::RngCore;

/// Everything a handler may read or mutate besides the effect registry
pub struct AbilityContext<'a> {
    pub host: &'a mut dyn GameHost,
    pub levels: &'a AbilityLevels,
    pub cooldowns: &'a mut CooldownBook,
    pub scheduler: &'a mut Scheduler,
    pub events: &'a mut EventQueue,
    pub rng: &'a mut dyn RngCore,
}

impl AbilityContext<'_> {
    pub fn level(&self, actor: ActorId, class: ClassKind, slot: AbilitySlot) -> u32 {
        self.levels.get(actor, class, slot)
    }

    pub fn is_alive(&self, actor: ActorId) -> bool {
        self.host.is_alive(actor)
    }

    pub fn name(&self, actor: ActorId) -> String {
        self.host.name(actor)
    }

    /// Damage through the host, queueing the follow-up hurt/death events
    pub fn deal_damage(&mut self, attacker: Option<ActorId>, target: ActorId, amount: i32) -> DamageReport {
        self.events.deal_damage(&mut *self.host, attacker, target, amount)
    }

    pub fn chat(&mut self, actor: ActorId, message: &str) {
        self.host.notify(actor, NoticeKind::Chat, message);
    }

    pub fn center(&mut self, actor: ActorId, message: &str) {
        self.host.notify(actor, NoticeKind::Center, message);
    }

    pub fn alert(&mut self, actor: ActorId, message: &str) {
        self.host.notify(actor, NoticeKind::Alert, message);
    }
}
