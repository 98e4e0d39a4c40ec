//! Game events delivered to class controllers

use crate::host::{DamageReport, GameHost};
use crate::types::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A discrete game event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PlayerSpawned { actor: ActorId },
    PlayerHurt(HurtEvent),
    PlayerDied {
        victim: ActorId,
        attacker: Option<ActorId>,
    },
    RoundStarted,
    RoundEnded,
}

/// Damage that has just been applied to a victim
///
/// Handlers may add bonus damage (attacker side) or ignore part of the
/// damage (victim side). The net adjustment is applied once every handler
/// has seen the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HurtEvent {
    pub victim: ActorId,
    pub attacker: Option<ActorId>,
    /// Health removed by the hit
    pub damage: i32,
    /// Victim health after the hit
    pub remaining_health: i32,
    #[serde(default)]
    pub bonus_damage: i32,
    #[serde(default)]
    pub ignored_damage: i32,
}

impl HurtEvent {
    pub fn new(victim: ActorId, attacker: Option<ActorId>, damage: i32, remaining_health: i32) -> Self {
        HurtEvent {
            victim,
            attacker,
            damage,
            remaining_health,
            bonus_damage: 0,
            ignored_damage: 0,
        }
    }

    pub fn add_bonus_damage(&mut self, amount: i32) {
        self.bonus_damage += amount.max(0);
    }

    /// Give back part of the damage, never more than was dealt
    pub fn ignore_damage(&mut self, amount: i32) {
        self.ignored_damage = (self.ignored_damage + amount.max(0)).min(self.damage);
    }

    /// Attacker, when it is someone other than the victim
    pub fn other_attacker(&self) -> Option<ActorId> {
        self.attacker.filter(|a| *a != self.victim)
    }

    /// Health change still to apply after handlers ran (negative = more damage)
    pub fn net_adjustment(&self) -> i32 {
        self.ignored_damage - self.bonus_damage
    }

    /// Whether the hit leaves the victim at or below zero health
    pub fn is_lethal(&self) -> bool {
        self.remaining_health <= 0
    }
}

/// Events raised while handling other events, processed FIFO by the session
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Damage `target` through the host and queue the resulting hurt/death events
    ///
    /// Dead targets and non-positive amounts are ignored.
    pub fn deal_damage(
        &mut self,
        host: &mut dyn GameHost,
        attacker: Option<ActorId>,
        target: ActorId,
        amount: i32,
    ) -> DamageReport {
        if amount <= 0 || !host.is_alive(target) {
            return DamageReport::default();
        }

        let report = host.apply_damage(target, amount, attacker);
        if report.dealt > 0 {
            self.push(GameEvent::PlayerHurt(HurtEvent::new(
                target,
                attacker,
                report.dealt,
                report.remaining_health,
            )));
        }
        if report.killed {
            self.push(GameEvent::PlayerDied {
                victim: target,
                attacker,
            });
        }
        report
    }
}
