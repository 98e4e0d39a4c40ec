//! Ability cooldowns - per actor, per slot

use crate::types::{AbilitySlot, ActorId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cooldown state for one actor's ability slots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownTracker {
    /// Seconds remaining per slot
    remaining: [f64; AbilitySlot::COUNT],
    /// Default cooldown length per slot
    defaults: [f64; AbilitySlot::COUNT],
}

impl CooldownTracker {
    /// Create a tracker with no default cooldowns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with the given default cooldown per slot
    pub fn with_defaults(defaults: [f64; AbilitySlot::COUNT]) -> Self {
        CooldownTracker {
            remaining: [0.0; AbilitySlot::COUNT],
            defaults: defaults.map(|d| d.max(0.0)),
        }
    }

    /// Set the default cooldown of a slot
    pub fn set_default(&mut self, slot: AbilitySlot, seconds: f64) {
        if let Some(default) = self.defaults.get_mut(slot.index()) {
            *default = seconds.max(0.0);
        }
    }

    pub fn default_for(&self, slot: AbilitySlot) -> f64 {
        self.defaults.get(slot.index()).copied().unwrap_or(0.0)
    }

    /// Whether the slot can be used
    pub fn is_ready(&self, slot: AbilitySlot) -> bool {
        self.remaining(slot) <= 0.0
    }

    /// Seconds until the slot is ready
    pub fn remaining(&self, slot: AbilitySlot) -> f64 {
        self.remaining.get(slot.index()).copied().unwrap_or(0.0)
    }

    /// Put a slot on cooldown
    ///
    /// Uses `override_seconds` when given, otherwise the slot default.
    /// Restarting an active cooldown replaces the remaining time.
    pub fn start(&mut self, slot: AbilitySlot, override_seconds: Option<f64>) {
        let length = override_seconds.unwrap_or_else(|| self.default_for(slot));
        if let Some(remaining) = self.remaining.get_mut(slot.index()) {
            *remaining = length.max(0.0);
        }
    }

    /// Count all running cooldowns down, floored at zero
    pub fn tick(&mut self, delta: f64) {
        if delta <= 0.0 {
            return;
        }
        for remaining in self.remaining.iter_mut().filter(|r| **r > 0.0) {
            *remaining = (*remaining - delta).max(0.0);
        }
    }

    /// Force a slot to ready
    pub fn reset(&mut self, slot: AbilitySlot) {
        if let Some(remaining) = self.remaining.get_mut(slot.index()) {
            *remaining = 0.0;
        }
    }

    /// Force every slot to ready
    pub fn reset_all(&mut self) {
        self.remaining = [0.0; AbilitySlot::COUNT];
    }
}

/// Cooldown trackers for every actor in a session
#[derive(Debug, Clone, Default)]
pub struct CooldownBook {
    trackers: HashMap<ActorId, CooldownTracker>,
}

impl CooldownBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh tracker for an actor, replacing any previous one
    pub fn install(&mut self, actor: ActorId, tracker: CooldownTracker) {
        self.trackers.insert(actor, tracker);
    }

    pub fn remove(&mut self, actor: ActorId) -> Option<CooldownTracker> {
        self.trackers.remove(&actor)
    }

    pub fn get(&self, actor: ActorId) -> Option<&CooldownTracker> {
        self.trackers.get(&actor)
    }

    /// Tracker for an actor, created empty if missing
    pub fn tracker_mut(&mut self, actor: ActorId) -> &mut CooldownTracker {
        self.trackers.entry(actor).or_default()
    }

    /// Unknown actors have nothing on cooldown
    pub fn is_ready(&self, actor: ActorId, slot: AbilitySlot) -> bool {
        self.get(actor).map(|t| t.is_ready(slot)).unwrap_or(true)
    }

    pub fn remaining(&self, actor: ActorId, slot: AbilitySlot) -> f64 {
        self.get(actor).map(|t| t.remaining(slot)).unwrap_or(0.0)
    }

    pub fn start(&mut self, actor: ActorId, slot: AbilitySlot, override_seconds: Option<f64>) {
        self.tracker_mut(actor).start(slot, override_seconds);
    }

    pub fn reset(&mut self, actor: ActorId, slot: AbilitySlot) {
        if let Some(tracker) = self.trackers.get_mut(&actor) {
            tracker.reset(slot);
        }
    }

    pub fn tick(&mut self, delta: f64) {
        for tracker in self.trackers.values_mut() {
            tracker.tick(delta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, &CooldownTracker)> {
        self.trackers.iter()
    }

    pub fn clear(&mut self) {
        self.trackers.clear();
    }
}
