//! Ability levels - per player, per class, per slot

use crate::types::{AbilitySlot, ActorId, ClassKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ability ranks owned by the progression system
///
/// The ability logic only reads these. Level 0 means the slot is locked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityLevels {
    levels: HashMap<ActorId, HashMap<ClassKind, [u32; AbilitySlot::COUNT]>>,
}

impl AbilityLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, actor: ActorId, class: ClassKind, slot: AbilitySlot) -> u32 {
        self.levels
            .get(&actor)
            .and_then(|classes| classes.get(&class))
            .and_then(|slots| slots.get(slot.index()))
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, actor: ActorId, class: ClassKind, slot: AbilitySlot, level: u32) {
        let slots = self
            .levels
            .entry(actor)
            .or_default()
            .entry(class)
            .or_insert([0; AbilitySlot::COUNT]);
        if let Some(entry) = slots.get_mut(slot.index()) {
            *entry = level;
        }
    }

    /// Set all four slots at once
    pub fn set_all(&mut self, actor: ActorId, class: ClassKind, levels: [u32; AbilitySlot::COUNT]) {
        self.levels.entry(actor).or_default().insert(class, levels);
    }

    /// Forget everything recorded for an actor
    pub fn remove_actor(&mut self, actor: ActorId) {
        self.levels.remove(&actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_level_is_locked() {
        let levels = AbilityLevels::new();
        assert_eq!(levels.get(ActorId(1), ClassKind::Warden, AbilitySlot::ULTIMATE), 0);
    }

    #[test]
    fn test_levels_are_per_class() {
        let mut levels = AbilityLevels::new();
        levels.set(ActorId(1), ClassKind::Warden, AbilitySlot::THIRD, 3);

        assert_eq!(levels.get(ActorId(1), ClassKind::Warden, AbilitySlot::THIRD), 3);
        assert_eq!(levels.get(ActorId(1), ClassKind::CryptLord, AbilitySlot::THIRD), 0);
    }

    #[test]
    fn test_set_all() {
        let mut levels = AbilityLevels::new();
        levels.set_all(ActorId(2), ClassKind::CryptLord, [1, 2, 3, 4]);
        assert_eq!(levels.get(ActorId(2), ClassKind::CryptLord, AbilitySlot::ULTIMATE), 4);

        levels.remove_actor(ActorId(2));
        assert_eq!(levels.get(ActorId(2), ClassKind::CryptLord, AbilitySlot::ULTIMATE), 0);
    }
}
