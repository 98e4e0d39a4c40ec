//! EffectManager - registry of live effects

use super::{Effect, EffectHooks, EffectId, EffectSignal, EffectState, EffectTag};
use crate::context::AbilityContext;
use crate::types::ActorId;
use serde::{Deserialize, Serialize};

/// Owner of every live effect in a session
#[derive(Debug, Clone, Default)]
pub struct EffectManager {
    effects: Vec<Effect>,
    next_id: u64,
}

/// Read-only view of a live effect, for display and snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSummary {
    pub id: EffectId,
    pub tag: EffectTag,
    pub owner: ActorId,
    pub victim: Option<ActorId>,
    pub elapsed: f64,
    /// `None` for unbounded effects
    pub remaining: Option<f64>,
    pub ticks: u32,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending effect, mark it running and run its `on_start`
    ///
    /// Does nothing and returns `None` if the owner is not alive. When
    /// `on_start` asks for destruction the effect is finished right away;
    /// the returned id is then no longer live.
    pub fn start(&mut self, effect: Effect, ctx: &mut AbilityContext) -> Option<EffectId> {
        if effect.state != EffectState::Pending {
            return None;
        }
        if !ctx.host.is_alive(effect.owner) {
            tracing::trace!(owner = %effect.owner, tag = ?effect.tag(), "effect not started, owner invalid");
            return None;
        }

        let id = self.register(effect);
        let signal = match self.find_mut(id) {
            Some(effect) => {
                effect.state = EffectState::Running;
                let this = effect.this();
                tracing::debug!(id = id.0, owner = %this.owner, tag = ?effect.tag(), "effect started");
                effect.kind.on_start(this, ctx)
            }
            None => EffectSignal::Continue,
        };

        if signal == EffectSignal::Destroy {
            self.destroy(id, ctx);
        }
        Some(id)
    }

    /// Add an effect to the live set without running any hook
    ///
    /// Callers are responsible for not registering duplicates.
    pub fn register(&mut self, mut effect: Effect) -> EffectId {
        self.next_id += 1;
        let id = EffectId(self.next_id);
        effect.id = id;
        self.effects.push(effect);
        id
    }

    /// Remove an effect from the live set without running any hook
    pub fn deregister(&mut self, id: EffectId) -> Option<Effect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Finish an effect: run `on_finish` once and deregister it
    ///
    /// Returns false when the effect was already finished or unknown.
    pub fn destroy(&mut self, id: EffectId, ctx: &mut AbilityContext) -> bool {
        let Some(effect) = self.find_mut(id) else {
            return false;
        };
        if effect.state == EffectState::Finished {
            return false;
        }

        effect.state = EffectState::Finished;
        let this = effect.this();
        effect.kind.on_finish(this, ctx);
        tracing::debug!(id = id.0, owner = %this.owner, tag = ?effect.tag(), elapsed = effect.elapsed, "effect finished");

        self.deregister(id);
        true
    }

    /// Advance every live effect by `delta`
    ///
    /// Iterates over a snapshot of ids, so effects removed while the pass is
    /// running are skipped and nothing is processed twice.
    pub fn tick(&mut self, delta: f64, ctx: &mut AbilityContext) {
        let ids: Vec<EffectId> = self.effects.iter().map(|e| e.id).collect();

        for id in ids {
            let signal = match self.find_mut(id) {
                Some(effect) if effect.is_running() => effect.advance(delta, ctx),
                _ => continue,
            };
            if signal == EffectSignal::Destroy {
                self.destroy(id, ctx);
            }
        }
    }

    /// Forward a due deferred action to the effect that scheduled it
    ///
    /// Returns false when the effect is gone or no longer running.
    pub fn fire_timer(&mut self, id: EffectId, ctx: &mut AbilityContext) -> bool {
        let signal = match self.find_mut(id) {
            Some(effect) if effect.is_running() => {
                let this = effect.this();
                effect.kind.on_timer(this, ctx)
            }
            _ => return false,
        };
        if signal == EffectSignal::Destroy {
            self.destroy(id, ctx);
        }
        true
    }

    /// Destroy every effect matching the predicate, returning how many finished
    pub fn destroy_where(
        &mut self,
        mut predicate: impl FnMut(&Effect) -> bool,
        ctx: &mut AbilityContext,
    ) -> usize {
        let ids: Vec<EffectId> = self.effects.iter().filter(|e| predicate(e)).map(|e| e.id).collect();
        ids.into_iter().filter(|id| self.destroy(*id, ctx)).count()
    }

    /// Destroy everything an actor owns
    pub fn destroy_owned_by(&mut self, owner: ActorId, ctx: &mut AbilityContext) -> usize {
        self.destroy_where(|e| e.owner == owner, ctx)
    }

    pub fn destroy_all(&mut self, ctx: &mut AbilityContext) -> usize {
        self.destroy_where(|_| true, ctx)
    }

    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.iter().find(|e| e.id == id)
    }

    fn find_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        self.effects.iter_mut().find(|e| e.id == id)
    }

    pub fn is_live(&self, id: EffectId) -> bool {
        self.get(id).is_some()
    }

    /// All live effects of one kind
    pub fn effects_of_kind(&self, tag: EffectTag) -> Vec<&Effect> {
        self.effects.iter().filter(|e| e.tag() == tag).collect()
    }

    /// All live effects owned by an actor
    pub fn effects_owned_by(&self, owner: ActorId) -> Vec<&Effect> {
        self.effects.iter().filter(|e| e.owner == owner).collect()
    }

    /// Whether `victim` already suffers an effect of this kind
    pub fn affects(&self, tag: EffectTag, victim: ActorId) -> bool {
        self.effects
            .iter()
            .any(|e| e.tag() == tag && e.victim() == Some(victim))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn summaries(&self) -> Vec<EffectSummary> {
        self.effects
            .iter()
            .map(|e| EffectSummary {
                id: e.id,
                tag: e.tag(),
                owner: e.owner,
                victim: e.victim(),
                elapsed: e.elapsed,
                remaining: e.remaining(),
                ticks: e.ticks,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::classes::test_support::{always, Harness};
    use crate::curve::LevelCurve;
    use crate::effect::{DisguiseEffect, Lifetime, PoisonEffect, UndeadAuraEffect};
    use crate::host::GameHost;
    use crate::types::{Team, Vec3};

    fn harness() -> (Harness, ActorId, ActorId) {
        let mut arena = Arena::new();
        arena.add_spawn_point(Team::CounterTerrorist, Vec3::new(900.0, 0.0, 0.0));
        let owner = arena.add_player(1, "owner", Team::Terrorist, Vec3::ZERO);
        let victim = arena.add_player(2, "victim", Team::CounterTerrorist, Vec3::new(10.0, 0.0, 0.0));
        (Harness::new(arena, always()), owner, victim)
    }

    fn poison(owner: ActorId, victim: ActorId) -> Effect {
        Effect::poison(owner, PoisonEffect::new(victim, 3), 5.0, 1.0)
    }

    #[test]
    fn test_poison_applies_five_ticks_then_finishes() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        assert!(h.arena.was_notified(victim, "[POISONED]"));
        assert_eq!(h.arena.particles().count(), 1);

        for _ in 0..4 {
            manager.tick(1.0, &mut h.ctx());
        }
        assert!(manager.is_live(id));
        assert_eq!(manager.get(id).unwrap().ticks(), 4);

        manager.tick(1.0, &mut h.ctx());
        assert!(!manager.is_live(id));
        assert_eq!(h.arena.health(victim), 85);
        assert_eq!(h.arena.damage_dealt(owner, victim), 15);
        assert_eq!(h.arena.particles().count(), 0);

        // Nothing ticks after finish
        manager.tick(1.0, &mut h.ctx());
        assert_eq!(h.arena.health(victim), 85);
    }

    #[test]
    fn test_poison_stops_when_victim_dies() {
        let (mut h, owner, victim) = harness();
        h.arena.player_mut(victim).unwrap().health = 9;
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        for _ in 0..3 {
            manager.tick(1.0, &mut h.ctx());
        }
        assert!(!h.arena.is_alive(victim));
        assert!(manager.is_live(id));

        manager.tick(1.0, &mut h.ctx());
        assert!(!manager.is_live(id));
        assert_eq!(h.arena.damage_log().len(), 3);
    }

    #[test]
    fn test_double_destroy_is_noop() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        assert!(manager.destroy(id, &mut h.ctx()));
        assert!(!manager.destroy(id, &mut h.ctx()));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_start_requires_live_owner() {
        let (mut h, owner, victim) = harness();
        h.arena.kill(owner);
        let mut manager = EffectManager::new();

        assert_eq!(manager.start(poison(owner, victim), &mut h.ctx()), None);
        assert!(manager.is_empty());
        assert!(h.arena.notices().is_empty());
    }

    #[test]
    fn test_start_hook_can_destroy() {
        let (mut h, owner, victim) = harness();
        h.arena.kill(victim);
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        assert!(!manager.is_live(id));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_unbounded_aura_ticks_until_destroyed() {
        let (mut h, owner, _) = harness();
        let mut manager = EffectManager::new();
        let aura = UndeadAuraEffect::new(LevelCurve::per_level(0.1), LevelCurve::per_level(0.1));

        let id = manager.start(Effect::undead_aura(owner, aura, 1.0), &mut h.ctx()).unwrap();
        for _ in 0..1000 {
            manager.tick(1.0, &mut h.ctx());
        }
        let effect = manager.get(id).unwrap();
        assert_eq!(effect.ticks(), 1000);
        assert_eq!(effect.remaining(), None);

        assert_eq!(manager.destroy_owned_by(owner, &mut h.ctx()), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_fractional_ticks_keep_cadence() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        for _ in 0..6 {
            manager.tick(0.25, &mut h.ctx());
        }
        // 1.5 seconds in: one tick, half way to the next
        assert_eq!(manager.get(id).unwrap().ticks(), 1);
        manager.tick(0.5, &mut h.ctx());
        assert_eq!(manager.get(id).unwrap().ticks(), 2);
    }

    #[test]
    fn test_coarse_frame_does_not_bank_ticks() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        let long = Effect::poison(owner, PoisonEffect::new(victim, 3), 10.0, 1.0);
        let id = manager.start(long, &mut h.ctx()).unwrap();

        manager.tick(3.0, &mut h.ctx());
        assert_eq!(h.arena.damage_dealt(owner, victim), 3);

        // Leftover time from the long frame is dropped
        manager.tick(0.01, &mut h.ctx());
        manager.tick(0.01, &mut h.ctx());
        assert_eq!(h.arena.damage_dealt(owner, victim), 3);
        assert_eq!(manager.get(id).unwrap().ticks(), 1);

        for _ in 0..4 {
            manager.tick(0.25, &mut h.ctx());
        }
        assert_eq!(manager.get(id).unwrap().ticks(), 2);
        assert_eq!(h.arena.health(victim), 94);
    }

    #[test]
    fn test_single_long_frame_expires_after_one_tick() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        let id = manager.start(poison(owner, victim), &mut h.ctx()).unwrap();
        manager.tick(5.0, &mut h.ctx());
        assert!(!manager.is_live(id));
        assert_eq!(h.arena.damage_dealt(owner, victim), 3);
    }

    #[test]
    fn test_disguise_timer_teleports_and_finish_restores() {
        let (mut h, owner, victim) = harness();
        h.arena.player_mut(victim).unwrap().model = "ctm_fbi".to_string();
        let mut manager = EffectManager::new();

        let disguise = Effect::disguise(owner, DisguiseEffect::new(6.0), Lifetime::Unbounded);
        let id = manager.start(disguise, &mut h.ctx()).unwrap();
        assert!(h.arena.was_notified(owner, "Fan of Knives! Teleport in 6 seconds."));

        let due = h.scheduler.advance(6.0);
        assert_eq!(due.len(), 1);
        assert!(manager.fire_timer(id, &mut h.ctx()));

        let player = h.arena.player(owner).unwrap();
        assert_eq!(player.model, "ctm_fbi");
        assert_eq!(player.position, Vec3::new(900.0, 0.0, 0.0));

        manager.destroy(id, &mut h.ctx());
        assert_eq!(h.arena.model(owner).unwrap(), h.arena.player(owner).unwrap().default_model);
        assert!(h.arena.was_notified(owner, "Your mole disguise has worn off."));
    }

    #[test]
    fn test_disguise_without_spawn_points_self_destructs() {
        let mut arena = Arena::new();
        let owner = arena.add_player(1, "owner", Team::Terrorist, Vec3::ZERO);
        let mut h = Harness::new(arena, always());
        let mut manager = EffectManager::new();

        let disguise = Effect::disguise(owner, DisguiseEffect::new(6.0), Lifetime::Unbounded);
        manager.start(disguise, &mut h.ctx());
        assert!(manager.is_empty());
        assert!(h.arena.was_notified(owner, "No valid spawn points found for enemy team."));
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_destroyed_disguise_cancels_teleport() {
        let (mut h, owner, _) = harness();
        let mut manager = EffectManager::new();

        let disguise = Effect::disguise(owner, DisguiseEffect::new(6.0), Lifetime::Unbounded);
        let id = manager.start(disguise, &mut h.ctx()).unwrap();
        manager.destroy(id, &mut h.ctx());

        assert_eq!(h.scheduler.pending(), 0);
        assert!(!manager.fire_timer(id, &mut h.ctx()));
        assert_eq!(h.arena.position(owner), Some(Vec3::ZERO));
        // Finish always restores the model and tells the owner
        assert_eq!(h.arena.model(owner).unwrap(), h.arena.player(owner).unwrap().default_model);
        assert!(h.arena.was_notified(owner, "Your mole disguise has worn off."));
    }

    #[test]
    fn test_queries() {
        let (mut h, owner, victim) = harness();
        let mut manager = EffectManager::new();

        manager.start(poison(owner, victim), &mut h.ctx());
        assert!(manager.affects(EffectTag::Poison, victim));
        assert!(!manager.affects(EffectTag::Poison, owner));
        assert_eq!(manager.effects_owned_by(owner).len(), 1);

        let summaries = manager.summaries();
        assert_eq!(summaries[0].victim, Some(victim));
        assert_eq!(summaries[0].remaining, Some(5.0));
    }
}
