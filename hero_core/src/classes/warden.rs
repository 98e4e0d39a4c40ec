//! Warden - mole disguise, cloak, poison strikes and a once-per-round respawn

use super::{is_valid_victim, ClassTask, HeroClass};
use crate::config::{UltimateConfig, WardenConfig};
use crate::context::AbilityContext;
use crate::effect::{DisguiseEffect, Effect, EffectManager, EffectTag, Lifetime, PoisonEffect};
use crate::events::{GameEvent, HurtEvent};
use crate::schedule::{DeferredAction, TimerHandle};
use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind};

const FAN_OF_KNIVES: AbilitySlot = AbilitySlot::FIRST;
const CLOAK: AbilitySlot = AbilitySlot::SECOND;
const SHADOW_STRIKE: AbilitySlot = AbilitySlot::THIRD;
const VENGEANCE: AbilitySlot = AbilitySlot::ULTIMATE;

#[derive(Debug, Clone)]
pub struct Warden {
    actor: ActorId,
    config: WardenConfig,
    /// The next spawn is the Vengeance respawn
    vengeance_respawn: bool,
    saved_weapons: Vec<String>,
    respawn_timer: Option<TimerHandle>,
    restore_timer: Option<TimerHandle>,
}

impl Warden {
    pub fn new(actor: ActorId, config: WardenConfig) -> Self {
        Warden {
            actor,
            config,
            vengeance_respawn: false,
            saved_weapons: Vec::new(),
            respawn_timer: None,
            restore_timer: None,
        }
    }

    /// Weapons saved on the last lethal hit
    pub fn saved_weapons(&self) -> &[String] {
        &self.saved_weapons
    }

    /// Pending Vengeance respawn, if any
    pub fn respawn_timer(&self) -> Option<TimerHandle> {
        self.respawn_timer
    }

    fn level(&self, ctx: &AbilityContext, slot: AbilitySlot) -> u32 {
        ctx.level(self.actor, ClassKind::Warden, slot)
    }

    fn schedule(&self, delay: f64, task: ClassTask, ctx: &mut AbilityContext) -> TimerHandle {
        ctx.scheduler.schedule(delay, DeferredAction::Class { actor: self.actor, task })
    }

    fn cancel_timers(&mut self, ctx: &mut AbilityContext) {
        for handle in [self.respawn_timer.take(), self.restore_timer.take()].into_iter().flatten() {
            ctx.scheduler.cancel(handle);
        }
    }

    /// Warden's Cloak: blunt and mirror hits from behind
    fn cloak(&self, hurt: &mut HurtEvent, attacker: ActorId, ctx: &mut AbilityContext) {
        let level = self.level(ctx, CLOAK);
        if level == 0 {
            return;
        }
        let (Some(attacker_yaw), Some(victim_yaw)) = (ctx.host.yaw(attacker), ctx.host.yaw(self.actor)) else {
            return;
        };
        if (attacker_yaw - victim_yaw).abs() > self.config.cloak_angle {
            return;
        }

        let reduction = self.config.cloak_reduction.at(level);
        let reflect = self.config.cloak_reflect.at(level);
        let reduced = (hurt.damage as f64 * (1.0 - reduction)).floor() as i32;
        let reflected = (hurt.damage as f64 * reflect).floor() as i32;

        hurt.ignore_damage(hurt.damage - reduced);
        if reflected > 0 {
            ctx.deal_damage(Some(self.actor), attacker, reflected);
        }

        let me = ctx.name(self.actor);
        ctx.chat(
            self.actor,
            &format!(
                "Warden's Cloak reduced damage by {:.0}% and reflected {reflected} damage!",
                reduction * 100.0
            ),
        );
        ctx.chat(attacker, &format!("Your attack was partially reflected by {me}'s Warden's Cloak!"));
    }
}

impl HeroClass for Warden {
    fn kind(&self) -> ClassKind {
        ClassKind::Warden
    }

    fn actor(&self) -> ActorId {
        self.actor
    }

    fn abilities(&self) -> Vec<AbilityInfo> {
        vec![
            AbilityInfo::new("Fan of Knives", "Chance to disguise as an enemy and infiltrate their team."),
            AbilityInfo::new("Warden's Cloak", "Reduces damage and reflects it when attacked from behind."),
            AbilityInfo::new("Shadow Strike", "Chance to poison enemies, dealing damage over time."),
            AbilityInfo::new("Ultimate: Vengeance", "Respawn once per round with your weapons."),
        ]
    }

    fn ultimate(&self) -> &UltimateConfig {
        &self.config.ultimate
    }

    /// Fan of Knives
    fn on_spawn(&mut self, effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if !ctx.is_alive(self.actor) {
            return;
        }
        if std::mem::take(&mut self.vengeance_respawn) {
            return;
        }

        let level = self.level(ctx, FAN_OF_KNIVES);
        if !self.config.fan_of_knives_chance.roll(level, &mut *ctx.rng) {
            return;
        }
        let actor = self.actor;
        if effects.effects_owned_by(actor).iter().any(|e| e.tag() == EffectTag::Disguise) {
            return;
        }
        let disguise = DisguiseEffect::new(self.config.disguise_delay);
        let lifetime = Lifetime::from_option(self.config.disguise_duration);
        effects.start(Effect::disguise(actor, disguise, lifetime), ctx);
    }

    fn on_hurt(&mut self, hurt: &mut HurtEvent, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if hurt.victim != self.actor {
            return;
        }
        if hurt.is_lethal() {
            self.saved_weapons = ctx.host.weapons(self.actor);
            tracing::trace!(actor = %self.actor, weapons = self.saved_weapons.len(), "saved weapons");
        }
        if !ctx.is_alive(self.actor) {
            return;
        }
        if let Some(attacker) = hurt.other_attacker().filter(|a| ctx.is_alive(*a)) {
            self.cloak(hurt, attacker, ctx);
        }
    }

    /// Shadow Strike
    fn on_hurt_other(&mut self, hurt: &mut HurtEvent, effects: &mut EffectManager, ctx: &mut AbilityContext) {
        let victim = hurt.victim;
        if !is_valid_victim(self.actor, victim, ctx) {
            return;
        }
        let level = self.level(ctx, SHADOW_STRIKE);
        if !self.config.shadow_strike_chance.roll(level, &mut *ctx.rng) {
            return;
        }
        if effects.affects(EffectTag::Poison, victim) {
            return;
        }

        let poison = PoisonEffect::new(victim, self.config.poison_damage);
        let effect = Effect::poison(self.actor, poison, self.config.poison_duration, self.config.poison_interval);
        if effects.start(effect, ctx).is_none() {
            return;
        }
        let (me, them) = (ctx.name(self.actor), ctx.name(victim));
        ctx.chat(self.actor, &format!("You poisoned {them} with Shadow Strike!"));
        ctx.chat(victim, &format!("{me} poisoned you with Shadow Strike!"));
    }

    /// Vengeance
    fn on_death(&mut self, _attacker: Option<ActorId>, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if self.level(ctx, VENGEANCE) == 0 || !ctx.cooldowns.is_ready(self.actor, VENGEANCE) {
            return;
        }
        ctx.cooldowns.start(self.actor, VENGEANCE, Some(f64::INFINITY));
        self.vengeance_respawn = true;

        let message = format!(
            "Vengeance activated! Respawning in {:.0} seconds...",
            self.config.vengeance_delay
        );
        ctx.center(self.actor, &message);
        self.respawn_timer = Some(self.schedule(self.config.vengeance_delay, ClassTask::VengeanceRespawn, ctx));
    }

    fn on_round_start(&mut self, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {
        self.vengeance_respawn = false;
        self.saved_weapons.clear();
    }

    fn on_round_end(&mut self, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        self.cancel_timers(ctx);
    }

    fn on_class_change(&mut self, ctx: &mut AbilityContext) {
        self.cancel_timers(ctx);
    }

    fn on_task(&mut self, task: &ClassTask, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        match task {
            ClassTask::VengeanceRespawn => {
                self.respawn_timer = None;
                if ctx.is_alive(self.actor) || ctx.host.team(self.actor).is_none() {
                    return;
                }
                ctx.host.respawn(self.actor);
                ctx.events.push(GameEvent::PlayerSpawned { actor: self.actor });
                self.restore_timer = Some(self.schedule(self.config.restore_weapons_delay, ClassTask::RestoreWeapons, ctx));
                ctx.center(self.actor, "You have returned with Vengeance!");
            }
            ClassTask::RestoreWeapons => {
                self.restore_timer = None;
                if !ctx.is_alive(self.actor) {
                    return;
                }
                for weapon in std::mem::take(&mut self.saved_weapons) {
                    ctx.host.give_weapon(self.actor, &weapon);
                }
            }
            ClassTask::DeathExplosion { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::classes::test_support::{always, never, Harness};
    use crate::cooldown::CooldownTracker;
    use crate::host::GameHost;
    use crate::types::{Team, Vec3};
    use rand::rngs::mock::StepRng;

    fn setup(rng: StepRng) -> (Harness, ActorId, ActorId, Warden) {
        let mut arena = Arena::new();
        arena.add_spawn_point(Team::CounterTerrorist, Vec3::new(900.0, 0.0, 0.0));
        arena.add_spawn_point(Team::Terrorist, Vec3::new(-900.0, 0.0, 0.0));
        let warden = arena.add_player(1, "warden", Team::Terrorist, Vec3::ZERO);
        let enemy = arena.add_player(2, "enemy", Team::CounterTerrorist, Vec3::new(50.0, 0.0, 0.0));
        let mut harness = Harness::new(arena, rng);
        let class = Warden::new(warden, WardenConfig::default());
        harness
            .cooldowns
            .install(warden, CooldownTracker::with_defaults(class.cooldown_defaults()));
        (harness, warden, enemy, class)
    }

    #[test]
    fn test_cloak_reduces_and_reflects_from_behind() {
        let (mut h, warden, enemy, mut class) = setup(never());
        h.levels.set(warden, ClassKind::Warden, CLOAK, 2);
        h.arena.player_mut(warden).unwrap().yaw = 90.0;
        h.arena.player_mut(enemy).unwrap().yaw = 60.0;
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(warden, Some(enemy), 50, 50);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());

        // 20% reduction keeps 40 of 50; 6% reflect is 3
        assert_eq!(hurt.ignored_damage, 10);
        assert_eq!(h.arena.health(enemy), 97);
        assert!(h.arena.was_notified(warden, "Warden's Cloak reduced damage by 20% and reflected 3 damage!"));
        assert!(h.arena.was_notified(enemy, "Your attack was partially reflected by warden's Warden's Cloak!"));
    }

    #[test]
    fn test_cloak_ignores_frontal_hits() {
        let (mut h, warden, enemy, mut class) = setup(never());
        h.levels.set(warden, ClassKind::Warden, CLOAK, 5);
        h.arena.player_mut(warden).unwrap().yaw = 0.0;
        h.arena.player_mut(enemy).unwrap().yaw = 180.0;
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(warden, Some(enemy), 50, 50);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());
        assert_eq!(hurt.ignored_damage, 0);
        assert_eq!(h.arena.health(enemy), 100);
    }

    #[test]
    fn test_lethal_hit_saves_weapons() {
        let (mut h, warden, enemy, mut class) = setup(never());
        h.arena.player_mut(warden).unwrap().weapons.push("weapon_ak47".to_string());
        h.arena.kill(warden);
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(warden, Some(enemy), 100, 0);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());
        assert_eq!(class.saved_weapons(), ["weapon_knife", "weapon_glock", "weapon_ak47"]);
    }

    #[test]
    fn test_shadow_strike_does_not_stack() {
        let (mut h, warden, enemy, mut class) = setup(always());
        h.levels.set(warden, ClassKind::Warden, SHADOW_STRIKE, 1);
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(enemy, Some(warden), 10, 90);
        class.on_hurt_other(&mut hurt, &mut effects, &mut h.ctx());
        class.on_hurt_other(&mut hurt, &mut effects, &mut h.ctx());

        assert_eq!(effects.effects_of_kind(EffectTag::Poison).len(), 1);
        assert!(effects.affects(EffectTag::Poison, enemy));
        assert!(h.arena.was_notified(enemy, "[POISONED]"));
        assert!(h.arena.was_notified(warden, "You poisoned enemy with Shadow Strike!"));
    }

    #[test]
    fn test_fan_of_knives_starts_one_disguise() {
        let (mut h, warden, _, mut class) = setup(always());
        h.levels.set(warden, ClassKind::Warden, FAN_OF_KNIVES, 1);
        let mut effects = EffectManager::new();

        class.on_spawn(&mut effects, &mut h.ctx());
        class.on_spawn(&mut effects, &mut h.ctx());

        assert_eq!(effects.effects_of_kind(EffectTag::Disguise).len(), 1);
        assert!(h.arena.was_notified(warden, "Fan of Knives! Teleport in 6 seconds."));
        assert_eq!(h.scheduler.pending(), 1);
    }

    #[test]
    fn test_vengeance_once_per_round() {
        let (mut h, warden, _, mut class) = setup(never());
        h.levels.set(warden, ClassKind::Warden, VENGEANCE, 1);
        let mut effects = EffectManager::new();
        h.arena.kill(warden);

        class.on_death(None, &mut effects, &mut h.ctx());
        assert!(class.respawn_timer().is_some());
        assert!(!h.cooldowns.is_ready(warden, VENGEANCE));
        assert!(h.arena.was_notified(warden, "Vengeance activated! Respawning in 5 seconds..."));

        // A second death in the same round does nothing
        class.on_death(None, &mut effects, &mut h.ctx());
        assert_eq!(h.scheduler.pending(), 1);
    }

    #[test]
    fn test_vengeance_respawn_and_weapon_restore() {
        let (mut h, warden, enemy, mut class) = setup(never());
        h.levels.set(warden, ClassKind::Warden, VENGEANCE, 1);
        h.arena.player_mut(warden).unwrap().weapons.push("weapon_awp".to_string());
        let mut effects = EffectManager::new();

        h.arena.apply_damage(warden, 100, Some(enemy));
        let mut hurt = HurtEvent::new(warden, Some(enemy), 100, 0);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());
        class.on_death(Some(enemy), &mut effects, &mut h.ctx());

        class.on_task(&ClassTask::VengeanceRespawn, &mut effects, &mut h.ctx());
        assert!(h.arena.is_alive(warden));
        assert_eq!(h.arena.weapons(warden), ["weapon_knife"]);
        assert_eq!(h.events.pop(), Some(GameEvent::PlayerSpawned { actor: warden }));

        class.on_task(&ClassTask::RestoreWeapons, &mut effects, &mut h.ctx());
        assert_eq!(h.arena.weapons(warden), ["weapon_knife", "weapon_glock", "weapon_awp"]);
    }

    #[test]
    fn test_respawn_skipped_when_already_alive() {
        let (mut h, warden, _, mut class) = setup(never());
        let mut effects = EffectManager::new();

        class.on_task(&ClassTask::VengeanceRespawn, &mut effects, &mut h.ctx());
        assert_eq!(h.arena.player(warden).unwrap().respawn_count, 0);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_round_end_cancels_timers() {
        let (mut h, warden, _, mut class) = setup(never());
        h.levels.set(warden, ClassKind::Warden, VENGEANCE, 1);
        let mut effects = EffectManager::new();
        h.arena.kill(warden);

        class.on_death(None, &mut effects, &mut h.ctx());
        class.on_round_end(&mut effects, &mut h.ctx());
        assert_eq!(h.scheduler.pending(), 0);
        assert!(class.respawn_timer().is_none());
    }
}
