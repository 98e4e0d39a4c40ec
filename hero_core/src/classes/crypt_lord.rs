//! Crypt Lord - impale, carapace armor and reflection, bonus damage, locust swarm

use super::{is_valid_victim, living_enemies, start_fallback_cooldown, HeroClass, UltimateOutcome};
use crate::config::{CryptLordConfig, UltimateConfig};
use crate::context::AbilityContext;
use crate::effect::EffectManager;
use crate::events::HurtEvent;
use crate::transfer::{grant, steal, transfer};
use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

const IMPALE: AbilitySlot = AbilitySlot::FIRST;
const CARAPACE: AbilitySlot = AbilitySlot::SECOND;
const BEETLES: AbilitySlot = AbilitySlot::THIRD;

#[derive(Debug, Clone)]
pub struct CryptLord {
    actor: ActorId,
    config: CryptLordConfig,
}

impl CryptLord {
    pub fn new(actor: ActorId, config: CryptLordConfig) -> Self {
        CryptLord { actor, config }
    }

    fn level(&self, ctx: &AbilityContext, slot: AbilitySlot) -> u32 {
        ctx.level(self.actor, ClassKind::CryptLord, slot)
    }

    /// Carapace spawn armor, which is also the armor cap for the swarm
    fn carapace_armor(&self, ctx: &AbilityContext) -> i32 {
        let level = self.level(ctx, CARAPACE).max(1);
        self.config.carapace_armor.at(level) as i32
    }

    /// Armor roll range, ordered so an inverted config never yields an empty range
    fn swarm_armor_bounds(&self) -> std::ops::RangeInclusive<i32> {
        let (a, b) = (self.config.swarm_armor_min, self.config.swarm_armor_max);
        a.min(b)..=a.max(b)
    }

    fn impale(&self, victim: ActorId, ctx: &mut AbilityContext) {
        let level = self.level(ctx, IMPALE);
        if !self.config.impale_chance.roll(level, &mut *ctx.rng) {
            return;
        }
        ctx.host.add_velocity(victim, Vec3::new(0.0, 0.0, self.config.impale_impulse));

        let (me, them) = (ctx.name(self.actor), ctx.name(victim));
        ctx.chat(self.actor, &format!("You impaled {them}!"));
        ctx.chat(victim, &format!("You were impaled by {me}!"));
    }

    fn carrion_beetles(&self, hurt: &mut HurtEvent, ctx: &mut AbilityContext) {
        let level = self.level(ctx, BEETLES);
        if !self.config.beetles_chance.roll(level, &mut *ctx.rng) {
            return;
        }
        hurt.add_bonus_damage(self.config.beetles_damage.at(level) as i32);

        let (me, them) = (ctx.name(self.actor), ctx.name(hurt.victim));
        ctx.chat(self.actor, &format!("Your Carrion Beetles dealt bonus damage to {them}!"));
        ctx.chat(hurt.victim, &format!("{me}'s Carrion Beetles dealt bonus damage to you!"));
    }
}

impl HeroClass for CryptLord {
    fn kind(&self) -> ClassKind {
        ClassKind::CryptLord
    }

    fn actor(&self) -> ActorId {
        self.actor
    }

    fn abilities(&self) -> Vec<AbilityInfo> {
        vec![
            AbilityInfo::new("Impale", "Your attacks may launch enemies into the air."),
            AbilityInfo::new("Spiked Carapace", "Start with extra armor and occasionally reflect damage."),
            AbilityInfo::new("Carrion Beetles", "Your attacks have a chance to inflict bonus damage."),
            AbilityInfo::new(
                "Ultimate: Locust Swarm",
                "Summon locusts that steal health and armor from a nearby enemy.",
            )
            .with_cooldown(self.config.ultimate.cooldown),
        ]
    }

    fn ultimate(&self) -> &UltimateConfig {
        &self.config.ultimate
    }

    fn on_spawn(&mut self, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if !ctx.is_alive(self.actor) || self.level(ctx, CARAPACE) == 0 {
            return;
        }
        let armor = self.carapace_armor(ctx);
        ctx.host.set_armor(self.actor, armor);
    }

    fn on_hurt_other(&mut self, hurt: &mut HurtEvent, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if !is_valid_victim(self.actor, hurt.victim, ctx) {
            return;
        }
        self.impale(hurt.victim, ctx);
        self.carrion_beetles(hurt, ctx);
    }

    fn on_hurt(&mut self, hurt: &mut HurtEvent, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if hurt.victim != self.actor || !ctx.is_alive(self.actor) {
            return;
        }
        let level = self.level(ctx, CARAPACE);
        if level == 0 {
            return;
        }
        let Some(attacker) = hurt.other_attacker().filter(|a| ctx.is_alive(*a)) else {
            return;
        };
        if !self.config.mirror_chance.roll(level, &mut *ctx.rng) {
            return;
        }

        let reflected = (hurt.damage as f64 * self.config.mirror_fraction.at(level)).floor() as i32;
        if reflected > 0 {
            ctx.deal_damage(Some(self.actor), attacker, reflected);
        }

        let me = ctx.name(self.actor);
        ctx.chat(self.actor, "Your Spiked Carapace reflected some of the damage!");
        ctx.chat(attacker, &format!("{me}'s Spiked Carapace reflected damage to you!"));
    }

    /// Locust Swarm: drain health and armor from a random enemy in range
    fn activate_ultimate(&mut self, _effects: &mut EffectManager, ctx: &mut AbilityContext) -> UltimateOutcome {
        let Some(eye) = ctx.host.eye_position(self.actor) else {
            return UltimateOutcome::Dead;
        };
        let range = self.config.swarm_range;
        let in_range: Vec<ActorId> = living_enemies(self.actor, ctx)
            .into_iter()
            .filter(|e| ctx.host.eye_position(*e).is_some_and(|p| p.distance(eye) <= range))
            .collect();

        let Some(target) = in_range.choose(&mut *ctx.rng).copied() else {
            ctx.chat(self.actor, "No enemies in range for the Locust Swarm!");
            start_fallback_cooldown(&self.config.ultimate, self.actor, ctx);
            return UltimateOutcome::NoTarget;
        };

        let armor_roll = ctx.rng.gen_range(self.swarm_armor_bounds());
        let target_armor = ctx.host.armor(target);
        let stolen_armor = steal(armor_roll, target_armor);
        let health = transfer(
            self.config.swarm_health,
            ctx.host.health(target),
            ctx.host.health(self.actor),
            ctx.host.max_health(self.actor),
        );
        let stolen_health = health.taken;

        ctx.deal_damage(Some(self.actor), target, stolen_health);
        ctx.host.set_armor(target, target_armor - stolen_armor);

        ctx.host.set_health(self.actor, health.destination_after);
        let armor = grant(ctx.host.armor(self.actor), stolen_armor, self.carapace_armor(ctx));
        ctx.host.set_armor(self.actor, armor);

        tracing::debug!(caster = %self.actor, %target, stolen_health, stolen_armor, "locust swarm");
        let (me, them) = (ctx.name(self.actor), ctx.name(target));
        ctx.chat(
            self.actor,
            &format!("Locust Swarm stole {stolen_health} health and {stolen_armor} armor from {them}!"),
        );
        ctx.chat(
            target,
            &format!("You lost {stolen_health} health and {stolen_armor} armor to {me}'s Locust Swarm!"),
        );

        ctx.cooldowns.start(self.actor, AbilitySlot::ULTIMATE, None);
        UltimateOutcome::Activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::classes::test_support::{always, never, Harness};
    use crate::cooldown::CooldownTracker;
    use crate::events::GameEvent;
    use crate::host::GameHost;
    use crate::types::Team;

    fn setup(rng: rand::rngs::mock::StepRng) -> (Harness, ActorId, ActorId, CryptLord) {
        let mut arena = Arena::new();
        let lord = arena.add_player(1, "lord", Team::Terrorist, Vec3::ZERO);
        let enemy = arena.add_player(2, "enemy", Team::CounterTerrorist, Vec3::new(100.0, 0.0, 0.0));
        let mut harness = Harness::new(arena, rng);
        let class = CryptLord::new(lord, CryptLordConfig::default());
        harness
            .cooldowns
            .install(lord, CooldownTracker::with_defaults(class.cooldown_defaults()));
        (harness, lord, enemy, class)
    }

    #[test]
    fn test_spawn_armor_by_carapace_level() {
        let (mut h, lord, _, mut class) = setup(never());
        let mut effects = EffectManager::new();

        class.on_spawn(&mut effects, &mut h.ctx());
        assert_eq!(h.arena.armor(lord), 0);

        h.levels.set(lord, ClassKind::CryptLord, CARAPACE, 3);
        class.on_spawn(&mut effects, &mut h.ctx());
        assert_eq!(h.arena.armor(lord), 150);
    }

    #[test]
    fn test_impale_and_beetles_on_hit() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.levels.set(lord, ClassKind::CryptLord, IMPALE, 1);
        h.levels.set(lord, ClassKind::CryptLord, BEETLES, 2);
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(enemy, Some(lord), 10, 90);
        class.on_hurt_other(&mut hurt, &mut effects, &mut h.ctx());

        assert_eq!(h.arena.player(enemy).unwrap().velocity.z, 500.0);
        assert_eq!(hurt.bonus_damage, 6);
        assert!(h.arena.was_notified(lord, "You impaled enemy!"));
        assert!(h.arena.was_notified(enemy, "You were impaled by lord!"));
    }

    #[test]
    fn test_no_procs_without_levels() {
        let (mut h, lord, enemy, mut class) = setup(always());
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(enemy, Some(lord), 10, 90);
        class.on_hurt_other(&mut hurt, &mut effects, &mut h.ctx());

        assert_eq!(h.arena.player(enemy).unwrap().velocity, Vec3::ZERO);
        assert_eq!(hurt.bonus_damage, 0);
        assert!(h.arena.notices().is_empty());
    }

    #[test]
    fn test_carapace_reflects_floor_of_fraction() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.levels.set(lord, ClassKind::CryptLord, CARAPACE, 1);
        let mut effects = EffectManager::new();

        // 10% of 47 is 4.7, floored to 4
        let mut hurt = HurtEvent::new(lord, Some(enemy), 47, 53);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());

        assert_eq!(h.arena.health(enemy), 96);
        assert_eq!(
            h.events.pop(),
            Some(GameEvent::PlayerHurt(HurtEvent::new(enemy, Some(lord), 4, 96)))
        );
    }

    #[test]
    fn test_carapace_ignores_self_damage() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.levels.set(lord, ClassKind::CryptLord, CARAPACE, 5);
        let mut effects = EffectManager::new();

        let mut hurt = HurtEvent::new(lord, Some(lord), 50, 50);
        class.on_hurt(&mut hurt, &mut effects, &mut h.ctx());
        assert_eq!(h.arena.health(enemy), 100);
        assert!(h.events.is_empty());
    }

    #[test]
    fn test_swarm_steals_clamped_to_target() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.levels.set(lord, ClassKind::CryptLord, AbilitySlot::ULTIMATE, 1);
        h.arena.player_mut(enemy).unwrap().health = 10;
        h.arena.player_mut(enemy).unwrap().armor = 5;
        h.arena.player_mut(lord).unwrap().health = 50;
        let mut effects = EffectManager::new();

        let outcome = class.activate_ultimate(&mut effects, &mut h.ctx());

        assert_eq!(outcome, UltimateOutcome::Activated);
        assert_eq!(h.arena.health(enemy), 0);
        assert_eq!(h.arena.armor(enemy), 0);
        assert_eq!(h.arena.health(lord), 60);
        assert_eq!(h.arena.armor(lord), 5);
        assert!(h.arena.was_notified(lord, "stole 10 health and 5 armor"));
        assert!((h.cooldowns.remaining(lord, AbilitySlot::ULTIMATE) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_swarm_caps_caster_at_maximums() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.levels.set(lord, ClassKind::CryptLord, AbilitySlot::ULTIMATE, 1);
        h.arena.player_mut(enemy).unwrap().armor = 100;
        h.arena.player_mut(lord).unwrap().health = 90;
        h.arena.player_mut(lord).unwrap().armor = 95;
        let mut effects = EffectManager::new();

        class.activate_ultimate(&mut effects, &mut h.ctx());

        // Armor roll with a zero draw is the minimum, 10
        assert_eq!(h.arena.armor(enemy), 90);
        assert_eq!(h.arena.health(enemy), 75);
        assert_eq!(h.arena.health(lord), 100);
        assert_eq!(h.arena.armor(lord), 100);
    }

    #[test]
    fn test_swarm_with_inverted_armor_bounds() {
        let mut arena = Arena::new();
        let lord = arena.add_player(1, "lord", Team::Terrorist, Vec3::ZERO);
        let enemy = arena.add_player(2, "enemy", Team::CounterTerrorist, Vec3::new(100.0, 0.0, 0.0));
        arena.player_mut(enemy).unwrap().armor = 100;
        let mut h = Harness::new(arena, always());
        let mut config = CryptLordConfig::default();
        config.swarm_armor_min = 30;
        config.swarm_armor_max = 10;
        let mut class = CryptLord::new(lord, config);
        h.cooldowns
            .install(lord, CooldownTracker::with_defaults(class.cooldown_defaults()));
        h.levels.set(lord, ClassKind::CryptLord, AbilitySlot::ULTIMATE, 1);
        let mut effects = EffectManager::new();

        let outcome = class.activate_ultimate(&mut effects, &mut h.ctx());

        assert_eq!(outcome, UltimateOutcome::Activated);
        // Zero draw lands on the lower bound, 10
        assert_eq!(h.arena.armor(enemy), 90);
    }

    #[test]
    fn test_swarm_without_enemies_uses_fallback() {
        let (mut h, lord, enemy, mut class) = setup(always());
        h.arena.player_mut(enemy).unwrap().position = Vec3::new(5000.0, 0.0, 0.0);
        let mut effects = EffectManager::new();

        let outcome = class.activate_ultimate(&mut effects, &mut h.ctx());

        assert_eq!(outcome, UltimateOutcome::NoTarget);
        assert!(h.arena.was_notified(lord, "No enemies in range for the Locust Swarm!"));
        assert!((h.cooldowns.remaining(lord, AbilitySlot::ULTIMATE) - 5.0).abs() < 1e-9);
        assert_eq!(h.arena.health(enemy), 100);
    }

    #[test]
    fn test_abilities_listed_in_slot_order() {
        let class = CryptLord::new(ActorId(1), CryptLordConfig::default());
        let abilities = class.abilities();
        assert_eq!(abilities.len(), 4);
        assert_eq!(abilities[0].name, "Impale");
        assert_eq!(abilities[3].cooldown, Some(40.0));
    }
}
