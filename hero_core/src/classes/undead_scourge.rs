//! Undead Scourge - life drain, movement auras and the suicide bomber

use super::{is_valid_victim, living_enemies, ClassTask, HeroClass, UltimateOutcome};
use crate::config::{UltimateConfig, UndeadScourgeConfig};
use crate::context::AbilityContext;
use crate::effect::{Effect, EffectManager, EffectTag, UndeadAuraEffect};
use crate::events::HurtEvent;
use crate::schedule::DeferredAction;
use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind, Vec3};

pub const EXPLOSION_PARTICLE: &str = "particles/explosions_fx/explosion_basic.vpcf";

const VAMPIRIC: AbilitySlot = AbilitySlot::FIRST;

#[derive(Debug, Clone)]
pub struct UndeadScourge {
    actor: ActorId,
    config: UndeadScourgeConfig,
    /// Set by the ultimate so the resulting death does not explode again
    detonated: bool,
}

impl UndeadScourge {
    pub fn new(actor: ActorId, config: UndeadScourgeConfig) -> Self {
        UndeadScourge {
            actor,
            config,
            detonated: false,
        }
    }

    /// Damage every living enemy within the blast radius, with linear falloff
    ///
    /// Returns the number of enemies hit.
    pub fn explode(&self, origin: Vec3, ctx: &mut AbilityContext) -> usize {
        ctx.host.spawn_particle(origin, EXPLOSION_PARTICLE, 1.0, None);

        let radius = self.config.explosion_radius;
        let mut hits = 0;
        for enemy in living_enemies(self.actor, ctx) {
            let Some(position) = ctx.host.position(enemy) else {
                continue;
            };
            let distance = position.distance(origin);
            if distance > radius {
                continue;
            }
            let damage = (self.config.explosion_damage * (1.0 - distance / radius)).round() as i32;
            if damage > 0 && ctx.deal_damage(Some(self.actor), enemy, damage).dealt > 0 {
                hits += 1;
            }
        }
        tracing::debug!(actor = %self.actor, hits, "undead explosion");
        hits
    }
}

impl HeroClass for UndeadScourge {
    fn kind(&self) -> ClassKind {
        ClassKind::UndeadScourge
    }

    fn actor(&self) -> ActorId {
        self.actor
    }

    fn abilities(&self) -> Vec<AbilityInfo> {
        vec![
            AbilityInfo::new("Vampiric Aura", "Steal life from your enemies with each strike."),
            AbilityInfo::new("Unholy Aura", "Increase your movement speed with dark energy."),
            AbilityInfo::new("Levitation", "Defy gravity to jump higher and move freely."),
            AbilityInfo::new(
                "Ultimate: Suicide Bomber",
                "Detonate upon death or by will, damaging nearby enemies.",
            )
            .with_cooldown(self.config.ultimate.cooldown),
        ]
    }

    fn ultimate(&self) -> &UltimateConfig {
        &self.config.ultimate
    }

    fn on_spawn(&mut self, effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if !ctx.is_alive(self.actor) {
            return;
        }
        self.detonated = false;

        let actor = self.actor;
        effects.destroy_where(|e| e.owner() == actor && e.tag() == EffectTag::UndeadAura, ctx);
        let aura = UndeadAuraEffect::new(self.config.unholy_speed, self.config.levitation_gravity);
        effects.start(Effect::undead_aura(actor, aura, self.config.aura_interval), ctx);
    }

    /// Vampiric Aura
    fn on_hurt_other(&mut self, hurt: &mut HurtEvent, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if !is_valid_victim(self.actor, hurt.victim, ctx) || !ctx.is_alive(self.actor) {
            return;
        }
        let level = ctx.level(self.actor, ClassKind::UndeadScourge, VAMPIRIC);
        let health = ctx.host.health(self.actor);
        let max_health = ctx.host.max_health(self.actor);
        if level == 0 || health >= max_health {
            return;
        }

        let drained = hurt.damage as f64 * self.config.vampiric_drain.at(level);
        let healed = (health as f64 + drained).min(max_health as f64) as i32;
        ctx.host.set_health(self.actor, healed);
    }

    fn on_death(&mut self, _attacker: Option<ActorId>, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if std::mem::take(&mut self.detonated) {
            return;
        }
        if ctx.level(self.actor, ClassKind::UndeadScourge, AbilitySlot::ULTIMATE) == 0 {
            return;
        }
        let Some(origin) = ctx.host.position(self.actor) else {
            return;
        };
        ctx.scheduler.schedule(
            self.config.death_explosion_delay,
            DeferredAction::Class {
                actor: self.actor,
                task: ClassTask::DeathExplosion { origin },
            },
        );
    }

    fn on_class_change(&mut self, ctx: &mut AbilityContext) {
        if ctx.is_alive(self.actor) {
            ctx.host.set_gravity_scale(self.actor, 1.0);
            ctx.host.set_speed_modifier(self.actor, 1.0);
        }
    }

    fn on_task(&mut self, task: &ClassTask, _effects: &mut EffectManager, ctx: &mut AbilityContext) {
        if let ClassTask::DeathExplosion { origin } = task {
            self.explode(*origin, ctx);
        }
    }

    /// Suicide Bomber: explode at eye level, then die
    fn activate_ultimate(&mut self, _effects: &mut EffectManager, ctx: &mut AbilityContext) -> UltimateOutcome {
        let Some(eye) = ctx.host.eye_position(self.actor) else {
            return UltimateOutcome::Dead;
        };
        self.explode(eye, ctx);

        self.detonated = true;
        let health = ctx.host.health(self.actor);
        ctx.deal_damage(Some(self.actor), self.actor, health);

        ctx.cooldowns.start(self.actor, AbilitySlot::ULTIMATE, None);
        UltimateOutcome::Activated
    }
}
