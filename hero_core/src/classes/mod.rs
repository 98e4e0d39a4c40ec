//! Hero class controllers
//!
//! A controller is created per actor when the actor picks a class. It turns
//! game events into ability effects: rolling chances against the actor's
//! ability levels, mutating actors through the host and starting timed
//! effects in the [`EffectManager`].

mod crypt_lord;
mod undead_scourge;
mod warden;

pub use crypt_lord::CryptLord;
pub use undead_scourge::UndeadScourge;
pub use warden::Warden;

use crate::config::{HeroConfig, RoundStartPolicy, UltimateConfig};
use crate::context::AbilityContext;
use crate::cooldown::CooldownBook;
use crate::effect::EffectManager;
use crate::events::HurtEvent;
use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Deferred work a controller schedules for itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassTask {
    /// Warden: bring the actor back after Vengeance
    VengeanceRespawn,
    /// Warden: hand back the weapons carried at death
    RestoreWeapons,
    /// Undead Scourge: delayed explosion where the actor died
    DeathExplosion { origin: Vec3 },
}

impl ClassTask {
    /// Class that schedules this task
    pub fn class(&self) -> ClassKind {
        match self {
            ClassTask::VengeanceRespawn | ClassTask::RestoreWeapons => ClassKind::Warden,
            ClassTask::DeathExplosion { .. } => ClassKind::UndeadScourge,
        }
    }
}

/// Result of an ultimate activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UltimateOutcome {
    Activated,
    /// No valid target; the fallback cooldown (if any) was applied
    NoTarget,
    /// Ultimate level is 0
    Locked,
    NotReady,
    /// Caster is dead or gone
    Dead,
    /// The actor has no class
    NoClass,
    /// The class ultimate triggers on its own and cannot be activated
    Passive,
}

impl fmt::Display for UltimateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UltimateOutcome::Activated => "activated",
            UltimateOutcome::NoTarget => "no target",
            UltimateOutcome::Locked => "locked",
            UltimateOutcome::NotReady => "on cooldown",
            UltimateOutcome::Dead => "caster dead",
            UltimateOutcome::NoClass => "no class",
            UltimateOutcome::Passive => "passive",
        };
        f.write_str(text)
    }
}

/// Event handlers of one class, bound to one actor
///
/// Every handler re-validates its preconditions (actor alive, level above
/// zero, target valid) and silently returns when they do not hold.
pub trait HeroClass: fmt::Debug {
    fn kind(&self) -> ClassKind;

    /// Actor this controller belongs to
    fn actor(&self) -> ActorId;

    /// Named abilities in slot order, for display
    fn abilities(&self) -> Vec<AbilityInfo>;

    fn ultimate(&self) -> &UltimateConfig;

    /// Default cooldown per slot installed with the controller
    fn cooldown_defaults(&self) -> [f64; AbilitySlot::COUNT] {
        let mut defaults = [0.0; AbilitySlot::COUNT];
        defaults[AbilitySlot::ULTIMATE.index()] = self.ultimate().cooldown;
        defaults
    }

    fn round_start_policy(&self) -> RoundStartPolicy {
        self.ultimate().round_start
    }

    fn on_spawn(&mut self, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    /// The actor damaged someone else
    fn on_hurt_other(&mut self, _hurt: &mut HurtEvent, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    /// The actor took damage
    fn on_hurt(&mut self, _hurt: &mut HurtEvent, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    fn on_death(&mut self, _attacker: Option<ActorId>, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    /// Reset per-round state. The round-start cooldown policy is applied by the caller.
    fn on_round_start(&mut self, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    fn on_round_end(&mut self, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    /// The actor is switching to another class
    fn on_class_change(&mut self, _ctx: &mut AbilityContext) {}

    /// A task this controller scheduled came due
    fn on_task(&mut self, _task: &ClassTask, _effects: &mut EffectManager, _ctx: &mut AbilityContext) {}

    /// Run the ultimate. Level and cooldown gating happen in [`check_ultimate`].
    fn activate_ultimate(&mut self, _effects: &mut EffectManager, _ctx: &mut AbilityContext) -> UltimateOutcome {
        UltimateOutcome::Passive
    }
}

/// Build the controller for `kind`, configured from `config`
pub fn create_class(kind: ClassKind, actor: ActorId, config: &HeroConfig) -> Box<dyn HeroClass> {
    match kind {
        ClassKind::CryptLord => Box::new(CryptLord::new(actor, config.crypt_lord.clone())),
        ClassKind::UndeadScourge => Box::new(UndeadScourge::new(actor, config.undead_scourge.clone())),
        ClassKind::Warden => Box::new(Warden::new(actor, config.warden.clone())),
    }
}

/// Gate an ultimate request on liveness, level and cooldown
pub fn check_ultimate(actor: ActorId, kind: ClassKind, ctx: &AbilityContext) -> Result<(), UltimateOutcome> {
    if !ctx.is_alive(actor) {
        return Err(UltimateOutcome::Dead);
    }
    if ctx.level(actor, kind, AbilitySlot::ULTIMATE) == 0 {
        return Err(UltimateOutcome::Locked);
    }
    if !ctx.cooldowns.is_ready(actor, AbilitySlot::ULTIMATE) {
        return Err(UltimateOutcome::NotReady);
    }
    Ok(())
}

/// Apply a round-start policy to an actor's ultimate
pub fn apply_round_start(policy: RoundStartPolicy, actor: ActorId, cooldowns: &mut CooldownBook) {
    match policy {
        RoundStartPolicy::Keep => {}
        RoundStartPolicy::Ready => cooldowns.reset(actor, AbilitySlot::ULTIMATE),
        RoundStartPolicy::Cooldown => cooldowns.start(actor, AbilitySlot::ULTIMATE, None),
    }
}

/// Put the ultimate on its short fallback cooldown, if the class has one
pub(crate) fn start_fallback_cooldown(ultimate: &UltimateConfig, actor: ActorId, ctx: &mut AbilityContext) {
    if let Some(seconds) = ultimate.fallback_cooldown {
        ctx.cooldowns.start(actor, AbilitySlot::ULTIMATE, Some(seconds));
    }
}

/// Living actors on the other team
pub(crate) fn living_enemies(actor: ActorId, ctx: &AbilityContext) -> Vec<ActorId> {
    let Some(team) = ctx.host.team(actor) else {
        return Vec::new();
    };
    ctx.host
        .players()
        .into_iter()
        .filter(|p| *p != actor && ctx.host.team(*p) == Some(team.enemy()) && ctx.host.is_alive(*p))
        .collect()
}

/// Whether `victim` is a valid target for an on-hit ability of `actor`
pub(crate) fn is_valid_victim(actor: ActorId, victim: ActorId, ctx: &AbilityContext) -> bool {
    victim != actor && ctx.is_alive(victim)
}
