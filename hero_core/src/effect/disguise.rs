//! Mole disguise - infiltrate the enemy spawn wearing an enemy model

use super::{EffectHooks, EffectRef, EffectSignal};
use crate::context::AbilityContext;
use crate::schedule::{DeferredAction, TimerHandle};
use crate::types::{Team, Vec3};
use rand::seq::SliceRandom;

/// Picks the enemy spawn points at start, then after `delay` seconds takes
/// the model of a living enemy and teleports to one of those spawns
#[derive(Debug, Clone)]
pub struct DisguiseEffect {
    /// Seconds between activation and the teleport
    pub delay: f64,
    enemy_team: Option<Team>,
    spawn_points: Vec<Vec3>,
    pending: Option<TimerHandle>,
    disguised: bool,
}

impl DisguiseEffect {
    pub fn new(delay: f64) -> Self {
        DisguiseEffect {
            delay,
            enemy_team: None,
            spawn_points: Vec::new(),
            pending: None,
            disguised: false,
        }
    }

    /// Whether the teleport and model swap already happened
    pub fn is_disguised(&self) -> bool {
        self.disguised
    }

    /// Timer of the pending teleport
    pub fn pending_teleport(&self) -> Option<TimerHandle> {
        self.pending
    }
}

impl EffectHooks for DisguiseEffect {
    fn on_start(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        let Some(team) = ctx.host.team(this.owner) else {
            return EffectSignal::Destroy;
        };
        let enemy_team = team.enemy();
        self.spawn_points = ctx.host.spawn_points(enemy_team);
        self.enemy_team = Some(enemy_team);

        if self.spawn_points.is_empty() {
            ctx.chat(this.owner, "No valid spawn points found for enemy team.");
            return EffectSignal::Destroy;
        }

        let message = format!("Fan of Knives! Teleport in {:.0} seconds.", self.delay);
        ctx.center(this.owner, &message);
        self.pending = Some(ctx.scheduler.schedule(self.delay, DeferredAction::Effect(this.id)));
        EffectSignal::Continue
    }

    fn on_tick(&mut self, _this: EffectRef, _ctx: &mut AbilityContext) -> EffectSignal {
        EffectSignal::Continue
    }

    fn on_timer(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        self.pending = None;
        if !ctx.is_alive(this.owner) {
            return EffectSignal::Destroy;
        }
        let Some(enemy_team) = self.enemy_team else {
            return EffectSignal::Destroy;
        };
        let Some(spawn) = self.spawn_points.choose(&mut *ctx.rng).copied() else {
            return EffectSignal::Destroy;
        };

        let enemy = ctx
            .host
            .players()
            .into_iter()
            .find(|p| ctx.host.team(*p) == Some(enemy_team) && ctx.host.is_alive(*p));
        let Some(enemy) = enemy else {
            ctx.chat(this.owner, "No alive enemy found for disguise.");
            return EffectSignal::Destroy;
        };

        if let Some(model) = ctx.host.model(enemy).filter(|m| !m.is_empty()) {
            ctx.host.set_model(this.owner, &model);
            ctx.chat(this.owner, "You are now disguised as an enemy and teleported to enemy spawn!");
        }
        ctx.host.teleport(this.owner, spawn);
        self.disguised = true;
        EffectSignal::Continue
    }

    fn on_finish(&mut self, this: EffectRef, ctx: &mut AbilityContext) {
        if let Some(handle) = self.pending.take() {
            ctx.scheduler.cancel(handle);
        }
        ctx.host.reset_appearance(this.owner);
        ctx.chat(this.owner, "Your mole disguise has worn off.");
    }
}
