//! Poison - periodic damage to a victim on behalf of the owner

use super::{EffectHooks, EffectRef, EffectSignal};
use crate::context::AbilityContext;
use crate::host::ParticleId;
use crate::types::ActorId;

pub const POISON_PARTICLE: &str = "particles/generic_gameplay/poison.vpcf";

/// Damage-over-time applied to `victim`, attributed to the effect owner
#[derive(Debug, Clone)]
pub struct PoisonEffect {
    pub victim: ActorId,
    pub damage_per_tick: i32,
    particle: Option<ParticleId>,
}

impl PoisonEffect {
    pub fn new(victim: ActorId, damage_per_tick: i32) -> Self {
        PoisonEffect {
            victim,
            damage_per_tick,
            particle: None,
        }
    }
}

impl EffectHooks for PoisonEffect {
    fn on_start(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        if !ctx.is_alive(self.victim) {
            return EffectSignal::Destroy;
        }

        ctx.alert(self.victim, "[POISONED]");
        if let Some(position) = ctx.host.position(self.victim) {
            let duration = this.lifetime.seconds().unwrap_or(f64::MAX);
            self.particle = Some(ctx.host.spawn_particle(position, POISON_PARTICLE, duration, Some(self.victim)));
        }
        EffectSignal::Continue
    }

    fn on_tick(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        if !ctx.is_alive(self.victim) {
            return EffectSignal::Destroy;
        }
        ctx.deal_damage(Some(this.owner), self.victim, self.damage_per_tick);
        EffectSignal::Continue
    }

    fn on_finish(&mut self, _this: EffectRef, ctx: &mut AbilityContext) {
        if let Some(particle) = self.particle.take() {
            ctx.host.remove_particle(particle);
        }
    }
}
