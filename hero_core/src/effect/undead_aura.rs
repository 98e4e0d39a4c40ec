//! Undead auras - movement speed and gravity driven by ability levels

use super::{EffectHooks, EffectRef, EffectSignal};
use crate::context::AbilityContext;
use crate::curve::LevelCurve;
use crate::types::{AbilitySlot, ActorId, ClassKind};

/// Keeps the Unholy Aura speed bonus and Levitation gravity applied
///
/// Re-applied on every tick so level changes and respawns are picked up.
/// Finishing restores normal speed and gravity.
#[derive(Debug, Clone)]
pub struct UndeadAuraEffect {
    /// Speed bonus by Unholy Aura level (1.0 + bonus)
    pub speed_bonus: LevelCurve,
    /// Gravity reduction by Levitation level (1.0 - reduction)
    pub gravity_reduction: LevelCurve,
}

impl UndeadAuraEffect {
    pub fn new(speed_bonus: LevelCurve, gravity_reduction: LevelCurve) -> Self {
        UndeadAuraEffect {
            speed_bonus,
            gravity_reduction,
        }
    }

    pub fn speed_modifier(&self, unholy_level: u32) -> f32 {
        (1.0 + self.speed_bonus.at(unholy_level)) as f32
    }

    pub fn gravity_scale(&self, levitation_level: u32) -> f32 {
        (1.0 - self.gravity_reduction.at(levitation_level)) as f32
    }

    fn levels(owner: ActorId, ctx: &AbilityContext) -> (u32, u32) {
        (
            ctx.level(owner, ClassKind::UndeadScourge, AbilitySlot::SECOND),
            ctx.level(owner, ClassKind::UndeadScourge, AbilitySlot::THIRD),
        )
    }

    fn apply(&self, owner: ActorId, ctx: &mut AbilityContext) {
        if !ctx.is_alive(owner) {
            return;
        }
        let (unholy, levitation) = Self::levels(owner, ctx);
        ctx.host.set_gravity_scale(owner, self.gravity_scale(levitation));
        ctx.host.set_speed_modifier(owner, self.speed_modifier(unholy));
    }
}

impl EffectHooks for UndeadAuraEffect {
    fn on_start(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        self.apply(this.owner, ctx);

        let (unholy, levitation) = Self::levels(this.owner, ctx);
        if levitation > 0 {
            let message = format!(
                "[Levitation] Your gravity has been set to {:.1}x.",
                self.gravity_scale(levitation)
            );
            ctx.chat(this.owner, &message);
        }
        if unholy > 0 {
            let message = format!(
                "[Unholy Aura] Your speed has been set to {:.1}x.",
                self.speed_modifier(unholy)
            );
            ctx.chat(this.owner, &message);
        }
        EffectSignal::Continue
    }

    fn on_tick(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        self.apply(this.owner, ctx);
        EffectSignal::Continue
    }

    fn on_finish(&mut self, this: EffectRef, ctx: &mut AbilityContext) {
        if ctx.is_alive(this.owner) {
            ctx.host.set_gravity_scale(this.owner, 1.0);
            ctx.host.set_speed_modifier(this.owner, 1.0);
        }
    }
}
