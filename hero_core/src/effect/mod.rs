//! Timed effects - auras, poisons, disguises
//!
//! An effect is owned by an actor (by id only), runs `on_start` once, ticks
//! while running and runs `on_finish` exactly once when it expires or is
//! destroyed. The [`EffectManager`] owns every live effect and drives them.

mod disguise;
mod manager;
mod poison;
mod undead_aura;

pub use disguise::DisguiseEffect;
pub use manager::{EffectManager, EffectSummary};
pub use poison::PoisonEffect;
pub use undead_aura::UndeadAuraEffect;

use crate::context::AbilityContext;
use crate::types::ActorId;
use serde::{Deserialize, Serialize};

/// Tolerance for comparing accumulated float time against thresholds
const TIME_EPSILON: f64 = 1e-9;

/// Identifier assigned when an effect is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

/// Lifecycle state of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectState {
    Pending,
    Running,
    Finished,
}

/// How long an effect lives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    Seconds(f64),
    /// Lives until explicitly destroyed
    Unbounded,
}

impl Lifetime {
    /// `None` means unbounded
    pub fn from_option(seconds: Option<f64>) -> Self {
        match seconds {
            Some(s) if s.is_finite() => Lifetime::Seconds(s),
            _ => Lifetime::Unbounded,
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            Lifetime::Seconds(s) => Some(*s),
            Lifetime::Unbounded => None,
        }
    }

    pub fn is_expired(&self, elapsed: f64) -> bool {
        match self {
            Lifetime::Seconds(s) => elapsed + TIME_EPSILON >= *s,
            Lifetime::Unbounded => false,
        }
    }
}

/// What a hook wants to happen to its effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSignal {
    Continue,
    Destroy,
}

/// Identity of the effect a hook is running for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectRef {
    pub id: EffectId,
    pub owner: ActorId,
    pub lifetime: Lifetime,
}

/// Lifecycle hooks implemented by every concrete effect
///
/// Hooks must re-check liveness of the owner and any other referenced actor
/// before mutating them.
pub trait EffectHooks {
    fn on_start(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal;

    fn on_tick(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal;

    fn on_finish(&mut self, this: EffectRef, ctx: &mut AbilityContext);

    /// A deferred action scheduled by this effect came due
    fn on_timer(&mut self, _this: EffectRef, _ctx: &mut AbilityContext) -> EffectSignal {
        EffectSignal::Continue
    }
}

/// Concrete effect kinds
#[derive(Debug, Clone)]
pub enum EffectKind {
    Poison(PoisonEffect),
    UndeadAura(UndeadAuraEffect),
    Disguise(DisguiseEffect),
}

/// Fieldless discriminant of [`EffectKind`], for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    Poison,
    UndeadAura,
    Disguise,
}

impl EffectTag {
    pub fn name(&self) -> &'static str {
        match self {
            EffectTag::Poison => "Shadow Strike Poison",
            EffectTag::UndeadAura => "Undead Auras",
            EffectTag::Disguise => "Mole Disguise",
        }
    }
}

impl EffectKind {
    pub fn tag(&self) -> EffectTag {
        match self {
            EffectKind::Poison(_) => EffectTag::Poison,
            EffectKind::UndeadAura(_) => EffectTag::UndeadAura,
            EffectKind::Disguise(_) => EffectTag::Disguise,
        }
    }

    /// Actor the effect acts upon, when it is someone other than the owner
    pub fn victim(&self) -> Option<ActorId> {
        match self {
            EffectKind::Poison(poison) => Some(poison.victim),
            _ => None,
        }
    }
}

impl EffectHooks for EffectKind {
    fn on_start(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        match self {
            EffectKind::Poison(e) => e.on_start(this, ctx),
            EffectKind::UndeadAura(e) => e.on_start(this, ctx),
            EffectKind::Disguise(e) => e.on_start(this, ctx),
        }
    }

    fn on_tick(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        match self {
            EffectKind::Poison(e) => e.on_tick(this, ctx),
            EffectKind::UndeadAura(e) => e.on_tick(this, ctx),
            EffectKind::Disguise(e) => e.on_tick(this, ctx),
        }
    }

    fn on_finish(&mut self, this: EffectRef, ctx: &mut AbilityContext) {
        match self {
            EffectKind::Poison(e) => e.on_finish(this, ctx),
            EffectKind::UndeadAura(e) => e.on_finish(this, ctx),
            EffectKind::Disguise(e) => e.on_finish(this, ctx),
        }
    }

    fn on_timer(&mut self, this: EffectRef, ctx: &mut AbilityContext) -> EffectSignal {
        match self {
            EffectKind::Poison(e) => e.on_timer(this, ctx),
            EffectKind::UndeadAura(e) => e.on_timer(this, ctx),
            EffectKind::Disguise(e) => e.on_timer(this, ctx),
        }
    }
}

/// A timed effect bound to an owning actor
#[derive(Debug, Clone)]
pub struct Effect {
    id: EffectId,
    owner: ActorId,
    lifetime: Lifetime,
    /// Seconds between `on_tick` calls; `None` never ticks
    tick_interval: Option<f64>,
    elapsed: f64,
    since_tick: f64,
    ticks: u32,
    state: EffectState,
    kind: EffectKind,
}

impl Effect {
    /// Create a pending effect. A zero or negative interval disables ticking.
    pub fn new(owner: ActorId, lifetime: Lifetime, tick_interval: Option<f64>, kind: EffectKind) -> Self {
        Effect {
            id: EffectId(0),
            owner,
            lifetime,
            tick_interval: tick_interval.filter(|i| *i > 0.0),
            elapsed: 0.0,
            since_tick: 0.0,
            ticks: 0,
            state: EffectState::Pending,
            kind,
        }
    }

    pub fn poison(owner: ActorId, poison: PoisonEffect, duration: f64, tick_interval: f64) -> Self {
        Self::new(
            owner,
            Lifetime::Seconds(duration),
            Some(tick_interval),
            EffectKind::Poison(poison),
        )
    }

    pub fn undead_aura(owner: ActorId, aura: UndeadAuraEffect, tick_interval: f64) -> Self {
        Self::new(
            owner,
            Lifetime::Unbounded,
            Some(tick_interval),
            EffectKind::UndeadAura(aura),
        )
    }

    pub fn disguise(owner: ActorId, disguise: DisguiseEffect, lifetime: Lifetime) -> Self {
        Self::new(owner, lifetime, None, EffectKind::Disguise(disguise))
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn tick_interval(&self) -> Option<f64> {
        self.tick_interval
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Seconds left, `None` when unbounded
    pub fn remaining(&self) -> Option<f64> {
        self.lifetime.seconds().map(|s| (s - self.elapsed).max(0.0))
    }

    /// Number of `on_tick` calls so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn state(&self) -> EffectState {
        self.state
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub fn tag(&self) -> EffectTag {
        self.kind.tag()
    }

    pub fn victim(&self) -> Option<ActorId> {
        self.kind.victim()
    }

    pub fn is_running(&self) -> bool {
        self.state == EffectState::Running
    }

    fn this(&self) -> EffectRef {
        EffectRef {
            id: self.id,
            owner: self.owner,
            lifetime: self.lifetime,
        }
    }

    /// Advance the clock by `delta`, ticking when the interval has elapsed
    ///
    /// At most one tick fires per call and the interval counter restarts from
    /// zero, so a long frame never leaves ticks owed to the next ones.
    /// Returns `Destroy` when the effect expired or a hook asked for it.
    fn advance(&mut self, delta: f64, ctx: &mut AbilityContext) -> EffectSignal {
        if self.state != EffectState::Running {
            return EffectSignal::Continue;
        }

        let delta = delta.max(0.0);
        self.elapsed += delta;

        if let Some(interval) = self.tick_interval {
            self.since_tick += delta;
            if self.since_tick + TIME_EPSILON >= interval {
                self.since_tick = 0.0;
                self.ticks += 1;
                let this = self.this();
                if self.kind.on_tick(this, ctx) == EffectSignal::Destroy {
                    return EffectSignal::Destroy;
                }
            }
        }

        if self.lifetime.is_expired(self.elapsed) {
            return EffectSignal::Destroy;
        }
        EffectSignal::Continue
    }
}
