//! Session - owns every registry and routes game events to class controllers
//!
//! The host loop drives a session with [`Session::dispatch`] for discrete
//! events and [`Session::tick`] for elapsed time. Events raised while another
//! event is being handled (reflected damage, deaths, respawns) are queued and
//! processed in order within the same call.

use crate::classes::{self, apply_round_start, check_ultimate, ClassTask, HeroClass, UltimateOutcome};
use crate::config::HeroConfig;
use crate::context::AbilityContext;
use crate::cooldown::{CooldownBook, CooldownTracker};
use crate::effect::{EffectManager, EffectSummary};
use crate::events::{EventQueue, GameEvent, HurtEvent};
use crate::host::{DamageReport, GameHost};
use crate::levels::AbilityLevels;
use crate::schedule::{DeferredAction, Scheduler};
use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cooldown state of one actor, for display and snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CooldownSnapshot {
    pub actor: ActorId,
    pub class: Option<ClassKind>,
    /// Seconds remaining per slot; unbounded cooldowns serialize as null
    pub remaining: [f64; AbilitySlot::COUNT],
}

/// Serializable view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: f64,
    pub classes: BTreeMap<ActorId, ClassKind>,
    pub effects: Vec<EffectSummary>,
    pub cooldowns: Vec<CooldownSnapshot>,
    pub pending_timers: usize,
}

/// Ability state of one game: effects, cooldowns, levels, timers and classes
pub struct Session {
    config: HeroConfig,
    effects: EffectManager,
    cooldowns: CooldownBook,
    levels: AbilityLevels,
    scheduler: Scheduler,
    events: EventQueue,
    controllers: BTreeMap<ActorId, Box<dyn HeroClass>>,
    rng: Box<dyn RngCore>,
}

/// Disjoint borrows of a session: the handler context plus the parts
/// handlers receive separately
struct Parts<'a> {
    ctx: AbilityContext<'a>,
    effects: &'a mut EffectManager,
    controllers: &'a mut BTreeMap<ActorId, Box<dyn HeroClass>>,
}

impl Session {
    /// Create a session seeded from entropy
    pub fn new(config: HeroConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a session drawing every chance roll from `rng`
    pub fn with_rng(config: HeroConfig, rng: impl RngCore + 'static) -> Self {
        Session {
            config,
            effects: EffectManager::new(),
            cooldowns: CooldownBook::new(),
            levels: AbilityLevels::new(),
            scheduler: Scheduler::new(),
            events: EventQueue::new(),
            controllers: BTreeMap::new(),
            rng: Box::new(rng),
        }
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn levels(&self) -> &AbilityLevels {
        &self.levels
    }

    /// Ability levels, for progression to write
    pub fn levels_mut(&mut self) -> &mut AbilityLevels {
        &mut self.levels
    }

    pub fn cooldowns(&self) -> &CooldownBook {
        &self.cooldowns
    }

    pub fn effects(&self) -> &EffectManager {
        &self.effects
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Current class of an actor
    pub fn class_of(&self, actor: ActorId) -> Option<ClassKind> {
        self.controllers.get(&actor).map(|c| c.kind())
    }

    pub fn controller(&self, actor: ActorId) -> Option<&dyn HeroClass> {
        self.controllers.get(&actor).map(|c| c.as_ref())
    }

    /// Abilities of the actor's class, empty without a class
    pub fn abilities(&self, actor: ActorId) -> Vec<AbilityInfo> {
        self.controller(actor).map(|c| c.abilities()).unwrap_or_default()
    }

    fn parts<'a>(&'a mut self, host: &'a mut dyn GameHost) -> Parts<'a> {
        Parts {
            ctx: AbilityContext {
                host,
                levels: &self.levels,
                cooldowns: &mut self.cooldowns,
                scheduler: &mut self.scheduler,
                events: &mut self.events,
                rng: &mut *self.rng,
            },
            effects: &mut self.effects,
            controllers: &mut self.controllers,
        }
    }

    /// Switch an actor to `kind`, tearing down whatever class it played
    pub fn assign_class(&mut self, host: &mut dyn GameHost, actor: ActorId, kind: ClassKind) {
        self.teardown(host, actor);

        let controller = classes::create_class(kind, actor, &self.config);
        self.cooldowns
            .install(actor, CooldownTracker::with_defaults(controller.cooldown_defaults()));
        self.controllers.insert(actor, controller);
        tracing::info!(%actor, class = %kind, "class assigned");
        self.pump(host);
    }

    /// Disconnect teardown: drop the actor's class, effects, timers and levels
    pub fn remove_player(&mut self, host: &mut dyn GameHost, actor: ActorId) {
        self.teardown(host, actor);
        self.controllers.remove(&actor);
        self.cooldowns.remove(actor);
        self.levels.remove_actor(actor);
        tracing::info!(%actor, "player removed");
        self.pump(host);
    }

    /// Destroy the actor's effects, cancel its class tasks and run the class-change hook
    fn teardown(&mut self, host: &mut dyn GameHost, actor: ActorId) {
        let Parts {
            mut ctx,
            effects,
            controllers,
        } = self.parts(host);

        let destroyed = effects.destroy_owned_by(actor, &mut ctx);
        let cancelled = ctx.scheduler.cancel_where(|a| a.actor() == Some(actor));
        if let Some(controller) = controllers.get_mut(&actor) {
            controller.on_class_change(&mut ctx);
            tracing::debug!(%actor, class = %controller.kind(), destroyed, cancelled, "class torn down");
        }
    }

    /// Queue an event and process it along with everything it triggers
    pub fn dispatch(&mut self, host: &mut dyn GameHost, event: GameEvent) {
        self.events.push(event);
        self.pump(host);
    }

    /// Damage `victim` through the host and process the resulting events
    pub fn deal_damage(
        &mut self,
        host: &mut dyn GameHost,
        attacker: Option<ActorId>,
        victim: ActorId,
        amount: i32,
    ) -> DamageReport {
        let report = self.events.deal_damage(host, attacker, victim, amount);
        self.pump(host);
        report
    }

    /// Try to activate the actor's ultimate
    pub fn activate_ultimate(&mut self, host: &mut dyn GameHost, actor: ActorId) -> UltimateOutcome {
        let outcome = {
            let Parts {
                mut ctx,
                effects,
                controllers,
            } = self.parts(host);
            match controllers.get_mut(&actor) {
                None => UltimateOutcome::NoClass,
                Some(controller) => match check_ultimate(actor, controller.kind(), &ctx) {
                    Err(outcome) => outcome,
                    Ok(()) => controller.activate_ultimate(effects, &mut ctx),
                },
            }
        };
        tracing::debug!(%actor, %outcome, "ultimate requested");
        self.pump(host);
        outcome
    }

    /// Advance simulation time by `delta` seconds
    ///
    /// Order: cooldowns, due deferred actions, effects, then queued events.
    pub fn tick(&mut self, host: &mut dyn GameHost, delta: f64) {
        if delta <= 0.0 {
            return;
        }
        self.cooldowns.tick(delta);

        let due = self.scheduler.advance(delta);
        {
            let Parts {
                mut ctx,
                effects,
                controllers,
            } = self.parts(host);

            for (handle, action) in due {
                match action {
                    DeferredAction::Effect(id) => {
                        if !effects.fire_timer(id, &mut ctx) {
                            tracing::trace!(handle = handle.0, effect = id.0, "timer for finished effect dropped");
                        }
                    }
                    DeferredAction::Class { actor, task } => {
                        run_task(controllers, effects, &mut ctx, actor, &task);
                    }
                }
            }

            effects.tick(delta, &mut ctx);
        }
        self.pump(host);
    }

    /// Tear everything down at the end of a game
    pub fn shutdown(&mut self, host: &mut dyn GameHost) {
        let Parts { mut ctx, effects, .. } = self.parts(host);
        let destroyed = effects.destroy_all(&mut ctx);
        ctx.scheduler.clear();
        ctx.events.clear();
        tracing::info!(destroyed, "session shut down");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let classes: BTreeMap<ActorId, ClassKind> =
            self.controllers.iter().map(|(a, c)| (*a, c.kind())).collect();
        let mut cooldowns: Vec<CooldownSnapshot> = self
            .cooldowns
            .iter()
            .map(|(actor, tracker)| CooldownSnapshot {
                actor: *actor,
                class: classes.get(actor).copied(),
                remaining: AbilitySlot::all().map(|slot| tracker.remaining(slot)),
            })
            .collect();
        cooldowns.sort_by_key(|c| c.actor);

        SessionSnapshot {
            time: self.scheduler.now(),
            classes,
            effects: self.effects.summaries(),
            cooldowns,
            pending_timers: self.scheduler.pending(),
        }
    }

    /// Process queued events until the queue is empty or the cascade limit is hit
    fn pump(&mut self, host: &mut dyn GameHost) {
        let limit = self.config.session.max_event_cascade;
        let mut processed = 0;

        while let Some(event) = self.events.pop() {
            if processed >= limit {
                let dropped = 1 + self.events.len();
                self.events.clear();
                tracing::warn!(limit, dropped, "event cascade limit reached, dropping events");
                break;
            }
            processed += 1;
            self.route(host, event);
        }
    }

    fn route(&mut self, host: &mut dyn GameHost, event: GameEvent) {
        tracing::trace!(?event, "routing event");
        match event {
            GameEvent::PlayerSpawned { actor } => {
                let Parts {
                    mut ctx,
                    effects,
                    controllers,
                } = self.parts(host);
                if let Some(controller) = controllers.get_mut(&actor) {
                    controller.on_spawn(effects, &mut ctx);
                }
            }
            GameEvent::PlayerHurt(hurt) => self.route_hurt(host, hurt),
            GameEvent::PlayerDied { victim, attacker } => {
                let Parts {
                    mut ctx,
                    effects,
                    controllers,
                } = self.parts(host);
                if let Some(controller) = controllers.get_mut(&victim) {
                    controller.on_death(attacker, effects, &mut ctx);
                }
            }
            GameEvent::RoundStarted => self.start_round(host),
            GameEvent::RoundEnded => self.end_round(host),
        }
    }

    /// Attacker handlers first, then the victim, then the net adjustment
    fn route_hurt(&mut self, host: &mut dyn GameHost, mut hurt: HurtEvent) {
        let Parts {
            mut ctx,
            effects,
            controllers,
        } = self.parts(host);

        if let Some(attacker) = hurt.other_attacker() {
            if let Some(controller) = controllers.get_mut(&attacker) {
                controller.on_hurt_other(&mut hurt, effects, &mut ctx);
            }
        }
        if let Some(controller) = controllers.get_mut(&hurt.victim) {
            controller.on_hurt(&mut hurt, effects, &mut ctx);
        }

        let net = hurt.net_adjustment();
        if net > 0 && ctx.is_alive(hurt.victim) {
            let restored = (ctx.host.health(hurt.victim) + net).min(ctx.host.max_health(hurt.victim));
            ctx.host.set_health(hurt.victim, restored);
        } else if net < 0 {
            // Bonus damage belongs to the original hit: no new hurt event
            let report = ctx.host.apply_damage(hurt.victim, -net, hurt.attacker);
            if report.killed {
                ctx.events.push(GameEvent::PlayerDied {
                    victim: hurt.victim,
                    attacker: hurt.attacker,
                });
            }
        }
    }

    fn start_round(&mut self, host: &mut dyn GameHost) {
        let Parts {
            mut ctx,
            effects,
            controllers,
        } = self.parts(host);

        for (actor, controller) in controllers.iter_mut() {
            apply_round_start(controller.round_start_policy(), *actor, ctx.cooldowns);
            controller.on_round_start(effects, &mut ctx);
        }
        tracing::debug!(controllers = controllers.len(), "round started");
    }

    /// Cancel class timers and destroy every live effect
    ///
    /// Clearing the scheduler drops every pending timer, including an Undead
    /// death explosion that was due a fraction of a second later.
    fn end_round(&mut self, host: &mut dyn GameHost) {
        let Parts {
            mut ctx,
            effects,
            controllers,
        } = self.parts(host);

        for controller in controllers.values_mut() {
            controller.on_round_end(effects, &mut ctx);
        }
        let destroyed = effects.destroy_all(&mut ctx);
        let cancelled = ctx.scheduler.pending();
        ctx.scheduler.clear();
        tracing::debug!(destroyed, cancelled, "round ended");
    }
}

/// Forward a due class task if the actor still plays the class that scheduled it
fn run_task(
    controllers: &mut BTreeMap<ActorId, Box<dyn HeroClass>>,
    effects: &mut EffectManager,
    ctx: &mut AbilityContext,
    actor: ActorId,
    task: &ClassTask,
) {
    match controllers.get_mut(&actor) {
        Some(controller) if controller.kind() == task.class() => controller.on_task(task, effects, ctx),
        _ => tracing::trace!(%actor, ?task, "class task dropped, class changed"),
    }
}
