//! hero_core - Ability effects, cooldowns and hero classes for shooter mods
//!
//! This library provides:
//! - Effect: timed effects with start/tick/finish hooks, driven by the EffectManager
//! - CooldownBook: per-actor, per-slot ability cooldowns
//! - Scheduler: cancelable deferred actions holding actor and effect ids
//! - Hero classes: Crypt Lord, Undead Scourge and Warden controllers
//! - Session: owns all of the above and routes game events to the classes
//! - GameHost: the engine interface, with an in-memory Arena implementation

pub mod arena;
pub mod classes;
pub mod config;
pub mod context;
pub mod cooldown;
pub mod curve;
pub mod effect;
pub mod events;
pub mod host;
pub mod levels;
pub mod prelude;
pub mod schedule;
pub mod session;
pub mod transfer;
pub mod types;

// Re-export core types for convenience
pub use arena::Arena;
pub use classes::{ClassTask, HeroClass, UltimateOutcome};
pub use config::{default_config, load_config, parse_config, ConfigError, HeroConfig};
pub use context::AbilityContext;
pub use cooldown::{CooldownBook, CooldownTracker};
pub use curve::LevelCurve;
pub use effect::{Effect, EffectId, EffectKind, EffectManager, EffectState, EffectTag, Lifetime};
pub use events::{GameEvent, HurtEvent};
pub use host::{GameHost, NoticeKind};
pub use levels::AbilityLevels;
pub use schedule::{DeferredAction, Scheduler, TimerHandle};
pub use session::{Session, SessionSnapshot};
pub use types::{AbilityInfo, AbilitySlot, ActorId, ClassKind, Team, Vec3};
