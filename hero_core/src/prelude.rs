//! Prelude module for convenient imports
//!
//! ```rust
//! use hero_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AbilityInfo, AbilitySlot, ActorId, ClassKind, Team, Vec3};

// Session and events
pub use crate::events::{GameEvent, HurtEvent};
pub use crate::session::{Session, SessionSnapshot};

// Effects and timing
pub use crate::cooldown::CooldownBook;
pub use crate::effect::{EffectManager, EffectSummary, EffectTag};
pub use crate::schedule::TimerHandle;

// Classes
pub use crate::classes::{HeroClass, UltimateOutcome};

// Host
pub use crate::arena::Arena;
pub use crate::host::{GameHost, NoticeKind};

// Config
pub use crate::config::{default_config, HeroConfig};
