//! GameHost - the narrow interface to the game engine
//!
//! Everything the abilities need from the outside world goes through this
//! trait: actor queries and mutations, notifications and particles. Queries on
//! unknown or disconnected actors return neutral values (not alive, zero
//! health, no position) instead of failing.

use crate::types::{ActorId, Team, Vec3};
use serde::{Deserialize, Serialize};

/// Where a notification is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Chat,
    Center,
    Alert,
}

/// Handle to a spawned particle system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

/// What a damage application actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageReport {
    /// Health actually removed
    pub dealt: i32,
    /// Health left afterwards
    pub remaining_health: i32,
    /// Whether this damage killed the target
    pub killed: bool,
}

/// Engine-side operations consumed by the ability core
pub trait GameHost {
    // === Queries ===
    /// Every connected actor
    fn players(&self) -> Vec<ActorId>;
    /// Connected, spawned and above zero health
    fn is_alive(&self, actor: ActorId) -> bool;
    /// Display name for notifications
    fn name(&self, actor: ActorId) -> String;
    fn team(&self, actor: ActorId) -> Option<Team>;
    fn health(&self, actor: ActorId) -> i32;
    fn max_health(&self, actor: ActorId) -> i32;
    fn armor(&self, actor: ActorId) -> i32;
    fn position(&self, actor: ActorId) -> Option<Vec3>;
    fn eye_position(&self, actor: ActorId) -> Option<Vec3>;
    /// Horizontal view angle in degrees
    fn yaw(&self, actor: ActorId) -> Option<f32>;
    /// Current model name, if the actor has a pawn
    fn model(&self, actor: ActorId) -> Option<String>;
    /// Weapons currently carried (designer names)
    fn weapons(&self, actor: ActorId) -> Vec<String>;
    /// Spawn point positions for a team
    fn spawn_points(&self, team: Team) -> Vec<Vec3>;

    // === Mutations ===
    fn set_health(&mut self, actor: ActorId, health: i32);
    fn set_armor(&mut self, actor: ActorId, armor: i32);
    /// Remove health, attributing the damage to `attacker`
    fn apply_damage(&mut self, target: ActorId, amount: i32, attacker: Option<ActorId>) -> DamageReport;
    fn add_velocity(&mut self, actor: ActorId, impulse: Vec3);
    fn set_gravity_scale(&mut self, actor: ActorId, scale: f32);
    fn set_speed_modifier(&mut self, actor: ActorId, modifier: f32);
    fn set_model(&mut self, actor: ActorId, model: &str);
    /// Restore the class's default model and color
    fn reset_appearance(&mut self, actor: ActorId);
    fn teleport(&mut self, actor: ActorId, position: Vec3);
    fn respawn(&mut self, actor: ActorId);
    fn give_weapon(&mut self, actor: ActorId, weapon: &str);

    // === Output ===
    fn notify(&mut self, actor: ActorId, kind: NoticeKind, message: &str);
    /// Visible effect at `position` for `duration` seconds, optionally following an actor
    fn spawn_particle(&mut self, position: Vec3, name: &str, duration: f64, attach_to: Option<ActorId>) -> ParticleId;
    fn remove_particle(&mut self, particle: ParticleId);
}
