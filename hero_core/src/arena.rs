//! Arena - in-memory GameHost for tests, simulations and the TUI

use crate::host::{DamageReport, GameHost, NoticeKind, ParticleId};
use crate::types::{ActorId, Team, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_LOADOUT: &[&str] = &["weapon_knife", "weapon_glock"];

/// Distance from feet to eyes
const EYE_HEIGHT: f32 = 64.0;

/// Simulated player pawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaPlayer {
    pub id: ActorId,
    pub name: String,
    pub team: Team,
    pub alive: bool,
    pub connected: bool,
    pub health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub position: Vec3,
    pub yaw: f32,
    pub velocity: Vec3,
    pub gravity_scale: f32,
    pub speed_modifier: f32,
    pub model: String,
    pub default_model: String,
    pub weapons: Vec<String>,
    pub respawn_count: u32,
}

impl ArenaPlayer {
    pub fn new(id: ActorId, name: &str, team: Team) -> Self {
        let default_model = match team {
            Team::Terrorist => "characters/models/tm_phoenix.vmdl",
            Team::CounterTerrorist => "characters/models/ctm_sas.vmdl",
        };
        ArenaPlayer {
            id,
            name: name.to_string(),
            team,
            alive: true,
            connected: true,
            health: 100,
            max_health: 100,
            armor: 0,
            position: Vec3::ZERO,
            yaw: 0.0,
            velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            speed_modifier: 1.0,
            model: default_model.to_string(),
            default_model: default_model.to_string(),
            weapons: DEFAULT_LOADOUT.iter().map(|w| w.to_string()).collect(),
            respawn_count: 0,
        }
    }

    fn is_alive(&self) -> bool {
        self.connected && self.alive && self.health > 0
    }
}

/// A notification delivered to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub actor: ActorId,
    pub kind: NoticeKind,
    pub message: String,
}

/// A live particle system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub name: String,
    pub position: Vec3,
    pub remaining: f64,
    pub attached_to: Option<ActorId>,
}

/// A damage application recorded by the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub target: ActorId,
    pub attacker: Option<ActorId>,
    pub amount: i32,
}

/// Simple world: players, spawn points, notices and particles
#[derive(Debug, Clone, Default)]
pub struct Arena {
    players: BTreeMap<ActorId, ArenaPlayer>,
    spawn_points: BTreeMap<Team, Vec<Vec3>>,
    notices: Vec<Notice>,
    particles: BTreeMap<u64, Particle>,
    damage_log: Vec<DamageRecord>,
    next_particle: u64,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player at `position`, returning its id
    pub fn add_player(&mut self, id: u32, name: &str, team: Team, position: Vec3) -> ActorId {
        let id = ActorId(id);
        let mut player = ArenaPlayer::new(id, name, team);
        player.position = position;
        self.players.insert(id, player);
        id
    }

    pub fn add_spawn_point(&mut self, team: Team, position: Vec3) {
        self.spawn_points.entry(team).or_default().push(position);
    }

    pub fn player(&self, id: ActorId) -> Option<&ArenaPlayer> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: ActorId) -> Option<&mut ArenaPlayer> {
        self.players.get_mut(&id)
    }

    pub fn all_players(&self) -> impl Iterator<Item = &ArenaPlayer> {
        self.players.values()
    }

    /// Kill a player outright, without any attribution
    pub fn kill(&mut self, id: ActorId) {
        if let Some(p) = self.players.get_mut(&id) {
            p.health = 0;
            p.alive = false;
        }
    }

    /// Mark a player as disconnected
    pub fn disconnect(&mut self, id: ActorId) {
        if let Some(p) = self.players.get_mut(&id) {
            p.connected = false;
            p.alive = false;
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Notices sent to one actor
    pub fn notices_for(&self, actor: ActorId) -> Vec<&Notice> {
        self.notices.iter().filter(|n| n.actor == actor).collect()
    }

    /// Whether any notice to `actor` contains `text`
    pub fn was_notified(&self, actor: ActorId, text: &str) -> bool {
        self.notices.iter().any(|n| n.actor == actor && n.message.contains(text))
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.values()
    }

    pub fn damage_log(&self) -> &[DamageRecord] {
        &self.damage_log
    }

    /// Total damage `target` took from `attacker`
    pub fn damage_dealt(&self, attacker: ActorId, target: ActorId) -> i32 {
        self.damage_log
            .iter()
            .filter(|d| d.attacker == Some(attacker) && d.target == target)
            .map(|d| d.amount)
            .sum()
    }

    /// Expire particles and follow attached ones
    pub fn advance(&mut self, delta: f64) {
        let positions: BTreeMap<ActorId, Vec3> =
            self.players.iter().map(|(id, p)| (*id, p.position)).collect();
        for particle in self.particles.values_mut() {
            particle.remaining -= delta;
            if let Some(pos) = particle.attached_to.and_then(|a| positions.get(&a)) {
                particle.position = *pos;
            }
        }
        self.particles.retain(|_, p| p.remaining > 0.0);
    }
}

impl GameHost for Arena {
    fn players(&self) -> Vec<ActorId> {
        self.players
            .values()
            .filter(|p| p.connected)
            .map(|p| p.id)
            .collect()
    }

    fn is_alive(&self, actor: ActorId) -> bool {
        self.players.get(&actor).map(|p| p.is_alive()).unwrap_or(false)
    }

    fn name(&self, actor: ActorId) -> String {
        self.players
            .get(&actor)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| actor.to_string())
    }

    fn team(&self, actor: ActorId) -> Option<Team> {
        self.players.get(&actor).filter(|p| p.connected).map(|p| p.team)
    }

    fn health(&self, actor: ActorId) -> i32 {
        self.players.get(&actor).map(|p| p.health).unwrap_or(0)
    }

    fn max_health(&self, actor: ActorId) -> i32 {
        self.players.get(&actor).map(|p| p.max_health).unwrap_or(0)
    }

    fn armor(&self, actor: ActorId) -> i32 {
        self.players.get(&actor).map(|p| p.armor).unwrap_or(0)
    }

    fn position(&self, actor: ActorId) -> Option<Vec3> {
        self.players.get(&actor).filter(|p| p.connected).map(|p| p.position)
    }

    fn eye_position(&self, actor: ActorId) -> Option<Vec3> {
        self.position(actor).map(|p| p + Vec3::new(0.0, 0.0, EYE_HEIGHT))
    }

    fn yaw(&self, actor: ActorId) -> Option<f32> {
        self.players.get(&actor).filter(|p| p.connected).map(|p| p.yaw)
    }

    fn model(&self, actor: ActorId) -> Option<String> {
        self.players.get(&actor).filter(|p| p.connected).map(|p| p.model.clone())
    }

    fn weapons(&self, actor: ActorId) -> Vec<String> {
        self.players.get(&actor).map(|p| p.weapons.clone()).unwrap_or_default()
    }

    fn spawn_points(&self, team: Team) -> Vec<Vec3> {
        self.spawn_points.get(&team).cloned().unwrap_or_default()
    }

    fn set_health(&mut self, actor: ActorId, health: i32) {
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.is_alive()) {
            p.health = health.max(0);
            if p.health == 0 {
                p.alive = false;
            }
        }
    }

    fn set_armor(&mut self, actor: ActorId, armor: i32) {
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.connected) {
            p.armor = armor.max(0);
        }
    }

    fn apply_damage(&mut self, target: ActorId, amount: i32, attacker: Option<ActorId>) -> DamageReport {
        let Some(p) = self.players.get_mut(&target).filter(|p| p.is_alive()) else {
            return DamageReport::default();
        };
        let dealt = amount.max(0).min(p.health);
        p.health -= dealt;
        let killed = p.health <= 0;
        if killed {
            p.alive = false;
        }
        let report = DamageReport {
            dealt,
            remaining_health: p.health,
            killed,
        };
        self.damage_log.push(DamageRecord {
            target,
            attacker,
            amount: dealt,
        });
        report
    }

    fn add_velocity(&mut self, actor: ActorId, impulse: Vec3) {
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.is_alive()) {
            p.velocity = p.velocity + impulse;
        }
    }

    fn set_gravity_scale(&mut self, actor: ActorId, scale: f32) {
        if let Some(p) = self.players.get_mut(&actor) {
            p.gravity_scale = scale;
        }
    }

    fn set_speed_modifier(&mut self, actor: ActorId, modifier: f32) {
        if let Some(p) = self.players.get_mut(&actor) {
            p.speed_modifier = modifier;
        }
    }

    fn set_model(&mut self, actor: ActorId, model: &str) {
        if let Some(p) = self.players.get_mut(&actor) {
            p.model = model.to_string();
        }
    }

    fn reset_appearance(&mut self, actor: ActorId) {
        if let Some(p) = self.players.get_mut(&actor) {
            p.model = p.default_model.clone();
        }
    }

    fn teleport(&mut self, actor: ActorId, position: Vec3) {
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.is_alive()) {
            p.position = position;
            p.velocity = Vec3::ZERO;
        }
    }

    fn respawn(&mut self, actor: ActorId) {
        let spawn = self
            .players
            .get(&actor)
            .and_then(|p| self.spawn_points.get(&p.team))
            .and_then(|points| points.first().copied());
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.connected) {
            p.alive = true;
            p.health = p.max_health;
            p.armor = 0;
            p.velocity = Vec3::ZERO;
            p.gravity_scale = 1.0;
            p.speed_modifier = 1.0;
            p.model = p.default_model.clone();
            p.weapons = vec!["weapon_knife".to_string()];
            p.respawn_count += 1;
            if let Some(spawn) = spawn {
                p.position = spawn;
            }
        }
    }

    fn give_weapon(&mut self, actor: ActorId, weapon: &str) {
        if let Some(p) = self.players.get_mut(&actor).filter(|p| p.is_alive()) {
            if !p.weapons.iter().any(|w| w == weapon) {
                p.weapons.push(weapon.to_string());
            }
        }
    }

    fn notify(&mut self, actor: ActorId, kind: NoticeKind, message: &str) {
        self.notices.push(Notice {
            actor,
            kind,
            message: message.to_string(),
        });
    }

    fn spawn_particle(&mut self, position: Vec3, name: &str, duration: f64, attach_to: Option<ActorId>) -> ParticleId {
        self.next_particle += 1;
        self.particles.insert(
            self.next_particle,
            Particle {
                name: name.to_string(),
                position,
                remaining: duration,
                attached_to: attach_to,
            },
        );
        ParticleId(self.next_particle)
    }

    fn remove_particle(&mut self, particle: ParticleId) {
        self.particles.remove(&particle.0);
    }
}
