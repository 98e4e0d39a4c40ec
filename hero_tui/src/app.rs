//! Application state

use hero_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;

/// Highest rank the level-up key cycles through
pub const MAX_LEVEL: u32 = 5;

/// Damage a basic attack deals
pub const ATTACK_DAMAGE: i32 = 20;

/// Where `d` writes the session snapshot
pub const SNAPSHOT_PATH: &str = "hero_snapshot.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Arena,
    Abilities,
    Effects,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Arena, Tab::Abilities, Tab::Effects, Tab::Help]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tab::Arena => "Arena",
            Tab::Abilities => "Abilities",
            Tab::Effects => "Effects",
            Tab::Help => "Help",
        }
    }
}

pub struct App {
    pub current_tab: Tab,
    pub arena: Arena,
    pub session: Session,
    pub players: Vec<ActorId>,
    pub selected_player: usize,
    pub selected_slot: usize,
    pub log: Vec<String>,
    pub log_scroll: usize,
    pub time_elapsed: f64,
    pub paused: bool,
    pub show_help: bool,
    seed: u64,
    /// Arena notices already copied into the log
    notices_seen: usize,
}

impl App {
    pub fn new(seed: u64) -> Self {
        let config = default_config();
        let session = Session::with_rng(config, ChaCha8Rng::seed_from_u64(seed));

        let mut app = App {
            current_tab: Tab::Arena,
            arena: Arena::new(),
            session,
            players: Vec::new(),
            selected_player: 0,
            selected_slot: 0,
            log: Vec::new(),
            log_scroll: 0,
            time_elapsed: 0.0,
            paused: true,
            show_help: false,
            seed,
            notices_seen: 0,
        };
        app.populate();
        app
    }

    /// Two players per team, one of each class plus a classless target
    fn populate(&mut self) {
        self.arena.add_spawn_point(Team::Terrorist, Vec3::new(-1200.0, 0.0, 0.0));
        self.arena.add_spawn_point(Team::Terrorist, Vec3::new(-1200.0, 200.0, 0.0));
        self.arena.add_spawn_point(Team::CounterTerrorist, Vec3::new(1200.0, 0.0, 0.0));
        self.arena.add_spawn_point(Team::CounterTerrorist, Vec3::new(1200.0, 200.0, 0.0));

        let roster = [
            (1, "Anub'arak", Team::Terrorist, Vec3::new(-100.0, 0.0, 0.0), Some(ClassKind::CryptLord)),
            (2, "Kel'Thuzad", Team::Terrorist, Vec3::new(-150.0, 150.0, 0.0), Some(ClassKind::UndeadScourge)),
            (3, "Maiev", Team::CounterTerrorist, Vec3::new(100.0, 0.0, 0.0), Some(ClassKind::Warden)),
            (4, "Footman", Team::CounterTerrorist, Vec3::new(200.0, 150.0, 0.0), None),
        ];

        for (id, name, team, position, class) in roster {
            let actor = self.arena.add_player(id, name, team, position);
            if let Some(player) = self.arena.player_mut(actor) {
                // Face the other team
                player.yaw = if team == Team::Terrorist { 0.0 } else { 180.0 };
            }
            self.players.push(actor);
            if let Some(kind) = class {
                self.session.assign_class(&mut self.arena, actor, kind);
                self.session.levels_mut().set_all(actor, kind, [1, 1, 1, 1]);
            }
        }

        self.session.dispatch(&mut self.arena, GameEvent::RoundStarted);
        for actor in self.players.clone() {
            self.session.dispatch(&mut self.arena, GameEvent::PlayerSpawned { actor });
        }
        self.push_log(format!("Arena ready (seed {}).", self.seed));
        self.collect_notices();
    }

    pub fn next_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        self.current_tab = tabs[(current_idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let current_idx = tabs.iter().position(|t| *t == self.current_tab).unwrap_or(0);
        let prev_idx = if current_idx == 0 {
            tabs.len() - 1
        } else {
            current_idx - 1
        };
        self.current_tab = tabs[prev_idx];
    }

    pub fn set_tab(&mut self, index: usize) {
        let tabs = Tab::all();
        if index < tabs.len() {
            self.current_tab = tabs[index];
        }
    }

    pub fn on_up(&mut self) {
        match self.current_tab {
            Tab::Arena => {
                if self.selected_player > 0 {
                    self.selected_player -= 1;
                }
            }
            Tab::Abilities => {
                if self.selected_slot > 0 {
                    self.selected_slot -= 1;
                }
            }
            Tab::Effects => {
                if self.log_scroll > 0 {
                    self.log_scroll -= 1;
                }
            }
            Tab::Help => {}
        }
    }

    pub fn on_down(&mut self) {
        match self.current_tab {
            Tab::Arena => {
                if self.selected_player < self.players.len().saturating_sub(1) {
                    self.selected_player += 1;
                }
            }
            Tab::Abilities => {
                if self.selected_slot < AbilitySlot::COUNT - 1 {
                    self.selected_slot += 1;
                }
            }
            Tab::Effects => {
                self.log_scroll += 1;
            }
            Tab::Help => {}
        }
    }

    pub fn selected_actor(&self) -> Option<ActorId> {
        self.players.get(self.selected_player).copied()
    }

    pub fn actor_name(&self, actor: ActorId) -> String {
        self.arena.name(actor)
    }

    /// Selected player attacks the closest living enemy
    pub fn attack(&mut self) {
        let Some(attacker) = self.selected_actor() else {
            return;
        };
        if !self.arena.is_alive(attacker) {
            self.push_log(format!("{} is dead and cannot attack.", self.actor_name(attacker)));
            return;
        }
        let Some(target) = self.closest_enemy(attacker) else {
            self.push_log("No living enemy to attack.".to_string());
            return;
        };

        let before = self.arena.health(target);
        let report = self
            .session
            .deal_damage(&mut self.arena, Some(attacker), target, ATTACK_DAMAGE);
        let after = self.arena.health(target);
        self.push_log(format!(
            "━━━ {} hits {} for {} ({} → {} HP)",
            self.actor_name(attacker),
            self.actor_name(target),
            report.dealt,
            before,
            after
        ));
        if after < report.remaining_health {
            self.push_log(format!("  ▶ Bonus damage: {}", report.remaining_health - after));
        } else if after > report.remaining_health {
            self.push_log(format!("  ▶ Damage ignored: {}", after - report.remaining_health));
        }
        if !self.arena.is_alive(target) {
            self.push_log(format!("  → {} DEFEATED", self.actor_name(target)));
        }
        self.collect_notices();
    }

    pub fn ultimate(&mut self) {
        let Some(actor) = self.selected_actor() else {
            return;
        };
        let outcome = self.session.activate_ultimate(&mut self.arena, actor);
        self.push_log(format!("{} ultimate: {}", self.actor_name(actor), outcome));
        self.collect_notices();
    }

    /// Kill the selected player outright (world damage)
    pub fn kill_selected(&mut self) {
        let Some(actor) = self.selected_actor() else {
            return;
        };
        let health = self.arena.health(actor);
        if health <= 0 {
            return;
        }
        self.session.deal_damage(&mut self.arena, None, actor, health);
        self.push_log(format!("{} was killed by the world.", self.actor_name(actor)));
        self.collect_notices();
    }

    pub fn respawn_selected(&mut self) {
        let Some(actor) = self.selected_actor() else {
            return;
        };
        if self.arena.is_alive(actor) {
            return;
        }
        self.arena.respawn(actor);
        self.session.dispatch(&mut self.arena, GameEvent::PlayerSpawned { actor });
        self.push_log(format!("{} respawned.", self.actor_name(actor)));
        self.collect_notices();
    }

    /// Switch the selected player to the next class
    pub fn cycle_class(&mut self) {
        let Some(actor) = self.selected_actor() else {
            return;
        };
        let classes = ClassKind::all();
        let next = match self.session.class_of(actor) {
            Some(kind) => {
                let idx = classes.iter().position(|k| *k == kind).unwrap_or(0);
                classes[(idx + 1) % classes.len()]
            }
            None => classes[0],
        };
        self.session.assign_class(&mut self.arena, actor, next);
        if self.session.levels().get(actor, next, AbilitySlot::FIRST) == 0 {
            self.session.levels_mut().set_all(actor, next, [1, 1, 1, 1]);
        }
        self.session.dispatch(&mut self.arena, GameEvent::PlayerSpawned { actor });
        self.push_log(format!("{} is now a {}.", self.actor_name(actor), next));
        self.collect_notices();
    }

    /// Raise the selected slot by one rank, wrapping back to 0 past the max
    pub fn level_up(&mut self) {
        let Some(actor) = self.selected_actor() else {
            return;
        };
        let Some(kind) = self.session.class_of(actor) else {
            self.push_log(format!("{} has no class.", self.actor_name(actor)));
            return;
        };
        let slot = AbilitySlot::all()[self.selected_slot];
        let level = self.session.levels().get(actor, kind, slot);
        let next = if level >= MAX_LEVEL { 0 } else { level + 1 };
        self.session.levels_mut().set(actor, kind, slot, next);
        self.push_log(format!(
            "{} slot {} → level {}",
            self.actor_name(actor),
            slot.index() + 1,
            next
        ));
    }

    pub fn start_round(&mut self) {
        self.session.dispatch(&mut self.arena, GameEvent::RoundStarted);
        for actor in self.players.clone() {
            if !self.arena.is_alive(actor) {
                self.arena.respawn(actor);
            }
            self.session.dispatch(&mut self.arena, GameEvent::PlayerSpawned { actor });
        }
        self.push_log("═══ Round started ═══".to_string());
        self.collect_notices();
    }

    pub fn end_round(&mut self) {
        self.session.dispatch(&mut self.arena, GameEvent::RoundEnded);
        self.push_log("═══ Round ended ═══".to_string());
        self.collect_notices();
    }

    pub fn tick_time(&mut self, seconds: f64) {
        self.time_elapsed += seconds;
        self.session.tick(&mut self.arena, seconds);
        self.arena.advance(seconds);
        self.collect_notices();
    }

    /// Real-time tick from the main loop; ignored while paused
    pub fn tick(&mut self, delta: f64) {
        if !self.paused {
            self.tick_time(delta);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let state = if self.paused { "paused" } else { "running" };
        self.push_log(format!("Clock {}.", state));
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.current_tab = Tab::Help;
        }
    }

    /// Write the session snapshot as JSON
    pub fn dump_snapshot(&mut self) {
        let snapshot = self.session.snapshot();
        let result = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(SNAPSHOT_PATH, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => self.push_log(format!("Snapshot written to {}", SNAPSHOT_PATH)),
            Err(e) => {
                tracing::error!(error = %e, "snapshot failed");
                self.push_log(format!("Snapshot failed: {}", e));
            }
        }
    }

    /// Start over with the same seed
    pub fn reset(&mut self) {
        self.session.shutdown(&mut self.arena);
        *self = App::new(self.seed);
        self.push_log("Arena reset.".to_string());
    }

    fn closest_enemy(&self, actor: ActorId) -> Option<ActorId> {
        let team = self.arena.team(actor)?;
        let origin = self.arena.position(actor)?;
        self.players
            .iter()
            .copied()
            .filter(|p| self.arena.team(*p) == Some(team.enemy()) && self.arena.is_alive(*p))
            .filter_map(|p| self.arena.position(p).map(|pos| (p, pos.distance(origin))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| p)
    }

    /// Copy notices the arena received since the last call into the log
    fn collect_notices(&mut self) {
        let fresh: Vec<String> = self.arena.notices()[self.notices_seen..]
            .iter()
            .map(|n| format!("  [{:?}] {}: {}", n.kind, self.arena.name(n.actor), n.message))
            .collect();
        self.notices_seen = self.arena.notices().len();
        for line in fresh {
            self.push_log(line);
        }
    }

    fn push_log(&mut self, line: String) {
        self.log.push(format!("[{:>6.1}s] {}", self.time_elapsed, line));
        // Auto-scroll to bottom
        self.log_scroll = self.log.len().saturating_sub(15);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(42)
    }
}
