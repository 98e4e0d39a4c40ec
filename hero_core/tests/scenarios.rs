//! Integration test: assign classes -> dispatch game events -> advance time
//!
//! Drives a full session against the in-memory arena the way a game loop
//! would, checking what players end up with.

use hero_core::prelude::*;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Every chance roll succeeds and random picks take the first candidate
fn lucky() -> StepRng {
    StepRng::new(0, 0)
}

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

/// Two-player arena with a spawn point per team
fn arena() -> (Arena, ActorId, ActorId) {
    let mut arena = Arena::new();
    arena.add_spawn_point(Team::Terrorist, Vec3::new(-900.0, 0.0, 0.0));
    arena.add_spawn_point(Team::CounterTerrorist, Vec3::new(900.0, 0.0, 0.0));
    let hero = arena.add_player(1, "hero", Team::Terrorist, Vec3::ZERO);
    let enemy = arena.add_player(2, "enemy", Team::CounterTerrorist, Vec3::new(100.0, 0.0, 0.0));
    (arena, hero, enemy)
}

fn tick_for(session: &mut Session, arena: &mut Arena, seconds: u32) {
    for _ in 0..seconds {
        session.tick(arena, 1.0);
        arena.advance(1.0);
    }
}

#[test]
fn test_locust_swarm_steals_health_and_armor() {
    separator("LOCUST SWARM");
    let (mut arena, lord, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, lord, ClassKind::CryptLord);
    session
        .levels_mut()
        .set(lord, ClassKind::CryptLord, AbilitySlot::ULTIMATE, 1);

    arena.player_mut(lord).unwrap().health = 50;
    {
        let victim = arena.player_mut(enemy).unwrap();
        victim.health = 10;
        victim.armor = 5;
    }

    let outcome = session.activate_ultimate(&mut arena, lord);
    println!("  Outcome: {}", outcome);

    assert_eq!(outcome, UltimateOutcome::Activated);
    assert_eq!(arena.health(enemy), 0);
    assert_eq!(arena.armor(enemy), 0);
    assert!(!arena.is_alive(enemy));
    assert_eq!(arena.health(lord), 60);
    assert_eq!(arena.armor(lord), 5);
    assert_eq!(session.cooldowns().remaining(lord, AbilitySlot::ULTIMATE), 40.0);
    assert!(arena.was_notified(lord, "Locust Swarm stole 10 health and 5 armor from enemy!"));

    // Still cooling down
    tick_for(&mut session, &mut arena, 10);
    assert_eq!(session.activate_ultimate(&mut arena, lord), UltimateOutcome::NotReady);
}

#[test]
fn test_locust_swarm_without_enemies_uses_fallback_cooldown() {
    let (mut arena, lord, enemy) = arena();
    arena.player_mut(enemy).unwrap().position = Vec3::new(5000.0, 0.0, 0.0);
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, lord, ClassKind::CryptLord);
    session
        .levels_mut()
        .set(lord, ClassKind::CryptLord, AbilitySlot::ULTIMATE, 2);

    assert_eq!(session.activate_ultimate(&mut arena, lord), UltimateOutcome::NoTarget);
    assert!(arena.was_notified(lord, "No enemies in range for the Locust Swarm!"));
    assert_eq!(session.cooldowns().remaining(lord, AbilitySlot::ULTIMATE), 5.0);
    assert_eq!(arena.health(enemy), 100);

    tick_for(&mut session, &mut arena, 5);
    assert!(session.cooldowns().is_ready(lord, AbilitySlot::ULTIMATE));
}

#[test]
fn test_warden_vengeance_round_trip() {
    separator("VENGEANCE");
    let (mut arena, warden, enemy) = arena();
    arena
        .player_mut(warden)
        .unwrap()
        .weapons
        .push("weapon_awp".to_string());
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session
        .levels_mut()
        .set(warden, ClassKind::Warden, AbilitySlot::ULTIMATE, 1);

    session.deal_damage(&mut arena, Some(enemy), warden, 150);
    assert!(!arena.is_alive(warden));
    assert!(arena.was_notified(warden, "Vengeance activated! Respawning in 5 seconds..."));
    assert_eq!(session.scheduler().pending(), 1);

    tick_for(&mut session, &mut arena, 4);
    assert!(!arena.is_alive(warden));

    tick_for(&mut session, &mut arena, 1);
    assert!(arena.is_alive(warden));
    assert_eq!(arena.health(warden), 100);
    assert_eq!(arena.weapons(warden), vec!["weapon_knife".to_string()]);
    assert!(arena.was_notified(warden, "You have returned with Vengeance!"));
    // The Vengeance respawn does not roll Fan of Knives
    assert!(session.effects().is_empty());

    tick_for(&mut session, &mut arena, 1);
    let weapons = arena.weapons(warden);
    println!("  Weapons after restore: {:?}", weapons);
    assert_eq!(weapons, vec!["weapon_knife", "weapon_glock", "weapon_awp"]);

    // Once per round
    session.deal_damage(&mut arena, Some(enemy), warden, 150);
    assert!(!arena.is_alive(warden));
    assert_eq!(session.scheduler().pending(), 0);

    // A new round makes it available again
    session.dispatch(&mut arena, GameEvent::RoundStarted);
    assert!(session.cooldowns().is_ready(warden, AbilitySlot::ULTIMATE));
    arena.respawn(warden);
    session.deal_damage(&mut arena, Some(enemy), warden, 150);
    assert_eq!(session.scheduler().pending(), 1);

    // Round end cancels the pending respawn
    session.dispatch(&mut arena, GameEvent::RoundEnded);
    assert_eq!(session.scheduler().pending(), 0);
    tick_for(&mut session, &mut arena, 10);
    assert!(!arena.is_alive(warden));
}

#[test]
fn test_fan_of_knives_teleports_into_enemy_spawn() {
    let (mut arena, warden, enemy) = arena();
    arena.player_mut(enemy).unwrap().model = "characters/models/ctm_fbi.vmdl".to_string();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session
        .levels_mut()
        .set(warden, ClassKind::Warden, AbilitySlot::FIRST, 5);

    session.dispatch(&mut arena, GameEvent::PlayerSpawned { actor: warden });
    assert_eq!(session.effects().effects_of_kind(EffectTag::Disguise).len(), 1);
    assert!(arena.was_notified(warden, "Fan of Knives! Teleport in 6 seconds."));

    tick_for(&mut session, &mut arena, 5);
    assert_eq!(arena.position(warden), Some(Vec3::ZERO));

    tick_for(&mut session, &mut arena, 1);
    assert_eq!(arena.position(warden), Some(Vec3::new(900.0, 0.0, 0.0)));
    assert_eq!(arena.model(warden).as_deref(), Some("characters/models/ctm_fbi.vmdl"));

    // The disguise lasts until the round ends
    session.dispatch(&mut arena, GameEvent::RoundEnded);
    assert!(session.effects().is_empty());
    assert_eq!(arena.model(warden).as_deref(), Some("characters/models/tm_phoenix.vmdl"));
    assert!(arena.was_notified(warden, "Your mole disguise has worn off."));
}

#[test]
fn test_shadow_strike_poison_through_session() {
    let (mut arena, warden, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session
        .levels_mut()
        .set(warden, ClassKind::Warden, AbilitySlot::THIRD, 5);

    session.deal_damage(&mut arena, Some(warden), enemy, 10);
    let poisons = session.effects().effects_of_kind(EffectTag::Poison);
    assert_eq!(poisons.len(), 1);
    let first = poisons[0].id();
    assert!(arena.was_notified(warden, "You poisoned enemy with Shadow Strike!"));

    // A second hit while poisoned does not stack
    session.deal_damage(&mut arena, Some(warden), enemy, 10);
    assert_eq!(session.effects().effects_of_kind(EffectTag::Poison).len(), 1);
    assert_eq!(arena.health(enemy), 80);

    tick_for(&mut session, &mut arena, 5);
    assert_eq!(arena.health(enemy), 65);
    assert!(!session.effects().is_live(first));
}

#[test]
fn test_final_poison_tick_reapplies_shadow_strike() {
    separator("SHADOW STRIKE CHAIN");
    let (mut arena, warden, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session
        .levels_mut()
        .set(warden, ClassKind::Warden, AbilitySlot::THIRD, 5);

    session.deal_damage(&mut arena, Some(warden), enemy, 10);
    let first = session.effects().effects_of_kind(EffectTag::Poison)[0].id();

    // Ticks while the first poison is live never stack a second one
    tick_for(&mut session, &mut arena, 4);
    assert_eq!(session.effects().effects_of_kind(EffectTag::Poison).len(), 1);

    // The last tick lands after the poison is gone, so it counts as a fresh hit
    tick_for(&mut session, &mut arena, 1);
    let poisons = session.effects().effects_of_kind(EffectTag::Poison);
    assert_eq!(poisons.len(), 1);
    assert_ne!(poisons[0].id(), first);
    assert_eq!(arena.health(enemy), 75);
    let strikes = arena
        .notices_for(warden)
        .iter()
        .filter(|n| n.message == "You poisoned enemy with Shadow Strike!")
        .count();
    println!("  Shadow Strike applications: {}", strikes);
    assert_eq!(strikes, 2);

    // The chain ends with the victim
    arena.player_mut(enemy).unwrap().health = 3;
    tick_for(&mut session, &mut arena, 1);
    assert!(!arena.is_alive(enemy));
    tick_for(&mut session, &mut arena, 1);
    assert!(session.effects().effects_of_kind(EffectTag::Poison).is_empty());
}

#[test]
fn test_undead_round_start_puts_ultimate_on_cooldown() {
    let (mut arena, undead, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, undead, ClassKind::UndeadScourge);
    session
        .levels_mut()
        .set(undead, ClassKind::UndeadScourge, AbilitySlot::ULTIMATE, 1);

    session.dispatch(&mut arena, GameEvent::RoundStarted);
    assert_eq!(session.activate_ultimate(&mut arena, undead), UltimateOutcome::NotReady);

    tick_for(&mut session, &mut arena, 50);
    assert_eq!(session.activate_ultimate(&mut arena, undead), UltimateOutcome::Activated);
    assert!(!arena.is_alive(undead));
    // 100 units away, feet 64 below the blast
    assert!(arena.health(enemy) < 100);

    // A self-detonation does not explode twice
    let after_blast = arena.health(enemy);
    tick_for(&mut session, &mut arena, 1);
    assert_eq!(arena.health(enemy), after_blast);
}

#[test]
fn test_undead_death_explosion_follows_the_corpse() {
    let (mut arena, undead, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, undead, ClassKind::UndeadScourge);
    session
        .levels_mut()
        .set(undead, ClassKind::UndeadScourge, AbilitySlot::ULTIMATE, 1);

    session.deal_damage(&mut arena, Some(enemy), undead, 500);
    assert_eq!(session.scheduler().pending(), 1);
    assert_eq!(arena.health(enemy), 100);

    session.tick(&mut arena, 0.1);
    assert!(arena.health(enemy) < 100);
    assert!(arena.particles().any(|p| p.name.contains("explosion")));
}

#[test]
fn test_round_end_drops_pending_death_explosion() {
    let (mut arena, undead, enemy) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, undead, ClassKind::UndeadScourge);
    session
        .levels_mut()
        .set(undead, ClassKind::UndeadScourge, AbilitySlot::ULTIMATE, 1);

    session.deal_damage(&mut arena, Some(enemy), undead, 500);
    assert_eq!(session.scheduler().pending(), 1);

    session.dispatch(&mut arena, GameEvent::RoundEnded);
    assert_eq!(session.scheduler().pending(), 0);

    session.tick(&mut arena, 0.1);
    assert_eq!(arena.health(enemy), 100);
    assert!(!arena.particles().any(|p| p.name.contains("explosion")));
}

#[test]
fn test_snapshot_reports_classes_and_effects() {
    let (mut arena, undead, warden) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), lucky());
    session.assign_class(&mut arena, undead, ClassKind::UndeadScourge);
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session.dispatch(&mut arena, GameEvent::PlayerSpawned { actor: undead });

    let snapshot = session.snapshot();
    assert_eq!(snapshot.classes.len(), 2);
    assert_eq!(snapshot.effects.len(), 1);
    assert_eq!(snapshot.effects[0].tag, EffectTag::UndeadAura);
    assert_eq!(snapshot.cooldowns.len(), 2);

    let json = serde_json::to_string_pretty(&snapshot).unwrap();
    println!("{}", json);
    assert!(json.contains("warden"));
}

/// Trade hits between a leveled Crypt Lord and Warden and report the outcome
fn duel(seed: u64) -> (i32, i32, usize) {
    let (mut arena, lord, warden) = arena();
    let mut session = Session::with_rng(HeroConfig::default(), StdRng::seed_from_u64(seed));
    session.assign_class(&mut arena, lord, ClassKind::CryptLord);
    session.assign_class(&mut arena, warden, ClassKind::Warden);
    session.levels_mut().set_all(lord, ClassKind::CryptLord, [5, 5, 5, 1]);
    session.levels_mut().set_all(warden, ClassKind::Warden, [5, 5, 5, 1]);
    session.dispatch(&mut arena, GameEvent::PlayerSpawned { actor: lord });
    session.dispatch(&mut arena, GameEvent::PlayerSpawned { actor: warden });

    for _ in 0..4 {
        session.deal_damage(&mut arena, Some(lord), warden, 12);
        session.deal_damage(&mut arena, Some(warden), lord, 12);
        tick_for(&mut session, &mut arena, 1);
    }
    (arena.health(lord), arena.health(warden), arena.notices().len())
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    assert_eq!(duel(1234), duel(1234));
}
