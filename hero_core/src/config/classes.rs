//! Per-class tunables

use super::{check_curve, check_non_negative, check_positive, ConfigError};
use crate::curve::LevelCurve;
use serde::{Deserialize, Serialize};

/// What happens to the ultimate cooldown when a round starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStartPolicy {
    /// Leave the cooldown as it is
    #[default]
    Keep,
    /// Force the ultimate ready
    Ready,
    /// Force the ultimate onto its full cooldown
    Cooldown,
}

/// Ultimate cooldown settings shared by every class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateConfig {
    /// Full cooldown in seconds after a successful activation
    pub cooldown: f64,
    /// Short cooldown applied when the ultimate found no valid target
    #[serde(default)]
    pub fallback_cooldown: Option<f64>,
    #[serde(default)]
    pub round_start: RoundStartPolicy,
}

impl UltimateConfig {
    fn validate(&self, class: &str) -> Result<(), ConfigError> {
        check_non_negative(&format!("{class}.ultimate.cooldown"), self.cooldown)?;
        if let Some(fallback) = self.fallback_cooldown {
            check_non_negative(&format!("{class}.ultimate.fallback_cooldown"), fallback)?;
        }
        Ok(())
    }
}

/// Crypt Lord: Impale, Spiked Carapace, Carrion Beetles, Locust Swarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptLordConfig {
    pub ultimate: UltimateConfig,
    pub impale_chance: LevelCurve,
    /// Upward velocity added to an impaled victim
    pub impale_impulse: f32,
    pub beetles_chance: LevelCurve,
    pub beetles_damage: LevelCurve,
    /// Spawn armor by carapace level
    pub carapace_armor: LevelCurve,
    pub mirror_chance: LevelCurve,
    /// Fraction of incoming damage mirrored back
    pub mirror_fraction: LevelCurve,
    pub swarm_range: f32,
    pub swarm_health: i32,
    pub swarm_armor_min: i32,
    pub swarm_armor_max: i32,
}

impl Default for CryptLordConfig {
    fn default() -> Self {
        CryptLordConfig {
            ultimate: UltimateConfig {
                cooldown: 40.0,
                fallback_cooldown: Some(5.0),
                round_start: RoundStartPolicy::Keep,
            },
            impale_chance: LevelCurve::linear(0.10, 0.02).capped(0.30),
            impale_impulse: 500.0,
            beetles_chance: LevelCurve::per_level(0.04).capped(0.20),
            beetles_damage: LevelCurve::per_level(3.0),
            carapace_armor: LevelCurve::linear(100.0, 25.0),
            mirror_chance: LevelCurve::linear(0.20, 0.05).capped(0.40),
            mirror_fraction: LevelCurve::linear(0.10, 0.025).capped(0.20),
            swarm_range: 600.0,
            swarm_health: 25,
            swarm_armor_min: 10,
            swarm_armor_max: 30,
        }
    }
}

impl CryptLordConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.ultimate.validate("crypt_lord")?;
        check_curve("crypt_lord.impale_chance", &self.impale_chance)?;
        check_curve("crypt_lord.beetles_chance", &self.beetles_chance)?;
        check_curve("crypt_lord.beetles_damage", &self.beetles_damage)?;
        check_curve("crypt_lord.carapace_armor", &self.carapace_armor)?;
        check_curve("crypt_lord.mirror_chance", &self.mirror_chance)?;
        check_curve("crypt_lord.mirror_fraction", &self.mirror_fraction)?;
        check_non_negative("crypt_lord.swarm_range", self.swarm_range as f64)?;
        check_non_negative("crypt_lord.swarm_health", self.swarm_health as f64)?;
        check_non_negative("crypt_lord.swarm_armor_min", self.swarm_armor_min as f64)?;
        if self.swarm_armor_min > self.swarm_armor_max {
            return Err(super::invalid(format!(
                "crypt_lord.swarm_armor_min {} exceeds swarm_armor_max {}",
                self.swarm_armor_min, self.swarm_armor_max
            )));
        }
        Ok(())
    }
}

/// Undead Scourge: Vampiric Aura, Unholy Aura, Levitation, Suicide Bomber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndeadScourgeConfig {
    pub ultimate: UltimateConfig,
    /// Fraction of dealt damage healed back
    pub vampiric_drain: LevelCurve,
    pub unholy_speed: LevelCurve,
    pub levitation_gravity: LevelCurve,
    /// Seconds between aura re-applications
    pub aura_interval: f64,
    pub explosion_damage: f32,
    pub explosion_radius: f32,
    /// Delay between death and the death explosion
    pub death_explosion_delay: f64,
}

impl Default for UndeadScourgeConfig {
    fn default() -> Self {
        UndeadScourgeConfig {
            ultimate: UltimateConfig {
                cooldown: 50.0,
                fallback_cooldown: None,
                round_start: RoundStartPolicy::Cooldown,
            },
            vampiric_drain: LevelCurve::per_level(0.10),
            unholy_speed: LevelCurve::per_level(0.10),
            levitation_gravity: LevelCurve::per_level(0.10).capped(0.90),
            aura_interval: 1.0,
            explosion_damage: 90.0,
            explosion_radius: 384.0,
            death_explosion_delay: 0.1,
        }
    }
}

impl UndeadScourgeConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.ultimate.validate("undead_scourge")?;
        check_curve("undead_scourge.vampiric_drain", &self.vampiric_drain)?;
        check_curve("undead_scourge.unholy_speed", &self.unholy_speed)?;
        check_curve("undead_scourge.levitation_gravity", &self.levitation_gravity)?;
        check_positive("undead_scourge.aura_interval", self.aura_interval)?;
        check_non_negative("undead_scourge.explosion_damage", self.explosion_damage as f64)?;
        check_positive("undead_scourge.explosion_radius", self.explosion_radius as f64)?;
        check_non_negative("undead_scourge.death_explosion_delay", self.death_explosion_delay)?;
        Ok(())
    }
}

/// Warden: Fan of Knives, Warden's Cloak, Shadow Strike, Vengeance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub ultimate: UltimateConfig,
    pub fan_of_knives_chance: LevelCurve,
    /// Seconds before the disguise teleport
    pub disguise_delay: f64,
    /// Disguise lifetime; unset lasts until the round ends
    pub disguise_duration: Option<f64>,
    /// Maximum yaw difference (degrees) for an attack to count as from behind
    pub cloak_angle: f32,
    pub cloak_reduction: LevelCurve,
    pub cloak_reflect: LevelCurve,
    pub shadow_strike_chance: LevelCurve,
    pub poison_duration: f64,
    pub poison_interval: f64,
    pub poison_damage: i32,
    pub vengeance_delay: f64,
    pub restore_weapons_delay: f64,
}

impl Default for WardenConfig {
    fn default() -> Self {
        WardenConfig {
            ultimate: UltimateConfig {
                cooldown: 0.0,
                fallback_cooldown: None,
                round_start: RoundStartPolicy::Ready,
            },
            fan_of_knives_chance: LevelCurve::per_level(0.044).capped(0.22),
            disguise_delay: 6.0,
            disguise_duration: None,
            cloak_angle: 50.0,
            cloak_reduction: LevelCurve::per_level(0.10).capped(1.0),
            cloak_reflect: LevelCurve::per_level(0.03),
            shadow_strike_chance: LevelCurve::per_level(0.05).capped(0.25),
            poison_duration: 5.0,
            poison_interval: 1.0,
            poison_damage: 3,
            vengeance_delay: 5.0,
            restore_weapons_delay: 1.0,
        }
    }
}

impl WardenConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        self.ultimate.validate("warden")?;
        check_curve("warden.fan_of_knives_chance", &self.fan_of_knives_chance)?;
        check_non_negative("warden.disguise_delay", self.disguise_delay)?;
        if let Some(duration) = self.disguise_duration {
            check_positive("warden.disguise_duration", duration)?;
        }
        check_non_negative("warden.cloak_angle", self.cloak_angle as f64)?;
        check_curve("warden.cloak_reduction", &self.cloak_reduction)?;
        check_curve("warden.cloak_reflect", &self.cloak_reflect)?;
        check_curve("warden.shadow_strike_chance", &self.shadow_strike_chance)?;
        check_positive("warden.poison_duration", self.poison_duration)?;
        check_positive("warden.poison_interval", self.poison_interval)?;
        check_non_negative("warden.poison_damage", self.poison_damage as f64)?;
        check_non_negative("warden.vengeance_delay", self.vengeance_delay)?;
        check_non_negative("warden.restore_weapons_delay", self.restore_weapons_delay)?;
        Ok(())
    }
}
