//! Core types shared by effects, cooldowns and class controllers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Identifier of a player-controlled actor
///
/// Effects and deferred tasks only ever hold this id, never the actor itself.
/// Liveness is re-checked through the host every time the id is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ActorId {
    fn from(id: u32) -> Self {
        ActorId(id)
    }
}

/// Team an actor plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Terrorist,
    CounterTerrorist,
}

impl Team {
    /// The opposing team
    pub fn enemy(self) -> Team {
        match self {
            Team::Terrorist => Team::CounterTerrorist,
            Team::CounterTerrorist => Team::Terrorist,
        }
    }
}

/// Ability slot index (0-3). Slot 3 is the ultimate by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilitySlot(pub u8);

impl AbilitySlot {
    pub const FIRST: AbilitySlot = AbilitySlot(0);
    pub const SECOND: AbilitySlot = AbilitySlot(1);
    pub const THIRD: AbilitySlot = AbilitySlot(2);
    pub const ULTIMATE: AbilitySlot = AbilitySlot(3);

    /// Number of slots every class exposes
    pub const COUNT: usize = 4;

    pub fn all() -> [AbilitySlot; Self::COUNT] {
        [Self::FIRST, Self::SECOND, Self::THIRD, Self::ULTIMATE]
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The playable hero classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    CryptLord,
    UndeadScourge,
    Warden,
}

impl ClassKind {
    pub fn all() -> &'static [ClassKind] {
        &[ClassKind::CryptLord, ClassKind::UndeadScourge, ClassKind::Warden]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ClassKind::CryptLord => "Crypt Lord",
            ClassKind::UndeadScourge => "Undead Scourge",
            ClassKind::Warden => "Warden",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a class name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hero class: {0}")]
pub struct UnknownClass(pub String);

impl FromStr for ClassKind {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "cryptlord" => Ok(ClassKind::CryptLord),
            "undeadscourge" | "undead" => Ok(ClassKind::UndeadScourge),
            "warden" => Ok(ClassKind::Warden),
            _ => Err(UnknownClass(s.to_string())),
        }
    }
}

/// Display information for one ability, consumed by external UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub name: String,
    pub description: String,
    /// Default cooldown in seconds, for cooldown-gated abilities
    #[serde(default)]
    pub cooldown: Option<f64>,
}

impl AbilityInfo {
    pub fn new(name: &str, description: &str) -> Self {
        AbilityInfo {
            name: name.to_string(),
            description: description.to_string(),
            cooldown: None,
        }
    }

    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.cooldown = Some(seconds);
        self
    }
}

/// World-space position or direction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        (*self - other).length()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_team() {
        assert_eq!(Team::Terrorist.enemy(), Team::CounterTerrorist);
        assert_eq!(Team::CounterTerrorist.enemy(), Team::Terrorist);
    }

    #[test]
    fn test_class_from_str() {
        assert_eq!("Crypt Lord".parse::<ClassKind>(), Ok(ClassKind::CryptLord));
        assert_eq!("undead_scourge".parse::<ClassKind>(), Ok(ClassKind::UndeadScourge));
        assert_eq!("WARDEN".parse::<ClassKind>(), Ok(ClassKind::Warden));
        assert!("paladin".parse::<ClassKind>().is_err());
    }

    #[test]
    fn test_vec3_distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }
}
