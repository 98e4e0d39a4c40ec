//! Level curves - ability chance and magnitude scaling

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Linear per-level scaling clamped into `[min, max]`
///
/// `value = clamp(base + step * (level - 1), min, max)` for `level >= 1`.
/// A "per level" curve such as `clamp(0.05 * level, 0, 0.25)` is the same
/// curve with `base == step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// Value at level 1
    pub base: f64,
    /// Added per level above 1
    #[serde(default)]
    pub step: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
}

fn default_max() -> f64 {
    f64::MAX
}

impl LevelCurve {
    /// Curve starting at `base` and growing by `step`, uncapped
    pub const fn linear(base: f64, step: f64) -> Self {
        LevelCurve {
            base,
            step,
            min: 0.0,
            max: f64::MAX,
        }
    }

    /// Curve that grows by `per_level` each level, from zero
    pub const fn per_level(per_level: f64) -> Self {
        Self::linear(per_level, per_level)
    }

    /// Cap the curve at `max`
    pub fn capped(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    /// Value for the given level. Level 0 (locked) is always 0.
    pub fn at(&self, level: u32) -> f64 {
        if level == 0 {
            return 0.0;
        }
        let raw = self.base + self.step * (level - 1) as f64;
        raw.max(self.min).min(self.max)
    }

    /// Roll a uniform [0, 1) draw against the chance at `level`
    pub fn roll<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> bool {
        if level == 0 {
            return false;
        }
        rng.gen::<f64>() < self.at(level)
    }

    /// Whether the curve is well formed
    pub fn is_valid(&self) -> bool {
        self.min <= self.max && self.base.is_finite() && self.step.is_finite()
    }
}
