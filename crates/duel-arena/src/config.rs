//! Arena configuration

use duel_agent::LearningConfig;
use duel_core::{Bounds, CombatantConfig, CombatantOverrides, DuelError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// How the knight reacts to a committed hero attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactiveBlockConfig {
    /// Only attacks started within this distance provoke a block
    pub radius: f32,
    pub probability: f64,
    /// How long the knight keeps the shield up
    pub hold_ms: f32,
}

impl Default for ReactiveBlockConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            probability: 0.75,
            hold_ms: 600.0,
        }
    }
}

/// Everything needed to build an arena
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub bounds: Bounds,
    /// Nominal frame length; velocities are in units per frame
    pub frame_ms: f32,
    #[serde(deserialize_with = "hero_overrides")]
    pub hero: CombatantConfig,
    #[serde(deserialize_with = "knight_overrides")]
    pub knight: CombatantConfig,
    pub telemetry_capacity: usize,
    pub telemetry_flush_ms: f32,
    pub reactive_block: ReactiveBlockConfig,
    pub learning: LearningConfig,
    /// Seed for crits, exploration and reactive blocks
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            frame_ms: 16.67,
            hero: CombatantConfig::hero(),
            knight: CombatantConfig::knight(),
            telemetry_capacity: 60,
            telemetry_flush_ms: 150.0,
            reactive_block: ReactiveBlockConfig::default(),
            learning: LearningConfig::default(),
            seed: 0,
        }
    }
}

fn hero_overrides<'de, D>(deserializer: D) -> std::result::Result<CombatantConfig, D::Error>
where
    D: Deserializer<'de>,
{
    CombatantOverrides::deserialize(deserializer).map(|o| o.apply(CombatantConfig::hero()))
}

fn knight_overrides<'de, D>(deserializer: D) -> std::result::Result<CombatantConfig, D::Error>
where
    D: Deserializer<'de>,
{
    CombatantOverrides::deserialize(deserializer).map(|o| o.apply(CombatantConfig::knight()))
}

impl ArenaConfig {
    /// Load a JSON override file; absent fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_ms <= 0.0 {
            return Err(DuelError::Config("frame_ms must be positive".into()));
        }
        if self.bounds.max.x <= self.bounds.min.x || self.bounds.max.y <= self.bounds.min.y {
            return Err(DuelError::Config("bounds are empty".into()));
        }
        let probabilities = [
            ("reactive_block.probability", self.reactive_block.probability),
            ("learning.epsilon", self.learning.epsilon),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(DuelError::Config(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        for (name, c) in [("hero", &self.hero), ("knight", &self.knight)] {
            if c.max_health <= 0.0 || c.max_stamina <= 0.0 {
                return Err(DuelError::Config(format!("{name} needs positive health and stamina")));
            }
        }
        Ok(())
    }
}
