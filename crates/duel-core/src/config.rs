//! Per-combatant tuning

use serde::{Deserialize, Serialize};

use crate::combatant::{ArmorSet, ArmorSlot, BodyMode};
use crate::geometry::{Facing, Vec2};

/// Starting values for one combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantConfig {
    pub max_health: f32,
    pub max_stamina: f32,
    /// Stamina regained per tick
    pub stamina_regen_rate: f32,
    /// Hurtbox radius
    pub body_radius: f32,
    pub spawn: Vec2,
    pub facing: Facing,
    pub body_mode: BodyMode,
    pub armor: ArmorSet,
}

impl CombatantConfig {
    /// Player defaults: lighter armor, dynamic body
    pub fn hero() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen_rate: 1.0,
            body_radius: 42.0,
            spawn: Vec2::new(750.0, 640.0),
            facing: Facing::N,
            body_mode: BodyMode::Dynamic,
            armor: ArmorSet::new()
                .with(ArmorSlot::Helmet, 0.10, 20.0)
                .with(ArmorSlot::Breastplate, 0.30, 30.0)
                .with(ArmorSlot::Greaves, 0.15, 15.0)
                .with(ArmorSlot::Shield, 0.50, 25.0),
        }
    }

    /// Opponent defaults: heavier armor, pinned in place unless moving
    pub fn knight() -> Self {
        Self {
            max_health: 50.0,
            max_stamina: 100.0,
            stamina_regen_rate: 1.0,
            body_radius: 42.0,
            spawn: Vec2::new(750.0, 330.0),
            facing: Facing::S,
            body_mode: BodyMode::Static,
            armor: ArmorSet::new()
                .with(ArmorSlot::Helmet, 0.15, 30.0)
                .with(ArmorSlot::Breastplate, 0.40, 40.0)
                .with(ArmorSlot::Greaves, 0.20, 25.0)
                .with(ArmorSlot::Shield, 0.60, 35.0),
        }
    }
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self::hero()
    }
}

/// Partial combatant config; only the fields present are applied
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CombatantOverrides {
    pub max_health: Option<f32>,
    pub max_stamina: Option<f32>,
    pub stamina_regen_rate: Option<f32>,
    pub body_radius: Option<f32>,
    pub spawn: Option<Vec2>,
    pub facing: Option<Facing>,
    pub body_mode: Option<BodyMode>,
    pub armor: Option<ArmorSet>,
}

impl CombatantOverrides {
    pub fn apply(self, base: CombatantConfig) -> CombatantConfig {
        CombatantConfig {
            max_health: self.max_health.unwrap_or(base.max_health),
            max_stamina: self.max_stamina.unwrap_or(base.max_stamina),
            stamina_regen_rate: self.stamina_regen_rate.unwrap_or(base.stamina_regen_rate),
            body_radius: self.body_radius.unwrap_or(base.body_radius),
            spawn: self.spawn.unwrap_or(base.spawn),
            facing: self.facing.unwrap_or(base.facing),
            body_mode: self.body_mode.unwrap_or(base.body_mode),
            armor: self.armor.unwrap_or(base.armor),
        }
    }
}
