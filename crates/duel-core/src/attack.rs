//! Attack kinds and their static definitions

use serde::{Deserialize, Serialize};

/// Kind of attack a combatant can commit to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    LightMelee,
    HeavyMelee,
    Special,
    Kick,
}

/// Immutable per-kind attack parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackDef {
    /// Stamina spent when the attack is committed
    pub stamina_cost: f32,
    /// Damage before armor and critical modifiers
    pub base_damage: f32,
    /// Delay between commit and the hit sensor going live
    pub wind_up_ms: f32,
    /// Regen delay applied to the attacker on commit
    pub regen_delay_ms: f32,
    /// Distance from the attacker's center to the sensor center
    pub reach: f32,
    /// Half of the sensor box side
    pub half_extent: f32,
    /// Knockback impulse magnitude (units per frame)
    pub knockback: f32,
    /// How long the knockback velocity persists
    pub knockback_ms: f32,
    /// Knockback temporarily turns a static body dynamic
    pub unpins_static: bool,
}

const LIGHT_MELEE: AttackDef = AttackDef {
    stamina_cost: 15.0,
    base_damage: 10.0,
    wind_up_ms: 100.0,
    regen_delay_ms: 500.0,
    reach: 60.0,
    half_extent: 20.0,
    knockback: 7.5,
    knockback_ms: 50.0,
    unpins_static: false,
};

const HEAVY_MELEE: AttackDef = AttackDef {
    stamina_cost: 25.0,
    base_damage: 15.0,
    wind_up_ms: 100.0,
    regen_delay_ms: 1000.0,
    reach: 60.0,
    half_extent: 20.0,
    knockback: 9.0,
    knockback_ms: 50.0,
    unpins_static: false,
};

const SPECIAL: AttackDef = AttackDef {
    stamina_cost: 40.0,
    base_damage: 25.0,
    wind_up_ms: 100.0,
    regen_delay_ms: 1500.0,
    reach: 60.0,
    half_extent: 20.0,
    knockback: 12.0,
    knockback_ms: 150.0,
    unpins_static: true,
};

const KICK: AttackDef = AttackDef {
    stamina_cost: 20.0,
    base_damage: 5.0,
    wind_up_ms: 100.0,
    regen_delay_ms: 500.0,
    reach: 60.0,
    half_extent: 20.0,
    knockback: 5.0,
    knockback_ms: 50.0,
    unpins_static: false,
};

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::LightMelee,
        AttackKind::HeavyMelee,
        AttackKind::Special,
        AttackKind::Kick,
    ];

    /// Static definition for this kind
    pub fn def(self) -> &'static AttackDef {
        match self {
            AttackKind::LightMelee => &LIGHT_MELEE,
            AttackKind::HeavyMelee => &HEAVY_MELEE,
            AttackKind::Special => &SPECIAL,
            AttackKind::Kick => &KICK,
        }
    }

    /// Clip name used by the presentation layer
    pub fn clip_name(self) -> &'static str {
        match self {
            AttackKind::LightMelee => "melee",
            AttackKind::HeavyMelee => "melee2",
            AttackKind::Special => "special1",
            AttackKind::Kick => "kick",
        }
    }
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.clip_name())
    }
}
