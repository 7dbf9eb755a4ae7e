//! Armor zones, mitigation, and durability decay

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combatant::{ArmorSlot, Combatant};

/// Chance that a landed hit is critical
pub const CRIT_CHANCE: f64 = 0.1;

/// Damage multiplier for a critical hit
pub const CRIT_MULTIPLIER: f32 = 1.5;

/// Body zone struck by a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitZone {
    Head,
    Torso,
    Limb,
}

impl HitZone {
    /// Armor slot covering this zone
    pub fn slot(self) -> ArmorSlot {
        match self {
            HitZone::Head => ArmorSlot::Helmet,
            HitZone::Torso => ArmorSlot::Breastplate,
            HitZone::Limb => ArmorSlot::Greaves,
        }
    }
}

/// Map a hit's distance from the body center to a zone. Not facing-dependent.
pub fn select_zone(hit_distance: f32, body_radius: f32) -> HitZone {
    if hit_distance < body_radius * 0.3 {
        HitZone::Head
    } else if hit_distance < body_radius * 0.7 {
        HitZone::Torso
    } else {
        HitZone::Limb
    }
}

/// Run `raw` damage through the zone's armor and return what gets through.
///
/// Durability is depleted by the raw amount while any remains. The hit that
/// takes it to zero breaks the piece: mitigation is halved once and
/// durability clamps at zero. A broken piece keeps its halved mitigation.
pub fn apply_damage(target: &mut Combatant, zone: HitZone, raw: f32) -> f32 {
    let slot = zone.slot();
    if let Some(piece) = target.armor.get_mut(slot) {
        if !piece.broken && piece.durability > 0.0 {
            piece.durability -= raw;
            if piece.durability <= 0.0 {
                piece.durability = 0.0;
                piece.mitigation /= 2.0;
                piece.broken = true;
                debug!(combatant = %target.id, ?slot, mitigation = piece.mitigation, "armor broke");
            }
        }
    }
    raw * (1.0 - target.armor.mitigation(slot))
}

/// Roll for a critical hit; returns the multiplier to apply
pub fn roll_critical<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(CRIT_CHANCE) {
        CRIT_MULTIPLIER
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatantId;
    use crate::config::CombatantConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn knight() -> Combatant {
        Combatant::from_config(CombatantId::Knight, &CombatantConfig::knight())
    }

    #[test]
    fn test_zone_thresholds() {
        assert_eq!(select_zone(0.0, 42.0), HitZone::Head);
        assert_eq!(select_zone(12.0, 42.0), HitZone::Head);
        assert_eq!(select_zone(13.0, 42.0), HitZone::Torso);
        assert_eq!(select_zone(29.0, 42.0), HitZone::Torso);
        assert_eq!(select_zone(30.0, 42.0), HitZone::Limb);
        assert_eq!(select_zone(500.0, 42.0), HitZone::Limb);
    }

    #[test]
    fn test_mitigation_applies() {
        let mut k = knight();
        let dealt = apply_damage(&mut k, HitZone::Torso, 10.0);
        assert!((dealt - 6.0).abs() < 1e-5);
        assert_eq!(k.armor.durability(ArmorSlot::Breastplate), 30.0);
    }

    #[test]
    fn test_break_halves_exactly_once() {
        let mut k = knight();
        let before = k.armor.mitigation(ArmorSlot::Greaves);

        // 25 durability: 10 + 10 + 10 breaks on the third hit
        apply_damage(&mut k, HitZone::Limb, 10.0);
        apply_damage(&mut k, HitZone::Limb, 10.0);
        assert_eq!(k.armor.mitigation(ArmorSlot::Greaves), before);
        apply_damage(&mut k, HitZone::Limb, 10.0);
        assert_eq!(k.armor.durability(ArmorSlot::Greaves), 0.0);
        assert_eq!(k.armor.mitigation(ArmorSlot::Greaves), before / 2.0);

        for _ in 0..5 {
            apply_damage(&mut k, HitZone::Limb, 10.0);
        }
        assert_eq!(k.armor.durability(ArmorSlot::Greaves), 0.0);
        assert_eq!(k.armor.mitigation(ArmorSlot::Greaves), before / 2.0);
    }

    #[test]
    fn test_breaking_hit_uses_halved_mitigation() {
        let mut k = knight();
        // Helmet: 30 durability, 0.15 mitigation
        let dealt = apply_damage(&mut k, HitZone::Head, 40.0);
        assert!((dealt - 40.0 * (1.0 - 0.075)).abs() < 1e-4);
    }

    #[test]
    fn test_critical_rate_is_about_ten_percent() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let crits = (0..10_000)
            .filter(|_| roll_critical(&mut rng) > 1.0)
            .count();
        assert!((800..1200).contains(&crits), "crit count {crits}");
    }
}
