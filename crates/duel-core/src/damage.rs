//! Impact resolution: directional block, armor, criticals, knockback

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::armor::{self, HitZone};
use crate::attack::AttackKind;
use crate::combatant::{BodyMode, Combatant, CombatantId, Knockback};
use crate::geometry::{Vec2, shortest_angle_deg};
use crate::machine::BlockPhase;
use crate::sensor::SensorHit;
use crate::stamina;

/// Half-width of the arc a raised shield covers
pub const BLOCK_ARC_DEG: f32 = 45.0;

/// Stamina drained by each absorbed hit
pub const BLOCK_STAMINA_COST: f32 = 15.0;

/// Hit reaction window during which further impacts are ignored
pub const HIT_STUN_MS: f32 = 500.0;

/// What one sensor contact did to its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub attacker: CombatantId,
    pub target: CombatantId,
    pub kind: AttackKind,
    /// Target was dead or still reeling; nothing happened
    pub ignored: bool,
    /// Absorbed by a correctly facing shield
    pub blocked: bool,
    pub zone: Option<HitZone>,
    pub critical: bool,
    /// Damage after armor and critical modifiers
    pub damage: f32,
    /// This impact killed the target
    pub died: bool,
}

impl ImpactReport {
    fn empty(attacker: CombatantId, target: CombatantId, kind: AttackKind) -> Self {
        Self {
            attacker,
            target,
            kind,
            ignored: false,
            blocked: false,
            zone: None,
            critical: false,
            damage: 0.0,
            died: false,
        }
    }

    /// Damage landed on a living or dying target
    pub fn landed(&self) -> bool {
        self.damage > 0.0 && !self.blocked && !self.ignored
    }
}

/// Whether `defender` absorbs a blow arriving from `attacker_position`.
///
/// Requires a raised shield (start or hold), no exhaustion, and the attacker
/// within [`BLOCK_ARC_DEG`] of the defender's facing.
pub fn resolve_block(defender: &Combatant, attacker_position: Vec2) -> bool {
    if !defender.is_blocking() || stamina::is_exhausted(defender) {
        return false;
    }
    let threat = defender.position.angle_to(attacker_position).to_degrees();
    let facing = defender.facing.angle().to_degrees();
    shortest_angle_deg(facing, threat).abs() <= BLOCK_ARC_DEG
}

/// Run a sensor contact through the damage pipeline
pub fn resolve_impact<R: Rng + ?Sized>(
    attacker: &Combatant,
    target: &mut Combatant,
    hit: &SensorHit,
    rng: &mut R,
) -> ImpactReport {
    let mut report = ImpactReport::empty(attacker.id, target.id, hit.kind);
    if target.dead || target.hit_stun_ms > 0.0 {
        report.ignored = true;
        return report;
    }
    if resolve_block(target, attacker.position) {
        stamina::drain(target, BLOCK_STAMINA_COST);
        report.blocked = true;
        debug!(defender = %target.id, stamina = target.stamina, "hit blocked");
        return report;
    }
    let multiplier = armor::roll_critical(rng);
    land(attacker, target, hit, multiplier, report)
}

fn land(
    attacker: &Combatant,
    target: &mut Combatant,
    hit: &SensorHit,
    crit_multiplier: f32,
    mut report: ImpactReport,
) -> ImpactReport {
    let zone = armor::select_zone(hit.center.distance(target.position), target.body_radius);
    let mitigated = armor::apply_damage(target, zone, hit.kind.def().base_damage);
    let damage = mitigated * crit_multiplier;
    let change = target.take_damage(damage);

    report.zone = Some(zone);
    report.critical = crit_multiplier > 1.0;
    report.damage = damage;
    report.died = change.died;

    if damage > 0.0 && !change.died {
        // A landed hit knocks the shield down and cuts any movement short
        target.block = BlockPhase::Idle;
        target.halt();
        target.hit_stun_ms = HIT_STUN_MS;
        apply_knockback(target, attacker.position, hit.kind);
    }
    debug!(
        attacker = %attacker.id,
        target = %target.id,
        kind = %hit.kind,
        ?zone,
        damage,
        health = target.health,
        "hit landed"
    );
    report
}

/// Push `target` directly away from `source`.
///
/// Static bodies only yield to attacks that unpin them; those switch the body
/// to dynamic until the impulse window closes.
pub fn apply_knockback(target: &mut Combatant, source: Vec2, kind: AttackKind) {
    let def = kind.def();
    if target.dead || (target.rest_mode == BodyMode::Static && !def.unpins_static) {
        return;
    }
    let mut away = (target.position - source).normalize();
    if away.is_zero() {
        away = -target.facing.unit();
    }
    target.movement = None;
    target.velocity = away * def.knockback;
    target.knockback = Some(Knockback {
        remaining_ms: def.knockback_ms,
    });
    if def.unpins_static {
        target.body_mode = BodyMode::Dynamic;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{ArmorSlot, Duelists, MovementKind};
    use crate::config::CombatantConfig;
    use crate::geometry::Facing;
    use crate::sensor::HitSensor;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::FRAC_PI_2;

    /// Hero at (500, 500) facing east, knight 80 units east of it facing west
    fn duel() -> Duelists {
        let mut hero = Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero());
        let mut knight = Combatant::from_config(CombatantId::Knight, &CombatantConfig::knight());
        hero.position = Vec2::new(500.0, 500.0);
        hero.facing = Facing::E;
        knight.position = Vec2::new(580.0, 500.0);
        knight.facing = Facing::W;
        Duelists::new(hero, knight)
    }

    fn hit_from(attacker: &Combatant, kind: AttackKind) -> SensorHit {
        let sensor = HitSensor::spawn(attacker, kind, 1);
        SensorHit {
            origin: sensor.origin,
            target: sensor.target,
            kind,
            generation: 1,
            center: sensor.center,
        }
    }

    fn strike(duel: &mut Duelists, kind: AttackKind, crit: f32) -> ImpactReport {
        let hit = hit_from(&duel.hero, kind);
        let (hero, knight) = duel.split(CombatantId::Hero);
        let report = ImpactReport::empty(hero.id, knight.id, kind);
        land(hero, knight, &hit, crit, report)
    }

    #[test]
    fn test_facing_block_negates_everything() {
        let mut duel = duel();
        duel.knight.block = BlockPhase::BlockMid;
        let durability = duel.knight.armor.durability(ArmorSlot::Breastplate);
        let hit = hit_from(&duel.hero, AttackKind::HeavyMelee);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (hero, knight) = duel.split(CombatantId::Hero);
        let report = resolve_impact(hero, knight, &hit, &mut rng);

        assert!(report.blocked);
        assert_eq!(report.damage, 0.0);
        assert_eq!(duel.knight.health, 50.0);
        assert_eq!(duel.knight.stamina, 85.0);
        assert_eq!(duel.knight.armor.durability(ArmorSlot::Breastplate), durability);
        assert!(duel.knight.velocity.is_zero());
    }

    #[test]
    fn test_block_arc_edges() {
        let mut knight = Combatant::from_config(CombatantId::Knight, &CombatantConfig::knight());
        knight.position = Vec2::ZERO;
        knight.facing = Facing::E;
        knight.block = BlockPhase::BlockStart { generation: 1 };

        let at = |deg: f32| Vec2::from_angle(deg.to_radians()) * 100.0;
        assert!(resolve_block(&knight, at(44.0)));
        assert!(resolve_block(&knight, at(-44.0)));
        assert!(!resolve_block(&knight, at(46.0)));
        assert!(!resolve_block(&knight, at(180.0)));

        knight.block_disabled = true;
        assert!(!resolve_block(&knight, at(0.0)));
    }

    #[test]
    fn test_block_from_behind_takes_damage() {
        let mut duel = duel();
        duel.knight.facing = Facing::E;
        duel.knight.block = BlockPhase::BlockMid;
        let report = strike(&mut duel, AttackKind::LightMelee, 1.0);
        assert!(!report.blocked);
        assert!(report.damage > 0.0);
        assert_eq!(duel.knight.block, BlockPhase::Idle);
    }

    #[test]
    fn test_torso_hit_is_mitigated() {
        let mut duel = duel();
        let report = strike(&mut duel, AttackKind::LightMelee, 1.0);
        assert_eq!(report.zone, Some(HitZone::Torso));
        assert!((report.damage - 6.0).abs() < 1e-4);
        assert!((duel.knight.health - 44.0).abs() < 1e-4);
        assert_eq!(duel.knight.hit_stun_ms, HIT_STUN_MS);
    }

    #[test]
    fn test_critical_multiplies_after_armor() {
        let mut duel = duel();
        let report = strike(&mut duel, AttackKind::LightMelee, armor::CRIT_MULTIPLIER);
        assert!(report.critical);
        assert!((report.damage - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_lethal_hit_fires_death_once() {
        let mut duel = duel();
        duel.knight.set_health(12.0);
        let report = strike(&mut duel, AttackKind::Special, 1.0);
        // 25 through 0.40 torso armor
        assert!((report.damage - 15.0).abs() < 1e-4);
        assert!(report.died);
        assert_eq!(duel.knight.health, 0.0);
        assert_eq!(duel.knight.hit_stun_ms, 0.0);

        let hit = hit_from(&duel.hero, AttackKind::Special);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (hero, knight) = duel.split(CombatantId::Hero);
        let again = resolve_impact(hero, knight, &hit, &mut rng);
        assert!(again.ignored);
        assert!(!again.died);
    }

    #[test]
    fn test_hit_stun_ignores_follow_up() {
        let mut duel = duel();
        strike(&mut duel, AttackKind::LightMelee, 1.0);
        let health = duel.knight.health;

        let hit = hit_from(&duel.hero, AttackKind::LightMelee);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (hero, knight) = duel.split(CombatantId::Hero);
        let report = resolve_impact(hero, knight, &hit, &mut rng);
        assert!(report.ignored);
        assert_eq!(duel.knight.health, health);
    }

    #[test]
    fn test_special_unpins_static_body() {
        let mut duel = duel();
        strike(&mut duel, AttackKind::Special, 1.0);
        assert_eq!(duel.knight.body_mode, BodyMode::Dynamic);
        assert!(duel.knight.velocity.x > 0.0, "pushed away from the hero");
        assert!(duel.knight.knockback.is_some());
    }

    #[test]
    fn test_light_hit_does_not_move_static_body() {
        let mut duel = duel();
        strike(&mut duel, AttackKind::LightMelee, 1.0);
        assert_eq!(duel.knight.body_mode, BodyMode::Static);
        assert!(duel.knight.velocity.is_zero());
    }

    #[test]
    fn test_hit_cancels_lunge_of_static_body() {
        let mut duel = duel();
        duel.knight.position = Vec2::new(584.0, 500.0);
        crate::motion::begin_movement(&mut duel.knight, MovementKind::LungeLeft, -FRAC_PI_2, Facing::W)
            .unwrap();
        assert_eq!(duel.knight.body_mode, BodyMode::Dynamic);

        let hit = hit_from(&duel.hero, AttackKind::LightMelee);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (hero, knight) = duel.split(CombatantId::Hero);
        let report = resolve_impact(hero, knight, &hit, &mut rng);

        assert!(report.landed());
        assert!(duel.knight.movement.is_none());
        assert!(duel.knight.velocity.is_zero());
        assert_eq!(duel.knight.body_mode, BodyMode::Static);
        assert_eq!(duel.knight.hit_stun_ms, HIT_STUN_MS);
    }

    #[test]
    fn test_dynamic_body_is_knocked_back() {
        let mut hero = Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero());
        hero.position = Vec2::new(100.0, 0.0);
        apply_knockback(&mut hero, Vec2::ZERO, AttackKind::LightMelee);
        assert!((hero.velocity.x - 7.5).abs() < 1e-4);
        assert_eq!(hero.knockback.map(|k| k.remaining_ms), Some(50.0));
    }
}
