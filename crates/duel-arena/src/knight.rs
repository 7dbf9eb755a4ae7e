//! Executes the knight's action vocabulary and its reflexive shield

use duel_agent::KnightAction;
use duel_core::{
    ActionOutcome, AnimationCue, AnimationKey, AttackKind, Combatant, Facing, FailureReason,
    MovementKind, machine, motion, stamina,
};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use tracing::debug;

use crate::arena::Effects;
use crate::config::ReactiveBlockConfig;

/// The knight only swings at a hero closer than this
pub const ENGAGE_RANGE: f32 = 100.0;

/// Approach is pointless inside this distance
pub const APPROACH_MIN_DISTANCE: f32 = 60.0;

/// Projected approach travel plus a buffer; closer than this the approach
/// would run into the hero
pub const APPROACH_CLEARANCE: f32 = 2.0 * 8.0 + 40.0;

/// Knight-side timers: decision cooldown and reactive block hold
#[derive(Debug, Clone, Default)]
pub struct KnightController {
    cooldown_ms: f32,
    block_hold_ms: f32,
}

impl KnightController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count down the cooldown and release an expired block hold
    pub fn tick_timers(&mut self, knight: &mut Combatant, delta_ms: f32) {
        self.cooldown_ms = (self.cooldown_ms - delta_ms).max(0.0);
        if self.block_hold_ms > 0.0 {
            self.block_hold_ms -= delta_ms;
            if self.block_hold_ms <= 0.0 {
                self.block_hold_ms = 0.0;
                knight.block_held = false;
            }
        }
    }

    /// Gate for taking a new decision this tick
    pub fn ready(&self, knight: &Combatant) -> bool {
        knight.is_alive()
            && !knight.is_busy()
            && self.cooldown_ms <= 0.0
            && knight.movement.is_none()
            && knight.stamina_regen_delay_ms <= 0.0
    }

    /// Carry out `action` against `hero`. Rejections come back as failures and
    /// still start the cooldown.
    pub fn execute(
        &mut self,
        knight: &mut Combatant,
        hero: &Combatant,
        action: KnightAction,
        fx: &mut Effects,
    ) -> ActionOutcome {
        let angle = knight.angle_to(hero);
        let facing = Facing::from_angle(angle);
        let distance = knight.distance_to(hero);
        knight.facing = facing;
        self.cooldown_ms = action.cooldown_ms();

        let result = match action {
            KnightAction::Attack => {
                if distance < ENGAGE_RANGE {
                    machine::begin_attack(knight, AttackKind::LightMelee)
                        .map(|cue| fx.play(knight.id, cue, facing))
                } else {
                    Err(FailureReason::OutOfRange)
                }
            }
            KnightAction::Approach => {
                if stamina::is_exhausted(knight) {
                    Err(FailureReason::Exhausted)
                } else if distance <= APPROACH_MIN_DISTANCE || distance <= APPROACH_CLEARANCE {
                    Err(FailureReason::OutOfRange)
                } else {
                    motion::begin_movement(knight, MovementKind::Approach, angle, facing).map(|()| {
                        fx.play(knight.id, AnimationCue::untracked(AnimationKey::Walk), facing)
                    })
                }
            }
            KnightAction::LungeLeft | KnightAction::LungeRight => {
                let (kind, offset) = if action == KnightAction::LungeLeft {
                    (MovementKind::LungeLeft, -FRAC_PI_2)
                } else {
                    (MovementKind::LungeRight, FRAC_PI_2)
                };
                motion::begin_movement(knight, kind, angle + offset, facing).map(|()| {
                    fx.play(knight.id, AnimationCue::untracked(AnimationKey::Rolling), facing)
                })
            }
        };
        result.into()
    }

    /// Maybe raise the shield against an attack the hero just committed
    pub fn react_to_attack<R: Rng + ?Sized>(
        &mut self,
        knight: &mut Combatant,
        hero: &Combatant,
        config: &ReactiveBlockConfig,
        rng: &mut R,
        fx: &mut Effects,
    ) -> bool {
        if knight.dead
            || knight.hit_stun_ms > 0.0
            || knight.is_blocking()
            || knight.is_attacking()
            || stamina::is_exhausted(knight)
            || knight.distance_to(hero) >= config.radius
        {
            return false;
        }
        if !rng.gen_bool(config.probability.clamp(0.0, 1.0)) {
            return false;
        }

        knight.facing = Facing::from_angle(knight.angle_to(hero));
        knight.block_held = true;
        match machine::begin_block(knight) {
            Ok(cue) => {
                self.block_hold_ms = config.hold_ms;
                fx.play(knight.id, cue, knight.facing);
                fx.log(knight.id, "block");
                debug!(facing = %knight.facing, "knight raised shield");
                true
            }
            Err(_) => {
                knight.block_held = false;
                false
            }
        }
    }

    /// Forget the block hold; used when exhaustion strips the shield
    pub fn drop_block(&mut self, knight: &mut Combatant) {
        self.block_hold_ms = 0.0;
        knight.block_held = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::{CombatantConfig, CombatantId, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(distance: f32) -> (Combatant, Combatant) {
        let mut knight = Combatant::from_config(CombatantId::Knight, &CombatantConfig::knight());
        let mut hero = Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero());
        knight.position = Vec2::new(500.0, 300.0);
        hero.position = Vec2::new(500.0, 300.0 + distance);
        (knight, hero)
    }

    #[test]
    fn test_attack_out_of_range_fails_but_costs_cooldown() {
        let (mut knight, hero) = pair(300.0);
        let mut ctl = KnightController::new();
        let mut fx = Effects::default();
        let outcome = ctl.execute(&mut knight, &hero, KnightAction::Attack, &mut fx);
        assert_eq!(outcome, ActionOutcome::Failure(FailureReason::OutOfRange));
        assert_eq!(knight.stamina, 100.0);
        ctl.tick_timers(&mut knight, 790.0);
        assert!(!ctl.ready(&knight));
        ctl.tick_timers(&mut knight, 10.0);
        assert!(ctl.ready(&knight));
    }

    #[test]
    fn test_attack_in_range_faces_hero() {
        let (mut knight, hero) = pair(90.0);
        knight.facing = Facing::N;
        let mut ctl = KnightController::new();
        let mut fx = Effects::default();
        let outcome = ctl.execute(&mut knight, &hero, KnightAction::Attack, &mut fx);
        assert!(outcome.is_success());
        assert_eq!(knight.facing, Facing::S);
        assert_eq!(knight.stamina, 85.0);
    }

    #[test]
    fn test_approach_too_close_fails() {
        let (mut knight, hero) = pair(55.0);
        let outcome = KnightController::new().execute(
            &mut knight,
            &hero,
            KnightAction::Approach,
            &mut Effects::default(),
        );
        assert_eq!(outcome, ActionOutcome::Failure(FailureReason::OutOfRange));
        assert!(knight.movement.is_none());
    }

    #[test]
    fn test_lunge_is_perpendicular() {
        let (mut knight, hero) = pair(200.0);
        let outcome = KnightController::new().execute(
            &mut knight,
            &hero,
            KnightAction::LungeLeft,
            &mut Effects::default(),
        );
        assert!(outcome.is_success());
        let movement = knight.movement.unwrap();
        // Hero is due south (pi/2); left lunge heads east
        assert!(movement.angle.abs() < 1e-5);
        assert_eq!(movement.facing, Facing::S);
        assert_eq!(knight.stamina, 80.0);
    }

    #[test]
    fn test_exhausted_lunge_fails() {
        let (mut knight, hero) = pair(200.0);
        knight.block_disabled = true;
        let outcome = KnightController::new().execute(
            &mut knight,
            &hero,
            KnightAction::LungeRight,
            &mut Effects::default(),
        );
        assert_eq!(outcome, ActionOutcome::Failure(FailureReason::Exhausted));
    }

    #[test]
    fn test_reactive_block_hold_expires() {
        let (mut knight, hero) = pair(100.0);
        let config = ReactiveBlockConfig {
            probability: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut ctl = KnightController::new();
        let mut fx = Effects::default();

        assert!(ctl.react_to_attack(&mut knight, &hero, &config, &mut rng, &mut fx));
        assert!(knight.is_blocking());
        assert!(knight.block_held);

        ctl.tick_timers(&mut knight, 400.0);
        assert!(knight.block_held);
        ctl.tick_timers(&mut knight, 200.0);
        assert!(!knight.block_held);
    }

    #[test]
    fn test_reactive_block_needs_proximity() {
        let (mut knight, hero) = pair(200.0);
        let config = ReactiveBlockConfig {
            probability: 1.0,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!(!KnightController::new().react_to_attack(
            &mut knight,
            &hero,
            &config,
            &mut rng,
            &mut Effects::default()
        ));
    }
}
