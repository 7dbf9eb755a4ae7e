//! Turns an input frame into hero actions

use duel_core::{
    ActionOutcome, AnimationCue, AnimationKey, AttackKind, Combatant, Facing, InputFrame,
    MovementKind, Trigger, Vec2, machine, motion, stamina,
};

use crate::arena::Effects;

/// Walking speed, units per frame
pub const WALK_SPEED: f32 = 3.0;

/// Running speed, units per frame
pub const RUN_SPEED: f32 = 5.0;

/// Stamina drained per tick while running
pub const RUN_DRAIN: f32 = 0.5;

/// Minimum gap between locomotion telemetry records
const MOVE_LOG_INTERVAL_MS: f32 = 500.0;

const ATTACK_TRIGGERS: [(Trigger, AttackKind); 4] = [
    (Trigger::AttackLight, AttackKind::LightMelee),
    (Trigger::AttackHeavy, AttackKind::HeavyMelee),
    (Trigger::Special, AttackKind::Special),
    (Trigger::Kick, AttackKind::Kick),
];

/// What the hero did with one input frame
#[derive(Debug, Clone, Default)]
pub struct HeroTurn {
    /// Outcome of every trigger that asked for an action
    pub outcomes: Vec<(Trigger, ActionOutcome)>,
    /// An attack was committed this tick
    pub attack_committed: bool,
}

/// Hero input handling
#[derive(Debug, Clone, Default)]
pub struct HeroController {
    since_move_log_ms: f32,
}

impl HeroController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(
        &mut self,
        hero: &mut Combatant,
        input: &InputFrame,
        delta_ms: f32,
        fx: &mut Effects,
    ) -> HeroTurn {
        let mut turn = HeroTurn::default();
        if hero.dead {
            return turn;
        }

        if input.pressed(Trigger::BlockRelease) {
            hero.block_held = false;
        }
        if input.pressed(Trigger::BlockHold) {
            hero.block_held = true;
            let result = machine::begin_block(hero).map(|cue| {
                fx.play(hero.id, cue, hero.facing);
                fx.log(hero.id, "block");
            });
            turn.outcomes.push((Trigger::BlockHold, result.into()));
        }

        for (trigger, kind) in ATTACK_TRIGGERS {
            if !input.pressed(trigger) {
                continue;
            }
            let result = machine::begin_attack(hero, kind).map(|cue| {
                fx.play(hero.id, cue, hero.facing);
                fx.log(hero.id, format!("attack_{kind}"));
                turn.attack_committed = true;
            });
            turn.outcomes.push((trigger, result.into()));
        }

        if input.pressed(Trigger::Dodge) {
            let facing = hero.facing;
            let result =
                motion::begin_movement(hero, MovementKind::Dodge, facing.angle(), facing).map(|()| {
                    fx.play(hero.id, AnimationCue::untracked(AnimationKey::FrontFlip), facing);
                    fx.log(hero.id, "dodge");
                });
            turn.outcomes.push((Trigger::Dodge, result.into()));
        }

        self.locomote(hero, input, delta_ms, fx);
        turn
    }

    fn locomote(&mut self, hero: &mut Combatant, input: &InputFrame, delta_ms: f32, fx: &mut Effects) {
        if hero.is_busy() || hero.movement.is_some() || hero.knockback.is_some() {
            return;
        }
        let direction = input.direction();
        if direction.is_zero() || stamina::is_exhausted(hero) {
            hero.velocity = Vec2::ZERO;
            hero.running = false;
            fx.play(hero.id, AnimationCue::untracked(AnimationKey::Idle), hero.facing);
            return;
        }

        hero.facing = Facing::from_angle(Vec2::ZERO.angle_to(direction));
        hero.running = input.run && hero.stamina > 0.0;
        let (speed, key, label) = if hero.running {
            (RUN_SPEED, AnimationKey::Run, "run")
        } else {
            (WALK_SPEED, AnimationKey::Walk, "walk")
        };
        hero.velocity = direction * speed;
        if hero.running {
            stamina::drain(hero, RUN_DRAIN);
        }
        fx.play(hero.id, AnimationCue::untracked(key), hero.facing);

        self.since_move_log_ms += delta_ms;
        if self.since_move_log_ms >= MOVE_LOG_INTERVAL_MS {
            self.since_move_log_ms = 0.0;
            fx.log(hero.id, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::{CombatantConfig, CombatantId, FailureReason};

    fn hero() -> Combatant {
        Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero())
    }

    #[test]
    fn test_attack_trigger_commits() {
        let mut h = hero();
        let mut fx = Effects::default();
        let input = InputFrame::idle().with_trigger(Trigger::AttackHeavy);
        let turn = HeroController::new().apply(&mut h, &input, 16.0, &mut fx);

        assert!(turn.attack_committed);
        assert_eq!(turn.outcomes, vec![(Trigger::AttackHeavy, ActionOutcome::Success)]);
        assert_eq!(h.stamina, 75.0);
        assert!(fx.logged("attack_melee2"));
    }

    #[test]
    fn test_second_attack_same_tick_is_busy() {
        let mut h = hero();
        let mut fx = Effects::default();
        let input = InputFrame::idle()
            .with_trigger(Trigger::AttackLight)
            .with_trigger(Trigger::Kick);
        let turn = HeroController::new().apply(&mut h, &input, 16.0, &mut fx);
        assert_eq!(
            turn.outcomes[1],
            (Trigger::Kick, ActionOutcome::Failure(FailureReason::Busy))
        );
        assert_eq!(h.stamina, 85.0);
    }

    #[test]
    fn test_walk_and_run() {
        let mut h = hero();
        let mut fx = Effects::default();
        let mut ctl = HeroController::new();

        ctl.apply(&mut h, &InputFrame::moving(Vec2::new(1.0, 0.0)), 16.0, &mut fx);
        assert_eq!(h.facing, Facing::E);
        assert!((h.velocity.x - WALK_SPEED).abs() < 1e-5);
        assert!(!h.running);

        ctl.apply(&mut h, &InputFrame::moving(Vec2::new(0.0, -2.0)).running(), 16.0, &mut fx);
        assert_eq!(h.facing, Facing::N);
        assert!((h.velocity.y + RUN_SPEED).abs() < 1e-5);
        assert_eq!(h.stamina, 99.5);
    }

    #[test]
    fn test_exhausted_hero_cannot_walk() {
        let mut h = hero();
        h.block_disabled = true;
        let mut fx = Effects::default();
        HeroController::new().apply(&mut h, &InputFrame::moving(Vec2::new(1.0, 0.0)), 16.0, &mut fx);
        assert!(h.velocity.is_zero());
    }

    #[test]
    fn test_dodge_moves_along_facing() {
        let mut h = hero();
        let mut fx = Effects::default();
        let input = InputFrame::idle().with_trigger(Trigger::Dodge);
        HeroController::new().apply(&mut h, &input, 16.0, &mut fx);
        let movement = h.movement.expect("dodge started");
        assert_eq!(movement.kind, MovementKind::Dodge);
        assert_eq!(movement.facing, Facing::N);
        assert_eq!(h.stamina, 70.0);
    }

    #[test]
    fn test_block_hold_and_release() {
        let mut h = hero();
        let mut fx = Effects::default();
        let mut ctl = HeroController::new();
        ctl.apply(&mut h, &InputFrame::idle().with_trigger(Trigger::BlockHold), 16.0, &mut fx);
        assert!(h.block_held);
        assert!(h.is_blocking());

        ctl.apply(&mut h, &InputFrame::idle().with_trigger(Trigger::BlockRelease), 16.0, &mut fx);
        assert!(!h.block_held);
    }
}
