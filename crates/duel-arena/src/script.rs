//! Scripted hero used to train the knight without a player

use duel_core::{Combatant, InputFrame, Trigger, stamina};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;

/// Hero closes in until it is this close
pub const CHASE_DISTANCE: f32 = 90.0;

/// Beyond this the hero runs, stamina permitting
pub const RUN_DISTANCE: f32 = 300.0;

/// Shield goes up against knight swings started within this distance
pub const GUARD_RADIUS: f32 = 150.0;

const GUARD_HOLD_MS: f32 = 400.0;

/// A sparring partner: chases, swings, sometimes blocks and dodges.
///
/// Decisions draw from its own seeded stream, so a run is reproducible from
/// the arena seed and the partner seed together.
#[derive(Debug, Clone)]
pub struct SparringPartner {
    rng: ChaCha8Rng,
    guard_ms: f32,
}

impl SparringPartner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            guard_ms: 0.0,
        }
    }

    /// Input for the next tick of `arena`
    pub fn next_input(&mut self, arena: &Arena, delta_ms: f32) -> InputFrame {
        self.input_for(arena.hero(), arena.knight(), delta_ms)
    }

    pub fn input_for(&mut self, hero: &Combatant, knight: &Combatant, delta_ms: f32) -> InputFrame {
        let mut input = InputFrame::idle();
        if hero.dead || knight.dead {
            return input;
        }

        if self.guard_ms > 0.0 {
            self.guard_ms -= delta_ms;
            if self.guard_ms <= 0.0 {
                self.guard_ms = 0.0;
                input = input.with_trigger(Trigger::BlockRelease);
            }
            return input;
        }

        let distance = hero.distance_to(knight);
        if knight.is_attacking()
            && distance < GUARD_RADIUS
            && !stamina::is_exhausted(hero)
            && self.rng.gen_bool(0.5)
        {
            self.guard_ms = GUARD_HOLD_MS;
            return input.with_trigger(Trigger::BlockHold);
        }

        if hero.health_fraction() < 0.3 && hero.stamina >= 30.0 && self.rng.gen_bool(0.02) {
            return input.with_trigger(Trigger::Dodge);
        }

        if distance > CHASE_DISTANCE {
            input.movement = knight.position - hero.position;
            input.run = distance > RUN_DISTANCE && hero.stamina > 50.0;
            return input;
        }

        if !hero.is_busy() {
            let trigger = if hero.stamina >= 40.0 && self.rng.gen_bool(0.1) {
                Trigger::Special
            } else if self.rng.gen_bool(0.3) {
                Trigger::AttackHeavy
            } else {
                Trigger::AttackLight
            };
            input = input.with_trigger(trigger);
        }
        // Keep facing the knight between swings
        input.movement = knight.position - hero.position;
        input
    }
}
