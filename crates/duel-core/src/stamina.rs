//! Resource governor: stamina spend, regen, and exhaustion.
//!
//! Every attack, block and dash commits through [`spend`] before touching any
//! other state, so an attempted action can never push stamina negative.
//! Passive drains ([`drain`]) may still bring it to exactly zero, which is what
//! trips exhaustion on the next [`tick`].

use crate::combatant::Combatant;
use crate::machine::BlockPhase;

/// How long exhaustion forbids blocking and movement
pub const EXHAUSTION_MS: f32 = 1000.0;

/// Stamina granted when exhaustion ends
pub const EXHAUSTION_REFUND: f32 = 1.0;

/// Flag transition produced by a governor tick. Animations for these are the
/// caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorEvent {
    /// Stamina hit zero; blocking and movement were force-cleared
    Exhausted {
        /// A block was in progress and has been dropped to idle
        block_cancelled: bool,
    },
    /// Exhaustion expired and stamina was refunded
    Recovered,
}

/// Advance timers and regen for one tick
pub fn tick(combatant: &mut Combatant, delta_ms: f32) -> Option<GovernorEvent> {
    if combatant.dead {
        return None;
    }

    if combatant.stamina_regen_delay_ms > 0.0 {
        combatant.stamina_regen_delay_ms = (combatant.stamina_regen_delay_ms - delta_ms).max(0.0);
    }

    if combatant.stamina <= 0.0 && !combatant.block_disabled {
        combatant.block_disabled = true;
        combatant.block_disable_timer_ms = EXHAUSTION_MS;
        let block_cancelled = combatant.block != BlockPhase::Idle;
        combatant.block = BlockPhase::Idle;
        combatant.halt();
        combatant.running = false;
        return Some(GovernorEvent::Exhausted { block_cancelled });
    }

    if combatant.block_disabled {
        combatant.block_disable_timer_ms -= delta_ms;
        if combatant.block_disable_timer_ms <= 0.0 {
            combatant.block_disabled = false;
            combatant.block_disable_timer_ms = 0.0;
            combatant.set_stamina(EXHAUSTION_REFUND);
            return Some(GovernorEvent::Recovered);
        }
        return None;
    }

    if combatant.stamina_regen_delay_ms <= 0.0 && !combatant.running {
        let regen = combatant.stamina + combatant.stamina_regen_rate;
        combatant.set_stamina(regen);
    }
    None
}

/// Try to pay `amount`. On success deducts it and arms the regen delay; on
/// failure nothing changes.
pub fn spend(combatant: &mut Combatant, amount: f32, post_use_delay_ms: f32) -> bool {
    if combatant.dead || combatant.stamina < amount {
        return false;
    }
    let remaining = combatant.stamina - amount;
    combatant.set_stamina(remaining);
    combatant.stamina_regen_delay_ms = post_use_delay_ms;
    true
}

/// Unconditional drain, clamped at zero (running, absorbed blocks)
pub fn drain(combatant: &mut Combatant, amount: f32) {
    if combatant.dead {
        return;
    }
    let remaining = combatant.stamina - amount;
    combatant.set_stamina(remaining);
}

/// Exhaustion forbids blocking and movement
pub fn is_exhausted(combatant: &Combatant) -> bool {
    combatant.block_disabled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatantId;
    use crate::config::CombatantConfig;

    fn hero() -> Combatant {
        Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero())
    }

    #[test]
    fn test_spend_rejects_when_short() {
        let mut c = hero();
        c.set_stamina(10.0);
        assert!(!spend(&mut c, 15.0, 500.0));
        assert_eq!(c.stamina, 10.0);
        assert_eq!(c.stamina_regen_delay_ms, 0.0);
    }

    #[test]
    fn test_spend_deducts_and_delays_regen() {
        let mut c = hero();
        assert!(spend(&mut c, 15.0, 500.0));
        assert_eq!(c.stamina, 85.0);
        assert_eq!(c.stamina_regen_delay_ms, 500.0);

        // Delay holds regen back
        tick(&mut c, 250.0);
        assert_eq!(c.stamina, 85.0);
        // The tick that clears the delay already regenerates
        tick(&mut c, 250.0);
        assert_eq!(c.stamina, 86.0);
        tick(&mut c, 16.0);
        assert_eq!(c.stamina, 87.0);
    }

    #[test]
    fn test_regen_caps_at_max() {
        let mut c = hero();
        c.set_stamina(99.5);
        tick(&mut c, 16.0);
        assert_eq!(c.stamina, 100.0);
        tick(&mut c, 16.0);
        assert_eq!(c.stamina, 100.0);
    }

    #[test]
    fn test_running_suppresses_regen() {
        let mut c = hero();
        c.set_stamina(50.0);
        c.running = true;
        tick(&mut c, 16.0);
        assert_eq!(c.stamina, 50.0);
    }

    #[test]
    fn test_exhaustion_while_blocking_cycle() {
        let mut c = hero();
        c.block = BlockPhase::BlockMid;
        c.block_held = true;
        let all = c.stamina;
        drain(&mut c, all);
        assert_eq!(c.stamina, 0.0);

        let event = tick(&mut c, 16.0);
        assert_eq!(event, Some(GovernorEvent::Exhausted { block_cancelled: true }));
        assert_eq!(c.block, BlockPhase::Idle);
        assert!(c.block_disabled);
        assert_eq!(c.block_disable_timer_ms, EXHAUSTION_MS);

        let mut elapsed = 0.0;
        let mut recovered = None;
        while elapsed < 2000.0 {
            elapsed += 100.0;
            if let Some(ev) = tick(&mut c, 100.0) {
                recovered = Some((ev, elapsed));
                break;
            }
            assert_eq!(c.stamina, 0.0, "no regen while disabled");
        }
        let (event, at) = recovered.expect("exhaustion must expire");
        assert_eq!(event, GovernorEvent::Recovered);
        assert_eq!(at, 1000.0);
        assert_eq!(c.stamina, EXHAUSTION_REFUND);
        assert!(!c.block_disabled);
    }

    #[test]
    fn test_dead_combatant_is_frozen() {
        let mut c = hero();
        c.take_damage(1_000.0);
        c.stamina = 0.0;
        assert_eq!(tick(&mut c, 16.0), None);
        assert!(!c.block_disabled);
        assert!(!spend(&mut c, 0.0, 0.0));
    }
}
