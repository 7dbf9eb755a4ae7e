//! Combat action state machine.
//!
//! Two mutually exclusive tracks per combatant:
//!
//! ```text
//! attack: Idle -> WindUp -> Active -> Recovery -> Idle
//!                                        \-> BlockMid   (block still held)
//! block:  Idle -> BlockStart -> BlockMid -> Idle
//!                     \-> Idle              (released before the clip ended)
//! ```
//!
//! WindUp is a countdown. Active and BlockStart end on the presentation's
//! completion signal, matched by kind and generation so a late signal from a
//! superseded clip is dropped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::FailureReason;
use crate::animation::{AnimationCue, AnimationKey};
use crate::attack::AttackKind;
use crate::combatant::Combatant;
use crate::stamina;

/// Attack track
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum AttackPhase {
    #[default]
    Idle,
    WindUp {
        kind: AttackKind,
        generation: u32,
        remaining_ms: f32,
    },
    Active {
        kind: AttackKind,
        generation: u32,
    },
    Recovery {
        kind: AttackKind,
        generation: u32,
    },
}

/// Block track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BlockPhase {
    #[default]
    Idle,
    BlockStart {
        generation: u32,
    },
    BlockMid,
}

/// Transition the caller must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineEvent {
    /// Wind-up elapsed: spawn exactly one hit sensor now
    BladeLive { kind: AttackKind, generation: u32 },
    /// Entered the loopable block hold
    BlockRaised,
    /// Left the block track for idle
    BlockLowered,
    /// Attack track returned to idle
    Recovered,
}

/// Commit an attack. Stamina is paid before any other state changes.
pub fn begin_attack(c: &mut Combatant, kind: AttackKind) -> Result<AnimationCue, FailureReason> {
    if c.dead {
        return Err(FailureReason::Dead);
    }
    if c.is_busy() {
        return Err(FailureReason::Busy);
    }
    let def = kind.def();
    if !stamina::spend(c, def.stamina_cost, def.regen_delay_ms) {
        return Err(FailureReason::InsufficientStamina);
    }

    let generation = c.next_generation();
    c.attack = AttackPhase::WindUp {
        kind,
        generation,
        remaining_ms: def.wind_up_ms,
    };
    c.halt();
    c.running = false;
    debug!(combatant = %c.id, %kind, generation, "attack committed");
    Ok(AnimationCue {
        key: AnimationKey::Attack(kind),
        generation,
    })
}

/// Raise the shield
pub fn begin_block(c: &mut Combatant) -> Result<AnimationCue, FailureReason> {
    if c.dead {
        return Err(FailureReason::Dead);
    }
    if stamina::is_exhausted(c) {
        return Err(FailureReason::Exhausted);
    }
    if c.is_busy() {
        return Err(FailureReason::Busy);
    }

    let generation = c.next_generation();
    c.block = BlockPhase::BlockStart { generation };
    c.halt();
    c.running = false;
    Ok(AnimationCue {
        key: AnimationKey::BlockStart,
        generation,
    })
}

/// Advance countdowns and hold checks by one tick
pub fn advance(c: &mut Combatant, delta_ms: f32) -> Option<MachineEvent> {
    if c.dead {
        return None;
    }

    match c.attack {
        AttackPhase::WindUp {
            kind,
            generation,
            remaining_ms,
        } => {
            let remaining_ms = remaining_ms - delta_ms;
            if remaining_ms <= 0.0 {
                c.attack = AttackPhase::Active { kind, generation };
                return Some(MachineEvent::BladeLive { kind, generation });
            }
            c.attack = AttackPhase::WindUp {
                kind,
                generation,
                remaining_ms,
            };
            return None;
        }
        AttackPhase::Recovery { .. } => {
            c.attack = AttackPhase::Idle;
            // Seamless defense: skip idle when the block is still held
            if c.block_held && !stamina::is_exhausted(c) {
                c.block = BlockPhase::BlockMid;
                return Some(MachineEvent::BlockRaised);
            }
            return Some(MachineEvent::Recovered);
        }
        AttackPhase::Active { .. } | AttackPhase::Idle => {}
    }

    if c.block == BlockPhase::BlockMid && !c.block_held {
        c.block = BlockPhase::Idle;
        return Some(MachineEvent::BlockLowered);
    }
    None
}

/// Apply a completion signal. Returns the resulting transition, if any;
/// signals for anything but the live clip are ignored.
pub fn on_complete(c: &mut Combatant, cue: AnimationCue) -> Option<MachineEvent> {
    if c.dead {
        return None;
    }

    match (cue.key, c.attack, c.block) {
        (AnimationKey::Attack(done), AttackPhase::Active { kind, generation }, _)
            if done == kind && cue.generation == generation =>
        {
            c.attack = AttackPhase::Recovery { kind, generation };
            None
        }
        (AnimationKey::BlockStart, _, BlockPhase::BlockStart { generation })
            if cue.generation == generation =>
        {
            if c.block_held && !stamina::is_exhausted(c) {
                c.block = BlockPhase::BlockMid;
                Some(MachineEvent::BlockRaised)
            } else {
                c.block = BlockPhase::Idle;
                Some(MachineEvent::BlockLowered)
            }
        }
        (AnimationKey::Attack(_) | AnimationKey::BlockStart, _, _) => {
            debug!(combatant = %c.id, ?cue, "stale completion ignored");
            None
        }
        _ => None,
    }
}

/// Sensor-relevant attack currently live, if any
pub fn live_attack(c: &Combatant) -> Option<(AttackKind, u32)> {
    match c.attack {
        AttackPhase::Active { kind, generation } => Some((kind, generation)),
        _ => None,
    }
}
