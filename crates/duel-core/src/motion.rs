//! Time-boxed movements, knockback windows, and body integration

use tracing::trace;

use crate::action::FailureReason;
use crate::combatant::{BodyMode, Combatant, Movement, MovementKind};
use crate::geometry::{Bounds, Facing, Vec2};
use crate::stamina;

/// Approach halts once the target is this close
pub const APPROACH_STOP_DISTANCE: f32 = 70.0;

/// Distance at which approach speed reaches zero
pub const APPROACH_STANDOFF: f32 = 60.0;

/// Cost and shape of one movement kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementDef {
    pub stamina_cost: f32,
    pub regen_delay_ms: f32,
    pub duration_ms: f32,
    /// Units per frame at full speed
    pub speed: f32,
}

impl MovementKind {
    pub fn def(self) -> MovementDef {
        match self {
            MovementKind::Approach => MovementDef {
                stamina_cost: 5.0,
                regen_delay_ms: 250.0,
                duration_ms: 500.0,
                speed: 2.0,
            },
            MovementKind::LungeLeft | MovementKind::LungeRight => MovementDef {
                stamina_cost: 20.0,
                regen_delay_ms: 400.0,
                duration_ms: 300.0,
                speed: 4.0,
            },
            MovementKind::Dodge => MovementDef {
                stamina_cost: 30.0,
                regen_delay_ms: 500.0,
                duration_ms: 333.0,
                speed: 6.0,
            },
        }
    }

    /// Whether the mover re-faces its target when the movement ends
    fn refaces_on_end(self) -> bool {
        !matches!(self, MovementKind::Dodge)
    }
}

/// Start a movement along `angle`, paying for it first. The angle and facing
/// are captured here and held for the whole movement.
pub fn begin_movement(
    c: &mut Combatant,
    kind: MovementKind,
    angle: f32,
    facing: Facing,
) -> Result<(), FailureReason> {
    if c.dead {
        return Err(FailureReason::Dead);
    }
    if stamina::is_exhausted(c) {
        return Err(FailureReason::Exhausted);
    }
    if c.is_busy() || c.movement.is_some() {
        return Err(FailureReason::Busy);
    }
    let def = kind.def();
    if !stamina::spend(c, def.stamina_cost, def.regen_delay_ms) {
        return Err(FailureReason::InsufficientStamina);
    }

    c.movement = Some(Movement {
        kind,
        remaining_ms: def.duration_ms,
        angle,
        facing,
    });
    c.facing = facing;
    c.running = false;
    c.body_mode = BodyMode::Dynamic;
    trace!(combatant = %c.id, ?kind, "movement started");
    Ok(())
}

/// Count down the hit-stun, knockback and movement timers, set this tick's
/// velocity, and integrate the body. Returns the movement that ended, if any.
pub fn advance(
    c: &mut Combatant,
    target: Vec2,
    delta_ms: f32,
    frame_ms: f32,
    bounds: &Bounds,
) -> Option<MovementKind> {
    if c.dead {
        c.velocity = Vec2::ZERO;
        return None;
    }

    c.hit_stun_ms = (c.hit_stun_ms - delta_ms).max(0.0);

    if let Some(knockback) = c.knockback.as_mut() {
        knockback.remaining_ms -= delta_ms;
        if knockback.remaining_ms <= 0.0 {
            c.knockback = None;
            c.velocity = Vec2::ZERO;
            c.body_mode = c.rest_mode;
        }
    }

    let ended = c.movement.and_then(|mut movement| {
        movement.remaining_ms -= delta_ms;
        let def = movement.kind.def();
        let speed = match movement.kind {
            MovementKind::Approach => {
                let distance = c.position.distance(target);
                if distance > APPROACH_STOP_DISTANCE {
                    def.speed.min((distance - APPROACH_STANDOFF) / 10.0)
                } else {
                    movement.remaining_ms = 0.0;
                    0.0
                }
            }
            _ => def.speed,
        };
        c.velocity = Vec2::from_angle(movement.angle) * speed;

        if movement.remaining_ms > 0.0 {
            c.movement = Some(movement);
            return None;
        }
        c.halt();
        if movement.kind.refaces_on_end() {
            c.facing = Facing::from_angle(c.position.angle_to(target));
        }
        Some(movement.kind)
    });

    if c.body_mode == BodyMode::Dynamic {
        let scale = if frame_ms > 0.0 { delta_ms / frame_ms } else { 0.0 };
        c.position += c.velocity * scale;
        c.position = bounds.clamp(c.position, c.body_radius);
    }
    ended
}

/// Push `mover` out of `obstacle` along the line between their centers
pub fn separate(mover: &mut Combatant, obstacle: &Combatant) {
    let min_distance = mover.body_radius + obstacle.body_radius;
    let offset = mover.position - obstacle.position;
    let distance = offset.length();
    if distance >= min_distance {
        return;
    }
    let push = if distance <= f32::EPSILON {
        -mover.facing.unit()
    } else {
        offset.normalize()
    };
    mover.position = obstacle.position + push * min_distance;
}
