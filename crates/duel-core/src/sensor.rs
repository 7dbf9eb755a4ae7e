//! Hit sensors: transient weapon-reach boxes consumed on first contact

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::attack::AttackKind;
use crate::combatant::{Combatant, CombatantId, Duelists};
use crate::geometry::Vec2;

/// How long a sensor waits for contact before expiring
pub const SENSOR_LIFETIME_MS: f32 = 200.0;

/// Axis-aligned box in front of an attacker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitSensor {
    pub origin: CombatantId,
    pub target: CombatantId,
    pub kind: AttackKind,
    pub generation: u32,
    pub center: Vec2,
    pub half_extent: f32,
    pub remaining_ms: f32,
}

impl HitSensor {
    /// Place a sensor at `reach` along the attacker's facing
    pub fn spawn(attacker: &Combatant, kind: AttackKind, generation: u32) -> Self {
        let def = kind.def();
        Self {
            origin: attacker.id,
            target: attacker.id.opponent(),
            kind,
            generation,
            center: attacker.position + attacker.facing.unit() * def.reach,
            half_extent: def.half_extent,
            remaining_ms: SENSOR_LIFETIME_MS,
        }
    }

    /// Box against the target's circular hurtbox
    pub fn overlaps(&self, target: &Combatant) -> bool {
        let nearest = Vec2::new(
            target
                .position
                .x
                .clamp(self.center.x - self.half_extent, self.center.x + self.half_extent),
            target
                .position
                .y
                .clamp(self.center.y - self.half_extent, self.center.y + self.half_extent),
        );
        nearest.distance(target.position) <= target.body_radius
    }
}

/// A sensor that found its target this tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorHit {
    pub origin: CombatantId,
    pub target: CombatantId,
    pub kind: AttackKind,
    pub generation: u32,
    /// Sensor center at contact, used for zone selection
    pub center: Vec2,
}

/// Live sensors of both combatants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorSet {
    sensors: Vec<HitSensor>,
}

impl SensorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, sensor: HitSensor) {
        trace!(origin = %sensor.origin, kind = %sensor.kind, "sensor spawned");
        self.sensors.push(sensor);
    }

    /// Test every sensor once. A sensor that overlaps its live target is
    /// removed and reported; the rest age by `delta_ms` and expire silently.
    pub fn evaluate(&mut self, duel: &Duelists, delta_ms: f32) -> Vec<SensorHit> {
        let mut hits = Vec::new();
        self.sensors.retain_mut(|sensor| {
            let target = duel.get(sensor.target);
            if target.is_alive() && sensor.overlaps(target) {
                hits.push(SensorHit {
                    origin: sensor.origin,
                    target: sensor.target,
                    kind: sensor.kind,
                    generation: sensor.generation,
                    center: sensor.center,
                });
                return false;
            }
            sensor.remaining_ms -= delta_ms;
            sensor.remaining_ms > 0.0
        });
        hits
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitSensor> {
        self.sensors.iter()
    }

    pub fn clear(&mut self) {
        self.sensors.clear();
    }
}
