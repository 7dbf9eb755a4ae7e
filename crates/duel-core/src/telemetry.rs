//! Bounded event buffer for the telemetry collaborator.
//!
//! Records are appended as things happen and handed out in batches on a fixed
//! interval. When the buffer is full the oldest record is dropped; delivery of
//! a flushed batch is the collaborator's problem.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::combatant::{Combatant, CombatantId};
use crate::geometry::Vec2;

/// Default buffer capacity
pub const DEFAULT_CAPACITY: usize = 60;

/// Default flush interval
pub const DEFAULT_FLUSH_INTERVAL_MS: f32 = 150.0;

/// One logged event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Simulation time in milliseconds
    pub time_ms: f64,
    pub actor: CombatantId,
    pub position: Vec2,
    /// Facing index in frame-bank order
    pub facing_bin: usize,
    pub health_fraction: f32,
    pub action: String,
}

impl TelemetryRecord {
    pub fn capture(time_ms: f64, actor: &Combatant, action: impl Into<String>) -> Self {
        Self {
            time_ms,
            actor: actor.id,
            position: actor.position,
            facing_bin: actor.facing.index(),
            health_fraction: actor.health_fraction(),
            action: action.into(),
        }
    }
}

/// Drop-oldest ring of pending records with an interval flush
#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    records: VecDeque<TelemetryRecord>,
    capacity: usize,
    flush_interval_ms: f32,
    since_flush_ms: f32,
}

impl TelemetryBuffer {
    pub fn new(capacity: usize, flush_interval_ms: f32) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            flush_interval_ms,
            since_flush_ms: 0.0,
        }
    }

    pub fn push(&mut self, record: TelemetryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Advance the flush clock. Returns the pending batch when the interval
    /// has elapsed and there is something to send.
    pub fn tick(&mut self, delta_ms: f32) -> Option<Vec<TelemetryRecord>> {
        self.since_flush_ms += delta_ms;
        if self.since_flush_ms < self.flush_interval_ms {
            return None;
        }
        self.since_flush_ms = 0.0;
        if self.records.is_empty() {
            return None;
        }
        Some(self.records.drain(..).collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.since_flush_ms = 0.0;
    }
}

impl Default for TelemetryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_FLUSH_INTERVAL_MS)
    }
}
