//! Reward signals emitted by the combat pipeline for the learning opponent

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something that happened to the knight worth a reward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEvent {
    /// Knight landed damage on the hero
    HitLanded,
    /// Knight took damage
    DamageTaken,
    /// Knight died; terminal
    Death,
    /// A full idle interval elapsed
    Idle,
}

impl RewardEvent {
    pub fn is_terminal(self) -> bool {
        matches!(self, RewardEvent::Death)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RewardEvent::HitLanded => "hit_landed",
            RewardEvent::DamageTaken => "damage_taken",
            RewardEvent::Death => "death",
            RewardEvent::Idle => "idle",
        }
    }
}

/// Reward magnitudes per event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    pub hit_landed: f64,
    pub damage_taken: f64,
    pub death: f64,
    pub idle_penalty: f64,
    /// Elapsed time that earns one idle penalty
    pub idle_interval_ms: f32,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            hit_landed: 20.0,
            damage_taken: -20.0,
            death: -100.0,
            idle_penalty: -1.0,
            idle_interval_ms: 1000.0,
        }
    }
}

impl RewardSchedule {
    pub fn value(&self, event: RewardEvent) -> f64 {
        match event {
            RewardEvent::HitLanded => self.hit_landed,
            RewardEvent::DamageTaken => self.damage_taken,
            RewardEvent::Death => self.death,
            RewardEvent::Idle => self.idle_penalty,
        }
    }
}

/// Wall-clock-free timer for the anti-idling penalty
#[derive(Debug, Clone, Default)]
pub struct IdleClock {
    elapsed_ms: f32,
}

impl IdleClock {
    /// Add `delta_ms`; returns how many whole intervals completed
    pub fn advance(&mut self, delta_ms: f32, interval_ms: f32) -> u32 {
        if interval_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += delta_ms;
        let mut due = 0;
        while self.elapsed_ms >= interval_ms {
            self.elapsed_ms -= interval_ms;
            due += 1;
        }
        due
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }
}

/// Scalar reward with its decomposition by event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    pub total: f64,
    #[serde(default)]
    pub components: BTreeMap<RewardEvent, f64>,
}

impl RewardLedger {
    pub fn record(&mut self, event: RewardEvent, value: f64) {
        self.total += value;
        *self.components.entry(event).or_default() += value;
    }

    pub fn component(&self, event: RewardEvent) -> f64 {
        self.components.get(&event).copied().unwrap_or(0.0)
    }
}
