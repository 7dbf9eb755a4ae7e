//! Per-tick player intent

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Discrete action trigger, edge-triggered for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    AttackLight,
    AttackHeavy,
    Special,
    Kick,
    BlockHold,
    BlockRelease,
    Dodge,
}

/// Everything the input collaborator reports for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    /// Movement intent, normalized before use
    pub movement: Vec2,
    pub triggers: Vec<Trigger>,
    /// Run modifier
    pub run: bool,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(direction: Vec2) -> Self {
        Self {
            movement: direction,
            ..Self::default()
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn running(mut self) -> Self {
        self.run = true;
        self
    }

    pub fn pressed(&self, trigger: Trigger) -> bool {
        self.triggers.contains(&trigger)
    }

    /// Normalized movement intent
    pub fn direction(&self) -> Vec2 {
        self.movement.normalize()
    }
}
