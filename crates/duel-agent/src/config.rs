//! Learning hyperparameters

use duel_core::RewardSchedule;
use serde::{Deserialize, Serialize};

/// Q-learning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Exploration probability
    pub epsilon: f64,
    pub rewards: RewardSchedule,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.1,
            rewards: RewardSchedule::default(),
        }
    }
}

impl LearningConfig {
    /// Pure exploitation; used for evaluation runs
    pub fn greedy() -> Self {
        Self {
            epsilon: 0.0,
            ..Self::default()
        }
    }
}
