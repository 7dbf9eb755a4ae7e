//! The knight's action vocabulary

use serde::{Deserialize, Serialize};

/// Action the policy can command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnightAction {
    Attack,
    Approach,
    LungeLeft,
    LungeRight,
}

impl KnightAction {
    /// Every action, in tie-break priority order
    pub const ALL: [KnightAction; 4] = [
        KnightAction::Attack,
        KnightAction::Approach,
        KnightAction::LungeLeft,
        KnightAction::LungeRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KnightAction::Attack => "attack",
            KnightAction::Approach => "approach",
            KnightAction::LungeLeft => "lunge_left",
            KnightAction::LungeRight => "lunge_right",
        }
    }

    /// Decision cooldown that follows this action
    pub fn cooldown_ms(self) -> f32 {
        match self {
            KnightAction::Attack => 800.0,
            _ => 200.0,
        }
    }
}

impl std::fmt::Display for KnightAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
