//! Discretized view of the duel used as the Q-table key

use serde::{Deserialize, Serialize};
use std::fmt;

use duel_core::{Combatant, Facing};

/// Upper bound (exclusive) of the close distance bin
pub const CLOSE_RANGE: f32 = 60.0;

/// Upper bound (exclusive) of the medium distance bin
pub const MEDIUM_RANGE: f32 = 120.0;

/// Coarse distance to the hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceBin {
    Close,
    Medium,
    Far,
}

impl DistanceBin {
    pub fn from_distance(distance: f32) -> Self {
        if distance < CLOSE_RANGE {
            DistanceBin::Close
        } else if distance < MEDIUM_RANGE {
            DistanceBin::Medium
        } else {
            DistanceBin::Far
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceBin::Close => "close",
            DistanceBin::Medium => "medium",
            DistanceBin::Far => "far",
        }
    }
}

/// Observation the policy conditions on. Derived fresh for every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AiState {
    Observed {
        distance: DistanceBin,
        /// Compass bin of the hero as seen from the knight
        direction: Facing,
    },
    /// Absorbing marker after the knight's death
    Dead,
}

impl AiState {
    pub fn observe(knight: &Combatant, hero: &Combatant) -> Self {
        if knight.dead {
            return AiState::Dead;
        }
        AiState::Observed {
            distance: DistanceBin::from_distance(knight.distance_to(hero)),
            direction: Facing::from_angle(knight.angle_to(hero)),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AiState::Dead)
    }

    /// Serialized table key, e.g. `close-se` or `dead-x`
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiState::Observed {
                distance,
                direction,
            } => write!(f, "{}-{}", distance.as_str(), direction),
            AiState::Dead => f.write_str("dead-x"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::{CombatantConfig, CombatantId, Vec2};

    fn pair(dx: f32, dy: f32) -> (Combatant, Combatant) {
        let mut knight = Combatant::from_config(CombatantId::Knight, &CombatantConfig::knight());
        let mut hero = Combatant::from_config(CombatantId::Hero, &CombatantConfig::hero());
        knight.position = Vec2::new(500.0, 500.0);
        hero.position = Vec2::new(500.0 + dx, 500.0 + dy);
        (knight, hero)
    }

    #[test]
    fn test_distance_bins() {
        assert_eq!(DistanceBin::from_distance(59.9), DistanceBin::Close);
        assert_eq!(DistanceBin::from_distance(60.0), DistanceBin::Medium);
        assert_eq!(DistanceBin::from_distance(119.9), DistanceBin::Medium);
        assert_eq!(DistanceBin::from_distance(120.0), DistanceBin::Far);
    }

    #[test]
    fn test_observe_keys() {
        let (knight, hero) = pair(30.0, 30.0);
        assert_eq!(AiState::observe(&knight, &hero).key(), "close-se");

        let (knight, hero) = pair(0.0, -300.0);
        assert_eq!(AiState::observe(&knight, &hero).key(), "far-n");

        let (knight, hero) = pair(-90.0, 0.0);
        assert_eq!(AiState::observe(&knight, &hero).key(), "medium-w");
    }

    #[test]
    fn test_dead_knight_is_terminal() {
        let (mut knight, hero) = pair(10.0, 0.0);
        knight.take_damage(1_000.0);
        let state = AiState::observe(&knight, &hero);
        assert!(state.is_terminal());
        assert_eq!(state.key(), "dead-x");
    }
}
