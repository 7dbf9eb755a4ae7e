//! Epsilon-greedy selection and the one-step Q-learning update

use rand::Rng;

use crate::action::KnightAction;
use crate::state::AiState;
use crate::table::QTable;

/// `q + alpha * (reward + gamma * next_max - q)`
pub fn q_update(q: f64, reward: f64, next_max: f64, alpha: f64, gamma: f64) -> f64 {
    q + alpha * (reward + gamma * next_max - q)
}

/// Explore with probability `epsilon`, otherwise exploit the table
pub fn epsilon_greedy<R: Rng + ?Sized>(
    table: &QTable,
    state: &AiState,
    epsilon: f64,
    rng: &mut R,
) -> KnightAction {
    if epsilon > 0.0 && rng.gen_bool(epsilon.min(1.0)) {
        return KnightAction::ALL[rng.gen_range(0..KnightAction::ALL.len())];
    }
    table.row(state).best()
}
