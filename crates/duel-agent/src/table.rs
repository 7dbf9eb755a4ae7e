//! Tabular action values keyed by serialized state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::KnightAction;
use crate::state::AiState;

/// One row of the table: a value per action
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionValues {
    pub attack: f64,
    pub approach: f64,
    pub lunge_left: f64,
    pub lunge_right: f64,
}

impl ActionValues {
    pub fn get(&self, action: KnightAction) -> f64 {
        match action {
            KnightAction::Attack => self.attack,
            KnightAction::Approach => self.approach,
            KnightAction::LungeLeft => self.lunge_left,
            KnightAction::LungeRight => self.lunge_right,
        }
    }

    pub fn set(&mut self, action: KnightAction, value: f64) {
        match action {
            KnightAction::Attack => self.attack = value,
            KnightAction::Approach => self.approach = value,
            KnightAction::LungeLeft => self.lunge_left = value,
            KnightAction::LungeRight => self.lunge_right = value,
        }
    }

    /// Highest-valued action; ties go to the earlier action in priority order
    pub fn best(&self) -> KnightAction {
        let mut best = KnightAction::ALL[0];
        for action in KnightAction::ALL.into_iter().skip(1) {
            if self.get(action) > self.get(best) {
                best = action;
            }
        }
        best
    }

    pub fn max(&self) -> f64 {
        self.get(self.best())
    }
}

/// State key to action values. Unseen states read as all zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    rows: BTreeMap<String, ActionValues>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row for `state`, zeros if never visited
    pub fn row(&self, state: &AiState) -> ActionValues {
        self.rows.get(&state.key()).copied().unwrap_or_default()
    }

    pub fn value(&self, state: &AiState, action: KnightAction) -> f64 {
        self.row(state).get(action)
    }

    pub fn set(&mut self, state: &AiState, action: KnightAction, value: f64) {
        self.rows.entry(state.key()).or_default().set(action, value);
    }

    /// Best attainable value from `state`; the absorbing dead marker is worth nothing
    pub fn max_value(&self, state: &AiState) -> f64 {
        if state.is_terminal() {
            0.0
        } else {
            self.row(state).max()
        }
    }

    /// Number of states with a stored row
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionValues)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }
}
