//! Outcomes of requested combat actions

use serde::{Deserialize, Serialize};

/// Why a requested action did not happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Not enough stamina to pay the cost
    InsufficientStamina,
    /// Attack or block track already committed, or in hit reaction
    Busy,
    /// Target too close or too far for this action
    OutOfRange,
    /// Stamina exhaustion forbids blocking and movement
    Exhausted,
    /// The actor is dead
    Dead,
}

/// Result reported to the caller of any action request.
///
/// Rejections are ordinary values, never errors: an invalid request simply
/// did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    Failure(FailureReason),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            ActionOutcome::Success => None,
            ActionOutcome::Failure(reason) => Some(*reason),
        }
    }
}

impl From<Result<(), FailureReason>> for ActionOutcome {
    fn from(result: Result<(), FailureReason>) -> Self {
        match result {
            Ok(()) => ActionOutcome::Success,
            Err(reason) => ActionOutcome::Failure(reason),
        }
    }
}
