//! # duel-agent
//!
//! Decision engine for the autonomous knight.
//!
//! - Discretized observations ([`AiState`]) and the action vocabulary
//! - A tabular value store with deterministic tie-breaking
//! - Epsilon-greedy selection and one-step Q-learning
//! - Policy persistence behind [`PolicyStore`], written off the tick thread

pub mod action;
pub mod agent;
pub mod config;
pub mod policy;
pub mod saver;
pub mod state;
pub mod store;
pub mod table;

pub use action::KnightAction;
pub use agent::{AgentStats, Decision, KnightAgent};
pub use config::LearningConfig;
pub use policy::{epsilon_greedy, q_update};
pub use saver::PolicySaver;
pub use state::{AiState, DistanceBin};
pub use store::{JsonFileStore, MemoryStore, PolicyStore, load_or_empty};
pub use table::{ActionValues, QTable};
