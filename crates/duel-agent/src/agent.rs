//! The learning knight: policy, online updates, and episode bookkeeping

use duel_core::{ActionOutcome, IdleClock, RewardEvent, RewardLedger};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::KnightAction;
use crate::config::LearningConfig;
use crate::policy::{epsilon_greedy, q_update};
use crate::saver::PolicySaver;
use crate::state::AiState;
use crate::table::{ActionValues, QTable};

/// The most recent `(state, action)` pair; rewards are credited to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub state: AiState,
    pub action: KnightAction,
    pub outcome: ActionOutcome,
}

/// Counters for debug panels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub decisions: u64,
    pub failures: u64,
    pub hits_landed: u64,
    pub known_states: usize,
    pub last_decision: Option<Decision>,
    /// Table row of the last decision's state
    pub last_row: Option<ActionValues>,
    pub episode_reward: RewardLedger,
}

impl AgentStats {
    /// Hits landed per decision, in `[0, 1]` for a sane run
    pub fn hit_rate(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.hits_landed as f64 / self.decisions as f64
        }
    }
}

/// Tabular Q-learning opponent
pub struct KnightAgent {
    config: LearningConfig,
    table: QTable,
    last: Option<Decision>,
    idle: IdleClock,
    stats: AgentStats,
    saver: Option<PolicySaver>,
}

impl KnightAgent {
    pub fn new(config: LearningConfig, table: QTable) -> Self {
        Self {
            config,
            table,
            last: None,
            idle: IdleClock::default(),
            stats: AgentStats::default(),
            saver: None,
        }
    }

    /// Attach a background writer used by [`KnightAgent::save`]
    pub fn with_saver(mut self, saver: PolicySaver) -> Self {
        self.saver = Some(saver);
        self
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last.as_ref()
    }

    /// Pick an action for `state` without recording it
    pub fn choose<R: Rng + ?Sized>(&self, state: &AiState, rng: &mut R) -> KnightAction {
        epsilon_greedy(&self.table, state, self.config.epsilon, rng)
    }

    /// Remember what was tried and how it went. Failed actions still become
    /// the pair that later rewards are credited to.
    pub fn record_decision(&mut self, state: AiState, action: KnightAction, outcome: ActionOutcome) {
        let decision = Decision {
            state,
            action,
            outcome,
        };
        self.stats.decisions += 1;
        if !outcome.is_success() {
            self.stats.failures += 1;
        }
        self.stats.last_decision = Some(decision);
        self.stats.last_row = Some(self.table.row(&state));
        debug!(state = %state, %action, ?outcome, "knight decided");
        self.last = Some(decision);
    }

    /// One-step Q-learning update. Updates out of the dead marker are ignored.
    pub fn update(&mut self, prev: &AiState, action: KnightAction, reward: f64, next: &AiState) {
        if prev.is_terminal() {
            return;
        }
        let q = self.table.value(prev, action);
        let next_max = self.table.max_value(next);
        let updated = q_update(q, reward, next_max, self.config.alpha, self.config.gamma);
        self.table.set(prev, action, updated);
        self.stats.known_states = self.table.len();
    }

    /// Credit `event` to the last decision, if any. A terminal event ends the
    /// episode and queues a save.
    pub fn reinforce(&mut self, event: RewardEvent, next: &AiState) {
        let reward = self.config.rewards.value(event);
        if event == RewardEvent::HitLanded {
            self.stats.hits_landed += 1;
        }
        if let Some(last) = self.last {
            self.update(&last.state, last.action, reward, next);
            self.stats.episode_reward.record(event, reward);
            self.stats.last_row = Some(self.table.row(&last.state));
        }
        if event.is_terminal() {
            self.end_episode();
        }
    }

    /// Advance the anti-idling clock; each full interval costs the last pair
    pub fn tick_idle(&mut self, delta_ms: f32, next: &AiState) {
        let due = self.idle.advance(delta_ms, self.config.rewards.idle_interval_ms);
        for _ in 0..due {
            self.reinforce(RewardEvent::Idle, next);
        }
    }

    /// Forget the in-flight pair and persist the table
    pub fn end_episode(&mut self) {
        info!(
            states = self.table.len(),
            reward = self.stats.episode_reward.total,
            "Episode ended"
        );
        self.last = None;
        self.idle.reset();
        self.save();
    }

    /// Reset per-episode state; learned values carry over
    pub fn begin_episode(&mut self) {
        self.last = None;
        self.idle.reset();
        self.stats.episode_reward = RewardLedger::default();
    }

    pub fn stats(&self) -> AgentStats {
        AgentStats {
            known_states: self.table.len(),
            ..self.stats.clone()
        }
    }

    /// Queue a fire-and-forget save, if a saver is attached
    pub fn save(&self) {
        match &self.saver {
            Some(saver) => saver.request_save(&self.table),
            None => debug!("No policy saver attached, skipping save"),
        }
    }

    /// Save one last time and wait for the writer to finish
    pub async fn shutdown(mut self) -> QTable {
        if let Some(saver) = self.saver.take() {
            saver.request_save(&self.table);
            saver.shutdown().await;
        }
        self.table
    }
}
