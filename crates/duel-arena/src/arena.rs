//! The per-tick duel loop.
//!
//! One [`Arena::tick`] runs, in order: pending animation completions, the
//! knight's idle clock, hero input, the knight's decision, both state
//! machines, movement, hit sensors and damage, the stamina governor, and
//! finally clip playback and telemetry.

use duel_agent::{AiState, KnightAction, KnightAgent, QTable};
use duel_core::{
    ActionOutcome, AnimationComplete, AnimationCue, AnimationKey, Combatant, CombatantId,
    Duelists, DuelError, Facing, GovernorEvent, HitSensor, ImpactReport, InputFrame,
    MachineEvent, Result, RewardEvent, SensorSet, TelemetryBuffer, TelemetryRecord, Trigger,
    damage, machine, motion, stamina,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::ArenaConfig;
use crate::environment::{Presentation, TelemetryBatch};
use crate::hero::HeroController;
use crate::knight::KnightController;
use crate::timeline::ClipTimeline;

const COMBATANTS: [CombatantId; 2] = [CombatantId::Hero, CombatantId::Knight];

/// Clip requests and telemetry entries gathered during a tick, applied at
/// its end
#[derive(Debug, Default)]
pub(crate) struct Effects {
    clips: Vec<(CombatantId, AnimationCue, Facing)>,
    log: Vec<(CombatantId, String)>,
}

impl Effects {
    pub(crate) fn play(&mut self, combatant: CombatantId, cue: AnimationCue, facing: Facing) {
        self.clips.push((combatant, cue, facing));
    }

    fn play_key(&mut self, combatant: &Combatant, key: AnimationKey) {
        self.play(combatant.id, AnimationCue::untracked(key), combatant.facing);
    }

    pub(crate) fn log(&mut self, combatant: CombatantId, action: impl Into<String>) {
        self.log.push((combatant, action.into()));
    }

    #[cfg(test)]
    pub(crate) fn logged(&self, action: &str) -> bool {
        self.log.iter().any(|(_, a)| a == action)
    }
}

/// How the current episode stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ongoing,
    HeroWon,
    KnightWon,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub hero_actions: Vec<(Trigger, ActionOutcome)>,
    pub knight_decision: Option<(KnightAction, ActionOutcome)>,
    pub impacts: Vec<ImpactReport>,
    pub outcome: Outcome,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    tick: u64,
    outcome: Outcome,
    duel: &'a Duelists,
    sensors: &'a SensorSet,
    table: &'a QTable,
}

/// Owns both combatants and drives them one tick at a time
pub struct Arena {
    config: ArenaConfig,
    duel: Duelists,
    sensors: SensorSet,
    agent: KnightAgent,
    hero_ctl: HeroController,
    knight_ctl: KnightController,
    presentation: Box<dyn Presentation>,
    inbox: VecDeque<AnimationComplete>,
    /// Last clip sent per combatant; looping clips are not restarted
    last_clip: BTreeMap<CombatantId, (AnimationKey, Facing)>,
    telemetry: TelemetryBuffer,
    telemetry_tx: broadcast::Sender<TelemetryBatch>,
    rng: ChaCha8Rng,
    time_ms: f64,
    tick: u64,
    outcome: Outcome,
}

impl Arena {
    /// Build an arena around a knight agent and a presentation layer
    pub fn new(
        config: ArenaConfig,
        agent: KnightAgent,
        presentation: Box<dyn Presentation>,
    ) -> Result<Self> {
        config.validate()?;
        let (telemetry_tx, _) = broadcast::channel(64);
        let mut arena = Self {
            duel: spawn(&config),
            sensors: SensorSet::new(),
            agent,
            hero_ctl: HeroController::new(),
            knight_ctl: KnightController::new(),
            presentation,
            inbox: VecDeque::new(),
            last_clip: BTreeMap::new(),
            telemetry: TelemetryBuffer::new(config.telemetry_capacity, config.telemetry_flush_ms),
            telemetry_tx,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time_ms: 0.0,
            tick: 0,
            outcome: Outcome::Ongoing,
            config,
        };
        arena.agent.begin_episode();
        arena.play_opening();
        info!(seed = arena.config.seed, "Arena ready");
        Ok(arena)
    }

    /// Arena whose clips complete on their authored lengths
    pub fn headless(config: ArenaConfig, agent: KnightAgent) -> Result<Self> {
        Self::new(config, agent, Box::new(ClipTimeline::new()))
    }

    /// Receive telemetry batches as they are flushed
    pub fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryBatch> {
        self.telemetry_tx.subscribe()
    }

    /// Queue a completion signal for the next tick
    pub fn notify_animation_complete(&mut self, done: AnimationComplete) {
        self.inbox.push_back(done);
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn duel(&self) -> &Duelists {
        &self.duel
    }

    pub fn duel_mut(&mut self) -> &mut Duelists {
        &mut self.duel
    }

    pub fn hero(&self) -> &Combatant {
        &self.duel.hero
    }

    pub fn knight(&self) -> &Combatant {
        &self.duel.knight
    }

    pub fn agent(&self) -> &KnightAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut KnightAgent {
        &mut self.agent
    }

    pub fn sensors(&self) -> &SensorSet {
        &self.sensors
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn time_ms(&self) -> f64 {
        self.time_ms
    }

    /// Start a fresh episode. Learned values and the RNG stream carry over.
    pub fn reset(&mut self) {
        self.duel = spawn(&self.config);
        self.sensors.clear();
        self.inbox.clear();
        self.last_clip.clear();
        self.telemetry.clear();
        self.hero_ctl = HeroController::new();
        self.knight_ctl = KnightController::new();
        self.presentation.reset();
        self.agent.begin_episode();
        self.time_ms = 0.0;
        self.tick = 0;
        self.outcome = Outcome::Ongoing;
        self.play_opening();
        debug!("Arena reset");
    }

    /// SHA-256 over the serialized duel, sensors and value table
    pub fn state_hash(&self) -> Result<String> {
        let snapshot = Snapshot {
            tick: self.tick,
            outcome: self.outcome,
            duel: &self.duel,
            sensors: &self.sensors,
            table: self.agent.table(),
        };
        let json = serde_json::to_vec(&snapshot).map_err(DuelError::from)?;
        Ok(hex::encode(Sha256::digest(&json)))
    }

    /// Persist the table one last time and hand it back
    pub async fn shutdown(self) -> QTable {
        self.agent.shutdown().await
    }

    /// Advance the duel by `delta_ms`
    pub fn tick(&mut self, input: &InputFrame, delta_ms: f32) -> TickReport {
        self.tick += 1;
        self.time_ms += f64::from(delta_ms);
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };
        if self.outcome.is_over() {
            self.flush_telemetry(delta_ms);
            report.outcome = self.outcome;
            return report;
        }

        let mut fx = Effects::default();

        let mut completions: Vec<AnimationComplete> = self.inbox.drain(..).collect();
        completions.extend(self.presentation.drain_completions(delta_ms));
        for done in completions {
            self.apply_completion(done, &mut fx);
        }

        let state = self.observe();
        self.agent.tick_idle(delta_ms, &state);

        let turn = self.hero_ctl.apply(&mut self.duel.hero, input, delta_ms, &mut fx);
        if turn.attack_committed {
            self.knight_ctl.react_to_attack(
                &mut self.duel.knight,
                &self.duel.hero,
                &self.config.reactive_block,
                &mut self.rng,
                &mut fx,
            );
        }
        report.hero_actions = turn.outcomes;

        self.knight_ctl.tick_timers(&mut self.duel.knight, delta_ms);
        if self.knight_ctl.ready(&self.duel.knight) {
            report.knight_decision = Some(self.decide(&mut fx));
        }

        self.advance_machines(delta_ms, &mut fx);
        self.advance_bodies(delta_ms, &mut fx);
        report.impacts = self.resolve_sensors(delta_ms, &mut fx);
        self.govern_stamina(delta_ms, &mut fx);

        self.apply_effects(fx);
        self.flush_telemetry(delta_ms);
        report.outcome = self.outcome;
        report
    }

    fn observe(&self) -> AiState {
        AiState::observe(&self.duel.knight, &self.duel.hero)
    }

    fn play_opening(&mut self) {
        let mut fx = Effects::default();
        fx.play_key(&self.duel.hero, AnimationKey::Idle);
        fx.play_key(&self.duel.knight, AnimationKey::Idle);
        self.apply_effects(fx);
    }

    fn apply_completion(&mut self, done: AnimationComplete, fx: &mut Effects) {
        let c = self.duel.get_mut(done.combatant);
        match machine::on_complete(c, done.cue) {
            Some(MachineEvent::BlockRaised) => fx.play_key(c, AnimationKey::BlockMid),
            Some(MachineEvent::BlockLowered) => fx.play_key(c, AnimationKey::Idle),
            _ => {}
        }
        if done.cue.key == AnimationKey::TakeDamage
            && c.is_alive()
            && !c.is_attacking()
            && !c.is_blocking()
        {
            fx.play_key(c, AnimationKey::Idle);
        }
    }

    fn decide(&mut self, fx: &mut Effects) -> (KnightAction, ActionOutcome) {
        let state = self.observe();
        let action = self.agent.choose(&state, &mut self.rng);
        let outcome = self
            .knight_ctl
            .execute(&mut self.duel.knight, &self.duel.hero, action, fx);
        self.agent.record_decision(state, action, outcome);
        fx.log(CombatantId::Knight, action.as_str());
        (action, outcome)
    }

    fn advance_machines(&mut self, delta_ms: f32, fx: &mut Effects) {
        for id in COMBATANTS {
            let c = self.duel.get_mut(id);
            match machine::advance(c, delta_ms) {
                Some(MachineEvent::BladeLive { kind, generation }) => {
                    self.sensors.spawn(HitSensor::spawn(c, kind, generation));
                }
                Some(MachineEvent::BlockRaised) => fx.play_key(c, AnimationKey::BlockMid),
                Some(MachineEvent::BlockLowered | MachineEvent::Recovered) => {
                    fx.play_key(c, AnimationKey::Idle)
                }
                None => {}
            }
        }
    }

    fn advance_bodies(&mut self, delta_ms: f32, fx: &mut Effects) {
        let frame_ms = self.config.frame_ms;
        let bounds = self.config.bounds;
        let knight_at = self.duel.knight.position;
        let hero_at = self.duel.hero.position;

        let hero_done = motion::advance(&mut self.duel.hero, knight_at, delta_ms, frame_ms, &bounds);
        let knight_done =
            motion::advance(&mut self.duel.knight, hero_at, delta_ms, frame_ms, &bounds);

        // A moving knight only meets the walls; otherwise the hero yields
        if self.duel.knight.movement.is_none() {
            motion::separate(&mut self.duel.hero, &self.duel.knight);
        }
        for c in [&mut self.duel.hero, &mut self.duel.knight] {
            c.position = bounds.clamp(c.position, c.body_radius);
        }

        for (id, ended) in [(CombatantId::Hero, hero_done), (CombatantId::Knight, knight_done)] {
            let c = self.duel.get(id);
            if ended.is_some() && c.is_alive() && !c.is_busy() {
                fx.play_key(c, AnimationKey::Idle);
            }
        }
    }

    fn resolve_sensors(&mut self, delta_ms: f32, fx: &mut Effects) -> Vec<ImpactReport> {
        let hits = self.sensors.evaluate(&self.duel, delta_ms);
        let mut impacts = Vec::with_capacity(hits.len());
        for hit in hits {
            if self.outcome.is_over() {
                break;
            }
            let (attacker, target) = self.duel.split(hit.origin);
            let impact = damage::resolve_impact(attacker, target, &hit, &mut self.rng);
            if impact.landed() {
                self.on_landed(&impact, fx);
            }
            impacts.push(impact);
        }
        impacts
    }

    fn on_landed(&mut self, impact: &ImpactReport, fx: &mut Effects) {
        let attacker = self.duel.get(impact.attacker);
        let target = self.duel.get(impact.target);
        fx.log(target.id, format!("took_damage_{:.1}", impact.damage));

        if impact.died {
            fx.play_key(target, AnimationKey::Die);
            fx.play_key(attacker, AnimationKey::Unsheath);
        } else if !target.is_attacking() {
            // Reel facing whoever struck
            let facing = Facing::from_angle(target.angle_to(attacker));
            fx.play(target.id, AnimationCue::untracked(AnimationKey::TakeDamage), facing);
        }

        let next = self.observe();
        match impact.target {
            CombatantId::Hero => {
                self.agent.reinforce(RewardEvent::HitLanded, &next);
                if impact.died {
                    self.agent.end_episode();
                    self.finish(Outcome::KnightWon);
                }
            }
            CombatantId::Knight => {
                self.agent.reinforce(RewardEvent::DamageTaken, &next);
                if impact.died {
                    self.agent.reinforce(RewardEvent::Death, &next);
                    self.finish(Outcome::HeroWon);
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        self.sensors.clear();
        info!(
            ?outcome,
            tick = self.tick,
            hero_health = self.duel.hero.health,
            knight_health = self.duel.knight.health,
            "Duel decided"
        );
    }

    fn govern_stamina(&mut self, delta_ms: f32, fx: &mut Effects) {
        for id in COMBATANTS {
            let c = self.duel.get_mut(id);
            match stamina::tick(c, delta_ms) {
                Some(GovernorEvent::Exhausted { block_cancelled }) => {
                    if id == CombatantId::Knight {
                        self.knight_ctl.drop_block(c);
                    }
                    if block_cancelled {
                        fx.play_key(c, AnimationKey::Idle);
                    }
                    debug!(combatant = %id, block_cancelled, "exhausted");
                }
                Some(GovernorEvent::Recovered) => debug!(combatant = %id, "recovered from exhaustion"),
                None => {}
            }
        }
    }

    fn apply_effects(&mut self, fx: Effects) {
        for (id, cue, facing) in fx.clips {
            let looping = cue.key.duration_ms().is_none();
            if looping && self.last_clip.get(&id) == Some(&(cue.key, facing)) {
                continue;
            }
            self.last_clip.insert(id, (cue.key, facing));
            self.presentation.play(id, cue, facing);
        }
        for (id, action) in fx.log {
            let record = TelemetryRecord::capture(self.time_ms, self.duel.get(id), action);
            self.telemetry.push(record);
        }
    }

    fn flush_telemetry(&mut self, delta_ms: f32) {
        if let Some(records) = self.telemetry.tick(delta_ms) {
            let batch = TelemetryBatch {
                tick: self.tick,
                records,
            };
            // Nobody listening is fine
            let _ = self.telemetry_tx.send(batch);
        }
    }
}

fn spawn(config: &ArenaConfig) -> Duelists {
    Duelists::new(
        Combatant::from_config(CombatantId::Hero, &config.hero),
        Combatant::from_config(CombatantId::Knight, &config.knight),
    )
}
