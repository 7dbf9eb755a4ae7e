//! # duel-core
//!
//! Combat model for a two-combatant melee duel.
//!
//! This crate owns the rules, not the loop:
//! - Combatant aggregate, facings and arena geometry
//! - Attack table and the attack/block state machine
//! - Stamina governor, armor zones and the damage pipeline
//! - Hit sensors, movement and knockback
//! - Animation cues, input frames, telemetry and reward signals
//!
//! Everything is a plain function over `&mut Combatant`; the caller decides
//! the order of a tick.

pub mod action;
pub mod animation;
pub mod armor;
pub mod attack;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod error;
pub mod geometry;
pub mod input;
pub mod machine;
pub mod motion;
pub mod reward;
pub mod sensor;
pub mod stamina;
pub mod telemetry;

pub use action::{ActionOutcome, FailureReason};
pub use animation::{AnimationComplete, AnimationCue, AnimationKey};
pub use armor::HitZone;
pub use attack::{AttackDef, AttackKind};
pub use combatant::{
    ArmorPiece, ArmorSet, ArmorSlot, BodyMode, Combatant, CombatantId, Duelists, Movement,
    MovementKind,
};
pub use config::{CombatantConfig, CombatantOverrides};
pub use damage::ImpactReport;
pub use error::{DuelError, Result};
pub use geometry::{Bounds, Facing, Vec2};
pub use input::{InputFrame, Trigger};
pub use machine::{AttackPhase, BlockPhase, MachineEvent};
pub use reward::{IdleClock, RewardEvent, RewardLedger, RewardSchedule};
pub use sensor::{HitSensor, SensorHit, SensorSet};
pub use stamina::GovernorEvent;
pub use telemetry::{TelemetryBuffer, TelemetryRecord};
