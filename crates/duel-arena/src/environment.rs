//! Collaborator seams: presentation and telemetry

use duel_core::{AnimationComplete, AnimationCue, CombatantId, Facing, TelemetryRecord};
use serde::{Deserialize, Serialize};

/// Batch of telemetry records pushed on each flush
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryBatch {
    /// Arena tick at flush time
    pub tick: u64,
    pub records: Vec<TelemetryRecord>,
}

/// Trait for the layer that plays clips.
///
/// The arena only issues `play` commands. Completion of one-shot clips comes
/// back either through [`Presentation::drain_completions`] or, for
/// presentations driven elsewhere, through `Arena::notify_animation_complete`.
pub trait Presentation: Send {
    /// Start `cue` on `combatant`, oriented along `facing`
    fn play(&mut self, combatant: CombatantId, cue: AnimationCue, facing: Facing);

    /// Completions observed while `delta_ms` elapsed
    fn drain_completions(&mut self, _delta_ms: f32) -> Vec<AnimationComplete> {
        Vec::new()
    }

    /// Drop any clip in progress; called between episodes
    fn reset(&mut self) {}
}

/// Presentation that ignores everything. Completions must be delivered by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn play(&mut self, _combatant: CombatantId, _cue: AnimationCue, _facing: Facing) {}
}
