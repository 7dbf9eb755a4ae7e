//! Headless clip clock standing in for a sprite renderer

use duel_core::{AnimationComplete, AnimationCue, CombatantId, Facing};
use std::collections::BTreeMap;
use tracing::trace;

use crate::environment::Presentation;

#[derive(Debug, Clone, Copy)]
struct Playing {
    cue: AnimationCue,
    facing: Facing,
    /// `None` for looping clips
    remaining_ms: Option<f32>,
}

/// Plays one clip per combatant using each clip's authored length.
///
/// Starting a clip replaces the current one, and a replaced clip never
/// completes.
#[derive(Debug, Default, Clone)]
pub struct ClipTimeline {
    playing: BTreeMap<CombatantId, Playing>,
}

impl ClipTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clip currently shown for `combatant`
    pub fn current(&self, combatant: CombatantId) -> Option<(AnimationCue, Facing)> {
        self.playing.get(&combatant).map(|p| (p.cue, p.facing))
    }
}

impl Presentation for ClipTimeline {
    fn play(&mut self, combatant: CombatantId, cue: AnimationCue, facing: Facing) {
        let remaining_ms = cue.key.duration_ms();
        trace!(%combatant, clip = cue.key.clip_name(), %facing, "play");
        self.playing.insert(
            combatant,
            Playing {
                cue,
                facing,
                remaining_ms,
            },
        );
    }

    fn drain_completions(&mut self, delta_ms: f32) -> Vec<AnimationComplete> {
        let mut done = Vec::new();
        for (&combatant, playing) in self.playing.iter_mut() {
            if let Some(remaining) = playing.remaining_ms.as_mut() {
                *remaining -= delta_ms;
                if *remaining <= 0.0 {
                    // Hold the last frame until something else is played
                    playing.remaining_ms = None;
                    done.push(AnimationComplete {
                        combatant,
                        cue: playing.cue,
                    });
                }
            }
        }
        done
    }

    fn reset(&mut self) {
        self.playing.clear();
    }
}
