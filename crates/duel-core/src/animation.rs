//! Animation cues exchanged with the presentation layer.
//!
//! The core never plays anything itself. It emits [`AnimationCue`]s and
//! consumes [`AnimationComplete`] events. Cues carry a generation number so a
//! completion that arrives after its clip was superseded can be told apart
//! from the live one.

use serde::{Deserialize, Serialize};

use crate::attack::AttackKind;
use crate::combatant::CombatantId;

/// Clip identifier, independent of facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "clip", content = "attack", rename_all = "snake_case")]
pub enum AnimationKey {
    Idle,
    Walk,
    Run,
    Attack(AttackKind),
    Rolling,
    FrontFlip,
    TakeDamage,
    BlockStart,
    BlockMid,
    Die,
    Unsheath,
}

impl AnimationKey {
    /// Sprite-sheet clip name
    pub fn clip_name(self) -> &'static str {
        match self {
            AnimationKey::Idle => "idle",
            AnimationKey::Walk => "walk",
            AnimationKey::Run => "run",
            AnimationKey::Attack(kind) => kind.clip_name(),
            AnimationKey::Rolling => "rolling",
            AnimationKey::FrontFlip => "front-flip",
            AnimationKey::TakeDamage => "take-damage",
            AnimationKey::BlockStart => "shield-block-start",
            AnimationKey::BlockMid => "shield-block-mid",
            AnimationKey::Die => "die",
            AnimationKey::Unsheath => "unsheath",
        }
    }

    /// Play length of one-shot clips; looping clips return `None`
    pub fn duration_ms(self) -> Option<f32> {
        // frames / frame rate, as authored in the sprite sheets
        let (frames, fps) = match self {
            AnimationKey::Idle | AnimationKey::Walk | AnimationKey::Run | AnimationKey::BlockMid => {
                return None;
            }
            AnimationKey::Attack(AttackKind::LightMelee) => (15.0, 40.0),
            AnimationKey::Attack(AttackKind::HeavyMelee) => (15.0, 24.0),
            AnimationKey::Attack(AttackKind::Special) => (15.0, 30.0),
            AnimationKey::Attack(AttackKind::Kick) => (15.0, 40.0),
            AnimationKey::Rolling => (15.0, 20.0),
            AnimationKey::FrontFlip => (15.0, 45.0),
            AnimationKey::TakeDamage => (8.0, 20.0),
            AnimationKey::BlockStart => (4.0, 30.0),
            AnimationKey::Die => (15.0, 15.0),
            AnimationKey::Unsheath => (15.0, 15.0),
        };
        Some(frames / fps * 1000.0)
    }

    /// Die has a single bank shared by all facings
    pub fn is_directional(self) -> bool {
        !matches!(self, AnimationKey::Die)
    }
}

/// A clip request tagged with the generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationCue {
    pub key: AnimationKey,
    pub generation: u32,
}

impl AnimationCue {
    /// Cue for clips whose completion the core does not track
    pub fn untracked(key: AnimationKey) -> Self {
        Self { key, generation: 0 }
    }
}

/// Edge-triggered notice that a one-shot clip finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationComplete {
    pub combatant: CombatantId,
    pub cue: AnimationCue,
}
