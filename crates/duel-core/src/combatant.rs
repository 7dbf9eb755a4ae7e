//! The combatant aggregate and the two-seat duel that owns both combatants

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::CombatantConfig;
use crate::geometry::{Facing, Vec2};
use crate::machine::{AttackPhase, BlockPhase};

/// Which seat a combatant occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatantId {
    /// Player-controlled actor
    Hero,
    /// Autonomous, learning opponent
    Knight,
}

impl CombatantId {
    pub fn opponent(self) -> CombatantId {
        match self {
            CombatantId::Hero => CombatantId::Knight,
            CombatantId::Knight => CombatantId::Hero,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CombatantId::Hero => "hero",
            CombatantId::Knight => "knight",
        }
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Armor slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    Helmet,
    Breastplate,
    Greaves,
    Shield,
}

/// One worn piece: mitigation fraction and remaining durability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmorPiece {
    /// Fraction of incoming damage removed, in `[0, 1]`
    pub mitigation: f32,
    /// Remaining durability points, never negative
    pub durability: f32,
    /// Set once when durability is exhausted
    #[serde(default)]
    pub broken: bool,
}

impl ArmorPiece {
    pub fn new(mitigation: f32, durability: f32) -> Self {
        Self {
            mitigation: mitigation.clamp(0.0, 1.0),
            durability: durability.max(0.0),
            broken: false,
        }
    }
}

/// Slot-indexed armor map
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmorSet {
    pieces: BTreeMap<ArmorSlot, ArmorPiece>,
}

impl ArmorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: ArmorSlot, mitigation: f32, durability: f32) -> Self {
        self.pieces.insert(slot, ArmorPiece::new(mitigation, durability));
        self
    }

    pub fn get(&self, slot: ArmorSlot) -> Option<&ArmorPiece> {
        self.pieces.get(&slot)
    }

    pub fn get_mut(&mut self, slot: ArmorSlot) -> Option<&mut ArmorPiece> {
        self.pieces.get_mut(&slot)
    }

    /// Mitigation fraction for a slot; unarmored slots mitigate nothing
    pub fn mitigation(&self, slot: ArmorSlot) -> f32 {
        self.get(slot).map_or(0.0, |p| p.mitigation)
    }

    /// Remaining durability for a slot
    pub fn durability(&self, slot: ArmorSlot) -> f32 {
        self.get(slot).map_or(0.0, |p| p.durability)
    }
}

/// Physical mode of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    /// Immovable; velocity is ignored
    Static,
    /// Integrates velocity every tick
    Dynamic,
}

/// Time-boxed velocity command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Approach,
    LungeLeft,
    LungeRight,
    Dodge,
}

/// Active movement, stamped with the angle and facing captured at issuance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub kind: MovementKind,
    pub remaining_ms: f32,
    /// Travel angle in radians, fixed for the whole movement
    pub angle: f32,
    /// Facing shown while moving
    pub facing: Facing,
}

/// Knockback impulse in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    pub remaining_ms: f32,
}

/// Result of a health mutation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthChange {
    /// Health actually removed
    pub dealt: f32,
    /// This mutation was the death transition
    pub died: bool,
}

/// Per-combatant mutable state, owned by exactly one driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    /// Stamina regained per tick once the regen delay has elapsed
    pub stamina_regen_rate: f32,
    pub stamina_regen_delay_ms: f32,
    pub block_disabled: bool,
    pub block_disable_timer_ms: f32,
    pub armor: ArmorSet,
    pub body_radius: f32,
    pub body_mode: BodyMode,
    /// Mode restored after movement or knockback ends
    pub rest_mode: BodyMode,
    pub attack: AttackPhase,
    pub block: BlockPhase,
    /// Block intent (key held, or AI hold timer running)
    pub block_held: bool,
    pub movement: Option<Movement>,
    pub knockback: Option<Knockback>,
    /// Remaining hit-reaction window; impacts are ignored while positive
    pub hit_stun_ms: f32,
    /// Running this tick (suppresses regen)
    pub running: bool,
    pub dead: bool,
    generation: u32,
}

impl Combatant {
    pub fn from_config(id: CombatantId, config: &CombatantConfig) -> Self {
        Self {
            id,
            position: config.spawn,
            velocity: Vec2::ZERO,
            facing: config.facing,
            health: config.max_health,
            max_health: config.max_health,
            stamina: config.max_stamina,
            max_stamina: config.max_stamina,
            stamina_regen_rate: config.stamina_regen_rate,
            stamina_regen_delay_ms: 0.0,
            block_disabled: false,
            block_disable_timer_ms: 0.0,
            armor: config.armor.clone(),
            body_radius: config.body_radius,
            body_mode: config.body_mode,
            rest_mode: config.body_mode,
            attack: AttackPhase::Idle,
            block: BlockPhase::Idle,
            block_held: false,
            movement: None,
            knockback: None,
            hit_stun_ms: 0.0,
            running: false,
            dead: false,
            generation: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    pub fn set_stamina(&mut self, stamina: f32) {
        self.stamina = stamina.clamp(0.0, self.max_stamina);
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    /// Remove health, clamped at zero. The transition to zero marks the
    /// combatant dead exactly once; a dead combatant takes no further damage.
    pub fn take_damage(&mut self, amount: f32) -> HealthChange {
        if self.dead || amount <= 0.0 {
            return HealthChange::default();
        }
        let before = self.health;
        self.set_health(before - amount);
        let mut change = HealthChange {
            dealt: before - self.health,
            died: false,
        };
        if self.health <= 0.0 {
            self.die();
            change.died = true;
        }
        change
    }

    fn die(&mut self) {
        self.dead = true;
        self.velocity = Vec2::ZERO;
        self.attack = AttackPhase::Idle;
        self.block = BlockPhase::Idle;
        self.block_held = false;
        self.movement = None;
        self.knockback = None;
        self.running = false;
    }

    pub fn is_blocking(&self) -> bool {
        self.block != BlockPhase::Idle
    }

    pub fn is_attacking(&self) -> bool {
        self.attack != AttackPhase::Idle
    }

    /// In any committed action: attack track, block track, or hit reaction
    pub fn is_busy(&self) -> bool {
        self.is_attacking() || self.is_blocking() || self.hit_stun_ms > 0.0
    }

    pub fn distance_to(&self, other: &Combatant) -> f32 {
        self.position.distance(other.position)
    }

    /// Angle from this combatant to `other`, in radians
    pub fn angle_to(&self, other: &Combatant) -> f32 {
        self.position.angle_to(other.position)
    }

    /// Allocate a fresh cue generation
    pub fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Stop all motion and return the body to its resting mode
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.movement = None;
        if self.knockback.is_none() {
            self.body_mode = self.rest_mode;
        }
    }
}

/// Both combatants of a duel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duelists {
    pub hero: Combatant,
    pub knight: Combatant,
}

impl Duelists {
    pub fn new(hero: Combatant, knight: Combatant) -> Self {
        Self { hero, knight }
    }

    pub fn get(&self, id: CombatantId) -> &Combatant {
        match id {
            CombatantId::Hero => &self.hero,
            CombatantId::Knight => &self.knight,
        }
    }

    pub fn get_mut(&mut self, id: CombatantId) -> &mut Combatant {
        match id {
            CombatantId::Hero => &mut self.hero,
            CombatantId::Knight => &mut self.knight,
        }
    }

    /// `(actor, opponent)` borrowed together
    pub fn split(&mut self, actor: CombatantId) -> (&mut Combatant, &mut Combatant) {
        match actor {
            CombatantId::Hero => (&mut self.hero, &mut self.knight),
            CombatantId::Knight => (&mut self.knight, &mut self.hero),
        }
    }
}
