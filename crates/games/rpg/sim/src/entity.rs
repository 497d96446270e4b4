//! The single entity record and its animation-driven state machine.

use crate::config::AttackVariant;
use crate::effects::{EffectKind, EffectList};
use crate::events::{Fx, Sound};
use crate::kinds::{EntityKind, KindDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimState {
    Idle,
    Run,
    Jump,
    Fall,
    Attack1,
    Attack2,
    Attack3,
    TakeHit,
    Death,
    Open,
    Dialogue,
    Greet,
}

impl AnimState {
    pub fn name(self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Run => "run",
            AnimState::Jump => "jump",
            AnimState::Fall => "fall",
            AnimState::Attack1 => "attack1",
            AnimState::Attack2 => "attack2",
            AnimState::Attack3 => "attack3",
            AnimState::TakeHit => "take_hit",
            AnimState::Death => "death",
            AnimState::Open => "open",
            AnimState::Dialogue => "dialogue",
            AnimState::Greet => "greet",
        }
    }

    pub fn attack_variant(self) -> Option<AttackVariant> {
        match self {
            AnimState::Attack1 => Some(AttackVariant::Light),
            AnimState::Attack2 => Some(AttackVariant::Air),
            AnimState::Attack3 => Some(AttackVariant::Heavy),
            _ => None,
        }
    }

    /// States the movement code is free to switch between.
    pub fn is_locomotion(self) -> bool {
        matches!(
            self,
            AnimState::Idle | AnimState::Run | AnimState::Jump | AnimState::Fall
        )
    }
}

impl AttackVariant {
    pub fn state(self) -> AnimState {
        match self {
            AttackVariant::Light => AnimState::Attack1,
            AttackVariant::Air => AnimState::Attack2,
            AttackVariant::Heavy => AnimState::Attack3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn toward(dx: f32) -> Self {
        if dx < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Enemy,
    Passive,
    Friendly,
}

/// What the rest of the world may do with an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub attackable: bool,
    pub interactable: bool,
    pub moving: bool,
    pub container: bool,
    pub blocking: bool,
}

/// Hitbox relative to the entity position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Result of an animation wrapping around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// Looping state, nothing to do.
    Looped,
    /// `take_hit` or `greet` finished, back to `idle`.
    Recovered,
    /// An attack animation finished; the swing resolves now if the attacker
    /// resolves on animation end.
    AttackFinished(AttackVariant),
    /// Death animation finished for the first time; queue the entity for removal.
    Died,
    /// Terminal frame reached (`open`, repeated `death`), animation frozen.
    Frozen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Target already at zero health.
    Ignored,
    Damaged,
    Killed,
}

#[derive(Clone, Debug)]
pub struct Entity {
    /// Stable identity used by quest tracking.
    pub uid: u32,
    pub kind: EntityKind,
    pub zone: String,

    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub on_ground: bool,
    /// Horizontal intent: -1, 0 or 1.
    pub move_dir: f32,
    pub facing: Facing,

    pub health: f32,
    pub max_health: f32,
    pub attack_damage: f32,
    pub attack_range: f32,

    pub state: AnimState,
    pub frame: u32,
    pub frame_counter: u32,
    frozen: bool,

    pub hitbox: Hitbox,
    pub faction: Faction,
    pub caps: Capabilities,

    pub on_cooldown: bool,
    pub attack_count: u32,
    /// Death animation completed; the entity no longer changes.
    pub dead: bool,
    pub kill_reported: bool,
    pub greeted: bool,

    pub effects: EffectList,
}

impl Entity {
    pub fn new(uid: u32, kind: EntityKind, zone: impl Into<String>, x: f32, y: f32) -> Self {
        let desc = kind.descriptor();
        Self {
            uid,
            kind,
            zone: zone.into(),
            x,
            y,
            vy: 0.0,
            on_ground: false,
            move_dir: 0.0,
            facing: Facing::Right,
            health: desc.max_health,
            max_health: desc.max_health,
            attack_damage: desc.attack_damage,
            attack_range: desc.attack_range,
            state: AnimState::Idle,
            frame: 0,
            frame_counter: 0,
            frozen: false,
            hitbox: desc.hitbox,
            faction: desc.faction,
            caps: desc.caps,
            on_cooldown: false,
            attack_count: 0,
            dead: false,
            kill_reported: false,
            greeted: false,
            effects: EffectList::default(),
        }
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        self.kind.descriptor()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && !self.dead
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.active(EffectKind::Stun).is_some()
    }

    pub fn is_slowed(&self) -> bool {
        self.effects.active(EffectKind::Freeze).is_some()
    }

    /// Alive, not stunned and not locked into an attack or hit reaction.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.is_stunned() && self.state.is_locomotion()
    }

    pub fn hitbox_rect(&self) -> Rect {
        Rect {
            x: self.x + self.hitbox.offset_x,
            y: self.y + self.hitbox.offset_y,
            width: self.hitbox.width,
            height: self.hitbox.height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.hitbox_rect().center_x()
    }

    pub fn center_y(&self) -> f32 {
        self.hitbox_rect().center_y()
    }

    /// Position at which the hitbox bottom rests on `floor_y`.
    pub fn ground_y(&self, floor_y: f32) -> f32 {
        floor_y - (self.hitbox.offset_y + self.hitbox.height)
    }

    pub fn frame_count(&self, state: AnimState) -> u32 {
        self.descriptor().frames(state)
    }

    /// Switch animation state. Never checks that `state` is reachable from the
    /// current one: callers own that decision.
    pub fn change_state(&mut self, state: AnimState) {
        if self.state != state {
            tracing::debug!(uid = self.uid, from = self.state.name(), to = state.name(), "state change");
        }
        self.state = state;
        self.frame = 0;
        self.frame_counter = 0;
        self.frozen = false;
    }

    /// Per-tick animation advance.
    ///
    /// Returns the end-of-animation outcome on the tick the frame index wraps.
    pub fn advance_animation(&mut self) -> Option<AnimationOutcome> {
        if self.frozen {
            return None;
        }
        self.frame_counter += 1;
        if self.frame_counter < self.descriptor().stagger {
            return None;
        }
        self.frame_counter = 0;
        let frame_count = self.frame_count(self.state);
        self.frame += 1;
        if self.frame < frame_count {
            return None;
        }
        self.frame = 0;
        Some(self.end_of_animation(frame_count))
    }

    pub fn end_of_animation(&mut self, frame_count: u32) -> AnimationOutcome {
        match self.state {
            AnimState::Death => {
                self.frame = frame_count.saturating_sub(1);
                self.frozen = true;
                if self.dead {
                    return AnimationOutcome::Frozen;
                }
                self.dead = true;
                AnimationOutcome::Died
            }
            AnimState::Open => {
                self.frame = frame_count.saturating_sub(1);
                self.frozen = true;
                AnimationOutcome::Frozen
            }
            AnimState::TakeHit | AnimState::Greet => {
                self.change_state(AnimState::Idle);
                AnimationOutcome::Recovered
            }
            AnimState::Attack1 | AnimState::Attack2 | AnimState::Attack3 => {
                let variant = self.state.attack_variant().unwrap_or(AttackVariant::Light);
                self.change_state(AnimState::Idle);
                AnimationOutcome::AttackFinished(variant)
            }
            AnimState::Idle | AnimState::Run | AnimState::Jump | AnimState::Fall | AnimState::Dialogue => {
                AnimationOutcome::Looped
            }
        }
    }

    /// Apply damage. A no-op once health is already at zero.
    pub fn take_hit(&mut self, damage: f32, fx: &mut Vec<Fx>) -> HitOutcome {
        if self.health <= 0.0 {
            return HitOutcome::Ignored;
        }
        self.change_state(AnimState::TakeHit);
        self.health = (self.health - damage).clamp(0.0, self.max_health);
        fx.push(Fx::HealthBar);
        if self.health <= 0.0 {
            self.move_dir = 0.0;
            self.change_state(AnimState::Death);
            fx.push(Fx::Sound(Sound::Death));
            HitOutcome::Killed
        } else {
            HitOutcome::Damaged
        }
    }

    /// Restore health up to the maximum. Returns false for a dead entity.
    pub fn heal(&mut self, amount: f32, fx: &mut Vec<Fx>) -> bool {
        if self.health <= 0.0 {
            return false;
        }
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        fx.push(Fx::HealthBar);
        true
    }
}
