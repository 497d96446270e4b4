use crate::config::AttackVariant;
use crate::items::Item;
use crate::kinds::EntityKind;
use crate::world::{EntityId, ProjectileId};

/// Fire-and-forget sound requests for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    Swing,
    Hit,
    Shoot,
    Death,
    ChestOpen,
    Pickup,
    Freeze,
    Shatter,
    PowerUp,
}

impl Sound {
    pub fn name(self) -> &'static str {
        match self {
            Sound::Swing => "swing",
            Sound::Hit => "hit",
            Sound::Shoot => "shoot",
            Sound::Death => "death",
            Sound::ChestOpen => "chest_open",
            Sound::Pickup => "pickup",
            Sound::Freeze => "freeze",
            Sound::Shatter => "shatter",
            Sound::PowerUp => "power_up",
        }
    }
}

/// Presentation side effect requested by a single entity.
///
/// Entity-level code pushes these without knowing its own key; the caller
/// wraps them into [`RpgEvent::Fx`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fx {
    HealthBar,
    VisualAttached { index: u32, visual: &'static str },
    VisualDetached { index: u32 },
    Sound(Sound),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestEventKind {
    Kill,
    Talk,
}

/// Record appended to the per-tick quest queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestEvent {
    pub kind: QuestEventKind,
    pub entity_uid: u32,
    pub entity_kind: EntityKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    OnCooldown,
    Incapacitated,
    Unarmed,
}

#[derive(Clone, Debug)]
pub enum RpgEvent {
    Fx {
        entity: EntityId,
        fx: Fx,
    },
    AttackStarted {
        entity: EntityId,
        variant: AttackVariant,
    },
    AttackRejected {
        entity: EntityId,
        reason: RejectReason,
    },
    Hit {
        attacker: Option<EntityId>,
        target: EntityId,
        damage: f32,
        health_left: f32,
    },
    ProjectileSpawned {
        id: ProjectileId,
        owner: EntityId,
    },
    ProjectileHit {
        id: ProjectileId,
        target: EntityId,
    },
    ProjectileExpired {
        id: ProjectileId,
    },
    EntityKilled {
        entity: EntityId,
        uid: u32,
        kind: EntityKind,
    },
    EntityRemoved {
        entity: EntityId,
        uid: u32,
    },
    ItemDropped {
        source_uid: u32,
        item: Item,
        count: u32,
    },
    DialogueOpened {
        entity: EntityId,
        uid: u32,
        lines: &'static [&'static str],
    },
    ChestOpened {
        entity: EntityId,
    },
    ItemUsed {
        item: Item,
    },
    Equipped {
        item: Item,
        equipped: bool,
    },
    Crafted {
        item: Item,
        count: u32,
    },
    CraftFailed,
    Quest(QuestEvent),
}

/// Wrap presentation requests collected for `entity` into events.
pub fn emit_fx(events: &mut Vec<RpgEvent>, entity: EntityId, fx: impl IntoIterator<Item = Fx>) {
    events.extend(fx.into_iter().map(|fx| RpgEvent::Fx { entity, fx }));
}
