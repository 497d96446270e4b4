//! Static per-kind data: animations, stats, attack profile, drops, dialogue.
//!
//! Behaviour differences between kinds are lookups into these tables.

use crate::config::AttackVariant;
use crate::effects::EffectKind;
use crate::entity::{AnimState, Capabilities, Faction, Hitbox};
use crate::items::{Delivery, Item, OnHit};
use serde::{Deserialize, Serialize};
use sim_core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Goblin,
    Skeleton,
    SkeletonArcher,
    Mushroom,
    Boar,
    Villager,
    Trader,
    Chest,
}

/// When a swing's hit test runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackTiming {
    /// Scheduled on the timer queue a fixed wind-up after the swing starts.
    WindUp,
    /// At the end of the attack animation.
    AnimationEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    pub timing: AttackTiming,
    pub delivery: Delivery,
    pub cooldown: Millis,
    /// Cycled through on consecutive attacks.
    pub variants: &'static [AttackVariant],
    pub on_hit: Option<OnHit>,
}

/// One drop-table row: emitted when `random(0, 100) <= chance`,
/// with quantity `random(0, amount)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropSpec {
    pub item: Item,
    pub amount: u32,
    pub chance: f32,
}

#[derive(Debug)]
pub struct KindDescriptor {
    pub name: &'static str,
    pub faction: Faction,
    pub caps: Capabilities,
    pub max_health: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub run_speed: f32,
    pub aggro_range: f32,
    pub hitbox: Hitbox,
    /// Ticks between animation frame advances.
    pub stagger: u32,
    pub animations: &'static [(AnimState, u32)],
    /// `None` for kinds that never attack on their own (the player attacks
    /// with its equipped weapon).
    pub attack: Option<AttackProfile>,
    pub drops: &'static [DropSpec],
    pub dialogue: &'static [&'static str],
}

impl KindDescriptor {
    /// Frame count of `state`; states missing from the set play as one frame.
    pub fn frames(&self, state: AnimState) -> u32 {
        self.animations
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, n)| (*n).max(1))
            .unwrap_or(1)
    }
}

const MONSTER: Capabilities = Capabilities {
    attackable: true,
    interactable: false,
    moving: true,
    container: false,
    blocking: false,
};

const NPC: Capabilities = Capabilities {
    attackable: false,
    interactable: true,
    moving: false,
    container: false,
    blocking: true,
};

const HUMANOID_HITBOX: Hitbox = Hitbox {
    offset_x: 20.0,
    offset_y: 10.0,
    width: 40.0,
    height: 60.0,
};

static PLAYER: KindDescriptor = KindDescriptor {
    name: "player",
    faction: Faction::Friendly,
    caps: Capabilities {
        attackable: true,
        interactable: false,
        moving: true,
        container: false,
        blocking: false,
    },
    max_health: 100.0,
    attack_damage: 1.0,
    attack_range: 60.0,
    run_speed: 4.0,
    aggro_range: 0.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 5,
    animations: &[
        (AnimState::Idle, 8),
        (AnimState::Run, 8),
        (AnimState::Jump, 2),
        (AnimState::Fall, 2),
        (AnimState::Attack1, 6),
        (AnimState::Attack2, 6),
        (AnimState::Attack3, 8),
        (AnimState::TakeHit, 4),
        (AnimState::Death, 10),
    ],
    attack: None,
    drops: &[],
    dialogue: &[],
};

static GOBLIN: KindDescriptor = KindDescriptor {
    name: "goblin",
    faction: Faction::Enemy,
    caps: MONSTER,
    max_health: 30.0,
    attack_damage: 5.0,
    attack_range: 60.0,
    run_speed: 2.0,
    aggro_range: 300.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 5,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Run, 8),
        (AnimState::Attack1, 8),
        (AnimState::TakeHit, 4),
        (AnimState::Death, 4),
    ],
    attack: Some(AttackProfile {
        timing: AttackTiming::AnimationEnd,
        delivery: Delivery::Melee,
        cooldown: Millis::from_millis(1200),
        variants: &[AttackVariant::Light],
        on_hit: None,
    }),
    drops: &[
        DropSpec {
            item: Item::Leather,
            amount: 2,
            chance: 50.0,
        },
        DropSpec {
            item: Item::Stick,
            amount: 3,
            chance: 40.0,
        },
    ],
    dialogue: &[],
};

static SKELETON: KindDescriptor = KindDescriptor {
    name: "skeleton",
    faction: Faction::Enemy,
    caps: MONSTER,
    max_health: 50.0,
    attack_damage: 8.0,
    attack_range: 70.0,
    run_speed: 1.5,
    aggro_range: 300.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 6,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Run, 4),
        (AnimState::Attack1, 8),
        (AnimState::Attack2, 8),
        (AnimState::Attack3, 8),
        (AnimState::TakeHit, 4),
        (AnimState::Death, 4),
    ],
    attack: Some(AttackProfile {
        timing: AttackTiming::AnimationEnd,
        delivery: Delivery::Melee,
        cooldown: Millis::from_millis(1500),
        variants: &[AttackVariant::Light, AttackVariant::Heavy],
        on_hit: None,
    }),
    drops: &[DropSpec {
        item: Item::Bone,
        amount: 3,
        chance: 80.0,
    }],
    dialogue: &[],
};

static SKELETON_ARCHER: KindDescriptor = KindDescriptor {
    name: "skeleton_archer",
    faction: Faction::Enemy,
    caps: MONSTER,
    max_health: 25.0,
    attack_damage: 6.0,
    attack_range: 400.0,
    run_speed: 1.2,
    aggro_range: 450.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 6,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Run, 4),
        (AnimState::Attack1, 6),
        (AnimState::TakeHit, 4),
        (AnimState::Death, 4),
    ],
    attack: Some(AttackProfile {
        timing: AttackTiming::AnimationEnd,
        delivery: Delivery::Ranged { speed: 6.0 },
        cooldown: Millis::from_millis(2000),
        variants: &[AttackVariant::Light],
        on_hit: None,
    }),
    drops: &[
        DropSpec {
            item: Item::Bone,
            amount: 2,
            chance: 60.0,
        },
        DropSpec {
            item: Item::String,
            amount: 2,
            chance: 50.0,
        },
    ],
    dialogue: &[],
};

static MUSHROOM: KindDescriptor = KindDescriptor {
    name: "mushroom",
    faction: Faction::Enemy,
    caps: MONSTER,
    max_health: 20.0,
    attack_damage: 3.0,
    attack_range: 50.0,
    run_speed: 1.0,
    aggro_range: 200.0,
    hitbox: Hitbox {
        offset_x: 20.0,
        offset_y: 30.0,
        width: 40.0,
        height: 40.0,
    },
    stagger: 5,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Run, 8),
        (AnimState::Attack1, 8),
        (AnimState::TakeHit, 4),
        (AnimState::Death, 4),
    ],
    attack: Some(AttackProfile {
        timing: AttackTiming::AnimationEnd,
        delivery: Delivery::Melee,
        cooldown: Millis::from_millis(1500),
        variants: &[AttackVariant::Light],
        on_hit: Some(OnHit {
            effect: EffectKind::Poison,
            duration: 180,
            factor: 1.0,
        }),
    }),
    drops: &[DropSpec {
        item: Item::Mushroom,
        amount: 2,
        chance: 70.0,
    }],
    dialogue: &[],
};

static BOAR: KindDescriptor = KindDescriptor {
    name: "boar",
    faction: Faction::Passive,
    caps: MONSTER,
    max_health: 20.0,
    attack_damage: 0.0,
    attack_range: 0.0,
    run_speed: 1.0,
    aggro_range: 0.0,
    hitbox: Hitbox {
        offset_x: 10.0,
        offset_y: 30.0,
        width: 50.0,
        height: 30.0,
    },
    stagger: 6,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Run, 4),
        (AnimState::TakeHit, 2),
        (AnimState::Death, 4),
    ],
    attack: None,
    drops: &[
        DropSpec {
            item: Item::RawMeat,
            amount: 2,
            chance: 100.0,
        },
        DropSpec {
            item: Item::Leather,
            amount: 1,
            chance: 60.0,
        },
    ],
    dialogue: &[],
};

static VILLAGER: KindDescriptor = KindDescriptor {
    name: "villager",
    faction: Faction::Friendly,
    caps: NPC,
    max_health: 50.0,
    attack_damage: 0.0,
    attack_range: 0.0,
    run_speed: 0.0,
    aggro_range: 0.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 8,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Greet, 6),
        (AnimState::Dialogue, 4),
    ],
    attack: None,
    drops: &[],
    dialogue: &[
        "Goblins have been raiding the eastern fields.",
        "If you bring me their leather I can patch your gear.",
    ],
};

static TRADER: KindDescriptor = KindDescriptor {
    name: "trader",
    faction: Faction::Friendly,
    caps: NPC,
    max_health: 50.0,
    attack_damage: 0.0,
    attack_range: 0.0,
    run_speed: 0.0,
    aggro_range: 0.0,
    hitbox: HUMANOID_HITBOX,
    stagger: 8,
    animations: &[
        (AnimState::Idle, 4),
        (AnimState::Greet, 6),
        (AnimState::Dialogue, 4),
    ],
    attack: None,
    drops: &[],
    dialogue: &["Fine wares, fair prices.", "Bones and leather buy potions here."],
};

static CHEST: KindDescriptor = KindDescriptor {
    name: "chest",
    faction: Faction::Passive,
    caps: Capabilities {
        attackable: false,
        interactable: true,
        moving: false,
        container: true,
        blocking: true,
    },
    max_health: 1.0,
    attack_damage: 0.0,
    attack_range: 0.0,
    run_speed: 0.0,
    aggro_range: 0.0,
    hitbox: Hitbox {
        offset_x: 0.0,
        offset_y: 0.0,
        width: 48.0,
        height: 32.0,
    },
    stagger: 6,
    animations: &[(AnimState::Idle, 1), (AnimState::Open, 5)],
    attack: None,
    drops: &[
        DropSpec {
            item: Item::HealthPotion,
            amount: 2,
            chance: 100.0,
        },
        DropSpec {
            item: Item::IronIngot,
            amount: 3,
            chance: 75.0,
        },
        DropSpec {
            item: Item::ThunderPotion,
            amount: 1,
            chance: 25.0,
        },
    ],
    dialogue: &[],
};

impl EntityKind {
    pub fn descriptor(self) -> &'static KindDescriptor {
        match self {
            EntityKind::Player => &PLAYER,
            EntityKind::Goblin => &GOBLIN,
            EntityKind::Skeleton => &SKELETON,
            EntityKind::SkeletonArcher => &SKELETON_ARCHER,
            EntityKind::Mushroom => &MUSHROOM,
            EntityKind::Boar => &BOAR,
            EntityKind::Villager => &VILLAGER,
            EntityKind::Trader => &TRADER,
            EntityKind::Chest => &CHEST,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}
