//! Item table: materials, weapons, armor and consumables.
//!
//! Every item is a variant of [`Item`]; all per-item data is looked up from
//! static tables, so an undeclared item cannot exist at runtime.

use crate::effects::EffectKind;
use serde::{Deserialize, Serialize};
use sim_core::Millis;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    // Materials
    Log,
    Planks,
    Stick,
    String,
    IronIngot,
    Leather,
    Bone,
    RawMeat,
    Mushroom,
    // Weapons
    WoodenSword,
    IronSword,
    FlameSword,
    VenomDagger,
    FrostAxe,
    StormBlade,
    Bow,
    // Armor
    LeatherCap,
    IronHelmet,
    IronChestplate,
    // Consumables
    HealthPotion,
    StrengthPotion,
    ThunderPotion,
    Antidote,
    Milk,
}

/// How an attack reaches its target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Delivery {
    /// Directional hit test in front of the attacker.
    Melee,
    /// Spawns a projectile moving `speed` units per tick.
    Ranged { speed: f32 },
}

/// Effect applied to the target after the damage of a landed hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OnHit {
    pub effect: EffectKind,
    pub duration: u32,
    pub factor: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    pub damage: f32,
    pub range: f32,
    pub cooldown: Millis,
    pub windup: Millis,
    pub delivery: Delivery,
    pub on_hit: Option<OnHit>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Consumable {
    Heal(f32),
    Effect {
        kind: EffectKind,
        duration: u32,
        factor: f32,
    },
    /// Removes one effect type.
    Cure(EffectKind),
    /// Removes every active effect.
    Cleanse,
}

const WOODEN_SWORD: WeaponSpec = WeaponSpec {
    damage: 3.0,
    range: 100.0,
    cooldown: Millis::from_millis(600),
    windup: Millis::from_millis(300),
    delivery: Delivery::Melee,
    on_hit: None,
};

const IRON_SWORD: WeaponSpec = WeaponSpec {
    damage: 5.0,
    range: 120.0,
    cooldown: Millis::from_millis(700),
    windup: Millis::from_millis(300),
    delivery: Delivery::Melee,
    on_hit: None,
};

const FLAME_SWORD: WeaponSpec = WeaponSpec {
    damage: 5.0,
    range: 120.0,
    cooldown: Millis::from_millis(700),
    windup: Millis::from_millis(300),
    delivery: Delivery::Melee,
    on_hit: Some(OnHit {
        effect: EffectKind::Burning,
        duration: 180,
        factor: 1.0,
    }),
};

const VENOM_DAGGER: WeaponSpec = WeaponSpec {
    damage: 3.0,
    range: 80.0,
    cooldown: Millis::from_millis(400),
    windup: Millis::from_millis(200),
    delivery: Delivery::Melee,
    on_hit: Some(OnHit {
        effect: EffectKind::Poison,
        duration: 270,
        factor: 1.0,
    }),
};

const FROST_AXE: WeaponSpec = WeaponSpec {
    damage: 6.0,
    range: 110.0,
    cooldown: Millis::from_millis(900),
    windup: Millis::from_millis(400),
    delivery: Delivery::Melee,
    on_hit: Some(OnHit {
        effect: EffectKind::Freeze,
        duration: 120,
        factor: 1.0,
    }),
};

const STORM_BLADE: WeaponSpec = WeaponSpec {
    damage: 4.0,
    range: 120.0,
    cooldown: Millis::from_millis(700),
    windup: Millis::from_millis(300),
    delivery: Delivery::Melee,
    on_hit: Some(OnHit {
        effect: EffectKind::ThunderShock,
        duration: 60,
        factor: 1.0,
    }),
};

const BOW: WeaponSpec = WeaponSpec {
    damage: 4.0,
    range: 600.0,
    cooldown: Millis::from_millis(900),
    windup: Millis::from_millis(400),
    delivery: Delivery::Ranged { speed: 8.0 },
    on_hit: None,
};

impl Item {
    pub fn name(self) -> &'static str {
        match self {
            Item::Log => "log",
            Item::Planks => "planks",
            Item::Stick => "stick",
            Item::String => "string",
            Item::IronIngot => "iron_ingot",
            Item::Leather => "leather",
            Item::Bone => "bone",
            Item::RawMeat => "raw_meat",
            Item::Mushroom => "mushroom",
            Item::WoodenSword => "wooden_sword",
            Item::IronSword => "iron_sword",
            Item::FlameSword => "flame_sword",
            Item::VenomDagger => "venom_dagger",
            Item::FrostAxe => "frost_axe",
            Item::StormBlade => "storm_blade",
            Item::Bow => "bow",
            Item::LeatherCap => "leather_cap",
            Item::IronHelmet => "iron_helmet",
            Item::IronChestplate => "iron_chestplate",
            Item::HealthPotion => "health_potion",
            Item::StrengthPotion => "strength_potion",
            Item::ThunderPotion => "thunder_potion",
            Item::Antidote => "antidote",
            Item::Milk => "milk",
        }
    }

    pub fn weapon(self) -> Option<&'static WeaponSpec> {
        match self {
            Item::WoodenSword => Some(&WOODEN_SWORD),
            Item::IronSword => Some(&IRON_SWORD),
            Item::FlameSword => Some(&FLAME_SWORD),
            Item::VenomDagger => Some(&VENOM_DAGGER),
            Item::FrostAxe => Some(&FROST_AXE),
            Item::StormBlade => Some(&STORM_BLADE),
            Item::Bow => Some(&BOW),
            _ => None,
        }
    }

    /// Damage protection in percent.
    pub fn armor_protection(self) -> Option<f32> {
        match self {
            Item::LeatherCap => Some(5.0),
            Item::IronHelmet => Some(10.0),
            Item::IronChestplate => Some(20.0),
            _ => None,
        }
    }

    pub fn consumable(self) -> Option<Consumable> {
        match self {
            Item::HealthPotion => Some(Consumable::Heal(30.0)),
            Item::RawMeat => Some(Consumable::Heal(5.0)),
            Item::StrengthPotion => Some(Consumable::Effect {
                kind: EffectKind::Strength,
                duration: 600,
                factor: 2.0,
            }),
            Item::ThunderPotion => Some(Consumable::Effect {
                kind: EffectKind::Electrocute,
                duration: 600,
                factor: 1.0,
            }),
            Item::Mushroom => Some(Consumable::Effect {
                kind: EffectKind::Regeneration,
                duration: 300,
                factor: 1.0,
            }),
            Item::Antidote => Some(Consumable::Cure(EffectKind::Poison)),
            Item::Milk => Some(Consumable::Cleanse),
            _ => None,
        }
    }

    pub fn max_stack(self) -> u32 {
        if self.weapon().is_some() || self.armor_protection().is_some() {
            1
        } else if self.consumable().is_some() {
            16
        } else {
            64
        }
    }
}
