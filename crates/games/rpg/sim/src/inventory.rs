//! Player inventory and equipment store.

use crate::items::{Item, WeaponSpec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemStack {
    pub item: Item,
    pub count: u32,
}

#[derive(Clone, Debug)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    selected: usize,
}

impl Inventory {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size.max(1)],
            selected: 0,
        }
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<Item> {
        self.slots[self.selected].map(|s| s.item)
    }

    /// Select slot `n`. Out-of-range slots are ignored.
    pub fn select(&mut self, n: usize) -> bool {
        if n >= self.slots.len() {
            return false;
        }
        self.selected = n;
        true
    }

    pub fn count(&self, item: Item) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item == item)
            .map(|s| s.count)
            .sum()
    }

    /// Add items, topping up existing stacks first. Returns what did not fit.
    pub fn add(&mut self, item: Item, mut count: u32) -> u32 {
        let max = item.max_stack();

        for stack in self.slots.iter_mut().flatten() {
            if count == 0 {
                break;
            }
            if stack.item == item && stack.count < max {
                let moved = (max - stack.count).min(count);
                stack.count += moved;
                count -= moved;
            }
        }

        for slot in self.slots.iter_mut() {
            if count == 0 {
                break;
            }
            if slot.is_none() {
                let moved = max.min(count);
                *slot = Some(ItemStack { item, count: moved });
                count -= moved;
            }
        }

        count
    }

    /// Remove `count` items, or nothing at all if there are not enough.
    pub fn remove(&mut self, item: Item, mut count: u32) -> bool {
        if self.count(item) < count {
            return false;
        }
        for slot in self.slots.iter_mut().rev() {
            if count == 0 {
                break;
            }
            if let Some(stack) = slot {
                if stack.item == item {
                    let taken = stack.count.min(count);
                    stack.count -= taken;
                    count -= taken;
                    if stack.count == 0 {
                        *slot = None;
                    }
                }
            }
        }
        true
    }
}

/// What the combat resolver reads: one weapon and any number of armor pieces.
#[derive(Clone, Debug, Default)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Vec<Item>,
}

impl Equipment {
    pub fn weapon_spec(&self) -> Option<&'static WeaponSpec> {
        self.weapon.and_then(Item::weapon)
    }

    /// Sum of armor protection in percent. Not capped.
    pub fn protection(&self) -> f32 {
        self.armor
            .iter()
            .filter_map(|item| item.armor_protection())
            .sum()
    }

    /// Equip or unequip an armor piece. Returns whether it is now worn.
    pub fn toggle_armor(&mut self, item: Item) -> bool {
        if let Some(pos) = self.armor.iter().position(|a| *a == item) {
            self.armor.remove(pos);
            false
        } else {
            self.armor.push(item);
            true
        }
    }

    /// Drop anything no longer held in `inventory`.
    pub fn retain_owned(&mut self, inventory: &Inventory) {
        if self.weapon.is_some_and(|w| inventory.count(w) == 0) {
            self.weapon = None;
        }
        self.armor.retain(|a| inventory.count(*a) > 0);
    }
}
