//! Player-side commands that are not movement or combat: talking, opening
//! chests, using the selected item, crafting, and collecting drops.

use crate::effects::{add_effect, clear_effects, remove_kind};
use crate::entity::{AnimState, Facing};
use crate::events::{emit_fx, Fx, QuestEvent, QuestEventKind, RpgEvent, Sound};
use crate::items::Consumable;
use crate::kinds::DropSpec;
use crate::recipes::{find_recipe, CraftGrid};
use crate::world::{EntityId, RpgState};
use rand::Rng;

/// Roll each drop independently and put the result in the player's inventory.
/// Returns how many stacks were produced.
pub fn roll_drops(
    state: &mut RpgState,
    source_uid: u32,
    drops: &[DropSpec],
    events: &mut Vec<RpgEvent>,
) -> usize {
    let mut produced = 0;
    for drop in drops {
        let roll: f32 = state.rng.gen_range(0.0f32, 100.0f32);
        if roll > drop.chance {
            continue;
        }
        let count: u32 = state.rng.gen_range(0u32, drop.amount + 1);
        if count == 0 {
            continue;
        }

        let overflow = state.inventory.add(drop.item, count);
        if overflow > 0 {
            tracing::warn!(item = drop.item.name(), overflow, "inventory full, drop lost");
        }
        events.push(RpgEvent::ItemDropped {
            source_uid,
            item: drop.item,
            count,
        });
        produced += 1;
    }
    if produced > 0 {
        emit_fx(events, state.player, [Fx::Sound(Sound::Pickup)]);
    }
    produced
}

/// Nearest interactable entity within reach of the player, in the active zone.
pub fn nearest_interactable(state: &RpgState) -> Option<EntityId> {
    let player = state.player();
    let reach = state.config.interact_range;
    state
        .world
        .entities
        .iter()
        .filter(|(_, e)| e.zone == state.zone.name && e.caps.interactable && e.is_alive())
        .filter(|(_, e)| !(e.caps.container && e.state == AnimState::Open))
        .filter_map(|(id, e)| {
            let dx = (e.center_x() - player.center_x()).abs();
            let dy = (e.center_y() - player.center_y()).abs();
            (dx <= reach && dy <= reach).then_some((id, dx))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Talk to an NPC or open a chest. Chests open once.
pub fn interact(state: &mut RpgState, events: &mut Vec<RpgEvent>) -> bool {
    if !state.player().can_act() {
        return false;
    }
    let Some(target) = nearest_interactable(state) else {
        return false;
    };

    let player_x = state.player().center_x();
    let entity = &mut state.world.entities[target];

    if entity.caps.container {
        if entity.state == AnimState::Open {
            return false;
        }
        entity.change_state(AnimState::Open);
        let uid = entity.uid;
        let drops = entity.descriptor().drops;
        tracing::info!(uid, "chest opened");

        events.push(RpgEvent::ChestOpened { entity: target });
        emit_fx(events, target, [Fx::Sound(Sound::ChestOpen)]);
        roll_drops(state, uid, drops, events);
        return true;
    }

    entity.facing = Facing::toward(player_x - entity.center_x());
    entity.change_state(AnimState::Dialogue);
    let uid = entity.uid;
    let kind = entity.kind;
    let lines = entity.descriptor().dialogue;

    events.push(RpgEvent::DialogueOpened {
        entity: target,
        uid,
        lines,
    });
    state.quest_queue.push(QuestEvent {
        kind: QuestEventKind::Talk,
        entity_uid: uid,
        entity_kind: kind,
    });
    true
}

/// Use the selected slot: consumables are eaten, weapons and armor toggle.
pub fn use_selected_item(state: &mut RpgState, events: &mut Vec<RpgEvent>) -> bool {
    let Some(item) = state.inventory.selected_item() else {
        return false;
    };
    if !state.player().is_alive() {
        return false;
    }

    if item.weapon().is_some() {
        let equipped = state.equipment.weapon != Some(item);
        state.equipment.weapon = equipped.then_some(item);
        events.push(RpgEvent::Equipped { item, equipped });
        return true;
    }

    if item.armor_protection().is_some() {
        let equipped = state.equipment.toggle_armor(item);
        events.push(RpgEvent::Equipped { item, equipped });
        return true;
    }

    let Some(consumable) = item.consumable() else {
        return false;
    };

    let player = state.player;
    let mut fx = Vec::new();
    let entity = &mut state.world.entities[player];
    match consumable {
        Consumable::Heal(amount) => {
            entity.heal(amount, &mut fx);
        }
        Consumable::Effect {
            kind,
            duration,
            factor,
        } => {
            add_effect(entity, kind, duration, factor, &mut fx);
        }
        Consumable::Cure(kind) => {
            remove_kind(entity, kind, &mut fx);
        }
        Consumable::Cleanse => {
            clear_effects(entity, &mut fx);
        }
    }
    emit_fx(events, player, fx);

    state.inventory.remove(item, 1);
    events.push(RpgEvent::ItemUsed { item });
    tracing::debug!(item = item.name(), "item used");
    true
}

/// Craft from a 3x3 grid, consuming the grid's ingredients from the inventory.
pub fn craft(state: &mut RpgState, grid: &CraftGrid, events: &mut Vec<RpgEvent>) -> bool {
    let Some(recipe) = find_recipe(grid) else {
        events.push(RpgEvent::CraftFailed);
        return false;
    };

    // Work on a copy so a failed craft leaves the inventory untouched.
    let mut after = state.inventory.clone();
    let missing = recipe
        .ingredients()
        .into_iter()
        .any(|(item, count)| !after.remove(item, count));
    if missing {
        events.push(RpgEvent::CraftFailed);
        return false;
    }
    if after.add(recipe.output, recipe.count) > 0 {
        tracing::debug!(item = recipe.output.name(), "no room for crafted items");
        events.push(RpgEvent::CraftFailed);
        return false;
    }

    state.inventory = after;
    state.equipment.retain_owned(&state.inventory);
    events.push(RpgEvent::Crafted {
        item: recipe.output,
        count: recipe.count,
    });
    tracing::info!(item = recipe.output.name(), count = recipe.count, "crafted");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RpgConfig;
    use crate::effects::EffectKind;
    use crate::items::Item;
    use crate::kinds::EntityKind;

    fn state() -> RpgState {
        RpgState::new(RpgConfig::default(), 3)
    }

    #[test]
    fn guaranteed_drops_land_in_inventory() {
        let mut state = state();
        let drops = [DropSpec {
            item: Item::Bone,
            amount: 3,
            chance: 100.0,
        }];
        let mut events = Vec::new();
        let mut total = 0;
        for _ in 0..50 {
            roll_drops(&mut state, 1, &drops, &mut events);
        }
        for event in &events {
            if let RpgEvent::ItemDropped { count, .. } = event {
                assert!((1..=3).contains(count));
                total += count;
            }
        }
        assert!(total > 0);
        assert_eq!(state.inventory.count(Item::Bone), total);
    }

    #[test]
    fn zero_chance_never_drops() {
        let mut state = state();
        let drops = [DropSpec {
            item: Item::Bone,
            amount: 3,
            chance: -1.0,
        }];
        let mut events = Vec::new();
        for _ in 0..50 {
            assert_eq!(roll_drops(&mut state, 1, &drops, &mut events), 0);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn chest_opens_once() {
        let mut state = state();
        let chest = state.world.spawn(EntityKind::Chest, "start", 130.0, 350.0, None);
        let mut events = Vec::new();
        assert!(interact(&mut state, &mut events));
        assert_eq!(state.world.entities[chest].state, AnimState::Open);
        assert!(state.inventory.count(Item::HealthPotion) <= 2);
        assert!(!interact(&mut state, &mut events));
    }

    #[test]
    fn talking_queues_a_quest_event() {
        let mut state = state();
        let villager = state.world.spawn(EntityKind::Villager, "start", 150.0, 330.0, Some(42));
        let mut events = Vec::new();
        assert!(interact(&mut state, &mut events));
        assert_eq!(state.world.entities[villager].state, AnimState::Dialogue);
        assert_eq!(
            state.quest_queue,
            vec![QuestEvent {
                kind: QuestEventKind::Talk,
                entity_uid: 42,
                entity_kind: EntityKind::Villager,
            }]
        );
    }

    #[test]
    fn nothing_in_reach() {
        let mut state = state();
        state.world.spawn(EntityKind::Villager, "start", 900.0, 330.0, None);
        state.world.spawn(EntityKind::Villager, "elsewhere", 100.0, 330.0, None);
        assert!(!interact(&mut state, &mut Vec::new()));
    }

    #[test]
    fn potions_and_milk() {
        let mut state = state();
        state.inventory.add(Item::StrengthPotion, 1);
        let mut events = Vec::new();
        assert!(use_selected_item(&mut state, &mut events));
        assert!(state.player().effects.active(EffectKind::Strength).is_some());
        assert_eq!(state.inventory.count(Item::StrengthPotion), 0);
        // Slot is empty now
        assert!(!use_selected_item(&mut state, &mut events));

        state.inventory.add(Item::Milk, 1);
        assert!(use_selected_item(&mut state, &mut events));
        assert!(state.player().effects.is_empty());
    }

    #[test]
    fn weapon_toggles() {
        let mut state = state();
        state.inventory.add(Item::Bow, 1);
        let mut events = Vec::new();
        use_selected_item(&mut state, &mut events);
        assert_eq!(state.equipment.weapon, Some(Item::Bow));
        use_selected_item(&mut state, &mut events);
        assert_eq!(state.equipment.weapon, None);
        assert_eq!(state.inventory.count(Item::Bow), 1);
    }

    #[test]
    fn craft_consumes_ingredients() {
        let mut state = state();
        state.inventory.add(Item::IronIngot, 2);
        state.inventory.add(Item::String, 1);
        state.inventory.add(Item::Stick, 1);
        let grid = [
            [None, Some(Item::IronIngot), None],
            [None, Some(Item::IronIngot), Some(Item::String)],
            [None, Some(Item::Stick), None],
        ];
        let mut events = Vec::new();
        assert!(craft(&mut state, &grid, &mut events));
        assert_eq!(state.inventory.count(Item::IronSword), 1);
        assert_eq!(state.inventory.count(Item::IronIngot), 0);

        // Out of ingredients now
        assert!(!craft(&mut state, &grid, &mut events));
        assert!(matches!(events.last(), Some(RpgEvent::CraftFailed)));
    }

    #[test]
    fn craft_into_full_inventory_keeps_ingredients() {
        let mut state = state();
        state.inventory.add(Item::Log, 5);
        for item in [
            Item::Bone,
            Item::Stick,
            Item::String,
            Item::IronIngot,
            Item::HealthPotion,
            Item::Milk,
            Item::IronSword,
            Item::Bow,
        ] {
            state.inventory.add(item, 1);
        }
        assert!(state.inventory.slots().iter().all(Option::is_some));

        let grid = [
            [None, None, None],
            [None, Some(Item::Log), None],
            [None, None, None],
        ];
        let mut events = Vec::new();
        assert!(!craft(&mut state, &grid, &mut events));
        assert!(matches!(events.last(), Some(RpgEvent::CraftFailed)));
        assert_eq!(state.inventory.count(Item::Log), 5);
        assert_eq!(state.inventory.count(Item::Planks), 0);
    }

    #[test]
    fn craft_can_use_the_slot_it_frees() {
        let mut state = state();
        state.inventory.add(Item::Log, 1);
        for item in [
            Item::Bone,
            Item::Stick,
            Item::String,
            Item::IronIngot,
            Item::HealthPotion,
            Item::Milk,
            Item::IronSword,
            Item::Bow,
        ] {
            state.inventory.add(item, 1);
        }

        let grid = [
            [None, None, None],
            [None, Some(Item::Log), None],
            [None, None, None],
        ];
        assert!(craft(&mut state, &grid, &mut Vec::new()));
        assert_eq!(state.inventory.count(Item::Log), 0);
        assert_eq!(state.inventory.count(Item::Planks), 4);
    }

    #[test]
    fn open_chest_does_not_hide_an_npc_behind_it() {
        let mut state = state();
        let chest = state.world.spawn(EntityKind::Chest, "start", 130.0, 350.0, None);
        let villager = state.world.spawn(EntityKind::Villager, "start", 170.0, 330.0, None);
        state.world.entities[chest].change_state(AnimState::Open);

        let mut events = Vec::new();
        assert_eq!(nearest_interactable(&state), Some(villager));
        assert!(interact(&mut state, &mut events));
        assert_eq!(state.world.entities[villager].state, AnimState::Dialogue);
    }
}
