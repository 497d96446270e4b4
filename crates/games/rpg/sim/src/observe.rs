use crate::entity::{Entity, Rect};
use crate::inventory::{Equipment, Inventory};
use crate::projectile::Projectile;
use crate::world::RpgState;
use rpg_types::{
    EffectInfo, EntityView, LoadoutInfo, ProjectileView, RectInfo, RpgObservation, SlotInfo,
};
use sim_core::Tick;

fn rect_info(rect: Rect) -> RectInfo {
    RectInfo {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    }
}

pub fn entity_view(entity: &Entity) -> EntityView {
    EntityView {
        uid: entity.uid,
        kind: entity.kind.name().to_string(),
        x: entity.x,
        y: entity.y,
        state: entity.state.name().to_string(),
        frame: entity.frame,
        facing: entity.facing.name().to_string(),
        health: entity.health,
        max_health: entity.max_health,
        hitbox: rect_info(entity.hitbox_rect()),
        effects: entity
            .effects
            .iter()
            .map(|e| EffectInfo {
                index: e.index,
                name: e.kind.name().to_string(),
                visual: e.kind.spec().visual.to_string(),
                remaining_ticks: e.duration(),
                factor: e.factor,
            })
            .collect(),
    }
}

fn projectile_view(projectile: &Projectile) -> ProjectileView {
    ProjectileView {
        x: projectile.x,
        y: projectile.y,
        direction: projectile.direction,
        hitbox: rect_info(projectile.rect()),
    }
}

pub fn loadout_info(inventory: &Inventory, equipment: &Equipment) -> LoadoutInfo {
    LoadoutInfo {
        slots: inventory
            .slots()
            .iter()
            .map(|slot| {
                slot.map(|s| SlotInfo {
                    item: s.item.name().to_string(),
                    count: s.count,
                })
            })
            .collect(),
        selected_slot: inventory.selected_slot(),
        weapon: equipment.weapon.map(|w| w.name().to_string()),
        armor: equipment
            .armor
            .iter()
            .map(|a| a.name().to_string())
            .collect(),
        protection: equipment.protection(),
    }
}

pub fn build_observation(state: &RpgState, tick: Tick) -> RpgObservation {
    let mut entities: Vec<&Entity> = state
        .world
        .entities
        .iter()
        .filter(|(id, e)| *id != state.player && e.zone == state.zone.name)
        .map(|(_, e)| e)
        .collect();
    entities.sort_by_key(|e| e.uid);

    RpgObservation {
        tick,
        ticks_per_second: state.config.tick_hz,
        zone: state.zone.name.clone(),
        player: entity_view(state.player()),
        loadout: loadout_info(&state.inventory, &state.equipment),
        entities: entities.into_iter().map(entity_view).collect(),
        projectiles: state
            .world
            .projectiles
            .values()
            .filter(|p| !p.spent && p.zone == state.zone.name)
            .map(projectile_view)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RpgConfig;
    use crate::effects::{add_effect, EffectKind};
    use crate::items::Item;
    use crate::kinds::EntityKind;

    #[test]
    fn observation_covers_active_zone_only() {
        let mut state = RpgState::new(RpgConfig::default(), 5);
        state.world.spawn(EntityKind::Skeleton, "start", 300.0, 0.0, Some(9));
        state.world.spawn(EntityKind::Goblin, "start", 250.0, 0.0, Some(4));
        state.world.spawn(EntityKind::Goblin, "elsewhere", 250.0, 0.0, None);
        state.inventory.add(Item::Bone, 3);
        state.equipment.weapon = Some(Item::IronSword);
        add_effect(state.player_mut(), EffectKind::Poison, 50, 1.0, &mut Vec::new());

        let obs = build_observation(&state, 12);
        assert_eq!(obs.tick, 12);
        assert_eq!(obs.zone, "start");
        assert_eq!(obs.player.kind, "player");
        assert_eq!(obs.player.effects[0].name, "poison");
        let uids: Vec<u32> = obs.entities.iter().map(|e| e.uid).collect();
        assert_eq!(uids, vec![4, 9]);
        assert_eq!(obs.loadout.slots.len(), 9);
        assert_eq!(obs.loadout.slots[0].as_ref().unwrap().item, "bone");
        assert_eq!(obs.loadout.weapon.as_deref(), Some("iron_sword"));
    }
}
