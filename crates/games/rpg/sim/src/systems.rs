use crate::actions::RpgAction;
use crate::combat;
use crate::config::AttackVariant;
use crate::effects::advance_effects;
use crate::entity::{AnimState, AnimationOutcome, Faction, Facing, Rect};
use crate::events::{emit_fx, QuestEvent, QuestEventKind, RpgEvent};
use crate::interact;
use crate::world::{ActiveZone, EntityId, RpgState, Timer};
use crate::zone::ZoneLayout;

/// Remove everything queued for removal during the previous tick.
pub fn flush_removals(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    for id in std::mem::take(&mut state.pending_removal) {
        if let Some(entity) = state.world.entities.remove(id) {
            tracing::debug!(uid = entity.uid, kind = entity.kind.name(), "entity removed");
            events.push(RpgEvent::EntityRemoved {
                entity: id,
                uid: entity.uid,
            });
        }
    }
    for id in std::mem::take(&mut state.pending_projectile_removal) {
        state.world.projectiles.remove(id);
    }
}

pub fn apply_action(state: &mut RpgState, action: &RpgAction, events: &mut Vec<RpgEvent>) {
    let player = state.player;
    match action {
        RpgAction::MoveLeft => state.player_mut().move_dir = -1.0,
        RpgAction::MoveRight => state.player_mut().move_dir = 1.0,
        RpgAction::Stop => state.player_mut().move_dir = 0.0,
        RpgAction::Jump => {
            let velocity = state.config.jump_velocity;
            let entity = state.player_mut();
            if entity.can_act() && entity.on_ground {
                entity.vy = velocity;
                entity.on_ground = false;
                entity.change_state(AnimState::Jump);
            }
        }
        RpgAction::Attack | RpgAction::HeavyAttack => {
            let variant = match (action, state.player().on_ground) {
                (_, false) => AttackVariant::Air,
                (RpgAction::HeavyAttack, true) => AttackVariant::Heavy,
                _ => AttackVariant::Light,
            };
            combat::try_attack(state, player, variant, events);
        }
        RpgAction::Interact => {
            interact::interact(state, events);
        }
        RpgAction::UseItem => {
            interact::use_selected_item(state, events);
        }
        RpgAction::SelectSlot(n) => {
            state.inventory.select(*n);
        }
        RpgAction::Craft(grid) => {
            interact::craft(state, grid, events);
        }
    }
}

/// Fire due timers. Each payload re-checks the world it lands in.
pub fn fire_timers(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    for timer in state.timers.drain_due(state.tick) {
        match timer {
            Timer::ResolveAttack(intent) => {
                tracing::trace!(tick = state.tick, scheduled = intent.resolve_tick, "wind-up due");
                combat::resolve_intent(state, intent, events);
            }
            Timer::CooldownExpired(id) => {
                if let Some(entity) = state.world.entities.get_mut(id) {
                    entity.on_cooldown = false;
                    tracing::trace!(uid = entity.uid, tick = state.tick, "cooldown expired");
                }
            }
        }
    }
}

/// Effects, behaviour, physics and animation for every entity in the active zone.
pub fn update_entities(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    for id in state.zone_entity_ids() {
        update_entity(state, id, events);
    }
}

fn update_entity(state: &mut RpgState, id: EntityId, events: &mut Vec<RpgEvent>) {
    match state.world.entities.get(id) {
        Some(entity) if !entity.dead => {}
        _ => return,
    }

    let mut fx = Vec::new();
    advance_effects(&mut state.world.entities[id], &mut fx);
    emit_fx(events, id, fx);

    let entity = &state.world.entities[id];
    let hunts = entity.faction == Faction::Enemy && entity.descriptor().attack.is_some();
    let greets =
        entity.faction == Faction::Friendly && !entity.is_player() && entity.caps.interactable;
    if hunts {
        pursue(state, id, events);
    } else if greets {
        greet(state, id);
    }

    move_entity(state, id);

    match state.world.entities[id].advance_animation() {
        Some(AnimationOutcome::Died) => {
            let entity = &state.world.entities[id];
            tracing::debug!(uid = entity.uid, kind = entity.kind.name(), "death animation finished");
            if !entity.is_player() {
                state.pending_removal.push(id);
            }
        }
        Some(AnimationOutcome::AttackFinished(variant)) => {
            combat::resolve_at_animation_end(state, id, variant, events);
        }
        _ => {}
    }
}

/// Single horizontal pursuit: walk toward the player once in aggro range,
/// stop and swing once in attack range.
fn pursue(state: &mut RpgState, id: EntityId, events: &mut Vec<RpgEvent>) {
    let player = state.player();
    let target = (player.is_alive() && player.zone == state.zone.name)
        .then(|| (player.center_x(), player.center_y()));

    let entity = &mut state.world.entities[id];
    let Some((px, py)) = target.filter(|_| entity.can_act()) else {
        entity.move_dir = 0.0;
        return;
    };

    let desc = entity.descriptor();
    let dx = px - entity.center_x();
    let dy = py - entity.center_y();
    if dx.abs() > desc.aggro_range {
        entity.move_dir = 0.0;
        return;
    }

    entity.facing = Facing::toward(dx);
    if dx.abs() > entity.attack_range || dy.abs() > entity.attack_range {
        entity.move_dir = dx.signum();
        return;
    }

    entity.move_dir = 0.0;
    if entity.on_cooldown {
        return;
    }
    let variants = desc.attack.map_or(&[][..], |profile| profile.variants);
    if variants.is_empty() {
        return;
    }
    let variant = variants[entity.attack_count as usize % variants.len()];
    combat::try_attack(state, id, variant, events);
}

/// Friendly NPCs greet the player once per approach and drop out of dialogue
/// when the player walks away.
fn greet(state: &mut RpgState, id: EntityId) {
    let player = state.player();
    let player_x = (player.is_alive() && player.zone == state.zone.name).then(|| player.center_x());
    let range = state.config.greet_range;

    let entity = &mut state.world.entities[id];
    let dx = player_x.map(|px| px - entity.center_x());
    let near = dx.is_some_and(|dx| dx.abs() <= range);

    if near && !entity.greeted {
        entity.greeted = true;
        entity.facing = Facing::toward(dx.unwrap_or(0.0));
        if entity.state == AnimState::Idle {
            entity.change_state(AnimState::Greet);
        }
    } else if !near {
        entity.greeted = false;
        if entity.state == AnimState::Dialogue {
            entity.change_state(AnimState::Idle);
        }
    }
}

/// Horizontal movement, gravity toward the zone floor, and the locomotion
/// animation that goes with them.
fn move_entity(state: &mut RpgState, id: EntityId) {
    if !state.world.entities[id].caps.moving {
        return;
    }
    let floor_y = state.zone.floor_y;
    let gravity = state.config.gravity;
    let freeze_slow = state.config.freeze_slow;
    let blockers: Vec<Rect> = state
        .world
        .entities
        .iter()
        .filter(|(other, e)| *other != id && e.caps.blocking && e.zone == state.zone.name)
        .map(|(_, e)| e.hitbox_rect())
        .collect();

    let entity = &mut state.world.entities[id];

    let walking = entity.move_dir != 0.0 && entity.is_alive() && !entity.is_stunned();
    if walking && entity.state.is_locomotion() {
        let mut speed = entity.descriptor().run_speed;
        if entity.is_slowed() {
            speed *= freeze_slow;
        }
        entity.facing = Facing::toward(entity.move_dir);

        let before = entity.hitbox_rect();
        let old_x = entity.x;
        entity.x += entity.move_dir * speed;
        let after = entity.hitbox_rect();
        let newly_blocked = blockers
            .iter()
            .any(|b| b.overlaps(&after) && !b.overlaps(&before));
        if newly_blocked {
            entity.x = old_x;
        }
    }

    let ground = entity.ground_y(floor_y);
    if !entity.on_ground || entity.y < ground {
        entity.vy += gravity;
        entity.y += entity.vy;
        if entity.y >= ground {
            entity.y = ground;
            entity.vy = 0.0;
            entity.on_ground = true;
        } else {
            entity.on_ground = false;
        }
    }

    if entity.is_alive() && entity.state.is_locomotion() {
        let next = if !entity.on_ground {
            if entity.vy < 0.0 {
                AnimState::Jump
            } else {
                AnimState::Fall
            }
        } else if walking {
            AnimState::Run
        } else {
            AnimState::Idle
        };
        if next != entity.state {
            entity.change_state(next);
        }
    }
}

/// Kill bookkeeping for entities that reached zero health this tick:
/// drops, the kill quest event and the kill notification. Runs once per entity.
pub fn process_kills(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    let killed: Vec<EntityId> = state
        .world
        .entities
        .iter()
        .filter(|(_, e)| e.zone == state.zone.name && e.health <= 0.0 && !e.kill_reported)
        .map(|(id, _)| id)
        .collect();

    for id in killed {
        let entity = &mut state.world.entities[id];
        entity.kill_reported = true;
        let uid = entity.uid;
        let kind = entity.kind;
        let is_player = entity.is_player();
        let drops = entity.descriptor().drops;

        tracing::info!(uid, kind = kind.name(), tick = state.tick, "entity killed");
        events.push(RpgEvent::EntityKilled {
            entity: id,
            uid,
            kind,
        });
        if is_player {
            continue;
        }

        interact::roll_drops(state, uid, drops, events);
        state.quest_queue.push(QuestEvent {
            kind: QuestEventKind::Kill,
            entity_uid: uid,
            entity_kind: kind,
        });
    }
}

/// Hand this tick's quest records to the caller. The queue is empty between ticks.
pub fn drain_quest_queue(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    events.extend(state.quest_queue.drain(..).map(RpgEvent::Quest));
}

/// Make `layout` the active zone and spawn its entities. Spawns with a
/// declared uid that were placed on an earlier visit are kept as they are.
/// Returns how many entities were spawned.
pub fn load_zone(state: &mut RpgState, layout: &ZoneLayout) -> usize {
    let floor_y = layout.floor_y.unwrap_or(state.config.floor_y);
    state.zone = ActiveZone {
        name: layout.name.clone(),
        floor_y,
        had_enemies: false,
    };

    let player_x = layout.player_x;
    let player = state.player_mut();
    player.zone = layout.name.clone();
    if let Some(x) = player_x {
        player.x = x;
    }
    player.y = player.ground_y(floor_y);
    player.vy = 0.0;
    player.on_ground = true;

    state.world.projectiles.clear();
    state.pending_projectile_removal.clear();

    // Declared uids go first so counter-assigned ones cannot claim them.
    let (declared, implicit): (Vec<_>, Vec<_>) =
        layout.spawns.iter().partition(|spec| spec.uid.is_some());

    let mut spawned = 0;
    for spec in declared.into_iter().chain(implicit) {
        if let Some(uid) = spec.uid {
            if !state.placed_spawns.insert((layout.name.clone(), uid)) {
                continue;
            }
        }
        let id = state
            .world
            .spawn(spec.kind, &layout.name, spec.x, 0.0, spec.uid);
        let entity = &mut state.world.entities[id];
        match spec.y {
            Some(y) => entity.y = y,
            None => {
                entity.y = entity.ground_y(floor_y);
                entity.on_ground = true;
            }
        }
        if let Some(facing) = spec.facing {
            entity.facing = facing;
        }
        spawned += 1;
    }

    state.zone.had_enemies = has_living_enemies(state);
    tracing::info!(zone = %layout.name, spawned, "zone loaded");
    spawned
}

pub fn has_living_enemies(state: &RpgState) -> bool {
    state
        .world
        .entities
        .values()
        .any(|e| e.zone == state.zone.name && e.faction == Faction::Enemy && e.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RpgConfig;
    use crate::kinds::EntityKind;

    fn state() -> RpgState {
        RpgState::new(RpgConfig::default(), 11)
    }

    fn tick(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
        state.tick += 1;
        flush_removals(state, events);
        fire_timers(state, events);
        update_entities(state, events);
        process_kills(state, events);
        drain_quest_queue(state, events);
    }

    #[test]
    fn player_walks_and_faces() {
        let mut state = state();
        let mut events = Vec::new();
        apply_action(&mut state, &RpgAction::MoveLeft, &mut events);
        let start = state.player().x;
        tick(&mut state, &mut events);
        assert_eq!(state.player().x, start - 4.0);
        assert_eq!(state.player().facing, Facing::Left);
        assert_eq!(state.player().state, AnimState::Run);

        apply_action(&mut state, &RpgAction::Stop, &mut events);
        tick(&mut state, &mut events);
        assert_eq!(state.player().state, AnimState::Idle);
    }

    #[test]
    fn jump_rises_then_lands() {
        let mut state = state();
        let mut events = Vec::new();
        let ground = state.player().y;
        apply_action(&mut state, &RpgAction::Jump, &mut events);
        tick(&mut state, &mut events);
        assert!(state.player().y < ground);
        assert_eq!(state.player().state, AnimState::Jump);

        for _ in 0..100 {
            tick(&mut state, &mut events);
        }
        assert_eq!(state.player().y, ground);
        assert!(state.player().on_ground);
        assert_eq!(state.player().state, AnimState::Idle);
    }

    #[test]
    fn cooldown_clears_after_its_ticks() {
        let mut state = state();
        let mut events = Vec::new();
        apply_action(&mut state, &RpgAction::Attack, &mut events);
        assert!(state.player().on_cooldown);
        // Unarmed cooldown is 500 ms at 60 Hz
        for _ in 0..29 {
            tick(&mut state, &mut events);
        }
        assert!(state.player().on_cooldown);
        tick(&mut state, &mut events);
        assert!(!state.player().on_cooldown);
    }

    #[test]
    fn airborne_attack_uses_air_variant() {
        let mut state = state();
        let mut events = Vec::new();
        apply_action(&mut state, &RpgAction::Jump, &mut events);
        apply_action(&mut state, &RpgAction::HeavyAttack, &mut events);
        assert_eq!(state.player().state, AnimState::Attack2);
    }

    #[test]
    fn goblin_closes_in() {
        let mut state = state();
        let goblin = state.world.spawn(EntityKind::Goblin, "start", 300.0, 0.0, None);
        let mut events = Vec::new();
        let start = state.world.entities[goblin].x;
        for _ in 0..5 {
            tick(&mut state, &mut events);
        }
        let goblin = &state.world.entities[goblin];
        assert!(goblin.x < start);
        assert_eq!(goblin.facing, Facing::Left);
    }

    #[test]
    fn npc_greets_once_per_approach() {
        let mut state = state();
        let villager = state.world.spawn(EntityKind::Villager, "start", 200.0, 330.0, None);
        let mut events = Vec::new();
        tick(&mut state, &mut events);
        assert!(state.world.entities[villager].greeted);
        assert_eq!(state.world.entities[villager].state, AnimState::Greet);

        state.player_mut().x = 2000.0;
        tick(&mut state, &mut events);
        assert!(!state.world.entities[villager].greeted);
    }

    #[test]
    fn zone_load_spawns_and_keeps_known_uids() {
        let mut state = state();
        let layout = ZoneLayout::from_json(
            r#"{ "name": "cave", "floor_y": 500, "player_x": 20,
                 "spawns": [{ "kind": "skeleton", "x": 300, "uid": 77 }] }"#,
        )
        .unwrap();
        assert_eq!(load_zone(&mut state, &layout), 1);
        assert_eq!(state.zone.name, "cave");
        assert!(state.zone.had_enemies);
        assert_eq!(state.player().x, 20.0);
        assert_eq!(state.player().zone, "cave");

        let skeleton = state.world.find_uid(77).unwrap();
        assert_eq!(state.world.entities[skeleton].y, 500.0 - 70.0);
        assert_eq!(load_zone(&mut state, &layout), 0);
    }

    #[test]
    fn declared_uids_survive_counter_assigned_neighbours() {
        let mut state = state();
        // uid 1 is the player's
        let layout = ZoneLayout::from_json(
            r#"{ "name": "glade", "spawns": [
                { "kind": "goblin", "x": 300 },
                { "kind": "skeleton", "x": 500, "uid": 2 },
                { "kind": "villager", "x": 700, "uid": 1 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(load_zone(&mut state, &layout), 3);

        let skeleton = state.world.find_uid(2).unwrap();
        assert_eq!(state.world.entities[skeleton].kind, EntityKind::Skeleton);
        assert_eq!(state.world.find_uid(1), Some(state.player));

        let mut uids: Vec<u32> = state.world.entities.values().map(|e| e.uid).collect();
        uids.sort_unstable();
        uids.dedup();
        assert_eq!(uids.len(), 4);

        // Coming back does not duplicate declared spawns
        assert_eq!(load_zone(&mut state, &layout), 1);
    }

    #[test]
    fn uid_at_the_top_of_the_range() {
        let mut state = state();
        let layout = ZoneLayout::from_json(
            r#"{ "name": "vault", "spawns": [
                { "kind": "skeleton", "x": 500, "uid": 4294967295 },
                { "kind": "goblin", "x": 300 },
                { "kind": "goblin", "x": 350 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(load_zone(&mut state, &layout), 3);
        assert!(state.world.find_uid(u32::MAX).is_some());

        let mut uids: Vec<u32> = state.world.entities.values().map(|e| e.uid).collect();
        uids.sort_unstable();
        uids.dedup();
        assert_eq!(uids.len(), 4);
    }

    #[test]
    fn declared_uid_from_another_zone_still_spawns() {
        let mut state = state();
        let first = ZoneLayout::from_json(
            r#"{ "name": "a", "spawns": [{ "kind": "goblin", "x": 300 }] }"#,
        )
        .unwrap();
        load_zone(&mut state, &first);
        let goblin_uid = state
            .world
            .entities
            .values()
            .find(|e| e.kind == EntityKind::Goblin)
            .unwrap()
            .uid;

        let second = ZoneLayout::from_json(&format!(
            r#"{{ "name": "b", "spawns": [{{ "kind": "skeleton", "x": 300, "uid": {} }}] }}"#,
            goblin_uid
        ))
        .unwrap();
        assert_eq!(load_zone(&mut state, &second), 1);
        assert!(state.zone.had_enemies);
    }
}
