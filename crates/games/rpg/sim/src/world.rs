use crate::combat::AttackIntent;
use crate::config::RpgConfig;
use crate::entity::Entity;
use crate::events::QuestEvent;
use crate::inventory::{Equipment, Inventory};
use crate::kinds::EntityKind;
use crate::projectile::Projectile;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sim_core::{Tick, TimerQueue};
use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeSet;

new_key_type! { pub struct EntityId; }
new_key_type! { pub struct ProjectileId; }

/// Deferred work scheduled on the timer queue.
#[derive(Clone, Debug)]
pub enum Timer {
    /// A wind-up finished: run the hit test or fire the projectile.
    ResolveAttack(AttackIntent),
    /// Clear the owner's cooldown flag.
    CooldownExpired(EntityId),
}

#[derive(Clone, Debug)]
pub struct World {
    pub entities: SlotMap<EntityId, Entity>,
    pub projectiles: SlotMap<ProjectileId, Projectile>,
    next_uid: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            next_uid: 1,
        }
    }

    /// Insert an entity, assigning the next free uid when none is given.
    ///
    /// A requested uid that is already taken is replaced by a fresh one.
    pub fn spawn(&mut self, kind: EntityKind, zone: &str, x: f32, y: f32, uid: Option<u32>) -> EntityId {
        let uid = match uid {
            Some(uid) if !self.uid_taken(uid) => {
                self.next_uid = self.next_uid.max(uid.saturating_add(1));
                uid
            }
            Some(taken) => {
                let uid = self.fresh_uid();
                tracing::warn!(requested = taken, assigned = uid, "uid already in use");
                uid
            }
            None => self.fresh_uid(),
        };
        self.entities.insert(Entity::new(uid, kind, zone, x, y))
    }

    fn uid_taken(&self, uid: u32) -> bool {
        self.entities.values().any(|e| e.uid == uid)
    }

    fn fresh_uid(&mut self) -> u32 {
        while self.next_uid < u32::MAX && self.uid_taken(self.next_uid) {
            self.next_uid += 1;
        }
        if !self.uid_taken(self.next_uid) {
            let uid = self.next_uid;
            self.next_uid = self.next_uid.saturating_add(1);
            return uid;
        }
        // Counter is pinned at the top of the range: reuse the lowest gap.
        (1..u32::MAX).find(|&uid| !self.uid_taken(uid)).unwrap_or(0)
    }

    pub fn find_uid(&self, uid: u32) -> Option<EntityId> {
        self.entities
            .iter()
            .find_map(|(id, e)| (e.uid == uid).then_some(id))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct ActiveZone {
    pub name: String,
    pub floor_y: f32,
    /// Whether an enemy has ever been present, so an empty zone does not count as cleared.
    pub had_enemies: bool,
}

#[derive(Clone, Debug)]
pub struct RpgState {
    pub config: RpgConfig,
    pub tick: Tick,
    pub world: World,
    pub player: EntityId,
    pub zone: ActiveZone,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub timers: TimerQueue<Timer>,
    /// Entities whose death animation finished; removed at the start of the next tick.
    pub pending_removal: Vec<EntityId>,
    pub pending_projectile_removal: Vec<ProjectileId>,
    /// Quest records produced this tick; empty between ticks.
    pub quest_queue: Vec<QuestEvent>,
    /// Layout spawns already placed, by zone name and declared uid.
    pub placed_spawns: BTreeSet<(String, u32)>,
    pub rng: StdRng,
}

impl RpgState {
    pub fn new(config: RpgConfig, seed: u64) -> Self {
        let zone = ActiveZone {
            name: "start".to_string(),
            floor_y: config.floor_y,
            had_enemies: false,
        };
        let mut world = World::new();
        let player = world.spawn(EntityKind::Player, &zone.name, config.player_start_x, 0.0, None);
        let ground = world.entities[player].ground_y(zone.floor_y);
        world.entities[player].y = ground;
        world.entities[player].on_ground = true;

        Self {
            tick: 0,
            world,
            player,
            zone,
            inventory: Inventory::new(config.inventory_slots),
            equipment: Equipment::default(),
            timers: TimerQueue::new(),
            pending_removal: Vec::new(),
            pending_projectile_removal: Vec::new(),
            quest_queue: Vec::new(),
            placed_spawns: BTreeSet::new(),
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    pub fn player(&self) -> &Entity {
        &self.world.entities[self.player]
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.world.entities[self.player]
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.world.entities.get(id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.world.entities.get(id).is_some_and(Entity::is_alive)
    }

    pub fn in_active_zone(&self, id: EntityId) -> bool {
        self.world
            .entities
            .get(id)
            .is_some_and(|e| e.zone == self.zone.name)
    }

    /// Entity keys in the active zone, player included.
    pub fn zone_entity_ids(&self) -> Vec<EntityId> {
        self.world
            .entities
            .iter()
            .filter(|(_, e)| e.zone == self.zone.name)
            .map(|(id, _)| id)
            .collect()
    }
}
