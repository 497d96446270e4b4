use crate::combat::{deliver_hit, is_hostile_target};
use crate::entity::Rect;
use crate::events::{emit_fx, Fx, RpgEvent, Sound};
use crate::items::OnHit;
use crate::world::{EntityId, ProjectileId, RpgState};

#[derive(Clone, Debug)]
pub struct Projectile {
    pub owner: EntityId,
    /// Player shots hit monsters, everything else hits the player.
    pub from_player: bool,
    pub zone: String,
    pub x: f32,
    pub y: f32,
    /// -1 or 1.
    pub direction: f32,
    pub speed: f32,
    pub range_left: f32,
    pub damage: f32,
    pub on_hit: Option<OnHit>,
    pub width: f32,
    pub height: f32,
    /// Hit something or ran out of range; waiting for removal.
    pub spent: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Launch a projectile from the owner's center along its facing.
pub fn spawn_projectile(
    state: &mut RpgState,
    owner: EntityId,
    speed: f32,
    range: f32,
    damage: f32,
    on_hit: Option<OnHit>,
    events: &mut Vec<RpgEvent>,
) -> Option<ProjectileId> {
    let width = state.config.projectile_width;
    let height = state.config.projectile_height;
    let source = state.entity(owner)?;

    let projectile = Projectile {
        owner,
        from_player: source.is_player(),
        zone: source.zone.clone(),
        x: source.center_x() - width / 2.0,
        y: source.center_y() - height / 2.0,
        direction: source.facing.sign(),
        speed,
        range_left: range,
        damage,
        on_hit,
        width,
        height,
        spent: false,
    };
    let id = state.world.projectiles.insert(projectile);
    tracing::debug!(tick = state.tick, speed, range, "projectile spawned");

    events.push(RpgEvent::ProjectileSpawned { id, owner });
    emit_fx(events, owner, [Fx::Sound(Sound::Shoot)]);
    Some(id)
}

/// Move every live projectile in the active zone, hitting the first overlapping
/// defender. Spent projectiles are queued for removal at the start of next tick.
pub fn advance_projectiles(state: &mut RpgState, events: &mut Vec<RpgEvent>) {
    let ids: Vec<ProjectileId> = state
        .world
        .projectiles
        .iter()
        .filter(|(_, p)| !p.spent && p.zone == state.zone.name)
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let projectile = &mut state.world.projectiles[id];
        projectile.x += projectile.direction * projectile.speed;
        projectile.range_left -= projectile.speed;
        let projectile = projectile.clone();

        if let Some(target) = find_target(state, &projectile) {
            state.world.projectiles[id].spent = true;
            state.pending_projectile_removal.push(id);
            events.push(RpgEvent::ProjectileHit { id, target });

            let attacker = state
                .world
                .entities
                .contains_key(projectile.owner)
                .then_some(projectile.owner);
            deliver_hit(
                state,
                attacker,
                target,
                projectile.damage,
                projectile.on_hit,
                events,
            );
        } else if projectile.range_left <= 0.0 {
            state.world.projectiles[id].spent = true;
            state.pending_projectile_removal.push(id);
            events.push(RpgEvent::ProjectileExpired { id });
        }
    }
}

fn find_target(state: &RpgState, projectile: &Projectile) -> Option<EntityId> {
    let rect = projectile.rect();
    state
        .world
        .entities
        .iter()
        .find(|(_, e)| {
            e.zone == projectile.zone
                && is_hostile_target(projectile.from_player, e)
                && e.hitbox_rect().overlaps(&rect)
        })
        .map(|(id, _)| id)
}
