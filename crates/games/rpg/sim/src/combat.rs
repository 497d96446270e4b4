//! Attack initiation, hit tests and damage resolution.
//!
//! An attack starts with [`try_attack`]. Its hit test runs either from the
//! timer queue after the wind-up ([`resolve_intent`]) or when the attack
//! animation ends ([`resolve_at_animation_end`]). Either way the world may have
//! changed since the swing started, so the attacker and every target are
//! re-checked at resolution time.

use crate::config::{AttackVariant, RpgConfig};
use crate::effects::{add_effect, EffectKind};
use crate::entity::{Entity, HitOutcome};
use crate::events::{emit_fx, Fx, RejectReason, RpgEvent, Sound};
use crate::items::{Delivery, OnHit};
use crate::kinds::AttackTiming;
use crate::projectile::spawn_projectile;
use crate::world::{EntityId, RpgState, Timer};
use sim_core::Tick;

/// Everything needed to resolve one swing, captured when it starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackDescriptor {
    pub damage: f32,
    pub range: f32,
    pub windup_ticks: u64,
    pub cooldown_ticks: u64,
    pub delivery: Delivery,
    pub on_hit: Option<OnHit>,
    pub timing: AttackTiming,
}

#[derive(Clone, Debug)]
pub struct AttackIntent {
    pub attacker: EntityId,
    pub variant: AttackVariant,
    pub descriptor: AttackDescriptor,
    pub resolve_tick: Tick,
}

/// The player's attack comes from the equipped weapon (or bare hands), every
/// other kind uses its profile. `None` for kinds that cannot attack.
pub fn attack_descriptor(state: &RpgState, id: EntityId) -> Option<AttackDescriptor> {
    let entity = state.entity(id)?;
    let config = &state.config;

    if entity.is_player() {
        let descriptor = match state.equipment.weapon_spec() {
            Some(weapon) => AttackDescriptor {
                damage: weapon.damage,
                range: weapon.range,
                windup_ticks: config.duration_to_ticks(weapon.windup),
                cooldown_ticks: config.duration_to_ticks(weapon.cooldown),
                delivery: weapon.delivery,
                on_hit: weapon.on_hit,
                timing: AttackTiming::WindUp,
            },
            None => AttackDescriptor {
                damage: config.unarmed_damage,
                range: config.unarmed_range,
                windup_ticks: config.duration_to_ticks(config.melee_windup),
                cooldown_ticks: config.duration_to_ticks(config.default_cooldown),
                delivery: Delivery::Melee,
                on_hit: None,
                timing: AttackTiming::WindUp,
            },
        };
        return Some(descriptor);
    }

    let profile = entity.descriptor().attack?;
    Some(AttackDescriptor {
        damage: entity.attack_damage,
        range: entity.attack_range,
        windup_ticks: config.duration_to_ticks(config.melee_windup),
        cooldown_ticks: config.duration_to_ticks(profile.cooldown),
        delivery: profile.delivery,
        on_hit: profile.on_hit,
        timing: profile.timing,
    })
}

/// Start an attack. Rejected while on cooldown or unable to act.
pub fn try_attack(
    state: &mut RpgState,
    id: EntityId,
    variant: AttackVariant,
    events: &mut Vec<RpgEvent>,
) -> bool {
    if state.entity(id).is_none() {
        return false;
    }
    let Some(descriptor) = attack_descriptor(state, id) else {
        events.push(RpgEvent::AttackRejected {
            entity: id,
            reason: RejectReason::Unarmed,
        });
        return false;
    };

    let tick = state.tick;
    let entity = &mut state.world.entities[id];
    if entity.on_cooldown {
        events.push(RpgEvent::AttackRejected {
            entity: id,
            reason: RejectReason::OnCooldown,
        });
        return false;
    }
    if !entity.can_act() {
        events.push(RpgEvent::AttackRejected {
            entity: id,
            reason: RejectReason::Incapacitated,
        });
        return false;
    }

    entity.change_state(variant.state());
    entity.on_cooldown = true;
    entity.attack_count += 1;
    tracing::debug!(uid = entity.uid, ?variant, tick, "attack started");

    state
        .timers
        .schedule(tick, descriptor.cooldown_ticks, Timer::CooldownExpired(id));
    if descriptor.timing == AttackTiming::WindUp {
        let intent = AttackIntent {
            attacker: id,
            variant,
            descriptor,
            resolve_tick: tick + descriptor.windup_ticks,
        };
        state
            .timers
            .schedule(tick, descriptor.windup_ticks, Timer::ResolveAttack(intent));
    }

    events.push(RpgEvent::AttackStarted {
        entity: id,
        variant,
    });
    emit_fx(events, id, [Fx::Sound(Sound::Swing)]);
    true
}

/// Fire a wind-up whose timer came due. Skipped if the attacker is gone.
pub fn resolve_intent(state: &mut RpgState, intent: AttackIntent, events: &mut Vec<RpgEvent>) {
    if !state.is_alive(intent.attacker) || !state.in_active_zone(intent.attacker) {
        tracing::trace!(tick = state.tick, "wind-up fired for a missing attacker");
        return;
    }
    execute(state, intent.attacker, intent.variant, &intent.descriptor, events);
}

/// Resolve a swing whose attack animation just finished, for kinds that
/// resolve on animation end.
pub fn resolve_at_animation_end(
    state: &mut RpgState,
    id: EntityId,
    variant: AttackVariant,
    events: &mut Vec<RpgEvent>,
) {
    let Some(descriptor) = attack_descriptor(state, id) else {
        return;
    };
    if descriptor.timing != AttackTiming::AnimationEnd || !state.is_alive(id) {
        return;
    }
    execute(state, id, variant, &descriptor, events);
}

fn execute(
    state: &mut RpgState,
    attacker: EntityId,
    variant: AttackVariant,
    descriptor: &AttackDescriptor,
    events: &mut Vec<RpgEvent>,
) {
    let spec = state.config.variant(variant);
    let range = descriptor.range * spec.range_mult;
    let damage = compute_damage(
        &state.config,
        &state.world.entities[attacker],
        descriptor.damage,
        spec.damage_mult,
    );

    match descriptor.delivery {
        Delivery::Melee => {
            for target in melee_targets(state, attacker, range) {
                deliver_hit(state, Some(attacker), target, damage, descriptor.on_hit, events);
            }
        }
        Delivery::Ranged { speed } => {
            spawn_projectile(state, attacker, speed, range, damage, descriptor.on_hit, events);
        }
    }
}

/// Base damage times the variant multiplier, plus the strength bonus.
pub fn compute_damage(config: &RpgConfig, attacker: &Entity, base: f32, damage_mult: f32) -> f32 {
    let bonus = attacker
        .effects
        .active(EffectKind::Strength)
        .map_or(0.0, |s| config.strength_bonus(s.factor));
    base * damage_mult + bonus
}

/// Protection is a percentage; anything past 100 blocks the hit entirely.
pub fn armor_reduction(raw: f32, protection: f32) -> f32 {
    raw * (100.0 - protection).max(0.0) / 100.0
}

/// Target must be in front of the attacker and within `range` on both axes.
pub fn in_melee_reach(attacker: &Entity, target: &Entity, range: f32) -> bool {
    let dx = target.center_x() - attacker.center_x();
    let dy = target.center_y() - attacker.center_y();
    dx * attacker.facing.sign() >= 0.0 && dx.abs() <= range && dy.abs() <= range
}

/// The player fights everything attackable; everything else fights the player.
pub fn is_hostile_target(attacker_is_player: bool, target: &Entity) -> bool {
    if !target.is_alive() {
        return false;
    }
    if attacker_is_player {
        target.caps.attackable && !target.is_player()
    } else {
        target.is_player()
    }
}

fn melee_targets(state: &RpgState, attacker: EntityId, range: f32) -> Vec<EntityId> {
    let Some(source) = state.entity(attacker) else {
        return Vec::new();
    };
    state
        .world
        .entities
        .iter()
        .filter(|(id, target)| {
            *id != attacker
                && target.zone == state.zone.name
                && is_hostile_target(source.is_player(), target)
                && in_melee_reach(source, target, range)
        })
        .map(|(id, _)| id)
        .collect()
}

/// Apply one landed hit: armor, damage, then electrocute stun and on-hit effect.
///
/// The stun and on-hit effect follow any hit that lands, a killing blow
/// included. Their hooks do nothing to a target at zero health.
pub fn deliver_hit(
    state: &mut RpgState,
    attacker: Option<EntityId>,
    target: EntityId,
    raw: f32,
    on_hit: Option<OnHit>,
    events: &mut Vec<RpgEvent>,
) -> HitOutcome {
    let protection = state.equipment.protection();
    let stun_ticks = state.config.stun_ticks;
    let electrocuted = attacker
        .and_then(|id| state.entity(id))
        .is_some_and(|a| a.effects.active(EffectKind::Electrocute).is_some());

    let Some(entity) = state.world.entities.get_mut(target) else {
        return HitOutcome::Ignored;
    };
    let damage = if entity.is_player() {
        armor_reduction(raw, protection)
    } else {
        raw
    };

    let mut fx = Vec::new();
    let outcome = entity.take_hit(damage, &mut fx);
    if outcome != HitOutcome::Ignored {
        fx.push(Fx::Sound(Sound::Hit));
        tracing::debug!(uid = entity.uid, damage, health = entity.health, "hit");
        events.push(RpgEvent::Hit {
            attacker,
            target,
            damage,
            health_left: entity.health,
        });
        if electrocuted {
            add_effect(entity, EffectKind::Stun, stun_ticks, 1.0, &mut fx);
        }
        if let Some(on_hit) = on_hit {
            add_effect(entity, on_hit.effect, on_hit.duration, on_hit.factor, &mut fx);
        }
    }
    emit_fx(events, target, fx);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::advance_effects;
    use crate::entity::{AnimState, Facing};
    use crate::items::Item;
    use crate::kinds::EntityKind;

    fn state() -> RpgState {
        RpgState::new(RpgConfig::default(), 7)
    }

    #[test]
    fn directional_reach() {
        let mut attacker = Entity::new(1, EntityKind::Skeleton, "z", 0.0, 0.0);
        attacker.facing = Facing::Right;
        let ahead = Entity::new(2, EntityKind::Skeleton, "z", 100.0, 0.0);
        let behind = Entity::new(3, EntityKind::Skeleton, "z", -50.0, 0.0);
        assert!(in_melee_reach(&attacker, &ahead, 150.0));
        assert!(!in_melee_reach(&attacker, &behind, 150.0));

        attacker.facing = Facing::Left;
        assert!(in_melee_reach(&attacker, &behind, 150.0));
        assert!(!in_melee_reach(&attacker, &ahead, 150.0));
    }

    #[test]
    fn vertical_gate() {
        let attacker = Entity::new(1, EntityKind::Skeleton, "z", 0.0, 0.0);
        let above = Entity::new(2, EntityKind::Skeleton, "z", 50.0, -200.0);
        assert!(!in_melee_reach(&attacker, &above, 100.0));
        assert!(in_melee_reach(&attacker, &above, 200.0));
    }

    #[test]
    fn armor_formula() {
        assert_eq!(armor_reduction(100.0, 30.0), 70.0);
        assert_eq!(armor_reduction(100.0, 120.0), 0.0);
        assert_eq!(armor_reduction(100.0, 0.0), 100.0);
    }

    #[test]
    fn strength_adds_flat_bonus() {
        let config = RpgConfig::default();
        let mut player = Entity::new(1, EntityKind::Player, "z", 0.0, 0.0);
        assert_eq!(compute_damage(&config, &player, 5.0, 2.0), 10.0);
        add_effect(&mut player, EffectKind::Strength, 100, 2.0, &mut Vec::new());
        assert_eq!(compute_damage(&config, &player, 5.0, 2.0), 16.0);
    }

    #[test]
    fn player_descriptor_follows_weapon() {
        let mut state = state();
        let player = state.player;
        let unarmed = attack_descriptor(&state, player).unwrap();
        assert_eq!(unarmed.damage, 1.0);
        assert_eq!(unarmed.range, 60.0);
        assert_eq!(unarmed.cooldown_ticks, 30);

        state.equipment.weapon = Some(Item::IronSword);
        let armed = attack_descriptor(&state, player).unwrap();
        assert_eq!(armed.damage, 5.0);
        assert_eq!(armed.range, 120.0);
        assert_eq!(armed.cooldown_ticks, 42);
        assert_eq!(armed.timing, AttackTiming::WindUp);
    }

    #[test]
    fn second_attack_rejected_on_cooldown() {
        let mut state = state();
        let player = state.player;
        let mut events = Vec::new();
        assert!(try_attack(&mut state, player, AttackVariant::Light, &mut events));
        assert_eq!(state.player().state, AnimState::Attack1);
        // Cooldown plus wind-up
        assert_eq!(state.timers.len(), 2);

        state.player_mut().change_state(AnimState::Idle);
        assert!(!try_attack(&mut state, player, AttackVariant::Light, &mut events));
        assert!(events.iter().any(|e| matches!(
            e,
            RpgEvent::AttackRejected {
                reason: RejectReason::OnCooldown,
                ..
            }
        )));
    }

    #[test]
    fn kinds_without_attacks_are_rejected() {
        let mut state = state();
        let boar = state.world.spawn(EntityKind::Boar, "start", 300.0, 0.0, None);
        let mut events = Vec::new();
        assert!(!try_attack(&mut state, boar, AttackVariant::Light, &mut events));
        assert!(matches!(
            events[0],
            RpgEvent::AttackRejected {
                reason: RejectReason::Unarmed,
                ..
            }
        ));
    }

    #[test]
    fn armor_only_protects_the_player() {
        let mut state = state();
        state.equipment.armor.push(Item::IronChestplate);
        let player = state.player;
        let goblin = state.world.spawn(EntityKind::Goblin, "start", 150.0, 0.0, None);
        let mut events = Vec::new();

        deliver_hit(&mut state, Some(goblin), player, 10.0, None, &mut events);
        assert_eq!(state.player().health, 92.0);

        deliver_hit(&mut state, Some(player), goblin, 10.0, None, &mut events);
        assert_eq!(state.world.entities[goblin].health, 20.0);
    }

    #[test]
    fn electrocuted_attacker_stuns_and_on_hit_applies() {
        let mut state = state();
        let player = state.player;
        let goblin = state.world.spawn(EntityKind::Goblin, "start", 150.0, 0.0, None);
        add_effect(
            state.player_mut(),
            EffectKind::Electrocute,
            100,
            1.0,
            &mut Vec::new(),
        );
        let burn = OnHit {
            effect: EffectKind::Burning,
            duration: 60,
            factor: 1.0,
        };
        let mut events = Vec::new();
        deliver_hit(&mut state, Some(player), goblin, 1.0, Some(burn), &mut events);

        let target = &state.world.entities[goblin];
        assert!(target.effects.active(EffectKind::Stun).is_some());
        assert!(target.effects.active(EffectKind::Burning).is_some());
    }

    #[test]
    fn killing_blow_still_applies_on_hit() {
        let mut state = state();
        let goblin = state.world.spawn(EntityKind::Goblin, "start", 150.0, 0.0, None);
        let poison = OnHit {
            effect: EffectKind::Poison,
            duration: 60,
            factor: 1.0,
        };
        let mut events = Vec::new();
        let outcome = deliver_hit(&mut state, None, goblin, 100.0, Some(poison), &mut events);
        assert_eq!(outcome, HitOutcome::Killed);

        let entity = &mut state.world.entities[goblin];
        assert!(entity.effects.active(EffectKind::Poison).is_some());
        assert_eq!(entity.state, AnimState::Death);
        // The poison tick finds nothing left to hurt
        for _ in 0..60 {
            advance_effects(entity, &mut Vec::new());
        }
        assert_eq!(entity.health, 0.0);
        assert_eq!(entity.state, AnimState::Death);
    }

    #[test]
    fn hits_on_a_corpse_are_ignored() {
        let mut state = state();
        let goblin = state.world.spawn(EntityKind::Goblin, "start", 150.0, 0.0, None);
        let poison = OnHit {
            effect: EffectKind::Poison,
            duration: 60,
            factor: 1.0,
        };
        deliver_hit(&mut state, None, goblin, 100.0, None, &mut Vec::new());
        let mut events = Vec::new();
        let outcome = deliver_hit(&mut state, None, goblin, 10.0, Some(poison), &mut events);
        assert_eq!(outcome, HitOutcome::Ignored);
        assert!(events.is_empty());
        assert!(state.world.entities[goblin].effects.is_empty());
    }
}
