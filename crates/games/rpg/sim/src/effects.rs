//! Status effects: timed modifiers attached to an entity.
//!
//! An entity carries at most one instance per [`EffectKind`]. Re-applying an
//! active effect refreshes its remaining duration in place. Durations and hook
//! cadences are both counted in simulation ticks.

use crate::entity::Entity;
use crate::events::{Fx, Sound};
use sim_core::Countdown;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Burning,
    Poison,
    Regeneration,
    Freeze,
    Strength,
    Electrocute,
    Stun,
    ThunderShock,
}

#[derive(Debug)]
pub struct EffectSpec {
    pub name: &'static str,
    /// Visual attached by the renderer while the effect is active.
    pub visual: &'static str,
    /// `on_tick` fires every `tick_cadence` ticks of the instance's lifetime.
    pub tick_cadence: u32,
}

static BURNING: EffectSpec = EffectSpec {
    name: "burning",
    visual: "fire",
    tick_cadence: 30,
};
static POISON: EffectSpec = EffectSpec {
    name: "poison",
    visual: "poison",
    tick_cadence: 45,
};
static REGENERATION: EffectSpec = EffectSpec {
    name: "regeneration",
    visual: "heart",
    tick_cadence: 60,
};
static FREEZE: EffectSpec = EffectSpec {
    name: "freeze",
    visual: "ice",
    tick_cadence: 1,
};
static STRENGTH: EffectSpec = EffectSpec {
    name: "strength",
    visual: "strength",
    tick_cadence: 60,
};
static ELECTROCUTE: EffectSpec = EffectSpec {
    name: "electrocute",
    visual: "spark",
    tick_cadence: 60,
};
static STUN: EffectSpec = EffectSpec {
    name: "stun",
    visual: "stun",
    tick_cadence: 1,
};
static THUNDER_SHOCK: EffectSpec = EffectSpec {
    name: "thunder_shock",
    visual: "thunder",
    tick_cadence: 20,
};

impl EffectKind {
    pub fn spec(self) -> &'static EffectSpec {
        match self {
            EffectKind::Burning => &BURNING,
            EffectKind::Poison => &POISON,
            EffectKind::Regeneration => &REGENERATION,
            EffectKind::Freeze => &FREEZE,
            EffectKind::Strength => &STRENGTH,
            EffectKind::Electrocute => &ELECTROCUTE,
            EffectKind::Stun => &STUN,
            EffectKind::ThunderShock => &THUNDER_SHOCK,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    fn on_start(self, entity: &mut Entity, _factor: f32, fx: &mut Vec<Fx>) {
        match self {
            EffectKind::Freeze => fx.push(Fx::Sound(Sound::Freeze)),
            EffectKind::Strength => fx.push(Fx::Sound(Sound::PowerUp)),
            // Zero-damage hit: interrupts whatever the target was doing.
            EffectKind::Stun => {
                entity.take_hit(0.0, fx);
            }
            _ => {}
        }
    }

    fn on_tick(self, entity: &mut Entity, factor: f32, fx: &mut Vec<Fx>) {
        match self {
            EffectKind::Burning | EffectKind::Poison => {
                entity.take_hit(factor, fx);
            }
            EffectKind::Regeneration => {
                entity.heal(factor * 5.0, fx);
            }
            EffectKind::ThunderShock => {
                entity.take_hit(0.0, fx);
            }
            _ => {}
        }
    }

    fn on_end(self, _entity: &mut Entity, _factor: f32, fx: &mut Vec<Fx>) {
        if self == EffectKind::Freeze {
            fx.push(Fx::Sound(Sound::Shatter));
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    /// Unique per entity, never reused.
    pub index: u32,
    pub kind: EffectKind,
    lifetime: Countdown,
    pub factor: f32,
    /// Ticks this instance has been advanced.
    pub elapsed: u32,
    started: bool,
}

impl ActiveEffect {
    /// Remaining lifetime in ticks.
    pub fn duration(&self) -> u32 {
        self.lifetime.remaining() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectApplied {
    Added { index: u32 },
    Refreshed { index: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct EffectList {
    instances: Vec<ActiveEffect>,
    next_index: u32,
}

impl EffectList {
    pub fn active(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.instances.iter().find(|e| e.kind == kind)
    }

    pub fn get(&self, index: u32) -> Option<&ActiveEffect> {
        self.instances.iter().find(|e| e.index == index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn insert_or_refresh(&mut self, kind: EffectKind, duration: u32, factor: f32) -> EffectApplied {
        if let Some(existing) = self.instances.iter_mut().find(|e| e.kind == kind) {
            existing.lifetime.start(duration as u64);
            return EffectApplied::Refreshed {
                index: existing.index,
            };
        }
        let index = self.next_index;
        self.next_index += 1;
        self.instances.push(ActiveEffect {
            index,
            kind,
            lifetime: Countdown::new(duration as u64),
            factor,
            elapsed: 0,
            started: false,
        });
        EffectApplied::Added { index }
    }

    fn take(&mut self, index: u32) -> Option<ActiveEffect> {
        let pos = self.instances.iter().position(|e| e.index == index)?;
        Some(self.instances.remove(pos))
    }
}

/// Apply `kind` to `entity`, or refresh its duration if already active.
pub fn add_effect(
    entity: &mut Entity,
    kind: EffectKind,
    duration: u32,
    factor: f32,
    fx: &mut Vec<Fx>,
) -> EffectApplied {
    let applied = entity.effects.insert_or_refresh(kind, duration, factor);
    if let EffectApplied::Added { index } = applied {
        fx.push(Fx::VisualAttached {
            index,
            visual: kind.spec().visual,
        });
    }
    tracing::debug!(uid = entity.uid, effect = kind.name(), duration, ?applied, "effect applied");
    applied
}

/// Remove an effect instance and its companion visual. No-op if absent.
pub fn remove_effect(entity: &mut Entity, index: u32, fx: &mut Vec<Fx>) -> bool {
    match entity.effects.take(index) {
        Some(effect) => {
            fx.push(Fx::VisualDetached { index });
            tracing::debug!(uid = entity.uid, effect = effect.kind.name(), "effect removed");
            true
        }
        None => false,
    }
}

/// Remove the instance of one effect type, if any.
pub fn remove_kind(entity: &mut Entity, kind: EffectKind, fx: &mut Vec<Fx>) -> bool {
    match entity.effects.active(kind).map(|e| e.index) {
        Some(index) => remove_effect(entity, index, fx),
        None => false,
    }
}

/// Remove every active effect.
pub fn clear_effects(entity: &mut Entity, fx: &mut Vec<Fx>) -> usize {
    let indices: Vec<u32> = entity.effects.iter().map(|e| e.index).collect();
    indices
        .into_iter()
        .filter(|&index| remove_effect(entity, index, fx))
        .count()
}

/// Advance every active effect on `entity` by one tick.
pub fn advance_effects(entity: &mut Entity, fx: &mut Vec<Fx>) {
    if entity.effects.is_empty() {
        return;
    }

    // Hooks need the entity mutably while we walk its instances.
    let mut instances = std::mem::take(&mut entity.effects.instances);
    let mut expired = Vec::new();

    for effect in instances.iter_mut() {
        let ran_out = effect.lifetime.tick() || !effect.lifetime.is_running();
        effect.elapsed += 1;

        if !effect.started {
            effect.started = true;
            effect.kind.on_start(entity, effect.factor, fx);
        }

        if ran_out {
            effect.kind.on_end(entity, effect.factor, fx);
            expired.push(effect.index);
        } else if effect.elapsed % effect.kind.spec().tick_cadence.max(1) == 0 {
            effect.kind.on_tick(entity, effect.factor, fx);
        }
    }

    instances.append(&mut entity.effects.instances);
    entity.effects.instances = instances;

    for index in expired {
        remove_effect(entity, index, fx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AnimState;
    use crate::kinds::EntityKind;

    fn goblin() -> Entity {
        Entity::new(1, EntityKind::Goblin, "test", 0.0, 0.0)
    }

    #[test]
    fn reapply_refreshes_instead_of_stacking() {
        let mut e = goblin();
        let mut fx = Vec::new();
        let first = add_effect(&mut e, EffectKind::Burning, 100, 1.0, &mut fx);
        advance_effects(&mut e, &mut fx);
        let second = add_effect(&mut e, EffectKind::Burning, 40, 3.0, &mut fx);

        assert_eq!(first, EffectApplied::Added { index: 0 });
        assert_eq!(second, EffectApplied::Refreshed { index: 0 });
        assert_eq!(e.effects.len(), 1);
        let active = e.effects.active(EffectKind::Burning).unwrap();
        assert_eq!(active.duration(), 40);
        // Only the duration changes on refresh
        assert_eq!(active.factor, 1.0);
        assert_eq!(
            fx.iter()
                .filter(|f| matches!(f, Fx::VisualAttached { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn duration_counts_down_and_end_fires_once() {
        let mut e = goblin();
        let mut fx = Vec::new();
        add_effect(&mut e, EffectKind::Freeze, 5, 1.0, &mut fx);
        fx.clear();

        for expected in (1..5).rev() {
            advance_effects(&mut e, &mut fx);
            assert_eq!(e.effects.active(EffectKind::Freeze).unwrap().duration(), expected);
        }
        advance_effects(&mut e, &mut fx);
        assert!(e.effects.is_empty());

        // Further ticks do nothing
        advance_effects(&mut e, &mut fx);

        let shatters = fx.iter().filter(|f| **f == Fx::Sound(Sound::Shatter)).count();
        let detached = fx
            .iter()
            .filter(|f| matches!(f, Fx::VisualDetached { index: 0 }))
            .count();
        let started = fx.iter().filter(|f| **f == Fx::Sound(Sound::Freeze)).count();
        assert_eq!(shatters, 1);
        assert_eq!(detached, 1);
        assert_eq!(started, 1);
    }

    #[test]
    fn on_tick_follows_cadence() {
        let mut e = goblin();
        let mut fx = Vec::new();
        add_effect(&mut e, EffectKind::Burning, 1000, 2.0, &mut fx);
        let cadence = EffectKind::Burning.spec().tick_cadence;

        for _ in 0..cadence - 1 {
            advance_effects(&mut e, &mut fx);
        }
        assert_eq!(e.health, e.max_health);
        advance_effects(&mut e, &mut fx);
        assert_eq!(e.health, e.max_health - 2.0);
        assert_eq!(e.state, AnimState::TakeHit);
    }

    #[test]
    fn stun_interrupts_with_zero_damage() {
        let mut e = goblin();
        let mut fx = Vec::new();
        e.change_state(AnimState::Attack1);
        add_effect(&mut e, EffectKind::Stun, 10, 1.0, &mut fx);
        advance_effects(&mut e, &mut fx);
        assert_eq!(e.state, AnimState::TakeHit);
        assert_eq!(e.health, e.max_health);
        assert!(e.is_stunned());
    }

    #[test]
    fn hooks_are_harmless_on_dead_entity() {
        let mut e = goblin();
        let mut fx = Vec::new();
        e.take_hit(1000.0, &mut fx);
        add_effect(&mut e, EffectKind::Poison, 100, 5.0, &mut fx);
        add_effect(&mut e, EffectKind::Regeneration, 100, 5.0, &mut fx);
        for _ in 0..100 {
            advance_effects(&mut e, &mut fx);
        }
        assert_eq!(e.health, 0.0);
        assert_eq!(e.state, AnimState::Death);
        assert!(e.effects.is_empty());
    }

    #[test]
    fn remove_unknown_index_is_noop() {
        let mut e = goblin();
        let mut fx = Vec::new();
        assert!(!remove_effect(&mut e, 42, &mut fx));
        assert!(fx.is_empty());
    }

    #[test]
    fn indices_are_not_reused() {
        let mut e = goblin();
        let mut fx = Vec::new();
        add_effect(&mut e, EffectKind::Poison, 10, 1.0, &mut fx);
        add_effect(&mut e, EffectKind::Strength, 10, 1.0, &mut fx);
        assert_eq!(clear_effects(&mut e, &mut fx), 2);
        let again = add_effect(&mut e, EffectKind::Poison, 10, 1.0, &mut fx);
        assert_eq!(again, EffectApplied::Added { index: 2 });
        assert!(remove_kind(&mut e, EffectKind::Poison, &mut fx));
        assert!(e.effects.is_empty());
    }
}
