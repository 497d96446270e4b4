use crate::actions::RpgAction;
use crate::config::RpgConfig;
use crate::entity::Faction;
use crate::events::RpgEvent;
use crate::kinds::EntityKind;
use crate::projectile;
use crate::systems;
use crate::world::{EntityId, RpgState};
use crate::zone::ZoneLayout;
use sim_core::{ActionEnvelope, Game, TerminalOutcome, Tick};

pub struct RpgGame {
    state: RpgState,
    seed: u64,
}

impl RpgGame {
    /// A game with `layout` already loaded as the active zone.
    pub fn with_zone(config: RpgConfig, seed: u64, layout: &ZoneLayout) -> Self {
        let mut game = <Self as Game>::new(config, seed);
        game.load_zone(layout);
        game
    }

    pub fn state(&self) -> &RpgState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RpgState {
        &mut self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn load_zone(&mut self, layout: &ZoneLayout) -> usize {
        systems::load_zone(&mut self.state, layout)
    }

    /// Spawn an entity into the active zone, standing on the floor.
    pub fn spawn(&mut self, kind: EntityKind, x: f32) -> EntityId {
        let state = &mut self.state;
        let id = state.world.spawn(kind, &state.zone.name, x, 0.0, None);
        let entity = &mut state.world.entities[id];
        entity.y = entity.ground_y(state.zone.floor_y);
        entity.on_ground = true;
        if entity.faction == Faction::Enemy {
            state.zone.had_enemies = true;
        }
        id
    }
}

impl Game for RpgGame {
    type Config = RpgConfig;
    type Action = RpgAction;
    type Observation = rpg_types::RpgObservation;
    type Event = RpgEvent;

    fn new(config: Self::Config, seed: u64) -> Self {
        Self {
            state: RpgState::new(config, seed),
            seed,
        }
    }

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        let state = &mut self.state;
        state.tick = tick;

        // 1. Entities and projectiles queued last tick leave the world
        systems::flush_removals(state, out_events);

        // 2. Player commands
        for action in actions {
            systems::apply_action(state, &action.payload, out_events);
        }

        // 3. Wind-ups and cooldowns that came due
        systems::fire_timers(state, out_events);

        // 4. Effects, behaviour, movement, animation
        systems::update_entities(state, out_events);

        // 5. Projectiles in flight
        projectile::advance_projectiles(state, out_events);

        // 6. Drops and kill events for whatever died this tick
        systems::process_kills(state, out_events);

        // 7. Quest records leave with this tick's events
        systems::drain_quest_queue(state, out_events);
    }

    fn observe(&self, tick: Tick) -> Self::Observation {
        crate::observe::build_observation(&self.state, tick)
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        if self.state.player().dead {
            return Some(TerminalOutcome::Lose);
        }
        if self.state.zone.had_enemies && !systems::has_living_enemies(&self.state) {
            return Some(TerminalOutcome::Win);
        }
        None
    }
}
