use sim_core::{ActionEnvelope, ActionId, ControllerId, Game, TerminalOutcome, Tick};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct RunResult<G: Game> {
    pub outcome: Option<TerminalOutcome>,
    pub final_tick: Tick,
    pub ticks_run: u64,
    pub events: Vec<G::Event>,
}

/// Drives a [`Game`] one tick at a time and feeds it the actions scheduled for each tick.
pub struct SimHost<G: Game> {
    game: G,
    current_tick: Tick,
    tick_hz: u32,
    next_action_id: ActionId,
    pending_actions: BTreeMap<Tick, Vec<ActionEnvelope<G::Action>>>,
}

impl<G: Game> SimHost<G> {
    pub fn new(config: G::Config, seed: u64, tick_hz: u32) -> Self {
        Self::from_game(G::new(config, seed), tick_hz)
    }

    /// Wrap an already constructed game (e.g. one with a zone loaded).
    pub fn from_game(game: G, tick_hz: u32) -> Self {
        Self {
            game,
            current_tick: 0,
            tick_hz,
            next_action_id: 0,
            pending_actions: BTreeMap::new(),
        }
    }

    /// Submit an action to be executed at the given tick.
    /// If `intended_tick` is in the past or current, schedules for the next tick.
    /// Returns the actual tick the action was scheduled for.
    pub fn submit(&mut self, mut action: ActionEnvelope<G::Action>) -> Tick {
        let scheduled_tick = if action.intended_tick <= self.current_tick {
            self.current_tick + 1
        } else {
            action.intended_tick
        };

        action.intended_tick = scheduled_tick;
        self.pending_actions
            .entry(scheduled_tick)
            .or_default()
            .push(action);

        scheduled_tick
    }

    /// Queue a payload for the next tick, numbering it automatically.
    pub fn push(&mut self, controller: ControllerId, payload: G::Action) -> Tick {
        let action_id = self.next_action_id;
        self.next_action_id += 1;
        self.submit(ActionEnvelope::new(
            controller,
            action_id,
            self.current_tick + 1,
            payload,
        ))
    }

    pub fn run_for_ticks(&mut self, max_ticks: u64) -> RunResult<G> {
        let mut all_events = Vec::new();
        let mut ticks_run = 0;

        for _ in 0..max_ticks {
            match self.step_one_tick() {
                Some(events) => {
                    all_events.extend(events);
                    ticks_run += 1;
                }
                None => break,
            }
        }

        let outcome = self.game.is_terminal();
        if let Some(outcome) = outcome {
            tracing::info!(tick = self.current_tick, ?outcome, "simulation reached terminal state");
        }
        RunResult {
            outcome,
            final_tick: self.current_tick,
            ticks_run,
            events: all_events,
        }
    }

    /// Advance by one tick. Returns None if the game is already terminal,
    /// otherwise the events from this tick.
    pub fn step_one_tick(&mut self) -> Option<Vec<G::Event>> {
        if self.game.is_terminal().is_some() {
            return None;
        }

        self.current_tick += 1;

        let mut actions = self
            .pending_actions
            .remove(&self.current_tick)
            .unwrap_or_default();

        // Sort by (controller, action_id) for determinism
        actions.sort_by_key(|a| (a.controller, a.action_id));

        let mut tick_events = Vec::new();
        self.game.step(self.current_tick, &actions, &mut tick_events);
        tracing::trace!(
            tick = self.current_tick,
            actions = actions.len(),
            events = tick_events.len(),
            "tick"
        );

        Some(tick_events)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn observe(&self) -> G::Observation {
        self.game.observe(self.current_tick)
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn is_terminal(&self) -> Option<TerminalOutcome> {
        self.game.is_terminal()
    }
}
