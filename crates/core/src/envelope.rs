use crate::types::{ActionId, ControllerId, Tick};

/// An intent produced outside the simulation, stamped with the tick it should apply on.
#[derive(Clone, Debug)]
pub struct ActionEnvelope<A> {
    pub controller: ControllerId,
    pub action_id: ActionId,
    pub intended_tick: Tick,
    pub payload: A,
}

impl<A> ActionEnvelope<A> {
    pub fn new(controller: ControllerId, action_id: ActionId, intended_tick: Tick, payload: A) -> Self {
        Self {
            controller,
            action_id,
            intended_tick,
            payload,
        }
    }
}
