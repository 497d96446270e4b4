use crate::recipes::CraftGrid;

/// Intents produced by the input layer, applied to the player.
#[derive(Clone, Debug, PartialEq)]
pub enum RpgAction {
    MoveLeft,
    MoveRight,
    Stop,
    Jump,
    /// Light attack on the ground, air attack while airborne.
    Attack,
    HeavyAttack,
    Interact,
    UseItem,
    SelectSlot(usize),
    Craft(CraftGrid),
}
