//! Canonical serializable snapshot types for the action RPG simulation.
//!
//! Produced by `sim_rpg` once per tick for whoever draws the world
//! (renderer, debug overlay, headless runner output).

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct RectInfo {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// An active status effect as the UI shows it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EffectInfo {
    /// Unique per entity; the key the companion visual is attached under.
    pub index: u32,
    pub name: String,
    pub visual: String,
    pub remaining_ticks: u32,
    pub factor: f32,
}

/// Everything needed to draw one entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EntityView {
    /// Stable identity used by quest tracking.
    pub uid: u32,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    /// Animation state name, e.g. "idle", "attack1", "death".
    pub state: String,
    pub frame: u32,
    pub facing: String,
    pub health: f32,
    pub max_health: f32,
    pub hitbox: RectInfo,
    #[serde(default)]
    pub effects: Vec<EffectInfo>,
}

/// A projectile in flight.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
    pub direction: f32,
    pub hitbox: RectInfo,
}

/// One inventory slot.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SlotInfo {
    pub item: String,
    pub count: u32,
}

/// Player-only state: inventory and equipment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct LoadoutInfo {
    pub slots: Vec<Option<SlotInfo>>,
    pub selected_slot: usize,
    pub weapon: Option<String>,
    #[serde(default)]
    pub armor: Vec<String>,
    /// Sum of equipped armor protection, in percent.
    pub protection: f32,
}

/// Full snapshot of the simulation for a single tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct RpgObservation {
    pub tick: u64,
    pub ticks_per_second: u32,
    pub zone: String,
    pub player: EntityView,
    pub loadout: LoadoutInfo,
    pub entities: Vec<EntityView>,
    pub projectiles: Vec<ProjectileView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_view_without_effects_deserializes() {
        let json = r#"{
            "uid": 7, "kind": "goblin", "x": 1.0, "y": 2.0,
            "state": "idle", "frame": 0, "facing": "left",
            "health": 30.0, "max_health": 30.0,
            "hitbox": {"x": 1.0, "y": 2.0, "width": 10.0, "height": 20.0}
        }"#;
        let view: EntityView = serde_json::from_str(json).unwrap();
        assert_eq!(view.uid, 7);
        assert!(view.effects.is_empty());
    }
}
