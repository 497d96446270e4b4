//! Zone layouts: the typed entity lists a world loader hands to the simulation.

use crate::entity::Facing;
use crate::errors::LoadError;
use crate::kinds::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub kind: EntityKind,
    pub x: f32,
    /// Defaults to standing on the floor.
    #[serde(default)]
    pub y: Option<f32>,
    /// Stable identity for quest tracking; assigned from a counter when absent.
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub facing: Option<Facing>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneLayout {
    pub name: String,
    /// Falls back to the configured floor.
    #[serde(default)]
    pub floor_y: Option<f32>,
    /// Where the player enters; keeps the current x when absent.
    #[serde(default)]
    pub player_x: Option<f32>,
    #[serde(default)]
    pub spawns: Vec<SpawnSpec>,
}

impl ZoneLayout {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::parse("zone layout", &e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_layout() {
        let layout = ZoneLayout::from_json(
            r#"{
                "name": "meadow",
                "spawns": [
                    { "kind": "goblin", "x": 400 },
                    { "kind": "chest", "x": 50, "uid": 900, "facing": "left" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(layout.name, "meadow");
        assert_eq!(layout.floor_y, None);
        assert_eq!(layout.spawns.len(), 2);
        assert_eq!(layout.spawns[0].kind, EntityKind::Goblin);
        assert_eq!(layout.spawns[1].uid, Some(900));
        assert_eq!(layout.spawns[1].facing, Some(Facing::Left));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = ZoneLayout::from_json(r#"{ "name": "x", "spawns": [{ "kind": "dragon", "x": 0 }] }"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { what: "zone layout", .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ZoneLayout::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
