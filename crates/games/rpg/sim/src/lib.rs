//! Real-time entity simulation and combat engine for a 2D action RPG.
//!
//! Everything advances in whole ticks: animation frames, status effects,
//! attack wind-ups, cooldowns and projectiles. Rendering, audio and UI sit
//! outside and only see [`RpgEvent`]s and [`rpg_types::RpgObservation`]s.

pub mod actions;
pub mod combat;
pub mod config;
pub mod effects;
pub mod entity;
pub mod errors;
pub mod events;
pub mod game;
pub mod interact;
pub mod inventory;
pub mod items;
pub mod kinds;
pub mod observe;
pub mod projectile;
pub mod recipes;
pub mod systems;
pub mod world;
pub mod zone;

pub use actions::RpgAction;
pub use config::RpgConfig;
pub use entity::{AnimState, Entity, Facing, Faction};
pub use errors::LoadError;
pub use events::{Fx, QuestEvent, QuestEventKind, RpgEvent};
pub use game::RpgGame;
pub use items::Item;
pub use kinds::EntityKind;
pub use world::{EntityId, ProjectileId, RpgState};
pub use zone::ZoneLayout;
