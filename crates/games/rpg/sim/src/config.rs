use crate::errors::LoadError;
use serde::{Deserialize, Serialize};
use sim_core::{Millis, Tick};
use std::path::Path;

/// The three melee/ranged swing variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackVariant {
    /// Ground swing (`attack1`).
    Light,
    /// Airborne swing (`attack2`).
    Air,
    /// Heavy swing (`attack3`).
    Heavy,
}

/// Range and damage multipliers for one attack variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    pub range_mult: f32,
    pub damage_mult: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantTable {
    pub light: VariantSpec,
    pub air: VariantSpec,
    pub heavy: VariantSpec,
}

impl Default for VariantTable {
    fn default() -> Self {
        Self {
            light: VariantSpec {
                range_mult: 1.0,
                damage_mult: 1.0,
            },
            air: VariantSpec {
                range_mult: 1.0,
                damage_mult: 1.25,
            },
            heavy: VariantSpec {
                range_mult: 1.5,
                damage_mult: 2.0,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpgConfig {
    pub tick_hz: u32,

    // Attack timing
    pub melee_windup: Millis,
    pub default_cooldown: Millis,

    // Unarmed attacks
    pub unarmed_damage: f32,
    pub unarmed_range: f32,

    pub variants: VariantTable,

    /// Flat bonus per point of strength factor is `factor / 2 * strength_scale`.
    pub strength_scale: f32,
    /// Stun applied by an electrocuted attacker.
    pub stun_ticks: u32,

    // Projectiles
    pub projectile_width: f32,
    pub projectile_height: f32,

    // Movement
    pub gravity: f32,
    pub jump_velocity: f32,
    pub floor_y: f32,
    /// Speed multiplier while frozen.
    pub freeze_slow: f32,

    // Interaction
    pub interact_range: f32,
    pub greet_range: f32,

    pub inventory_slots: usize,
    pub player_start_x: f32,
}

impl RpgConfig {
    pub fn variant(&self, variant: AttackVariant) -> VariantSpec {
        match variant {
            AttackVariant::Light => self.variants.light,
            AttackVariant::Air => self.variants.air,
            AttackVariant::Heavy => self.variants.heavy,
        }
    }

    pub fn duration_to_ticks(&self, d: Millis) -> Tick {
        d.to_ticks(self.tick_hz)
    }

    pub fn strength_bonus(&self, factor: f32) -> f32 {
        factor / 2.0 * self.strength_scale
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_str(json).map_err(|e| LoadError::parse("config", &e))?;
        if config.tick_hz == 0 {
            return Err(LoadError::Parse {
                what: "config",
                message: "tick_hz must be at least 1".to_string(),
            });
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        Self::from_json(&text)
    }
}

impl Default for RpgConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,

            melee_windup: Millis::from_millis(300),
            default_cooldown: Millis::from_millis(500),

            unarmed_damage: 1.0,
            unarmed_range: 60.0,

            variants: VariantTable::default(),

            strength_scale: 6.0,
            stun_ticks: 30,

            projectile_width: 16.0,
            projectile_height: 6.0,

            gravity: 0.5,
            jump_velocity: -10.0,
            floor_y: 400.0,
            freeze_slow: 0.5,

            interact_range: 80.0,
            greet_range: 150.0,

            inventory_slots: 9,
            player_start_x: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RpgConfig::from_json(r#"{ "tick_hz": 30, "melee_windup": 100 }"#).unwrap();
        assert_eq!(config.tick_hz, 30);
        assert_eq!(config.melee_windup, Millis::from_millis(100));
        assert_eq!(config.default_cooldown, Millis::from_millis(500));
        assert_eq!(config.duration_to_ticks(config.melee_windup), 3);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = RpgConfig::from_json("{ tick_hz: }").unwrap_err();
        assert!(matches!(err, LoadError::Parse { what: "config", .. }));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let err = RpgConfig::from_json(r#"{ "tick_hz": 0 }"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse { what: "config", .. }));
    }

    #[test]
    fn heavy_reaches_further_than_light() {
        let config = RpgConfig::default();
        let light = config.variant(AttackVariant::Light);
        let heavy = config.variant(AttackVariant::Heavy);
        assert!(heavy.range_mult > light.range_mult);
        assert!(heavy.damage_mult > light.damage_mult);
    }

    #[test]
    fn strength_bonus_formula() {
        let config = RpgConfig::default();
        assert_eq!(config.strength_bonus(2.0), 6.0);
        assert_eq!(config.strength_bonus(3.0), 9.0);
    }
}
