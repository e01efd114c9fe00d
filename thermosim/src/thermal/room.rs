//! Presets for the physical properties of a room.
//!
//! These turn everyday descriptions ("a small bedroom with 20 cm of clay
//! brick") into the thermal mass and wall resistance the model needs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Density of air at sea level (kg/m³).
const AIR_DENSITY_KG_PER_M3: f64 = 1.225;

/// Specific heat of air at constant pressure (J/(kg·K)).
const AIR_SPECIFIC_HEAT_J_PER_KG_K: f64 = 1005.0;

pub const DEFAULT_WALL_THICKNESS_CM: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Room {
    SmallBedroom,
    LargeHall,
    /// Air volume only; furniture and walls are not counted.
    Custom { volume_m3: f64 },
}

impl Room {
    /// Heat capacity of the room (J/K).
    pub fn thermal_mass_j_per_k(&self) -> f64 {
        match self {
            Room::SmallBedroom => 40_000.0,
            Room::LargeHall => 100_000.0,
            Room::Custom { volume_m3 } => {
                volume_m3 * AIR_DENSITY_KG_PER_M3 * AIR_SPECIFIC_HEAT_J_PER_KG_K
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Wall {
    /// Classic red bricks.
    BurntClayBricks,
    CementBricks,
    Custom { resistance_per_cm: f64 },
}

impl Wall {
    /// Thermal resistance contributed by each centimetre of wall.
    pub fn resistance_per_cm(&self) -> f64 {
        match self {
            Wall::BurntClayBricks => 0.5,
            Wall::CementBricks => 0.08,
            Wall::Custom { resistance_per_cm } => *resistance_per_cm,
        }
    }

    /// Resistance of a wall of uniform `thickness_cm` (K/W).
    pub fn resistance_k_per_w(&self, thickness_cm: f64) -> f64 {
        self.resistance_per_cm() * thickness_cm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Room::SmallBedroom, 40_000.0; "small bedroom")]
    #[test_case(Room::LargeHall, 100_000.0; "large hall")]
    #[test_case(Room::Custom { volume_m3: 10.0 }, 12_311.25; "ten cubic metres")]
    #[test_case(Room::Custom { volume_m3: 0.0 }, 0.0; "empty")]
    fn should_compute_thermal_mass(room: Room, expected: f64) {
        assert!((room.thermal_mass_j_per_k() - expected).abs() < 1e-9);
    }

    #[test_case(Wall::BurntClayBricks, 20.0, 10.0; "clay 20cm")]
    #[test_case(Wall::CementBricks, 20.0, 1.6; "cement 20cm")]
    #[test_case(Wall::Custom { resistance_per_cm: 0.1 }, 30.0, 3.0; "custom 30cm")]
    fn should_compute_wall_resistance(wall: Wall, thickness_cm: f64, expected: f64) {
        assert!((wall.resistance_k_per_w(thickness_cm) - expected).abs() < 1e-9);
    }

    #[test]
    fn should_parse_preset_names() {
        assert_eq!("small-bedroom".parse::<Room>().unwrap(), Room::SmallBedroom);
        assert_eq!("large-hall".parse::<Room>().unwrap(), Room::LargeHall);
        assert_eq!(
            "burnt-clay-bricks".parse::<Wall>().unwrap(),
            Wall::BurntClayBricks
        );
        assert_eq!("cement-bricks".parse::<Wall>().unwrap(), Wall::CementBricks);
    }

    #[test]
    fn should_parse_custom_with_default_fields() {
        assert_eq!(
            "custom".parse::<Room>().unwrap(),
            Room::Custom { volume_m3: 0.0 }
        );
        assert_eq!(
            "custom".parse::<Wall>().unwrap(),
            Wall::Custom {
                resistance_per_cm: 0.0
            }
        );
    }

    #[test]
    fn should_reject_unknown_preset() {
        assert!("igloo".parse::<Room>().is_err());
        assert!("straw".parse::<Wall>().is_err());
    }
}
