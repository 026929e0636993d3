//! Terrain heightfield settings.

use serde::{Deserialize, Serialize};

use super::Rgb;

/// Ground material selected in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainType {
    /// No terrain layer at all
    None,
    #[default]
    Grass,
    Desert,
    Snow,
    Rocky,
    Water,
}

impl TerrainType {
    /// Surface roughness fed to the terrain shader (0 = glossy, 1 = fully diffuse)
    pub fn roughness(self) -> f32 {
        match self {
            TerrainType::None => 1.0,
            TerrainType::Grass => 0.9,
            TerrainType::Desert => 0.8,
            TerrainType::Snow => 0.55,
            TerrainType::Rocky => 1.0,
            TerrainType::Water => 0.2,
        }
    }

    /// Colour the editor proposes when the user switches to this type
    pub fn default_color(self) -> Rgb {
        match self {
            TerrainType::None => [0.0, 0.0, 0.0],
            TerrainType::Grass => [0.29, 0.49, 0.23],
            TerrainType::Desert => [0.84, 0.71, 0.47],
            TerrainType::Snow => [0.93, 0.95, 0.98],
            TerrainType::Rocky => [0.45, 0.42, 0.39],
            TerrainType::Water => [0.12, 0.35, 0.55],
        }
    }
}

impl std::str::FromStr for TerrainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(TerrainType::None),
            "grass" => Ok(TerrainType::Grass),
            "desert" => Ok(TerrainType::Desert),
            "snow" => Ok(TerrainType::Snow),
            "rocky" => Ok(TerrainType::Rocky),
            "water" => Ok(TerrainType::Water),
            other => Err(format!("unknown terrain type '{}'", other)),
        }
    }
}

/// Terrain heightfield settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerrainSettings {
    /// Ground material; `None` disables the layer
    #[serde(rename = "type")]
    pub terrain_type: TerrainType,

    /// Relief strength (dimensionless, [0, 1]); peak height is `elevation * 15` units
    pub elevation: f32,

    /// Albedo
    pub color: Rgb,

    /// Hide the unit grid drawn over the ground
    pub hide_grid: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            terrain_type: TerrainType::Grass,
            elevation: 0.3,
            color: TerrainType::Grass.default_color(),
            hide_grid: false,
        }
    }
}

impl TerrainSettings {
    pub fn is_enabled(&self) -> bool {
        self.terrain_type != TerrainType::None
    }
}
