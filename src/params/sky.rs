//! Sky and sun settings.

use serde::{Deserialize, Serialize};

/// Named time-of-day preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkyPreset {
    #[default]
    Noon,
    Sunset,
    Dawn,
    Night,
    /// Use `sun_elevation` / `sun_azimuth` as given
    Custom,
}

impl SkyPreset {
    /// Fixed `(elevation, azimuth)` in degrees, or `None` for `Custom`
    pub fn sun_angles(self) -> Option<(f32, f32)> {
        match self {
            SkyPreset::Noon => Some((80.0, 180.0)),
            SkyPreset::Sunset => Some((5.0, 270.0)),
            SkyPreset::Dawn => Some((10.0, 90.0)),
            SkyPreset::Night => Some((-10.0, 180.0)),
            SkyPreset::Custom => None,
        }
    }
}

impl std::str::FromStr for SkyPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "noon" => Ok(SkyPreset::Noon),
            "sunset" => Ok(SkyPreset::Sunset),
            "dawn" => Ok(SkyPreset::Dawn),
            "night" => Ok(SkyPreset::Night),
            "custom" => Ok(SkyPreset::Custom),
            other => Err(format!("unknown sky preset '{}'", other)),
        }
    }
}

/// Sky and sun settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkySettings {
    pub enabled: bool,

    pub preset: SkyPreset,

    /// Sun elevation above the horizon (degrees, [-90, 90]); ignored unless `Custom`
    pub sun_elevation: f32,

    /// Sun azimuth (degrees, [0, 360)); ignored unless `Custom`
    pub sun_azimuth: f32,

    /// Draw the star field
    pub stars: bool,

    /// Number of stars; the density factor scales their size
    pub star_count: u32,
}

impl Default for SkySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            preset: SkyPreset::Noon,
            sun_elevation: 45.0,
            sun_azimuth: 180.0,
            stars: false,
            star_count: 1000,
        }
    }
}
