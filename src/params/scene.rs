//! Whole-scene snapshot handed to the engine by the editor.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CloudSettings, SkySettings, TerrainSettings, WaterSettings};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable snapshot of every environment setting plus the shared scene scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub terrain: TerrainSettings,
    pub water: WaterSettings,
    pub clouds: CloudSettings,
    pub sky: SkySettings,

    /// Side length of the square scene footprint (world units)
    pub box_size: f32,

    /// Height of the scene box (world units)
    pub box_height: f32,

    /// Seed for the noise permutation and all randomized placement
    pub seed: u64,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings::default(),
            water: WaterSettings::default(),
            clouds: CloudSettings::default(),
            sky: SkySettings::default(),
            box_size: 200.0,
            box_height: 80.0,
            seed: 0,
        }
    }
}

impl SceneSnapshot {
    /// Parse a (possibly partial) editor snapshot; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
