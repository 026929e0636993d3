//! Volumetric cloud field settings.

use serde::{Deserialize, Serialize};

use super::Rgb;

/// Volumetric cloud field settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudSettings {
    pub enabled: bool,

    /// Number of cloud puffs
    pub count: u32,

    /// Height of the puff centres above the ground plane (world units)
    pub altitude: f32,

    /// Fraction of the footprint half-size covered by the placement ellipse, [0, 1]
    pub spread: f32,

    /// Uniform multiplier on the randomized per-puff size
    pub scale: f32,

    /// Maximum alpha of a fully dense puff, [0, 1]
    pub opacity: f32,

    /// Drift and wind speed multiplier
    pub speed: f32,

    /// Lit colour of the cloud body
    pub color: Rgb,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 8,
            altitude: 40.0,
            spread: 0.8,
            scale: 1.0,
            opacity: 0.85,
            speed: 1.0,
            color: [1.0, 1.0, 1.0],
        }
    }
}
