//! Ocean surface settings.

use serde::{Deserialize, Serialize};

use super::Rgb;

/// Ocean surface settings
///
/// Only drives per-frame uniforms: the base plane never changes, all motion is
/// computed per vertex from these values and the frame time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaterSettings {
    pub enabled: bool,

    /// Rest height of the water plane (world units)
    pub height: f32,

    /// Deep water colour
    pub color: Rgb,

    /// Opacity looking straight down, [0, 1]
    pub opacity: f32,

    /// Multiplier on all six Gerstner wave amplitudes, [0, 3]
    pub wave_amplitude: f32,

    /// Multiplier on wave phase speed, [0, 3]
    pub wave_speed: f32,
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            height: 0.5,
            color: [0.05, 0.28, 0.42],
            opacity: 0.8,
            wave_amplitude: 1.0,
            wave_speed: 1.0,
        }
    }
}
