//! Command-line argument parsing.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use moodscape::params::{
    CameraPreset, FixedCamera, OrbitCamera, SceneSnapshot, SettingsError, SkyPreset, TerrainType,
};
use moodscape::sky;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "moodscape")]
#[command(
    about = "Procedural environment viewer: terrain, ocean, clouds and sky",
    long_about = None
)]
pub struct Args {
    /// Scene snapshot to load (JSON, camelCase keys, missing fields take defaults)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Noise and placement seed (default: from the settings file, else the clock)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sky preset: noon, sunset, dawn, night, custom
    #[arg(long, value_name = "PRESET")]
    pub sky: Option<SkyPreset>,

    /// Sun elevation in degrees (custom sky only)
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub sun_elevation: Option<f32>,

    /// Sun azimuth in degrees (custom sky only)
    #[arg(long, value_name = "DEGREES")]
    pub sun_azimuth: Option<f32>,

    /// Terrain type: none, grass, desert, snow, rocky, water
    #[arg(long, value_name = "TYPE")]
    pub terrain: Option<TerrainType>,

    /// Terrain elevation in [0, 1]
    #[arg(long, value_name = "FRACTION")]
    pub elevation: Option<f32>,

    /// Enable the ocean layer
    #[arg(long)]
    pub water: bool,

    /// Number of cloud puffs (0 disables the layer's drawing)
    #[arg(long, value_name = "N")]
    pub clouds: Option<u32>,

    /// Show the star field
    #[arg(long)]
    pub stars: bool,

    /// Scene footprint side length (world units)
    #[arg(long, value_name = "UNITS")]
    pub box_size: Option<f32>,

    /// Camera preset: orbit (default), fixed
    #[arg(long, value_name = "PRESET", default_value = "orbit")]
    pub camera_preset: String,
}

impl Args {
    /// Load the snapshot (or defaults) and apply command-line overrides
    pub fn build_snapshot(&self) -> Result<SceneSnapshot, SettingsError> {
        let mut snapshot = match &self.settings {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                SceneSnapshot::from_path(path)?
            }
            None => SceneSnapshot {
                seed: clock_seed(),
                ..Default::default()
            },
        };

        if let Some(seed) = self.seed {
            snapshot.seed = seed;
        }
        if let Some(preset) = self.sky {
            snapshot.sky.preset = preset;
        }
        if let Some(elevation) = self.sun_elevation {
            snapshot.sky.sun_elevation = elevation.clamp(-90.0, 90.0);
        }
        if let Some(azimuth) = self.sun_azimuth {
            snapshot.sky.sun_azimuth = azimuth.rem_euclid(360.0);
        }
        if (self.sun_elevation.is_some() || self.sun_azimuth.is_some())
            && sky::is_locked(snapshot.sky.preset)
        {
            log::warn!(
                "Sun angles are ignored with the {:?} preset; use --sky custom",
                snapshot.sky.preset
            );
        }
        if let Some(terrain_type) = self.terrain {
            snapshot.terrain.terrain_type = terrain_type;
            snapshot.terrain.color = terrain_type.default_color();
        }
        if let Some(elevation) = self.elevation {
            snapshot.terrain.elevation = elevation.clamp(0.0, 1.0);
        }
        if self.water {
            snapshot.water.enabled = true;
        }
        if let Some(count) = self.clouds {
            snapshot.clouds.count = count;
        }
        if self.stars {
            snapshot.sky.stars = true;
        }
        if let Some(box_size) = self.box_size {
            snapshot.box_size = box_size.max(1.0);
        }

        Ok(snapshot)
    }

    /// Parse camera preset, sized to the scene footprint
    pub fn parse_camera_preset(&self, box_size: f32) -> CameraPreset {
        match self.camera_preset.to_lowercase().as_str() {
            "orbit" => {
                log::info!("Camera: Orbit");
                CameraPreset::Orbit(OrbitCamera::for_box(box_size))
            }
            "fixed" => {
                log::info!("Camera: Fixed");
                CameraPreset::Fixed(FixedCamera::default())
            }
            other => {
                log::warn!("Unknown camera preset '{}', using orbit", other);
                CameraPreset::Orbit(OrbitCamera::for_box(box_size))
            }
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_defaults() {
        let args = Args::try_parse_from([
            "moodscape",
            "--seed",
            "42",
            "--sky",
            "sunset",
            "--terrain",
            "snow",
            "--elevation",
            "0.5",
            "--water",
            "--clouds",
            "0",
            "--box-size",
            "60",
        ])
        .unwrap();
        let snapshot = args.build_snapshot().unwrap();

        assert_eq!(snapshot.seed, 42);
        assert_eq!(snapshot.sky.preset, SkyPreset::Sunset);
        assert_eq!(snapshot.terrain.terrain_type, TerrainType::Snow);
        assert_eq!(snapshot.terrain.color, TerrainType::Snow.default_color());
        assert_eq!(snapshot.terrain.elevation, 0.5);
        assert!(snapshot.water.enabled);
        assert_eq!(snapshot.clouds.count, 0);
        assert_eq!(snapshot.box_size, 60.0);
    }

    #[test]
    fn test_negative_sun_elevation_parses() {
        let args = Args::try_parse_from([
            "moodscape",
            "--sky",
            "custom",
            "--sun-elevation",
            "-20",
            "--sun-azimuth",
            "400",
        ])
        .unwrap();
        let snapshot = args.build_snapshot().unwrap();
        assert_eq!(snapshot.sky.sun_elevation, -20.0);
        assert_eq!(snapshot.sky.sun_azimuth, 40.0);
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(Args::try_parse_from(["moodscape", "--sky", "dusk"]).is_err());
        assert!(Args::try_parse_from(["moodscape", "--terrain", "lava"]).is_err());
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let args =
            Args::try_parse_from(["moodscape", "--settings", "/nonexistent/scene.json"]).unwrap();
        assert!(matches!(args.build_snapshot(), Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_camera_preset_fallback() {
        let args = Args::try_parse_from(["moodscape", "--camera-preset", "drone"]).unwrap();
        assert!(matches!(args.parse_camera_preset(200.0), CameraPreset::Orbit(_)));
    }
}
