//! Sun positioning, sky gradient palette and star field.
//!
//! The sun direction computed here is the single light direction of the
//! environment: the sky backdrop, the ocean specular and the cloud lighting all
//! read it from the frame plan.

mod stars;

pub use stars::{Star, StarField, STAR_DENSITY_FACTOR, STAR_SHELL_RADIUS};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::{SkyPreset, SkySettings};

/// Distance of the sun from the scene origin (world units)
pub const SUN_DISTANCE: f32 = 450.0;

/// Resolved sun placement for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    /// Degrees above the horizon
    pub elevation_deg: f32,
    /// Degrees around the vertical axis, 0 = +Z, 90 = +X
    pub azimuth_deg: f32,
    /// Sun position at `SUN_DISTANCE` from the origin
    pub position: Vec3,
    /// Unit vector pointing towards the sun
    pub direction: Vec3,
}

impl SunState {
    /// Resolve the sun from settings: presets win over the explicit angles
    pub fn from_settings(settings: &SkySettings) -> Self {
        let (elevation_deg, azimuth_deg) = settings
            .preset
            .sun_angles()
            .unwrap_or((settings.sun_elevation, settings.sun_azimuth));
        Self::from_angles(elevation_deg, azimuth_deg)
    }

    pub fn from_angles(elevation_deg: f32, azimuth_deg: f32) -> Self {
        let position = sun_position(elevation_deg, azimuth_deg);
        Self {
            elevation_deg,
            azimuth_deg,
            position,
            direction: position / SUN_DISTANCE,
        }
    }
}

impl Default for SunState {
    fn default() -> Self {
        Self::from_settings(&SkySettings::default())
    }
}

/// Spherical (elevation, azimuth) in degrees to a Cartesian point at `SUN_DISTANCE`
///
/// Polar angle is measured from +Y, so elevation 90° lands exactly on the Y axis.
pub fn sun_position(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let phi = (90.0 - elevation_deg).to_radians();
    let theta = azimuth_deg.to_radians();
    Vec3::new(
        phi.sin() * theta.sin(),
        phi.cos(),
        phi.sin() * theta.cos(),
    ) * SUN_DISTANCE
}

/// Sky colours for a given sun height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyPalette {
    pub zenith: Vec3,
    pub horizon: Vec3,
    pub sun_color: Vec3,
    /// Ambient light level for lit layers, [0, 1]
    pub ambient: f32,
}

const DAY_ZENITH: Vec3 = Vec3::new(0.18, 0.42, 0.85);
const DAY_HORIZON: Vec3 = Vec3::new(0.65, 0.80, 0.95);
const GOLDEN_ZENITH: Vec3 = Vec3::new(0.30, 0.35, 0.60);
const GOLDEN_HORIZON: Vec3 = Vec3::new(0.98, 0.55, 0.30);
const NIGHT_ZENITH: Vec3 = Vec3::new(0.01, 0.015, 0.04);
const NIGHT_HORIZON: Vec3 = Vec3::new(0.04, 0.05, 0.10);
const NOON_SUN: Vec3 = Vec3::new(1.0, 0.97, 0.9);
const LOW_SUN: Vec3 = Vec3::new(1.0, 0.55, 0.25);

impl SkyPalette {
    pub fn for_sun(sun: &SunState) -> Self {
        let h = sun.direction.y;
        let day = smoothstep(-0.15, 0.2, h);
        // Warm light only near the horizon, and only while the sun is up
        let warm = (1.0 - smoothstep(0.05, 0.35, h.abs())) * day;

        let zenith = NIGHT_ZENITH.lerp(DAY_ZENITH, day).lerp(GOLDEN_ZENITH, warm * 0.5);
        let horizon = NIGHT_HORIZON.lerp(DAY_HORIZON, day).lerp(GOLDEN_HORIZON, warm);
        let sun_color = NOON_SUN.lerp(LOW_SUN, warm) * day;

        Self {
            zenith,
            horizon,
            sun_color,
            ambient: 0.08 + 0.35 * day,
        }
    }
}

/// Uniform buffer for the sky backdrop (fullscreen triangle)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub zenith: [f32; 4],
    pub horizon: [f32; 4],
    /// xyz = direction towards the sun
    pub sun_dir: [f32; 4],
    pub sun_color: [f32; 4],
}

impl SkyUniforms {
    pub fn new(view_proj: Mat4, camera_pos: Vec3, sun: &SunState, palette: &SkyPalette) -> Self {
        Self {
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            zenith: palette.zenith.extend(1.0).to_array(),
            horizon: palette.horizon.extend(1.0).to_array(),
            sun_dir: sun.direction.extend(0.0).to_array(),
            sun_color: palette.sun_color.extend(1.0).to_array(),
        }
    }
}

/// Uniform buffer for the star billboards
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct StarUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// x = quad half-size (world units), y = brightness
    pub params: [f32; 4],
}

impl StarUniforms {
    pub fn new(view_proj: Mat4, camera_pos: Vec3, palette: &SkyPalette) -> Self {
        // Stars wash out as the sky brightens but stay visible
        let brightness = 1.0 - 0.8 * (palette.ambient - 0.08) / 0.35;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            params: [stars::star_half_size(), brightness, 0.0, 0.0],
        }
    }
}

#[inline]
pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Whether a preset locks the sun angles
pub fn is_locked(preset: SkyPreset) -> bool {
    preset != SkyPreset::Custom
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noon_preset_ignores_overrides() {
        let settings = SkySettings {
            preset: SkyPreset::Noon,
            sun_elevation: 12.0,
            sun_azimuth: 33.0,
            ..Default::default()
        };
        let sun = SunState::from_settings(&settings);
        assert_eq!(sun.elevation_deg, 80.0);
        assert_eq!(sun.azimuth_deg, 180.0);
    }

    #[test]
    fn test_preset_table() {
        let cases = [
            (SkyPreset::Noon, 80.0, 180.0),
            (SkyPreset::Sunset, 5.0, 270.0),
            (SkyPreset::Dawn, 10.0, 90.0),
            (SkyPreset::Night, -10.0, 180.0),
        ];
        for (preset, el, az) in cases {
            let sun = SunState::from_settings(&SkySettings {
                preset,
                ..Default::default()
            });
            assert_eq!((sun.elevation_deg, sun.azimuth_deg), (el, az), "{:?}", preset);
            assert!(is_locked(preset));
        }
        assert!(!is_locked(SkyPreset::Custom));
    }

    #[test]
    fn test_custom_zenith_has_no_horizontal_component() {
        let settings = SkySettings {
            preset: SkyPreset::Custom,
            sun_elevation: 90.0,
            sun_azimuth: 123.0,
            ..Default::default()
        };
        let sun = SunState::from_settings(&settings);
        assert!(sun.position.x.abs() < 1e-4, "x = {}", sun.position.x);
        assert!(sun.position.z.abs() < 1e-4, "z = {}", sun.position.z);
        assert!((sun.position.y - SUN_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_sun_sits_at_fixed_distance() {
        for el in [-30.0, 0.0, 5.0, 45.0, 89.0] {
            for az in [0.0, 90.0, 180.0, 270.0, 359.0] {
                let p = sun_position(el, az);
                assert!((p.length() - SUN_DISTANCE).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn test_azimuth_convention() {
        // Sunset at 270° lands on -X, dawn at 90° on +X
        let sunset = SunState::from_angles(5.0, 270.0);
        let dawn = SunState::from_angles(10.0, 90.0);
        assert!(sunset.direction.x < -0.9);
        assert!(dawn.direction.x > 0.9);
        assert!(sunset.direction.y > 0.0);
    }

    #[test]
    fn test_palette_day_night() {
        let noon = SkyPalette::for_sun(&SunState::from_angles(80.0, 180.0));
        let night = SkyPalette::for_sun(&SunState::from_angles(-10.0, 180.0));
        let sunset = SkyPalette::for_sun(&SunState::from_angles(5.0, 270.0));

        assert!(noon.zenith.length() > night.zenith.length() * 5.0);
        assert_eq!(night.sun_color, Vec3::ZERO);
        assert!(noon.ambient > night.ambient);
        // Sunset horizon is warmer (red dominates blue)
        assert!(sunset.horizon.x > sunset.horizon.z);
        assert!(noon.horizon.z > noon.horizon.x);
    }
}
