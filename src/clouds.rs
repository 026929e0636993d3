//! Volumetric cloud puffs: randomized placement, deterministic drift, raymarched shading.

mod instances;
mod raymarch;
mod system;

pub use instances::{place_instances, wind_offset, CloudInstance};
pub use raymarch::{
    ellipsoidal_falloff, intersect_unit_box, CloudSample, CloudVolume, MARCH_STEPS, MIN_ALPHA,
};
pub use system::CloudSystem;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::CloudSettings;
use crate::sky::{SkyPalette, SunState};

/// Per-instance transform, uploaded every frame
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CloudInstanceRaw {
    /// xyz = drifted centre
    pub center: [f32; 4],
    /// xyz = box extents
    pub scale: [f32; 4],
}

/// Uniform buffer for the cloud raymarch shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CloudUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb = cloud colour, a = user opacity
    pub color: [f32; 4],
    pub sun_dir: [f32; 4],
    /// rgb = sun colour blended with ambient
    pub light_tint: [f32; 4],
    /// xyz = noise-space wind offset
    pub wind: [f32; 4],
}

/// Immutable cloud lighting and wind for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParams {
    pub color: Vec3,
    pub opacity: f32,
    pub sun_direction: Vec3,
    pub light_tint: Vec3,
    pub wind_offset: Vec3,
}

impl CloudParams {
    pub fn new(
        settings: &CloudSettings,
        time_s: f32,
        sun: &SunState,
        palette: &SkyPalette,
    ) -> Self {
        Self {
            color: Vec3::from_array(settings.color),
            opacity: settings.opacity,
            sun_direction: sun.direction,
            light_tint: palette.sun_color * (1.0 - palette.ambient) + Vec3::splat(palette.ambient),
            wind_offset: wind_offset(time_s, settings.speed),
        }
    }

    /// Volume description of one drifted instance, for CPU-side marching
    pub fn volume(&self, instance: &CloudInstanceRaw) -> CloudVolume {
        CloudVolume {
            center: Vec3::from_slice(&instance.center[..3]),
            scale: Vec3::from_slice(&instance.scale[..3]),
            wind_offset: self.wind_offset,
            color: self.color,
            opacity: self.opacity,
            sun_direction: self.sun_direction,
            light_tint: self.light_tint,
        }
    }

    pub fn uniforms(&self, view_proj: Mat4, camera_pos: Vec3) -> CloudUniforms {
        CloudUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            color: self.color.extend(self.opacity).to_array(),
            sun_dir: self.sun_direction.extend(0.0).to_array(),
            light_tint: self.light_tint.extend(1.0).to_array(),
            wind: self.wind_offset.extend(0.0).to_array(),
        }
    }
}
