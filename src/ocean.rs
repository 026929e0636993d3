//! Ocean surface: six analytic Gerstner waves over a static base plane.
//!
//! Nothing here rebuilds geometry per frame. The plane is uploaded once per
//! footprint and displaced in the vertex shader from `OceanUniforms`; the CPU
//! versions in `waves` and `shading` are the reference the WGSL mirrors.

mod shading;
mod system;
mod waves;

pub use shading::{caustic_shimmer, fresnel, shade, specular, FRESNEL_POWER};
pub use system::{OceanSystem, OCEAN_SEGMENTS};
pub use waves::{GerstnerWave, OceanSurface, SurfaceSample, WAVES};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::WaterSettings;
use crate::sky::{SkyPalette, SunState};

/// Immutable ocean parameters for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OceanParams {
    /// Rest height of the plane
    pub height: f32,
    pub color: Vec3,
    pub opacity: f32,
    /// User multiplier on every wave amplitude
    pub amplitude: f32,
    /// Elapsed time scaled by the user wave speed
    pub wave_time: f32,
    /// Unscaled elapsed time (caustic scrolling)
    pub time_s: f32,
    pub sun_direction: Vec3,
    pub sun_color: Vec3,
    pub ambient: f32,
}

impl OceanParams {
    pub fn new(water: &WaterSettings, time_s: f32, sun: &SunState, palette: &SkyPalette) -> Self {
        Self {
            height: water.height,
            color: Vec3::from_array(water.color),
            opacity: water.opacity,
            amplitude: water.wave_amplitude,
            wave_time: time_s * water.wave_speed,
            time_s,
            sun_direction: sun.direction,
            sun_color: palette.sun_color,
            ambient: palette.ambient,
        }
    }

    /// Wave field evaluated with this frame's amplitude and time
    pub fn surface(&self) -> OceanSurface {
        OceanSurface::new(self.amplitude, self.wave_time)
    }

    pub fn uniforms(&self, view_proj: Mat4, camera_pos: Vec3) -> OceanUniforms {
        let mut waves = [[0.0; 4]; 12];
        for (i, wave) in WAVES.iter().enumerate() {
            waves[i * 2] = [
                wave.direction.x,
                wave.direction.y,
                wave.frequency,
                wave.amplitude,
            ];
            waves[i * 2 + 1] = [wave.steepness, wave.phase_speed, 0.0, 0.0];
        }

        OceanUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            color: self.color.extend(self.opacity).to_array(),
            sun_dir: self.sun_direction.extend(0.0).to_array(),
            sun_color: self.sun_color.extend(self.ambient).to_array(),
            params: [self.height, self.amplitude, self.wave_time, self.time_s],
            waves,
        }
    }
}

/// Uniform buffer for the ocean shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OceanUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// rgb = water colour, a = base opacity
    pub color: [f32; 4],
    pub sun_dir: [f32; 4],
    /// rgb = sun colour, a = ambient level
    pub sun_color: [f32; 4],
    /// x = rest height, y = amplitude multiplier, z = wave time, w = time
    pub params: [f32; 4],
    /// Two vec4 per wave: (dir.x, dir.z, frequency, amplitude), (steepness, phase speed, 0, 0)
    pub waves: [[f32; 4]; 12],
}
