//! Terrain heightfield: noise-displaced ground grid with memoized rebuilds.

mod heightfield;
mod system;

pub use heightfield::{build_heightfield, terrain_height, MAX_RELIEF, TERRAIN_SEGMENTS};
pub use system::TerrainSystem;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::params::TerrainSettings;
use crate::sky::{SkyPalette, SunState};

/// Uniform buffer for the terrain shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TerrainUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// rgb = albedo, a = roughness
    pub color: [f32; 4],
    pub sun_dir: [f32; 4],
    /// rgb = sun colour, a = ambient level
    pub sun_color: [f32; 4],
    /// x = grid overlay on (1) / off (0), y = grid spacing (world units)
    pub grid: [f32; 4],
}

/// World units between grid overlay lines
const GRID_SPACING: f32 = 1.0;

impl TerrainUniforms {
    pub fn new(
        view_proj: Mat4,
        settings: &TerrainSettings,
        sun: &SunState,
        palette: &SkyPalette,
    ) -> Self {
        let albedo = Vec3::from_array(settings.color);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            color: albedo.extend(settings.terrain_type.roughness()).to_array(),
            sun_dir: sun.direction.extend(0.0).to_array(),
            sun_color: palette.sun_color.extend(palette.ambient).to_array(),
            grid: [
                if settings.hide_grid { 0.0 } else { 1.0 },
                GRID_SPACING,
                0.0,
                0.0,
            ],
        }
    }
}
