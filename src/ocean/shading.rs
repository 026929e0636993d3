//! Per-pixel ocean shading: Fresnel, Blinn specular and caustic shimmer.

use glam::{Vec3, Vec4};

use super::OceanParams;
use crate::noise::NoiseField;
use crate::sky::smoothstep;

pub const FRESNEL_POWER: f32 = 2.5;
const SPECULAR_SHININESS: f32 = 96.0;
const SPECULAR_STRENGTH: f32 = 1.2;
/// Colour the surface fades towards at grazing angles
const GRAZING_TINT: Vec3 = Vec3::new(0.85, 0.92, 1.0);
const GRAZING_MIX: f32 = 0.65;
/// Extra opacity at fully grazing angles
const FRESNEL_ALPHA_BOOST: f32 = 0.4;
const SHIMMER_STRENGTH: f32 = 0.18;

/// `(1 - cos θ)^2.5`: 0 looking straight down the normal, 1 at grazing
pub fn fresnel(view_dir: Vec3, normal: Vec3) -> f32 {
    (1.0 - view_dir.dot(normal).max(0.0)).powf(FRESNEL_POWER)
}

/// Blinn-Phong highlight towards `light_dir`
pub fn specular(normal: Vec3, view_dir: Vec3, light_dir: Vec3) -> f32 {
    let half = (light_dir + view_dir).try_normalize().unwrap_or(normal);
    normal.dot(half).max(0.0).powf(SPECULAR_SHININESS)
}

/// Sparse bright speckles from two independently scrolling noise layers
pub fn caustic_shimmer(noise: &NoiseField, x: f32, z: f32, time_s: f32) -> f32 {
    let n1 = noise.fbm2(x * 0.15 + time_s * 0.03, z * 0.15 + time_s * 0.02);
    let n2 = noise.fbm2(x * 0.21 - time_s * 0.025 + 17.0, z * 0.21 + time_s * 0.035 + 31.0);
    smoothstep(0.35, 0.65, n1 * n2 * 4.0)
}

/// Shade one surface point; returns straight (non-premultiplied) RGBA
pub fn shade(
    params: &OceanParams,
    noise: &NoiseField,
    world_pos: Vec3,
    normal: Vec3,
    camera_pos: Vec3,
) -> Vec4 {
    let view_dir = (camera_pos - world_pos).try_normalize().unwrap_or(Vec3::Y);
    let fr = fresnel(view_dir, normal);
    let diffuse = normal.dot(params.sun_direction).max(0.0);
    let lit = params.color * (params.ambient + (1.0 - params.ambient) * diffuse * 0.6);

    let spec = specular(normal, view_dir, params.sun_direction) * SPECULAR_STRENGTH;
    let shimmer =
        caustic_shimmer(noise, world_pos.x, world_pos.z, params.time_s) * SHIMMER_STRENGTH;

    let color = lit.lerp(GRAZING_TINT, fr * GRAZING_MIX) + params.sun_color * (spec + shimmer);
    let alpha = (params.opacity + fr * FRESNEL_ALPHA_BOOST).min(1.0);

    color.extend(alpha)
}
