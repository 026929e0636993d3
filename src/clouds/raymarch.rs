//! CPU reference of the per-pixel cloud raymarch in `shaders/clouds.wgsl`.

use glam::Vec3;

use crate::noise::NoiseField;
use crate::sky::smoothstep;

/// Fixed number of samples along every ray segment
pub const MARCH_STEPS: usize = 40;
/// Pixels below this alpha are discarded instead of blended
pub const MIN_ALPHA: f32 = 0.01;

/// World position to noise coordinates
const NOISE_SCALE: f32 = 0.08;
const DENSITY_GAIN: f32 = 2.2;
const EXTINCTION: f32 = 0.8;
/// March stops once this little light gets through
const MIN_TRANSMITTANCE: f32 = 0.01;
/// Distance of the single self-shadow probe towards the sun (world units)
const SHADOW_DISTANCE: f32 = 4.0;
const SHADOW_ABSORPTION: f32 = 1.5;
/// Light reaching fully shadowed cloud
const SHADOW_FLOOR: f32 = 0.3;

/// Slab test of a ray against the box [-0.5, 0.5]^3
///
/// `dir` need not be normalized; returned distances are in units of `dir`.
/// The entry distance is clamped to 0 when the origin is inside the box.
pub fn intersect_unit_box(origin: Vec3, dir: Vec3) -> Option<(f32, f32)> {
    let inv = dir.recip();
    let t0 = (Vec3::splat(-0.5) - origin) * inv;
    let t1 = (Vec3::splat(0.5) - origin) * inv;
    let t_near = t0.min(t1).max_element().max(0.0);
    let t_far = t0.max(t1).min_element();

    // NaN (ray parallel to and on a slab plane) fails this comparison too
    if t_far > t_near {
        Some((t_near, t_far))
    } else {
        None
    }
}

/// 1 in the core of the inscribed ellipsoid, fading to 0 at its surface
pub fn ellipsoidal_falloff(local: Vec3) -> f32 {
    1.0 - smoothstep(0.4, 1.0, (local * 2.0).length())
}

/// Result of marching one ray through one puff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSample {
    /// Premultiplied colour
    pub color: Vec3,
    /// `(1 - transmittance) * opacity`
    pub alpha: f32,
    pub transmittance: f32,
}

/// One drifted puff with this frame's lighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudVolume {
    pub center: Vec3,
    pub scale: Vec3,
    pub wind_offset: Vec3,
    pub color: Vec3,
    pub opacity: f32,
    pub sun_direction: Vec3,
    pub light_tint: Vec3,
}

impl CloudVolume {
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        (world - self.center) / self.scale
    }

    /// Thresholded density in [0, 1] at a world position
    pub fn density(&self, noise: &NoiseField, world: Vec3) -> f32 {
        let falloff = ellipsoidal_falloff(self.to_local(world));
        if falloff <= 0.0 {
            return 0.0;
        }
        let n = noise.fbm3(world * NOISE_SCALE + self.wind_offset);
        smoothstep(0.15, 0.55, falloff * n * DENSITY_GAIN)
    }

    /// March a world-space ray; `None` when it misses or contributes nothing visible
    pub fn march(&self, noise: &NoiseField, origin: Vec3, dir: Vec3) -> Option<CloudSample> {
        self.march_with(noise, origin, dir, |_| {})
    }

    /// `march`, reporting the transmittance after every step
    pub fn march_with(
        &self,
        noise: &NoiseField,
        origin: Vec3,
        dir: Vec3,
        mut on_step: impl FnMut(f32),
    ) -> Option<CloudSample> {
        let dir = dir.normalize();
        // Same t in local and world space since only origin and direction are rescaled
        let (t_near, t_far) = intersect_unit_box(self.to_local(origin), dir / self.scale)?;

        let step = (t_far - t_near) / MARCH_STEPS as f32;
        let mut light = Vec3::ZERO;
        let mut transmittance = 1.0;

        for i in 0..MARCH_STEPS {
            let world = origin + dir * (t_near + (i as f32 + 0.5) * step);
            let density = self.density(noise, world);

            if density > 0.0 {
                let local = self.to_local(world);
                let height = (local.y + 0.5).clamp(0.0, 1.0);
                let gradient = 0.55 + 0.45 * height;

                let toward_sun = self.density(noise, world + self.sun_direction * SHADOW_DISTANCE);
                let shadow =
                    SHADOW_FLOOR + (1.0 - SHADOW_FLOOR) * (-toward_sun * SHADOW_ABSORPTION).exp();

                let absorption = density * step * EXTINCTION;
                light +=
                    self.color * self.light_tint * gradient * shadow * transmittance * absorption;
                transmittance *= (-absorption).exp();
            }

            on_step(transmittance);
            if transmittance < MIN_TRANSMITTANCE {
                break;
            }
        }

        let alpha = (1.0 - transmittance) * self.opacity;
        if alpha < MIN_ALPHA {
            return None;
        }

        Some(CloudSample {
            color: light * self.opacity,
            alpha,
            transmittance,
        })
    }
}
