//! Gerstner wave superposition with analytic normals.

use glam::{Vec2, Vec3};

/// One analytic wave train
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GerstnerWave {
    /// Unit travel direction in the XZ plane (x, z)
    pub direction: Vec2,
    /// Spatial angular frequency (radians per world unit)
    pub frequency: f32,
    /// Relative amplitude (world units at amplitude multiplier 1)
    pub amplitude: f32,
    /// Crest sharpness Q; horizontal orbit radius is Q * amplitude
    pub steepness: f32,
    /// Phase advance per second
    pub phase_speed: f32,
}

/// Two slow swells, two medium chop waves, two fast ripples
pub const WAVES: [GerstnerWave; 6] = [
    // Large swell
    GerstnerWave {
        direction: Vec2::new(0.9578, 0.2873),
        frequency: 0.08,
        amplitude: 0.6,
        steepness: 0.55,
        phase_speed: 0.6,
    },
    GerstnerWave {
        direction: Vec2::new(-0.3714, 0.9285),
        frequency: 0.12,
        amplitude: 0.45,
        steepness: 0.5,
        phase_speed: 0.7,
    },
    // Medium chop
    GerstnerWave {
        direction: Vec2::new(0.7071, -0.7071),
        frequency: 0.25,
        amplitude: 0.2,
        steepness: 0.7,
        phase_speed: 1.2,
    },
    GerstnerWave {
        direction: Vec2::new(-0.9363, -0.3511),
        frequency: 0.3,
        amplitude: 0.16,
        steepness: 0.65,
        phase_speed: 1.4,
    },
    // Fine ripple
    GerstnerWave {
        direction: Vec2::new(0.1961, 0.9806),
        frequency: 0.7,
        amplitude: 0.06,
        steepness: 0.45,
        phase_speed: 2.4,
    },
    GerstnerWave {
        direction: Vec2::new(0.9806, -0.1961),
        frequency: 0.9,
        amplitude: 0.045,
        steepness: 0.4,
        phase_speed: 2.8,
    },
];

/// Displacement and normal at one base-plane point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    /// Offset from the rest position (x, y, z)
    pub displacement: Vec3,
    /// Unit surface normal
    pub normal: Vec3,
}

/// The wave field at a fixed amplitude multiplier and time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OceanSurface {
    amplitude: f32,
    wave_time: f32,
}

impl OceanSurface {
    /// `wave_time` is elapsed time already scaled by the user wave speed
    pub fn new(amplitude: f32, wave_time: f32) -> Self {
        Self {
            amplitude,
            wave_time,
        }
    }

    /// Sum all waves at rest position (x, z)
    ///
    /// The normal comes from the accumulated partial derivatives of the
    /// displaced position, not from neighbouring samples.
    pub fn sample(&self, x: f32, z: f32) -> SurfaceSample {
        let mut displacement = Vec3::ZERO;
        // d(position)/dx and d(position)/dz of the displaced surface
        let mut tangent_x = Vec3::X;
        let mut tangent_z = Vec3::Z;

        for wave in &WAVES {
            let d = wave.direction;
            let a = wave.amplitude * self.amplitude;
            let q = wave.steepness;
            let k = wave.frequency;

            let phase = d.dot(Vec2::new(x, z)) * k + self.wave_time * wave.phase_speed;
            let (sin_p, cos_p) = phase.sin_cos();

            displacement += Vec3::new(q * a * d.x * cos_p, a * sin_p, q * a * d.y * cos_p);

            let qak = q * a * k;
            let ak = a * k;
            tangent_x += Vec3::new(
                -qak * d.x * d.x * sin_p,
                ak * d.x * cos_p,
                -qak * d.x * d.y * sin_p,
            );
            tangent_z += Vec3::new(
                -qak * d.x * d.y * sin_p,
                ak * d.y * cos_p,
                -qak * d.y * d.y * sin_p,
            );
        }

        let normal = tangent_z.cross(tangent_x).try_normalize().unwrap_or(Vec3::Y);

        SurfaceSample {
            displacement,
            normal,
        }
    }

    /// Displaced world position of rest point (x, rest_height, z)
    pub fn position(&self, x: f32, z: f32, rest_height: f32) -> Vec3 {
        Vec3::new(x, rest_height, z) + self.sample(x, z).displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> impl Iterator<Item = (f32, f32)> {
        (-20..20).flat_map(|i| (-20..20).map(move |j| (i as f32 * 3.1, j as f32 * 2.7)))
    }

    #[test]
    fn test_wave_table_tiers() {
        for wave in &WAVES {
            assert!((wave.direction.length() - 1.0).abs() < 1e-3);
        }
        // Swells slow and long, ripples fast and short
        assert!(WAVES[..2].iter().all(|w| (0.08..=0.12).contains(&w.frequency)));
        assert!(WAVES[2..4].iter().all(|w| (0.25..=0.3).contains(&w.frequency)));
        assert!(WAVES[4..].iter().all(|w| (0.7..=0.9).contains(&w.frequency)));
        assert!(WAVES[0].phase_speed < WAVES[5].phase_speed);
    }

    #[test]
    fn test_normals_are_unit_length() {
        for amplitude in [0.0, 0.5, 1.0, 2.0, 3.0] {
            for t in [0.0, 1.7, 12.5, 300.0] {
                let surface = OceanSurface::new(amplitude, t);
                for (x, z) in sample_points() {
                    let n = surface.sample(x, z).normal;
                    assert!((n.length() - 1.0).abs() < 1e-4, "|n| = {}", n.length());
                    assert!(n.y > 0.0, "normal flipped at ({}, {})", x, z);
                }
            }
        }
    }

    #[test]
    fn test_zero_amplitude_is_flat() {
        let surface = OceanSurface::new(0.0, 42.0);
        for (x, z) in sample_points() {
            let s = surface.sample(x, z);
            assert_eq!(s.displacement, Vec3::ZERO);
            assert_eq!(s.normal, Vec3::Y);
        }
    }

    #[test]
    fn test_analytic_normal_matches_finite_difference() {
        let surface = OceanSurface::new(1.5, 4.0);
        let eps = 1e-2;
        for (x, z) in sample_points().step_by(37) {
            let p = surface.position(x, z, 0.0);
            let px = surface.position(x + eps, z, 0.0);
            let pz = surface.position(x, z + eps, 0.0);
            let numeric = (pz - p).cross(px - p).normalize();
            let analytic = surface.sample(x, z).normal;
            assert!(
                numeric.dot(analytic) > 0.999,
                "analytic {:?} vs numeric {:?}",
                analytic,
                numeric
            );
        }
    }

    #[test]
    fn test_surface_moves_over_time() {
        let a = OceanSurface::new(1.0, 0.0).sample(5.0, 5.0);
        let b = OceanSurface::new(1.0, 1.0).sample(5.0, 5.0);
        assert_ne!(a.displacement, b.displacement);
    }

    #[test]
    fn test_height_bounded_by_amplitude_sum() {
        let amplitude = 2.0;
        let bound: f32 = WAVES.iter().map(|w| w.amplitude * amplitude).sum();
        let surface = OceanSurface::new(amplitude, 7.0);
        for (x, z) in sample_points() {
            assert!(surface.sample(x, z).displacement.y.abs() <= bound + 1e-5);
        }
    }
}
