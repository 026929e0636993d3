//! Cloud instance placement and drift.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::params::CloudSettings;

/// Horizontal extent range of a puff before the user scale (world units)
const WIDTH_RANGE: std::ops::Range<f32> = 18.0..43.0;
/// Vertical extent range of a puff before the user scale (world units)
const HEIGHT_RANGE: std::ops::Range<f32> = 5.0..11.0;
/// Z radius of the placement ellipse relative to its X radius
const ELLIPSE_ASPECT: f32 = 0.7;
/// Random vertical offset around the configured altitude (world units, ±)
const ALTITUDE_JITTER: f32 = 3.0;

/// Drift phase advance per second at speed 1 (radians)
const DRIFT_RATE: f32 = 0.05;
/// Drift orbit radii along X and Z (world units)
const DRIFT_RADIUS: Vec2 = Vec2::new(8.0, 5.0);

/// Noise-space wind velocity at speed 1 (noise units per second)
const WIND_VELOCITY: Vec3 = Vec3::new(0.02, 0.004, 0.012);

/// One cloud puff, as placed; drift and user scale are applied per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudInstance {
    /// Rest position on the XZ plane
    pub anchor: Vec2,
    /// Offset from the configured altitude
    pub altitude_offset: f32,
    /// Box extents before the user scale
    pub size: Vec3,
    /// Drift phase in [0, 2π)
    pub phase: f32,
}

impl CloudInstance {
    /// Centre after drifting for `time_s` seconds
    pub fn position_at(&self, time_s: f32, settings: &CloudSettings) -> Vec3 {
        let t = time_s * settings.speed * DRIFT_RATE + self.phase;
        Vec3::new(
            self.anchor.x + t.sin() * DRIFT_RADIUS.x,
            settings.altitude + self.altitude_offset,
            self.anchor.y + (t * 0.8).cos() * DRIFT_RADIUS.y,
        )
    }

    pub fn scale(&self, settings: &CloudSettings) -> Vec3 {
        self.size * settings.scale
    }
}

/// Scatter `count` puffs uniformly inside an ellipse of X radius `spread * footprint / 2`
///
/// Uses the square-root radius trick, so no samples are rejected.
pub fn place_instances(count: u32, spread: f32, footprint: f32, seed: u64) -> Vec<CloudInstance> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed ^ 0xC10D);
    let radius = Vec2::new(1.0, ELLIPSE_ASPECT) * spread * footprint / 2.0;

    (0..count)
        .map(|_| {
            let r = rng.random_range(0.0f32..1.0).sqrt();
            let theta = rng.random_range(0.0..TAU);
            let anchor = Vec2::new(theta.cos(), theta.sin()) * r * radius;

            let width = rng.random_range(WIDTH_RANGE);
            let depth = rng.random_range(WIDTH_RANGE);
            let height = rng.random_range(HEIGHT_RANGE);

            CloudInstance {
                anchor,
                altitude_offset: rng.random_range(-ALTITUDE_JITTER..ALTITUDE_JITTER),
                size: Vec3::new(width, height, depth),
                phase: rng.random_range(0.0..TAU),
            }
        })
        .collect()
}

/// Offset added to noise coordinates so the density pattern streams with the wind
pub fn wind_offset(time_s: f32, speed: f32) -> Vec3 {
    WIND_VELOCITY * time_s * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_inside_ellipse() {
        let footprint = 200.0;
        let spread = 0.8;
        let instances = place_instances(500, spread, footprint, 17);
        assert_eq!(instances.len(), 500);

        let rx = spread * footprint / 2.0;
        let rz = rx * ELLIPSE_ASPECT;
        for inst in &instances {
            let e = (inst.anchor.x / rx).powi(2) + (inst.anchor.y / rz).powi(2);
            assert!(e <= 1.0 + 1e-4, "anchor {:?} outside ellipse", inst.anchor);
        }
    }

    #[test]
    fn test_instance_sizes_in_range() {
        for inst in place_instances(300, 1.0, 100.0, 5) {
            assert!(WIDTH_RANGE.contains(&inst.size.x));
            assert!(WIDTH_RANGE.contains(&inst.size.z));
            assert!(HEIGHT_RANGE.contains(&inst.size.y));
            assert!((0.0..TAU).contains(&inst.phase));
        }
    }

    #[test]
    fn test_placement_is_seeded() {
        assert_eq!(place_instances(20, 0.5, 80.0, 3), place_instances(20, 0.5, 80.0, 3));
        assert_ne!(place_instances(20, 0.5, 80.0, 3), place_instances(20, 0.5, 80.0, 4));
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(place_instances(0, 0.8, 200.0, 1).is_empty());
    }

    #[test]
    fn test_drift_is_bounded_and_periodic() {
        let settings = CloudSettings::default();
        let inst = place_instances(1, 0.8, 200.0, 9)[0];
        let start = inst.position_at(0.0, &settings);

        for step in 0..200 {
            let p = inst.position_at(step as f32 * 0.7, &settings);
            assert!((p.x - inst.anchor.x).abs() <= DRIFT_RADIUS.x + 1e-4);
            assert!((p.z - inst.anchor.y).abs() <= DRIFT_RADIUS.y + 1e-4);
            assert_eq!(p.y, settings.altitude + inst.altitude_offset);
        }

        // Zero speed freezes the drift
        let still = CloudSettings {
            speed: 0.0,
            ..settings
        };
        assert_eq!(inst.position_at(123.0, &still), start);
    }

    #[test]
    fn test_user_scale_applies_per_frame() {
        let inst = place_instances(1, 0.8, 200.0, 2)[0];
        let doubled = CloudSettings {
            scale: 2.0,
            ..Default::default()
        };
        assert_eq!(inst.scale(&doubled), inst.size * 2.0);
    }
}
