//! Star field on a spherical shell around the scene.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Inner radius of the star shell (world units)
pub const STAR_SHELL_RADIUS: f32 = 400.0;
/// Thickness of the star shell (world units)
const STAR_SHELL_DEPTH: f32 = 50.0;
/// Constant size multiplier applied to every star
pub const STAR_DENSITY_FACTOR: f32 = 4.0;
/// Half-size of a star quad before the density factor
const STAR_BASE_HALF_SIZE: f32 = 0.3;

pub(crate) fn star_half_size() -> f32 {
    STAR_BASE_HALF_SIZE * STAR_DENSITY_FACTOR
}

/// Per-instance star data, uploaded as-is
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Star {
    /// xyz = position, w = brightness in [0.4, 1]
    pub position: [f32; 4],
}

/// Memoized star positions, regenerated when count or seed changes
#[derive(Debug, Default)]
pub struct StarField {
    key: Option<(u32, u64)>,
    stars: Vec<Star>,
    revision: u64,
}

impl StarField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stars for `(count, seed)`, rebuilding only if the key changed
    pub fn update(&mut self, count: u32, seed: u64) -> &[Star] {
        if self.key != Some((count, seed)) {
            log::debug!("Rebuilding star field: count={} seed={}", count, seed);
            self.stars = generate_stars(count, seed);
            self.key = Some((count, seed));
            self.revision += 1;
        }
        &self.stars
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Bumped on every rebuild so GPU buffers know when to re-upload
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Uniformly distributed directions, radius uniform in the shell
fn generate_stars(count: u32, seed: u64) -> Vec<Star> {
    let mut rng = Pcg64Mcg::seed_from_u64(seed ^ 0x5747_4152);
    (0..count)
        .map(|_| {
            let y: f32 = rng.random_range(-1.0..1.0);
            let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let ring = (1.0 - y * y).sqrt();
            let dir = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
            let radius = STAR_SHELL_RADIUS + rng.random_range(0.0..STAR_SHELL_DEPTH);
            let brightness = rng.random_range(0.4..1.0);
            Star {
                position: (dir * radius).extend(brightness).to_array(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_lie_in_shell() {
        let mut field = StarField::new();
        let stars = field.update(2000, 9);
        assert_eq!(stars.len(), 2000);
        for star in stars {
            let r = Vec3::from_slice(&star.position[..3]).length();
            assert!(
                (STAR_SHELL_RADIUS - 1e-2..=STAR_SHELL_RADIUS + STAR_SHELL_DEPTH + 1e-2)
                    .contains(&r),
                "radius {}",
                r
            );
        }
    }

    #[test]
    fn test_star_field_is_memoized() {
        let mut field = StarField::new();
        let first = field.update(100, 1).to_vec();
        let rev = field.revision();

        assert_eq!(field.update(100, 1), first.as_slice());
        assert_eq!(field.revision(), rev, "same key must not rebuild");

        field.update(100, 2);
        assert_eq!(field.revision(), rev + 1);
        assert_ne!(field.stars(), first.as_slice());
    }

    #[test]
    fn test_zero_stars() {
        let mut field = StarField::new();
        assert!(field.update(0, 3).is_empty());
    }
}
