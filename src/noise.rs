//! Seeded gradient and value noise shared by the terrain, ocean and cloud layers.
//!
//! One permutation table drives everything:
//! - `noise2` / `fbm2`: 2D simplex noise (terrain relief, ocean caustics)
//! - `noise3` / `fbm3`: 3D value noise (cloud density)
//!
//! The table is a pure function of the seed, so identical seeds give identical
//! terrain and clouds. The same table is uploaded to the GPU (see `rendering`)
//! and the WGSL versions in `shaders/noise.wgsl` must stay in lockstep with this file.

use glam::{Mat3, Vec3};
use noise::NoiseFn;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Entries in the doubled permutation lookup
pub const PERM_LEN: usize = 512;

/// Skew factor into the simplex grid: (sqrt(3) - 1) / 2
const F2: f32 = 0.366_025_42;
/// Unskew factor back to input space: (3 - sqrt(3)) / 6
const G2: f32 = 0.211_324_87;
/// Brings the summed corner contributions to roughly [-1, 1]
const SIMPLEX2_SCALE: f32 = 70.0;

const GRAD2: [[f32; 2]; 8] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

const FBM2_OCTAVES: usize = 4;
const FBM2_GAIN: f32 = 0.5;
const FBM2_LACUNARITY: f32 = 2.0;

const FBM3_OCTAVES: usize = 5;
const FBM3_GAIN: f32 = 0.45;
const FBM3_LACUNARITY: f32 = 2.1;

/// Orthonormal rotation applied between fbm3 octaves to break up axis-aligned lattice artifacts
const FBM3_ROTATION: Mat3 = Mat3::from_cols_array(&[
    0.00, -0.80, -0.60, //
    0.80, 0.36, -0.48, //
    0.60, -0.48, 0.64,
]);

/// Seeded noise generator
#[derive(Clone)]
pub struct NoiseField {
    seed: u64,
    perm: [u32; PERM_LEN],
}

impl NoiseField {
    /// Build the permutation table: shuffle 0..256 and repeat it twice
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u32> = (0..256).collect();
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u32; PERM_LEN];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }

        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Doubled permutation table, as uploaded to the GPU
    pub fn permutation(&self) -> &[u32; PERM_LEN] {
        &self.perm
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    /// 2D simplex noise in [-1, 1]
    ///
    /// The scaled corner sum peaks just under 1; the clamp only guards float error.
    pub fn noise2(&self, x: f32, y: f32) -> f32 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Which triangle of the skewed cell we are in
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f32 + G2;
        let y1 = y0 - j1 as f32 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i32 & 255) as usize;
        let jj = (j as i32 & 255) as usize;
        let gi0 = self.p(ii + self.p(jj)) % 8;
        let gi1 = self.p(ii + i1 + self.p(jj + j1)) % 8;
        let gi2 = self.p(ii + 1 + self.p(jj + 1)) % 8;

        let n0 = corner2(GRAD2[gi0], x0, y0);
        let n1 = corner2(GRAD2[gi1], x1, y1);
        let n2 = corner2(GRAD2[gi2], x2, y2);

        (SIMPLEX2_SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Lattice value in [0, 1] at an integer corner
    #[inline]
    fn lattice3(&self, x: i32, y: i32, z: i32) -> f32 {
        let xi = (x & 255) as usize;
        let yi = (y & 255) as usize;
        let zi = (z & 255) as usize;
        self.p(self.p(self.p(xi) + yi) + zi) as f32 / 255.0
    }

    /// Unsigned trilinear value noise in [0, 1]
    fn value3(&self, x: f32, y: f32, z: f32) -> f32 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let (xi, yi, zi) = (xf as i32, yf as i32, zf as i32);
        let u = fade(x - xf);
        let v = fade(y - yf);
        let w = fade(z - zf);

        let c000 = self.lattice3(xi, yi, zi);
        let c100 = self.lattice3(xi + 1, yi, zi);
        let c010 = self.lattice3(xi, yi + 1, zi);
        let c110 = self.lattice3(xi + 1, yi + 1, zi);
        let c001 = self.lattice3(xi, yi, zi + 1);
        let c101 = self.lattice3(xi + 1, yi, zi + 1);
        let c011 = self.lattice3(xi, yi + 1, zi + 1);
        let c111 = self.lattice3(xi + 1, yi + 1, zi + 1);

        let x00 = lerp(c000, c100, u);
        let x10 = lerp(c010, c110, u);
        let x01 = lerp(c001, c101, u);
        let x11 = lerp(c011, c111, u);
        lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
    }

    /// 3D value noise in [-1, 1]
    pub fn noise3(&self, x: f32, y: f32, z: f32) -> f32 {
        self.value3(x, y, z) * 2.0 - 1.0
    }

    /// Four octaves of `noise2`, normalized back to [-1, 1]
    pub fn fbm2(&self, x: f32, y: f32) -> f32 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..FBM2_OCTAVES {
            sum += amplitude * self.noise2(x * frequency, y * frequency);
            norm += amplitude;
            amplitude *= FBM2_GAIN;
            frequency *= FBM2_LACUNARITY;
        }
        sum / norm
    }

    /// Five octaves of unsigned value noise with a rotation between octaves.
    ///
    /// Returns a density-like value in [0, 1).
    pub fn fbm3(&self, p: Vec3) -> f32 {
        let mut p = p;
        let mut sum = 0.0;
        let mut amplitude = 0.5;
        for _ in 0..FBM3_OCTAVES {
            sum += amplitude * self.value3(p.x, p.y, p.z);
            p = FBM3_ROTATION * p * FBM3_LACUNARITY;
            amplitude *= FBM3_GAIN;
        }
        sum
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise2(point[0] as f32, point[1] as f32) as f64
    }
}

impl NoiseFn<f64, 3> for NoiseField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.noise3(point[0] as f32, point[1] as f32, point[2] as f32) as f64
    }
}

#[inline]
fn corner2(grad: [f32; 2], x: f32, y: f32) -> f32 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        0.0
    } else {
        let t2 = t * t;
        t2 * t2 * (grad[0] * x + grad[1] * y)
    }
}

/// Hermite fade, C1-continuous at lattice boundaries
#[inline]
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> impl Iterator<Item = (f32, f32)> {
        (-100..100).flat_map(|i| (-100..100).map(move |j| (i as f32 * 0.173, j as f32 * 0.291)))
    }

    #[test]
    fn test_permutation_is_doubled_shuffle() {
        let field = NoiseField::new(7);
        let perm = field.permutation();

        let mut first: Vec<u32> = perm[..256].to_vec();
        assert_eq!(&perm[..256], &perm[256..], "table must repeat");
        first.sort_unstable();
        assert_eq!(first, (0..256).collect::<Vec<u32>>(), "must be a permutation");
    }

    #[test]
    fn test_noise2_in_unit_range() {
        let field = NoiseField::new(42);
        for (x, y) in sample_grid() {
            let n = field.noise2(x, y);
            assert!((-1.0..=1.0).contains(&n), "noise2({}, {}) = {}", x, y, n);
        }
    }

    #[test]
    fn test_noise_is_deterministic() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for (x, y) in sample_grid().take(500) {
            assert_eq!(a.noise2(x, y), a.noise2(x, y));
            assert_eq!(a.noise2(x, y), b.noise2(x, y));
            assert_eq!(a.noise3(x, y, 0.5), b.noise3(x, y, 0.5));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differing = sample_grid()
            .take(500)
            .filter(|&(x, y)| a.noise2(x, y) != b.noise2(x, y))
            .count();
        assert!(differing > 400, "only {} samples differ", differing);
    }

    #[test]
    fn test_noise2_is_continuous() {
        let field = NoiseField::new(3);
        for (x, y) in sample_grid().take(2000) {
            let d = (field.noise2(x, y) - field.noise2(x + 1e-3, y + 1e-3)).abs();
            assert!(d < 0.05, "jump of {} at ({}, {})", d, x, y);
        }
    }

    #[test]
    fn test_noise2_zero_at_lattice_origin() {
        // All corner offsets vanish at the skewed cell origin except the first, whose dot is 0
        let field = NoiseField::new(9);
        assert_eq!(field.noise2(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_negative_and_large_inputs_wrap() {
        let field = NoiseField::new(11);
        for &(x, y) in &[(-1e4, 3.5), (1e5, -2e4), (-0.25, -0.75)] {
            let n = field.noise2(x, y);
            assert!(n.is_finite() && (-1.0..=1.0).contains(&n));
            let v = field.noise3(x, y, -x);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_noise3_range_and_continuity() {
        let field = NoiseField::new(5);
        for (x, y) in sample_grid().take(4000) {
            let z = x * 0.5 - y;
            let n = field.noise3(x, y, z);
            assert!((-1.0..=1.0).contains(&n));
            let d = (n - field.noise3(x + 1e-3, y, z)).abs();
            assert!(d < 0.05);
        }
    }

    #[test]
    fn test_fbm_ranges() {
        let field = NoiseField::new(77);
        for (x, y) in sample_grid().take(4000) {
            let f2 = field.fbm2(x, y);
            assert!((-1.0..=1.0).contains(&f2), "fbm2 = {}", f2);

            let f3 = field.fbm3(Vec3::new(x, y, x + y));
            assert!((0.0..1.0).contains(&f3), "fbm3 = {}", f3);
        }
    }

    #[test]
    fn test_fbm3_rotation_is_orthonormal() {
        let m = FBM3_ROTATION;
        let product = m * m.transpose();
        assert!(product.abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_noise_fn_matches_direct_calls() {
        let field = NoiseField::new(21);
        let via_trait: f64 = NoiseFn::<f64, 2>::get(&field, [1.25, -3.5]);
        assert_eq!(via_trait as f32, field.noise2(1.25, -3.5));

        let via_trait3: f64 = NoiseFn::<f64, 3>::get(&field, [0.3, 0.6, 0.9]);
        assert_eq!(via_trait3 as f32, field.noise3(0.3, 0.6, 0.9));
    }
}
