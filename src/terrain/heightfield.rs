//! Heightfield sampling and mesh construction.

use crate::mesh::GridMesh;
use crate::noise::NoiseField;
use crate::params::TerrainSettings;

/// Quads per side of the terrain grid
pub const TERRAIN_SEGMENTS: usize = 128;

/// Peak height at `elevation = 1` (world units)
pub const MAX_RELIEF: f32 = 15.0;

/// (spatial frequency, relative amplitude) per octave
const OCTAVES: [(f32, f32); 3] = [(0.02, 1.0), (0.05, 0.4), (0.12, 0.15)];

/// Terrain height at a ground-plane position, in [0, elevation * MAX_RELIEF]
///
/// The raw octave sum is scaled by `elevation * MAX_RELIEF`, then clamped so the
/// ground never dips below the base plane or overshoots the peak.
pub fn terrain_height(noise: &NoiseField, x: f32, z: f32, elevation: f32) -> f32 {
    let sum: f32 = OCTAVES
        .iter()
        .map(|&(frequency, amplitude)| noise.noise2(x * frequency, z * frequency) * amplitude)
        .sum();
    let height = sum * elevation * MAX_RELIEF;
    height.clamp(0.0, elevation.max(0.0) * MAX_RELIEF)
}

/// Displace a flat `footprint`-sized grid into terrain; `None` when the layer is off
pub fn build_heightfield(
    settings: &TerrainSettings,
    footprint: f32,
    noise: &NoiseField,
) -> Option<GridMesh> {
    if !settings.is_enabled() {
        return None;
    }

    let mut mesh = GridMesh::flat(footprint, TERRAIN_SEGMENTS);
    for vertex in &mut mesh.vertices {
        let [x, _, z] = vertex.position;
        vertex.position[1] = terrain_height(noise, x, z, settings.elevation);
    }
    mesh.recompute_normals();

    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TerrainType;
    use glam::Vec3;

    fn settings(terrain_type: TerrainType, elevation: f32) -> TerrainSettings {
        TerrainSettings {
            terrain_type,
            elevation,
            ..Default::default()
        }
    }

    #[test]
    fn test_none_builds_nothing() {
        let noise = NoiseField::new(1);
        assert!(build_heightfield(&settings(TerrainType::None, 0.8), 60.0, &noise).is_none());
    }

    #[test]
    fn test_snow_heights_within_bounds() {
        let noise = NoiseField::new(2024);
        let mesh = build_heightfield(&settings(TerrainType::Snow, 0.5), 60.0, &noise).unwrap();

        assert_eq!(mesh.segments(), TERRAIN_SEGMENTS);
        for v in &mesh.vertices {
            let h = v.position[1];
            assert!((0.0..=7.5).contains(&h), "height {} out of [0, 7.5]", h);
        }
    }

    #[test]
    fn test_heights_non_negative_for_all_elevations() {
        let noise = NoiseField::new(5);
        for step in 0..=10 {
            let elevation = step as f32 / 10.0;
            for i in 0..40 {
                for j in 0..40 {
                    let (x, z) = (i as f32 * 3.7 - 70.0, j as f32 * 2.9 - 60.0);
                    let h = terrain_height(&noise, x, z, elevation);
                    assert!(h >= 0.0 && h <= elevation * MAX_RELIEF);
                }
            }
        }
    }

    #[test]
    fn test_relief_is_not_rescaled() {
        let noise = NoiseField::new(2024);
        let mut unclamped = 0;
        for i in 0..64 {
            for j in 0..64 {
                let (x, z) = (i as f32 * 3.1 - 100.0, j as f32 * 3.1 - 100.0);
                let raw: f32 = OCTAVES
                    .iter()
                    .map(|&(f, a)| noise.noise2(x * f, z * f) * a)
                    .sum();
                let h = terrain_height(&noise, x, z, 1.0);
                if raw > 0.0 && raw < 1.0 {
                    assert!((h - raw * MAX_RELIEF).abs() < 1e-4, "{} vs {}", h, raw);
                    unclamped += 1;
                }
            }
        }
        assert!(unclamped > 100);
    }

    #[test]
    fn test_zero_elevation_is_flat() {
        let noise = NoiseField::new(77);
        let mesh = build_heightfield(&settings(TerrainType::Rocky, 0.0), 100.0, &noise).unwrap();
        for v in &mesh.vertices {
            assert_eq!(v.position[1], 0.0);
            assert!(Vec3::from_array(v.normal).abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn test_relief_produces_varied_heights_and_normals() {
        let noise = NoiseField::new(8);
        let mesh = build_heightfield(&settings(TerrainType::Grass, 1.0), 200.0, &noise).unwrap();

        let raised = mesh.vertices.iter().filter(|v| v.position[1] > 0.5).count();
        assert!(raised > 100, "only {} raised vertices", raised);

        let tilted = mesh.vertices.iter().filter(|v| v.normal[1] < 0.999).count();
        assert!(tilted > 100, "normals were not recomputed");
    }
}
