//! Memoized terrain mesh: rebuilt only when footprint, elevation, type or seed change.

use super::heightfield::build_heightfield;
use crate::mesh::GridMesh;
use crate::noise::NoiseField;
use crate::params::{TerrainSettings, TerrainType};

/// Inputs the mesh depends on; colour and grid toggles only touch uniforms
#[derive(Debug, Clone, Copy, PartialEq)]
struct TerrainKey {
    footprint: f32,
    elevation: f32,
    terrain_type: TerrainType,
    seed: u64,
}

/// Terrain layer state
#[derive(Debug, Default)]
pub struct TerrainSystem {
    key: Option<TerrainKey>,
    mesh: Option<GridMesh>,
    revision: u64,
}

impl TerrainSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the cached mesh in line with `settings`; `None` when the layer is off
    pub fn update(
        &mut self,
        settings: &TerrainSettings,
        footprint: f32,
        noise: &NoiseField,
    ) -> Option<&GridMesh> {
        let key = TerrainKey {
            footprint,
            elevation: settings.elevation,
            terrain_type: settings.terrain_type,
            seed: noise.seed(),
        };

        if self.key != Some(key) {
            log::debug!(
                "Rebuilding terrain: type={:?} elevation={} footprint={}",
                key.terrain_type,
                key.elevation,
                key.footprint
            );
            self.mesh = build_heightfield(settings, footprint, noise);
            self.key = Some(key);
            self.revision += 1;
        }

        self.mesh.as_ref()
    }

    pub fn mesh(&self) -> Option<&GridMesh> {
        self.mesh.as_ref()
    }

    /// Bumped on every rebuild so GPU buffers know when to re-upload
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_only_on_key_change() {
        let noise = NoiseField::new(3);
        let mut system = TerrainSystem::new();
        let mut settings = TerrainSettings::default();

        assert!(system.update(&settings, 60.0, &noise).is_some());
        assert_eq!(system.revision(), 1);

        // Colour and grid visibility do not touch the mesh
        settings.color = [1.0, 0.0, 0.0];
        settings.hide_grid = true;
        system.update(&settings, 60.0, &noise);
        assert_eq!(system.revision(), 1);

        settings.elevation = 0.9;
        system.update(&settings, 60.0, &noise);
        assert_eq!(system.revision(), 2);

        system.update(&settings, 80.0, &noise);
        assert_eq!(system.revision(), 3);

        system.update(&settings, 80.0, &NoiseField::new(4));
        assert_eq!(system.revision(), 4);
    }

    #[test]
    fn test_switching_to_none_drops_mesh() {
        let noise = NoiseField::new(3);
        let mut system = TerrainSystem::new();
        let mut settings = TerrainSettings::default();
        system.update(&settings, 60.0, &noise);

        settings.terrain_type = TerrainType::None;
        assert!(system.update(&settings, 60.0, &noise).is_none());
        assert!(system.mesh().is_none());
    }
}
