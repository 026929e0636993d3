//! Static ocean base plane, rebuilt only when the scene footprint changes.

use crate::mesh::GridMesh;

/// Quads per side of the ocean base plane
pub const OCEAN_SEGMENTS: usize = 160;

/// Ocean layer state
#[derive(Debug, Default)]
pub struct OceanSystem {
    plane: Option<(f32, GridMesh)>,
    revision: u64,
}

impl OceanSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat plane covering `footprint`; water settings never touch it
    pub fn plane(&mut self, footprint: f32) -> &GridMesh {
        let stale = !matches!(&self.plane, Some((built_for, _)) if *built_for == footprint);
        if stale {
            log::debug!("Rebuilding ocean plane: footprint={}", footprint);
            self.revision += 1;
        }
        let (_, mesh) = match self.plane.take() {
            Some(entry) if !stale => self.plane.insert(entry),
            _ => self
                .plane
                .insert((footprint, GridMesh::flat(footprint, OCEAN_SEGMENTS))),
        };
        mesh
    }

    /// Plane built by the last `plane` call, if any
    pub fn current(&self) -> Option<&GridMesh> {
        self.plane.as_ref().map(|(_, mesh)| mesh)
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
    fn test_plane_is_flat_and_reused() {
        let mut system = OceanSystem::new();
        let plane = system.plane(60.0);
        assert_eq!(plane.segments(), OCEAN_SEGMENTS);
        assert!(plane.vertices.iter().all(|v| v.position[1] == 0.0));
        assert_eq!(system.revision(), 1);

        system.plane(60.0);
        assert_eq!(system.revision(), 1, "same footprint must not rebuild");

        let bigger = system.plane(120.0);
        assert_eq!(bigger.vertices[0].position[0], -60.0);
        assert_eq!(system.revision(), 2);
        assert!(system.current().is_some());
    }
}
