//! Memoized cloud placement plus per-frame drifted transforms.

use super::instances::{place_instances, CloudInstance};
use super::CloudInstanceRaw;
use crate::params::CloudSettings;

/// Inputs the placement depends on; everything else is applied per frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlacementKey {
    count: u32,
    spread: f32,
    footprint: f32,
    seed: u64,
}

/// Cloud layer state
#[derive(Debug, Default)]
pub struct CloudSystem {
    key: Option<PlacementKey>,
    instances: Vec<CloudInstance>,
    revision: u64,
}

impl CloudSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-place the puffs if count, spread, footprint or seed changed
    pub fn update(
        &mut self,
        settings: &CloudSettings,
        footprint: f32,
        seed: u64,
    ) -> &[CloudInstance] {
        let key = PlacementKey {
            count: settings.count,
            spread: settings.spread,
            footprint,
            seed,
        };

        if self.key != Some(key) {
            log::debug!(
                "Placing clouds: count={} spread={} footprint={}",
                key.count,
                key.spread,
                key.footprint
            );
            self.instances = place_instances(key.count, key.spread, key.footprint, key.seed);
            self.key = Some(key);
            self.revision += 1;
        }

        &self.instances
    }

    /// Drop placement while the layer is off or empty
    pub fn clear(&mut self) {
        if self.key.take().is_some() {
            self.instances.clear();
            self.revision += 1;
        }
    }

    pub fn instances(&self) -> &[CloudInstance] {
        &self.instances
    }

    /// Bumped on every re-placement
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drifted, scaled transforms for this frame
    pub fn frame_instances(&self, settings: &CloudSettings, time_s: f32) -> Vec<CloudInstanceRaw> {
        self.instances
            .iter()
            .map(|inst| CloudInstanceRaw {
                center: inst.position_at(time_s, settings).extend(1.0).to_array(),
                scale: inst.scale(settings).extend(0.0).to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_memoized_on_key() {
        let mut system = CloudSystem::new();
        let mut settings = CloudSettings::default();

        let first = system.update(&settings, 200.0, 1).to_vec();
        assert_eq!(first.len(), settings.count as usize);
        assert_eq!(system.revision(), 1);

        // Per-frame properties do not re-place
        settings.altitude = 90.0;
        settings.opacity = 0.1;
        settings.scale = 3.0;
        settings.speed = 4.0;
        assert_eq!(system.update(&settings, 200.0, 1), first.as_slice());
        assert_eq!(system.revision(), 1);

        settings.count = 3;
        assert_eq!(system.update(&settings, 200.0, 1).len(), 3);
        assert_eq!(system.revision(), 2);

        system.update(&settings, 150.0, 1);
        assert_eq!(system.revision(), 3);
    }

    #[test]
    fn test_frame_instances_follow_settings() {
        let mut system = CloudSystem::new();
        let settings = CloudSettings {
            altitude: 55.0,
            scale: 0.5,
            ..Default::default()
        };
        system.update(&settings, 100.0, 7);

        let raw = system.frame_instances(&settings, 10.0);
        assert_eq!(raw.len(), system.instances().len());
        for (r, inst) in raw.iter().zip(system.instances()) {
            assert_eq!(r.center[1], 55.0 + inst.altitude_offset);
            assert_eq!(r.scale[0], inst.size.x * 0.5);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut system = CloudSystem::new();
        let settings = CloudSettings {
            count: 0,
            ..Default::default()
        };
        assert!(system.update(&settings, 200.0, 1).is_empty());
        assert!(system.frame_instances(&settings, 1.0).is_empty());
    }

    #[test]
    fn test_clear_empties_cache() {
        let mut system = CloudSystem::new();
        let settings = CloudSettings::default();
        system.update(&settings, 200.0, 1);
        assert!(!system.instances().is_empty());

        system.clear();
        assert!(system.instances().is_empty());
        assert_eq!(system.revision(), 2);

        system.clear();
        assert_eq!(system.revision(), 2);

        assert_eq!(system.update(&settings, 200.0, 1).len(), settings.count as usize);
        assert_eq!(system.revision(), 3);
    }
}
