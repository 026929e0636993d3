//! Per-frame composition of the four environment layers.
//!
//! `Environment` owns every memoized resource (noise table, terrain mesh, ocean
//! plane, cloud placement, stars). Each frame it turns a settings snapshot and
//! the host's camera/time into an immutable `FramePlan`: the ordered layer list
//! plus the uniform values every layer needs. Disabled layers never reach the
//! plan, so no geometry or shader work is issued for them.

use glam::{Mat4, Vec3};

use crate::clouds::{CloudInstance, CloudInstanceRaw, CloudParams, CloudSystem, CloudUniforms};
use crate::mesh::GridMesh;
use crate::noise::NoiseField;
use crate::ocean::{OceanParams, OceanSystem, OceanUniforms};
use crate::params::SceneSnapshot;
use crate::sky::{SkyPalette, SkyUniforms, Star, StarField, StarUniforms, SunState};
use crate::terrain::{TerrainSystem, TerrainUniforms};

/// Render layers in their fixed composition order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Sky,
    Clouds,
    Terrain,
    Ocean,
    /// Weather particles and light shafts, drawn by the host
    Weather,
    /// Placed models, drawn by the host
    Models,
}

impl Layer {
    /// Back-to-front order; transparency blending depends on it
    pub const ORDER: [Layer; 6] = [
        Layer::Sky,
        Layer::Clouds,
        Layer::Terrain,
        Layer::Ocean,
        Layer::Weather,
        Layer::Models,
    ];

    /// Drawn by host-supplied passes rather than the engine
    pub fn is_external(self) -> bool {
        matches!(self, Layer::Weather | Layer::Models)
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::Sky => "sky",
            Layer::Clouds => "clouds",
            Layer::Terrain => "terrain",
            Layer::Ocean => "ocean",
            Layer::Weather => "weather",
            Layer::Models => "models",
        }
    }
}

/// Broadcast inputs supplied by the host render loop every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    pub time_s: f32,
    pub view_proj: Mat4,
    pub camera_pos: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct StarDraw {
    pub uniforms: StarUniforms,
    pub count: u32,
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct CloudDraw {
    pub params: CloudParams,
    pub uniforms: CloudUniforms,
    pub instances: Vec<CloudInstanceRaw>,
}

#[derive(Debug, Clone, Copy)]
pub struct TerrainDraw {
    pub uniforms: TerrainUniforms,
    pub revision: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct OceanDraw {
    pub params: OceanParams,
    pub uniforms: OceanUniforms,
    pub plane_revision: u64,
}

/// Everything the renderer needs for one frame; never mutated after creation
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub time_s: f32,
    pub sun: SunState,
    pub palette: SkyPalette,
    pub noise_seed: u64,
    pub sky: Option<SkyUniforms>,
    pub stars: Option<StarDraw>,
    pub clouds: Option<CloudDraw>,
    pub terrain: Option<TerrainDraw>,
    pub ocean: Option<OceanDraw>,
}

impl FramePlan {
    /// Layers to draw this frame, in composition order
    pub fn layers(&self) -> Vec<Layer> {
        Layer::ORDER
            .into_iter()
            .filter(|layer| match layer {
                Layer::Sky => self.sky.is_some(),
                Layer::Clouds => self.clouds.is_some(),
                Layer::Terrain => self.terrain.is_some(),
                Layer::Ocean => self.ocean.is_some(),
                Layer::Weather | Layer::Models => true,
            })
            .collect()
    }
}

/// Procedural environment engine
pub struct Environment {
    noise: NoiseField,
    terrain: TerrainSystem,
    ocean: OceanSystem,
    clouds: CloudSystem,
    stars: StarField,
}

impl Environment {
    pub fn new(seed: u64) -> Self {
        Self {
            noise: NoiseField::new(seed),
            terrain: TerrainSystem::new(),
            ocean: OceanSystem::new(),
            clouds: CloudSystem::new(),
            stars: StarField::new(),
        }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn terrain_mesh(&self) -> Option<&GridMesh> {
        self.terrain.mesh()
    }

    pub fn ocean_plane(&self) -> Option<&GridMesh> {
        self.ocean.current()
    }

    pub fn stars(&self) -> &[Star] {
        self.stars.stars()
    }

    pub fn cloud_instances(&self) -> &[CloudInstance] {
        self.clouds.instances()
    }

    /// Refresh memoized geometry and build this frame's plan
    pub fn prepare_frame(&mut self, snapshot: &SceneSnapshot, inputs: &FrameInputs) -> FramePlan {
        if snapshot.seed != self.noise.seed() {
            log::debug!("Reseeding noise: {}", snapshot.seed);
            self.noise = NoiseField::new(snapshot.seed);
        }

        let sun = SunState::from_settings(&snapshot.sky);
        let palette = SkyPalette::for_sun(&sun);
        let footprint = snapshot.box_size;

        let (sky, stars) = if snapshot.sky.enabled {
            let sky = SkyUniforms::new(inputs.view_proj, inputs.camera_pos, &sun, &palette);
            let stars = if snapshot.sky.stars && snapshot.sky.star_count > 0 {
                let count = self.stars.update(snapshot.sky.star_count, snapshot.seed).len() as u32;
                Some(StarDraw {
                    uniforms: StarUniforms::new(inputs.view_proj, inputs.camera_pos, &palette),
                    count,
                    revision: self.stars.revision(),
                })
            } else {
                None
            };
            (Some(sky), stars)
        } else {
            (None, None)
        };

        let clouds = if snapshot.clouds.enabled && snapshot.clouds.count > 0 {
            self.clouds.update(&snapshot.clouds, footprint, snapshot.seed);
            let params = CloudParams::new(&snapshot.clouds, inputs.time_s, &sun, &palette);
            Some(CloudDraw {
                params,
                uniforms: params.uniforms(inputs.view_proj, inputs.camera_pos),
                instances: self.clouds.frame_instances(&snapshot.clouds, inputs.time_s),
            })
        } else {
            self.clouds.clear();
            None
        };

        // Always consulted so a switch to `None` also drops the cached mesh
        let has_terrain = self
            .terrain
            .update(&snapshot.terrain, footprint, &self.noise)
            .is_some();
        let terrain = has_terrain.then(|| TerrainDraw {
            uniforms: TerrainUniforms::new(inputs.view_proj, &snapshot.terrain, &sun, &palette),
            revision: self.terrain.revision(),
        });

        let ocean = if snapshot.water.enabled {
            self.ocean.plane(footprint);
            let params = OceanParams::new(&snapshot.water, inputs.time_s, &sun, &palette);
            Some(OceanDraw {
                params,
                uniforms: params.uniforms(inputs.view_proj, inputs.camera_pos),
                plane_revision: self.ocean.revision(),
            })
        } else {
            None
        };

        FramePlan {
            time_s: inputs.time_s,
            sun,
            palette,
            noise_seed: self.noise.seed(),
            sky,
            stars,
            clouds,
            terrain,
            ocean,
        }
    }
}
