//! One render pass object per engine layer.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::buffers::{grid_vertex_layout, sync_mesh, GpuMesh, InstanceBuffer};
use super::pipeline::{create_layer_pipeline, guarded, Blend, PipelineSpec};
use super::shaders;
use crate::clouds::{CloudInstanceRaw, CloudUniforms};
use crate::environment::{Environment, FramePlan, Layer};
use crate::error::LayerError;
use crate::ocean::OceanUniforms;
use crate::sky::{SkyUniforms, Star, StarUniforms};
use crate::terrain::TerrainUniforms;

/// Corners of the box [-0.5, 0.5]^3, indexed by x | y << 1 | z << 2
pub(crate) const UNIT_CUBE_CORNERS: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
];

/// Counter-clockwise seen from outside
pub(crate) const UNIT_CUBE_INDICES: [u16; 36] = [
    1, 3, 7, 1, 7, 5, // +X
    0, 4, 6, 0, 6, 2, // -X
    2, 6, 7, 2, 7, 3, // +Y
    0, 1, 5, 0, 5, 4, // -Y
    4, 5, 7, 4, 7, 6, // +Z
    0, 2, 3, 0, 3, 1, // -Z
];

/// Pipeline, uniform buffer and bind group common to every layer
pub(crate) struct LayerPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl LayerPass {
    fn new<U: Pod>(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        layer: Layer,
        spec: PipelineSpec<'_>,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        guarded(device, layer, || {
            let built = create_layer_pipeline(device, color_format, &spec);

            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{} Uniform Buffer", spec.label)),
                size: std::mem::size_of::<U>() as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let mut entries = vec![wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }];
            if spec.uses_noise {
                entries.push(wgpu::BindGroupEntry {
                    binding: 1,
                    resource: perm_buffer.as_entire_binding(),
                });
            }

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", spec.label)),
                layout: &built.bind_group_layout,
                entries: &entries,
            });

            Self {
                pipeline: built.pipeline,
                uniform_buffer,
                bind_group,
            }
        })
    }

    fn write_uniforms<U: Pod>(&self, queue: &wgpu::Queue, uniforms: &U) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
    }
}

/// Gradient backdrop and sun disc
pub(crate) struct SkyPass {
    base: LayerPass,
}

impl SkyPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        let spec = PipelineSpec {
            label: "Sky",
            source: shaders::SKY,
            vertex_buffers: &[],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            blend: Blend::Opaque,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::Always,
            uses_noise: false,
        };
        let base =
            LayerPass::new::<SkyUniforms>(device, color_format, Layer::Sky, spec, perm_buffer)?;
        Ok(Self { base })
    }

    pub fn prepare(&self, queue: &wgpu::Queue, uniforms: &SkyUniforms) {
        self.base.write_uniforms(queue, uniforms);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.base.bind(pass);
        pass.draw(0..3, 0..1); // Fullscreen triangle
    }
}

/// Camera-facing star quads, added on top of the sky
pub(crate) struct StarPass {
    base: LayerPass,
    instances: InstanceBuffer,
    revision: Option<u64>,
}

const STAR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

impl StarPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Star>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &STAR_ATTRIBUTES,
        }];
        let spec = PipelineSpec {
            label: "Stars",
            source: shaders::STARS,
            vertex_buffers: &buffers,
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            cull_mode: None,
            blend: Blend::Additive,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            uses_noise: false,
        };
        let base =
            LayerPass::new::<StarUniforms>(device, color_format, Layer::Sky, spec, perm_buffer)?;
        Ok(Self {
            base,
            instances: InstanceBuffer::new(device, "Star Instance Buffer", 0),
            revision: None,
        })
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniforms: &StarUniforms,
        stars: &[Star],
        revision: u64,
    ) {
        self.base.write_uniforms(queue, uniforms);
        if self.revision != Some(revision) {
            self.instances.write(device, queue, stars);
            self.revision = Some(revision);
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instances.is_empty() {
            return;
        }
        self.base.bind(pass);
        pass.set_vertex_buffer(0, self.instances.slice());
        pass.draw(0..4, 0..self.instances.len());
    }
}

/// Instanced boxes raymarched in the fragment shader
pub(crate) struct CloudPass {
    base: LayerPass,
    cube_vertices: wgpu::Buffer,
    cube_indices: wgpu::Buffer,
    instances: InstanceBuffer,
}

const CUBE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const CLOUD_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![1 => Float32x4, 2 => Float32x4];

impl CloudPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &CUBE_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CloudInstanceRaw>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &CLOUD_INSTANCE_ATTRIBUTES,
            },
        ];
        // Back faces only, so the march still runs with the camera inside a puff
        let spec = PipelineSpec {
            label: "Clouds",
            source: shaders::CLOUDS,
            vertex_buffers: &buffers,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Front),
            blend: Blend::Premultiplied,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            uses_noise: true,
        };
        let base = LayerPass::new::<CloudUniforms>(
            device,
            color_format,
            Layer::Clouds,
            spec,
            perm_buffer,
        )?;

        let cube_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&UNIT_CUBE_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cloud Cube Index Buffer"),
            contents: bytemuck::cast_slice(&UNIT_CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            base,
            cube_vertices,
            cube_indices,
            instances: InstanceBuffer::new(device, "Cloud Instance Buffer", 0),
        })
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniforms: &CloudUniforms,
        instances: &[CloudInstanceRaw],
    ) {
        self.base.write_uniforms(queue, uniforms);
        // Drift moves every puff each frame
        self.instances.write(device, queue, instances);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instances.is_empty() {
            return;
        }
        self.base.bind(pass);
        pass.set_vertex_buffer(0, self.cube_vertices.slice(..));
        pass.set_vertex_buffer(1, self.instances.slice());
        pass.set_index_buffer(self.cube_indices.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..UNIT_CUBE_INDICES.len() as u32, 0, 0..self.instances.len());
    }
}

/// Opaque heightfield
pub(crate) struct TerrainPass {
    base: LayerPass,
    mesh: Option<GpuMesh>,
}

impl TerrainPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        let buffers = [grid_vertex_layout()];
        let spec = PipelineSpec {
            label: "Terrain",
            source: shaders::TERRAIN,
            vertex_buffers: &buffers,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            blend: Blend::Opaque,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
            uses_noise: false,
        };
        let base = LayerPass::new::<TerrainUniforms>(
            device,
            color_format,
            Layer::Terrain,
            spec,
            perm_buffer,
        )?;
        Ok(Self { base, mesh: None })
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        env: &Environment,
        uniforms: &TerrainUniforms,
        revision: u64,
    ) {
        self.base.write_uniforms(queue, uniforms);
        sync_mesh(&mut self.mesh, device, "Terrain", env.terrain_mesh(), revision);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(mesh) = &self.mesh {
            self.base.bind(pass);
            mesh.draw(pass);
        }
    }
}

/// Translucent Gerstner surface
pub(crate) struct OceanPass {
    base: LayerPass,
    mesh: Option<GpuMesh>,
}

impl OceanPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
    ) -> Result<Self, LayerError> {
        let buffers = [grid_vertex_layout()];
        let spec = PipelineSpec {
            label: "Ocean",
            source: shaders::OCEAN,
            vertex_buffers: &buffers,
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            blend: Blend::Alpha,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::Less,
            uses_noise: true,
        };
        let base =
            LayerPass::new::<OceanUniforms>(device, color_format, Layer::Ocean, spec, perm_buffer)?;
        Ok(Self { base, mesh: None })
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        env: &Environment,
        uniforms: &OceanUniforms,
        revision: u64,
    ) {
        self.base.write_uniforms(queue, uniforms);
        sync_mesh(&mut self.mesh, device, "Ocean", env.ocean_plane(), revision);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(mesh) = &self.mesh {
            self.base.bind(pass);
            mesh.draw(pass);
        }
    }
}

fn keep<T>(result: Result<T, LayerError>, errors: &mut Vec<LayerError>) -> Option<T> {
    match result {
        Ok(pass) => Some(pass),
        Err(err) => {
            log::warn!("{}", err);
            errors.push(err);
            None
        }
    }
}

/// Every engine pass, `None` where the pipeline failed to build
pub(crate) struct LayerPasses {
    pub sky: Option<SkyPass>,
    pub stars: Option<StarPass>,
    pub clouds: Option<CloudPass>,
    pub terrain: Option<TerrainPass>,
    pub ocean: Option<OceanPass>,
}

impl LayerPasses {
    /// Build all passes; failures are collected instead of aborting the rest
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        perm_buffer: &wgpu::Buffer,
        errors: &mut Vec<LayerError>,
    ) -> Self {
        Self {
            sky: keep(SkyPass::new(device, color_format, perm_buffer), errors),
            stars: keep(StarPass::new(device, color_format, perm_buffer), errors),
            clouds: keep(CloudPass::new(device, color_format, perm_buffer), errors),
            terrain: keep(TerrainPass::new(device, color_format, perm_buffer), errors),
            ocean: keep(OceanPass::new(device, color_format, perm_buffer), errors),
        }
    }

    /// Upload this frame's uniforms and any geometry whose revision changed
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        env: &Environment,
        plan: &FramePlan,
    ) {
        if let (Some(pass), Some(uniforms)) = (&self.sky, &plan.sky) {
            pass.prepare(queue, uniforms);
        }
        if let (Some(pass), Some(draw)) = (&mut self.stars, &plan.stars) {
            pass.prepare(device, queue, &draw.uniforms, env.stars(), draw.revision);
        }
        if let (Some(pass), Some(draw)) = (&mut self.clouds, &plan.clouds) {
            pass.prepare(device, queue, &draw.uniforms, &draw.instances);
        }
        if let (Some(pass), Some(draw)) = (&mut self.terrain, &plan.terrain) {
            pass.prepare(device, queue, env, &draw.uniforms, draw.revision);
        }
        if let (Some(pass), Some(draw)) = (&mut self.ocean, &plan.ocean) {
            pass.prepare(device, queue, env, &draw.uniforms, draw.plane_revision);
        }
    }

    /// Draw one engine layer if the plan includes it and its pipeline exists
    pub fn draw(&self, layer: Layer, plan: &FramePlan, pass: &mut wgpu::RenderPass<'_>) {
        match layer {
            Layer::Sky => {
                if let Some(sky) = &self.sky {
                    sky.draw(pass);
                }
                if let (Some(stars), Some(_)) = (&self.stars, &plan.stars) {
                    stars.draw(pass);
                }
            }
            Layer::Clouds => {
                if let Some(clouds) = &self.clouds {
                    clouds.draw(pass);
                }
            }
            Layer::Terrain => {
                if let Some(terrain) = &self.terrain {
                    terrain.draw(pass);
                }
            }
            Layer::Ocean => {
                if let Some(ocean) = &self.ocean {
                    ocean.draw(pass);
                }
            }
            Layer::Weather | Layer::Models => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_unit_cube_faces_point_outward() {
        for tri in UNIT_CUBE_INDICES.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(UNIT_CUBE_CORNERS[i as usize]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {:?} faces inward", tri);
        }
    }

    #[test]
    fn test_unit_cube_matches_march_box() {
        for corner in UNIT_CUBE_CORNERS {
            assert!(corner.iter().all(|c| c.abs() == 0.5));
        }
        let mut used = [false; 8];
        for i in UNIT_CUBE_INDICES {
            used[i as usize] = true;
        }
        assert!(used.iter().all(|&u| u));
    }
}
