//! GPU-side copies of memoized CPU geometry.

use wgpu::util::DeviceExt;

use crate::mesh::{GridMesh, Vertex};

/// Vertex layout of `mesh::Vertex`: position, normal, uv
pub(crate) const GRID_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

pub(crate) fn grid_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &GRID_VERTEX_ATTRIBUTES,
    }
}

/// Uploaded grid mesh, tagged with the CPU revision it came from
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub revision: u64,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &GridMesh, revision: u64) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            revision,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Re-upload `mesh` when its revision moved past the one on the GPU
pub(crate) fn sync_mesh(
    slot: &mut Option<GpuMesh>,
    device: &wgpu::Device,
    label: &str,
    mesh: Option<&GridMesh>,
    revision: u64,
) {
    let stale = slot.as_ref().map(|m| m.revision) != Some(revision);
    if stale {
        *slot = mesh.map(|mesh| {
            log::debug!("Uploading {} mesh ({} vertices)", label, mesh.vertices.len());
            GpuMesh::upload(device, label, mesh, revision)
        });
    }
}

/// Per-instance vertex buffer that grows on demand
pub struct InstanceBuffer {
    label: String,
    buffer: wgpu::Buffer,
    capacity: u64,
    len: u32,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, label: &str, capacity: u64) -> Self {
        let capacity = capacity.max(16);
        Self {
            label: label.to_string(),
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents; reallocates when `items` no longer fit
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[T],
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(items);
        let size = bytes.len() as u64;
        if size > self.capacity {
            self.capacity = size.next_power_of_two();
            self.buffer = Self::allocate(device, &self.label, self.capacity);
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = items.len() as u32;
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}
