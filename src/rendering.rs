//! Rendering system: wgpu device, per-layer passes and frame composition.

mod buffers;
mod passes;
mod pipeline;
mod shaders;

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::environment::{Environment, FramePlan, Layer};
use crate::error::{LayerError, RenderError};
use crate::noise::PERM_LEN;
use passes::LayerPasses;
use pipeline::{create_depth_texture, DEPTH_FORMAT};

/// Host-supplied drawing for the external slots (weather effects, placed models)
///
/// Overlays draw into the same pass as the engine layers, after them in
/// `Layer::ORDER`, so they must build pipelines against `color_format()` and
/// `depth_format()`.
pub trait OverlayPass {
    /// `Layer::Weather` or `Layer::Models`
    fn layer(&self) -> Layer;

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Rendering system managing wgpu device, pipelines, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    perm_buffer: wgpu::Buffer,
    perm_seed: Option<u64>,
    passes: LayerPasses,
    layer_errors: Vec<LayerError>,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Window must have 'static lifetime via Arc
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::Adapter)?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfig)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(RenderError::SurfaceConfig)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (_, depth_view) = create_depth_texture(&device, config.width, config.height);

        let perm_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Noise Permutation Buffer"),
            contents: bytemuck::cast_slice(&[0u32; PERM_LEN]),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let mut layer_errors = Vec::new();
        let passes = LayerPasses::new(&device, surface_format, &perm_buffer, &mut layer_errors);

        log::info!(
            "Renderer ready: {}x{} {:?}, {} layer(s) disabled",
            config.width,
            config.height,
            surface_format,
            layer_errors.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            perm_buffer,
            perm_seed: None,
            passes,
            layer_errors,
        })
    }

    /// Layers whose pipelines failed to build; they are skipped every frame
    pub fn layer_errors(&self) -> &[LayerError] {
        &self.layer_errors
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        DEPTH_FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface and depth buffer; zero sizes (minimized) are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        let (_, depth_view) = create_depth_texture(&self.device, width, height);
        self.depth_view = depth_view;
    }

    /// Push the plan's uniforms and any rebuilt geometry to the GPU
    pub fn sync(&mut self, env: &Environment, plan: &FramePlan) {
        if self.perm_seed != Some(plan.noise_seed) {
            log::debug!("Uploading noise permutation for seed {}", plan.noise_seed);
            self.queue.write_buffer(
                &self.perm_buffer,
                0,
                bytemuck::cast_slice(env.noise().permutation()),
            );
            self.perm_seed = Some(plan.noise_seed);
        }

        self.passes.prepare(&self.device, &self.queue, env, plan);
    }

    /// Render one frame in fixed layer order, then the host overlays
    pub fn render(
        &self,
        plan: &FramePlan,
        overlays: &[&dyn OverlayPass],
    ) -> Result<(), RenderError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Visible only where the sky layer is off
        let [r, g, b] = plan.palette.horizon.to_array().map(f64::from);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Environment Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for layer in plan.layers() {
                if layer.is_external() {
                    for overlay in overlays.iter().filter(|o| o.layer() == layer) {
                        overlay.draw(&mut render_pass);
                    }
                } else {
                    self.passes.draw(layer, plan, &mut render_pass);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
